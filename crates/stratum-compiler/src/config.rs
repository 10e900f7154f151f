//! Compiler configuration
//!
//! Loaded from TOML; every field has a default so partial files work.

use serde::{Deserialize, Serialize};
use std::path::Path;
use stratum_features::{BudgetLimits, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Prepended to every artifact name
    pub shader_prefix: String,
    /// Material inspector for the main artifact
    pub custom_editor: Option<String>,
    /// Material inspector for the terrain-blend artifact
    pub blend_custom_editor: Option<String>,
    /// Fallback used when no base artifact is requested
    pub fallback_shader: Option<String>,
    pub blend_suffix: String,
    pub digger_suffix: String,
    pub budget: BudgetLimits,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            shader_prefix: "Stratum/".to_string(),
            custom_editor: Some("StratumShaderGUI".to_string()),
            blend_custom_editor: Some("StratumBlendableShaderGUI".to_string()),
            fallback_shader: Some("Diffuse".to_string()),
            blend_suffix: "_TerrainObjectBlend".to_string(),
            digger_suffix: "_Digger".to_string(),
            budget: BudgetLimits::default(),
        }
    }
}

impl CompilerConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        log::debug!("Loaded compiler config from {}", path.display());
        Ok(config)
    }

    pub fn with_shader_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.shader_prefix = prefix.into();
        self
    }

    pub fn with_custom_editor(mut self, editor: Option<String>) -> Self {
        self.custom_editor = editor;
        self
    }

    pub fn with_blend_custom_editor(mut self, editor: Option<String>) -> Self {
        self.blend_custom_editor = editor;
        self
    }

    pub fn with_fallback_shader(mut self, fallback: Option<String>) -> Self {
        self.fallback_shader = fallback;
        self
    }

    pub fn with_budget(mut self, budget: BudgetLimits) -> Self {
        self.budget = budget;
        self
    }

    /// Fully qualified shader name for `target`
    pub fn qualified_name(&self, target: &str) -> String {
        if target.starts_with(&self.shader_prefix) {
            target.to_string()
        } else {
            format!("{}{}", self.shader_prefix, target)
        }
    }
}
