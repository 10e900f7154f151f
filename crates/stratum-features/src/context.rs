//! Context types handed to modules and backends while a shader is emitted

use crate::feature_set::FeatureSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which of the correlated outputs of one request is being emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// The shader the material actually uses
    Main,
    /// Simplified distant/fallback shader
    BaseMap,
    /// Shader used by meshes blending into the terrain
    TerrainBlend,
    /// Shader for digger cave/overhang meshes
    Digger,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArtifactKind::Main => "main",
            ArtifactKind::BaseMap => "basemap",
            ArtifactKind::TerrainBlend => "terrain-blend",
            ArtifactKind::Digger => "digger",
        };
        f.write_str(name)
    }
}

/// Build environment recorded in the header comment
///
/// Kept explicit so two compiles with the same inputs produce identical text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentStamp {
    pub engine: String,
    pub platform: String,
}

impl Default for EnvironmentStamp {
    fn default() -> Self {
        Self {
            engine: "unknown".to_string(),
            platform: std::env::consts::OS.to_string(),
        }
    }
}

impl EnvironmentStamp {
    pub fn new(engine: impl Into<String>, platform: impl Into<String>) -> Self {
        Self {
            engine: engine.into(),
            platform: platform.into(),
        }
    }
}

/// Context provided to every emission hook
#[derive(Debug, Clone, Copy)]
pub struct EmitContext<'a> {
    /// Token set of the artifact being emitted (after derivation)
    pub features: &'a FeatureSet,
    pub artifact: ArtifactKind,
    /// Fully qualified shader name
    pub shader_name: &'a str,
    /// Blend variants select the blend fragment body and blend-only buffers
    pub is_blend: bool,
    pub pass_index: usize,
    pub environment: &'a EnvironmentStamp,
}

impl<'a> EmitContext<'a> {
    pub fn new(
        features: &'a FeatureSet,
        artifact: ArtifactKind,
        shader_name: &'a str,
        is_blend: bool,
        environment: &'a EnvironmentStamp,
    ) -> Self {
        Self {
            features,
            artifact,
            shader_name,
            is_blend,
            pass_index: 0,
            environment,
        }
    }

    /// Same context for another pass
    pub fn for_pass(self, pass_index: usize) -> Self {
        Self { pass_index, ..self }
    }

    pub fn has(&self, token: &str) -> bool {
        self.features.contains(token)
    }
}
