//! Distance-based tessellation with height displacement
//!
//! Adds hull and domain stages after the vertex function. The displacement
//! height is sampled from the splat arrays, so the quality tier controls how
//! many layers are blended in the domain stage.

use std::fmt::Write;
use stratum_features::{
    feature_tokens, text, EmitContext, FeatureSet, FeatureToken, Module, QualityTier, Result,
    SampleBudget, ShaderModel, TokenEnum,
};

feature_tokens! {
    /// Tokens owned by [`TessellationModule`]
    pub enum TessToken {
        Distance => "_TESSDISTANCE",
        Phong => "_TESSPHONG",
        Balanced => "_TESSBALANCED",
        Fastest => "_TESSFASTEST",
    }
}

/// Prefix shared by every tessellation token
pub const TESS_TOKEN_PREFIX: &str = "_TESS";

/// Tessellation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TessellationMode {
    #[default]
    Off,
    Distance,
}

/// Default material property values written into the property block
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TessellationDefaults {
    pub max_factor: f32,
    pub displacement: f32,
    pub height_offset: f32,
    pub phong_strength: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for TessellationDefaults {
    fn default() -> Self {
        Self {
            max_factor: 12.0,
            displacement: 0.5,
            height_offset: 1.0,
            phong_strength: 0.5,
            min_distance: 15.0,
            max_distance: 35.0,
        }
    }
}

impl TessellationDefaults {
    pub fn with_max_factor(mut self, max_factor: f32) -> Self {
        self.max_factor = max_factor;
        self
    }

    pub fn with_displacement(mut self, displacement: f32) -> Self {
        self.displacement = displacement;
        self
    }

    pub fn with_distance_range(mut self, min: f32, max: f32) -> Self {
        self.min_distance = min;
        self.max_distance = max;
        self
    }
}

/// Tessellation module
#[derive(Debug, Clone, Default)]
pub struct TessellationModule {
    pub mode: TessellationMode,
    pub phong: bool,
    pub quality: QualityTier,
    pub defaults: TessellationDefaults,
}

impl TessellationModule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults(mut self, defaults: TessellationDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.mode == TessellationMode::Distance
    }

    /// Layers blended when sampling displacement height
    pub fn height_samples(quality: QualityTier) -> u32 {
        quality.select(4, 2, 1)
    }
}

impl Module for TessellationModule {
    fn name(&self) -> &str {
        "Tessellation"
    }

    fn version(&self) -> &str {
        env!("CARGO_PKG_VERSION")
    }

    fn compile_sort_order(&self) -> i32 {
        10
    }

    fn display_sort_order(&self) -> i32 {
        30
    }

    fn owns_token(&self, token: &str) -> bool {
        TessToken::owns(token)
    }

    fn pack(&mut self) -> Vec<FeatureToken> {
        if !self.is_enabled() {
            // phong and quality only mean something with tessellation on
            return Vec::new();
        }
        let mut tokens = vec![TessToken::Distance.token()];
        if self.phong {
            tokens.push(TessToken::Phong.token());
        }
        match self.quality {
            QualityTier::Best => {}
            QualityTier::Balanced => tokens.push(TessToken::Balanced.token()),
            QualityTier::Fastest => tokens.push(TessToken::Fastest.token()),
        }
        tokens
    }

    fn unpack(&mut self, features: &FeatureSet) {
        self.mode = if features.contains(TessToken::Distance.as_str()) {
            TessellationMode::Distance
        } else {
            TessellationMode::Off
        };
        self.phong = features.contains(TessToken::Phong.as_str());
        self.quality = QualityTier::from_markers(
            features,
            TessToken::Balanced.as_str(),
            TessToken::Fastest.as_str(),
        );
    }

    fn required_shader_model(&self) -> Option<ShaderModel> {
        self.is_enabled().then_some(ShaderModel::SM_4_6)
    }

    fn tessellates(&self) -> bool {
        self.is_enabled()
    }

    fn compute_budget(&self, features: &FeatureSet, budget: &mut SampleBudget) {
        if !features.contains(TessToken::Distance.as_str()) {
            return;
        }
        let quality = QualityTier::from_markers(
            features,
            TessToken::Balanced.as_str(),
            TessToken::Fastest.as_str(),
        );
        budget.tessellation_samples += Self::height_samples(quality);
    }

    fn write_properties(&self, _ctx: &EmitContext, out: &mut String) -> Result<()> {
        if !self.is_enabled() {
            return Ok(());
        }
        let d = &self.defaults;
        writeln!(
            out,
            "_TessData1 (\"Tessellation\", Vector) = ({}, {}, {}, {})",
            d.max_factor, d.displacement, d.height_offset, d.phong_strength
        )?;
        writeln!(
            out,
            "_TessData2 (\"Tessellation Distance\", Vector) = ({}, {}, 0, 0)",
            d.min_distance, d.max_distance
        )?;
        Ok(())
    }

    fn write_per_material_buffer(&self, _ctx: &EmitContext, out: &mut String) -> Result<()> {
        if self.is_enabled() {
            writeln!(out, "float4 _TessData1;")?;
            writeln!(out, "float4 _TessData2;")?;
        }
        Ok(())
    }

    fn write_shared_functions(&self, _ctx: &EmitContext, out: &mut String) -> Result<()> {
        if self.is_enabled() {
            writeln!(out, "#define TESS_SAMPLE_COUNT {}", Self::height_samples(self.quality))?;
        }
        Ok(())
    }

    fn write_after_vertex_functions(&self, _ctx: &EmitContext, out: &mut String) -> Result<()> {
        if self.is_enabled() {
            text::push_block(out, include_str!("../shaders/tessellation.hlsl"));
            text::push_block(out, include_str!("../shaders/displacement.hlsl"));
        }
        Ok(())
    }
}
