use std::fmt::Write;
use stratum_features::{
    feature_tokens, text, EmitContext, FeatureSet, FeatureToken, Module, Result, SampleBudget,
    SubShaderTags, TokenEnum,
};

feature_tokens! {
    /// Tokens owned by [`TerrainBlendModule`]
    pub enum TerrainBlendToken {
        Enabled => "_TERRAINBLENDING",
        DisableDetailNoise => "_TBDISABLE_DETAILNOISE",
        DisableDistanceNoise => "_TBDISABLE_DISTANCENOISE",
        DisableDistanceResample => "_TBDISABLE_DISTANCERESAMPLE",
    }
}

/// Blends object meshes into the terrain they intersect
#[derive(Debug, Clone, Default)]
pub struct TerrainBlendModule {
    pub enabled: bool,
    pub disable_detail_noise: bool,
    pub disable_distance_noise: bool,
    pub disable_distance_resample: bool,
}

impl TerrainBlendModule {
    pub fn new() -> Self {
        Self::default()
    }

    fn emits(&self, ctx: &EmitContext) -> bool {
        self.enabled && ctx.is_blend
    }
}

impl Module for TerrainBlendModule {
    fn name(&self) -> &str {
        "Terrain Blending"
    }

    fn version(&self) -> &str {
        env!("CARGO_PKG_VERSION")
    }

    fn compile_sort_order(&self) -> i32 {
        30
    }

    fn display_sort_order(&self) -> i32 {
        50
    }

    fn owns_token(&self, token: &str) -> bool {
        TerrainBlendToken::owns(token)
    }

    fn pack(&mut self) -> Vec<FeatureToken> {
        if !self.enabled {
            return Vec::new();
        }
        let flags = [
            (true, TerrainBlendToken::Enabled),
            (self.disable_detail_noise, TerrainBlendToken::DisableDetailNoise),
            (self.disable_distance_noise, TerrainBlendToken::DisableDistanceNoise),
            (self.disable_distance_resample, TerrainBlendToken::DisableDistanceResample),
        ];
        flags
            .into_iter()
            .filter(|(on, _)| *on)
            .map(|(_, token)| token.token())
            .collect()
    }

    fn unpack(&mut self, features: &FeatureSet) {
        let has = |token: TerrainBlendToken| features.contains(token.as_str());
        self.enabled = has(TerrainBlendToken::Enabled);
        self.disable_detail_noise = has(TerrainBlendToken::DisableDetailNoise);
        self.disable_distance_noise = has(TerrainBlendToken::DisableDistanceNoise);
        self.disable_distance_resample = has(TerrainBlendToken::DisableDistanceResample);
    }

    fn blend_only(&self) -> bool {
        true
    }

    fn declare_tags(&self, ctx: &EmitContext, tags: &mut SubShaderTags) {
        if self.emits(ctx) {
            tags.set("Queue", "Geometry+101");
        }
    }

    fn compute_budget(&self, features: &FeatureSet, budget: &mut SampleBudget) {
        if features.contains(TerrainBlendToken::Enabled.as_str()) {
            // terrain height + terrain normal
            budget.plain_texture_samples += 2;
            budget.dependent_read_sites += 1;
        }
    }

    fn write_properties(&self, ctx: &EmitContext, out: &mut String) -> Result<()> {
        if self.emits(ctx) {
            writeln!(out, "_TerrainBlendParams (\"Blend Height/Slope/Contrast/Scale\", Vector) = (0.5, 1, 1, 600)")?;
        }
        Ok(())
    }

    fn write_per_material_buffer(&self, ctx: &EmitContext, out: &mut String) -> Result<()> {
        if self.emits(ctx) {
            writeln!(out, "float4 _TerrainBlendParams;")?;
            writeln!(out, "float4 _TerrainBlendBounds;")?;
        }
        Ok(())
    }

    fn write_functions(&self, ctx: &EmitContext, out: &mut String) -> Result<()> {
        if self.emits(ctx) {
            writeln!(out, "sampler2D _TerrainHeightmapTexture;")?;
            writeln!(out, "sampler2D _TerrainNormalmapTexture;")?;
            text::push_block(out, include_str!("../shaders/terrain_blend.hlsl"));
        }
        Ok(())
    }
}
