//! Core splat module
//!
//! Owns the settings every terrain material has: how many textures the
//! arrays hold, how many layers are blended per pixel and how array samples
//! are taken.

use std::fmt::Write;
use stratum_features::{
    feature_tokens, text, EmitContext, FeatureSet, FeatureToken, Module, QualityTier, Result,
    SampleBudget, ShaderModel, SubShaderTags, TokenEnum,
};

feature_tokens! {
    /// Tokens owned by [`CoreModule`]
    pub enum CoreToken {
        Max4Textures => "_MAX4TEXTURES",
        Max8Textures => "_MAX8TEXTURES",
        Max12Textures => "_MAX12TEXTURES",
        Max20Textures => "_MAX20TEXTURES",
        Max24Textures => "_MAX24TEXTURES",
        Max28Textures => "_MAX28TEXTURES",
        Max32Textures => "_MAX32TEXTURES",
        UseLodMip => "_USELODMIP",
        UseGradMip => "_USEGRADMIP",
        PerTexUvScale => "_PERTEXUVSCALEOFFSET",
        Max3Layer => "_MAX3LAYER",
        Max2Layer => "_MAX2LAYER",
        WorldUv => "_WORLDUV",
        ForceModel46 => "_FORCEMODEL46",
        ForceModel50 => "_FORCEMODEL50",
        BaseMap => "_SPLATBASEMAP",
    }
}

/// Number of textures in the splat arrays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextureTier {
    Max4,
    Max8,
    Max12,
    #[default]
    Max16,
    Max20,
    Max24,
    Max28,
    Max32,
}

impl TextureTier {
    pub const ALL: [TextureTier; 8] = [
        TextureTier::Max4,
        TextureTier::Max8,
        TextureTier::Max12,
        TextureTier::Max16,
        TextureTier::Max20,
        TextureTier::Max24,
        TextureTier::Max28,
        TextureTier::Max32,
    ];

    pub fn count(&self) -> u32 {
        match self {
            TextureTier::Max4 => 4,
            TextureTier::Max8 => 8,
            TextureTier::Max12 => 12,
            TextureTier::Max16 => 16,
            TextureTier::Max20 => 20,
            TextureTier::Max24 => 24,
            TextureTier::Max28 => 28,
            TextureTier::Max32 => 32,
        }
    }

    /// 16 is the implicit default and has no token
    fn token(&self) -> Option<CoreToken> {
        match self {
            TextureTier::Max4 => Some(CoreToken::Max4Textures),
            TextureTier::Max8 => Some(CoreToken::Max8Textures),
            TextureTier::Max12 => Some(CoreToken::Max12Textures),
            TextureTier::Max16 => None,
            TextureTier::Max20 => Some(CoreToken::Max20Textures),
            TextureTier::Max24 => Some(CoreToken::Max24Textures),
            TextureTier::Max28 => Some(CoreToken::Max28Textures),
            TextureTier::Max32 => Some(CoreToken::Max32Textures),
        }
    }

    /// Largest tier whose token is present
    fn from_features(features: &FeatureSet) -> Self {
        Self::ALL
            .iter()
            .rev()
            .copied()
            .find(|tier| tier.token().is_some_and(|t| features.contains(t.as_str())))
            .unwrap_or_default()
    }
}

/// How array textures are sampled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SamplerMode {
    /// Hardware derivatives; no explicit choice
    #[default]
    Default,
    LodMip,
    GradientMip,
}

/// Explicitly forced shader model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ForcedModel {
    #[default]
    None,
    Model46,
    Model50,
}

/// Typed state of the core module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CoreConfig {
    pub texture_tier: TextureTier,
    pub sampler_mode: SamplerMode,
    pub per_texture_uv_scale: bool,
    /// Layers blended per pixel: best 4, balanced 3, fastest 2
    pub blend_quality: QualityTier,
    pub world_uv: bool,
    pub forced_model: ForcedModel,
    pub base_map: bool,
}

impl CoreConfig {
    pub fn from_features(features: &FeatureSet) -> Self {
        let has = |token: CoreToken| features.contains(token.as_str());

        let sampler_mode = if has(CoreToken::UseGradMip) {
            SamplerMode::GradientMip
        } else if has(CoreToken::UseLodMip) {
            SamplerMode::LodMip
        } else {
            SamplerMode::Default
        };

        let forced_model = if has(CoreToken::ForceModel50) {
            ForcedModel::Model50
        } else if has(CoreToken::ForceModel46) {
            ForcedModel::Model46
        } else {
            ForcedModel::None
        };

        Self {
            texture_tier: TextureTier::from_features(features),
            sampler_mode,
            per_texture_uv_scale: has(CoreToken::PerTexUvScale),
            blend_quality: QualityTier::from_markers(
                features,
                CoreToken::Max3Layer.as_str(),
                CoreToken::Max2Layer.as_str(),
            ),
            world_uv: has(CoreToken::WorldUv),
            forced_model,
            base_map: has(CoreToken::BaseMap),
        }
    }

    /// Apply dependent defaults
    ///
    /// Per-texture UV scales break hardware derivatives, so without an
    /// explicit choice the sampler switches to gradient sampling.
    pub fn normalize(&mut self) {
        if self.per_texture_uv_scale && self.sampler_mode == SamplerMode::Default {
            log::debug!("Per-texture UV scale forces gradient sampling");
            self.sampler_mode = SamplerMode::GradientMip;
        }
    }

    pub fn tokens(&self) -> Vec<CoreToken> {
        let mut tokens = Vec::new();
        tokens.extend(self.texture_tier.token());
        match self.sampler_mode {
            SamplerMode::Default => {}
            SamplerMode::LodMip => tokens.push(CoreToken::UseLodMip),
            SamplerMode::GradientMip => tokens.push(CoreToken::UseGradMip),
        }
        if self.per_texture_uv_scale {
            tokens.push(CoreToken::PerTexUvScale);
        }
        match self.blend_quality {
            QualityTier::Best => {}
            QualityTier::Balanced => tokens.push(CoreToken::Max3Layer),
            QualityTier::Fastest => tokens.push(CoreToken::Max2Layer),
        }
        if self.world_uv {
            tokens.push(CoreToken::WorldUv);
        }
        match self.forced_model {
            ForcedModel::None => {}
            ForcedModel::Model46 => tokens.push(CoreToken::ForceModel46),
            ForcedModel::Model50 => tokens.push(CoreToken::ForceModel50),
        }
        if self.base_map {
            tokens.push(CoreToken::BaseMap);
        }
        tokens
    }

    /// Layers blended per pixel
    pub fn layer_count(&self) -> u32 {
        self.blend_quality.select(4, 3, 2)
    }
}

/// Core splat module
#[derive(Debug, Clone, Default)]
pub struct CoreModule {
    config: CoreConfig,
}

impl CoreModule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut CoreConfig {
        &mut self.config
    }

    fn sample_macro(&self) -> &'static str {
        match self.config.sampler_mode {
            SamplerMode::Default => "UNITY_SAMPLE_TEX2DARRAY(tex, uv)",
            SamplerMode::LodMip => "UNITY_SAMPLE_TEX2DARRAY_LOD(tex, uv, grads.lod)",
            SamplerMode::GradientMip => "UNITY_SAMPLE_TEX2DARRAY_GRAD(tex, uv, grads.dx, grads.dy)",
        }
    }
}

impl Module for CoreModule {
    fn name(&self) -> &str {
        "Core"
    }

    fn version(&self) -> &str {
        env!("CARGO_PKG_VERSION")
    }

    fn display_sort_order(&self) -> i32 {
        -100
    }

    fn owns_token(&self, token: &str) -> bool {
        CoreToken::owns(token)
    }

    fn pack(&mut self) -> Vec<FeatureToken> {
        self.config.normalize();
        self.config.tokens().iter().map(|t| t.token()).collect()
    }

    fn unpack(&mut self, features: &FeatureSet) {
        self.config = CoreConfig::from_features(features);
    }

    fn required_shader_model(&self) -> Option<ShaderModel> {
        match self.config.forced_model {
            ForcedModel::None => None,
            ForcedModel::Model46 => Some(ShaderModel::SM_4_6),
            ForcedModel::Model50 => Some(ShaderModel::SM_5_0),
        }
    }

    fn declare_tags(&self, _ctx: &EmitContext, tags: &mut SubShaderTags) {
        tags.raise_splat_count(self.config.texture_tier.count());
    }

    fn compute_budget(&self, features: &FeatureSet, budget: &mut SampleBudget) {
        let config = CoreConfig::from_features(features);
        let layers = config.layer_count();

        // control map
        budget.plain_texture_samples += 1;
        // albedo + normal per blended layer
        budget.array_samples += layers * 2;
        budget.max_samples += layers;

        if config.per_texture_uv_scale {
            budget.plain_texture_samples += 1;
            budget.dependent_read_sites += 1;
        }
    }

    fn write_properties(&self, _ctx: &EmitContext, out: &mut String) -> Result<()> {
        writeln!(out, "[HideInInspector] _Control0 (\"Control0\", 2D) = \"red\" {{}}")?;
        writeln!(out, "[NoScaleOffset] _Diffuse (\"Diffuse Array\", 2DArray) = \"white\" {{}}")?;
        writeln!(out, "[NoScaleOffset] _NormalSAO (\"Normal Array\", 2DArray) = \"bump\" {{}}")?;
        writeln!(out, "_UVScale (\"UV Scales\", Vector) = (45, 45, 0, 0)")?;
        if self.config.per_texture_uv_scale {
            writeln!(out, "[HideInInspector] _PerTexProps (\"Per Texture Properties\", 2D) = \"black\" {{}}")?;
        }
        Ok(())
    }

    fn write_per_material_buffer(&self, _ctx: &EmitContext, out: &mut String) -> Result<()> {
        writeln!(out, "float4 _UVScale;")?;
        if self.config.per_texture_uv_scale {
            writeln!(out, "float4 _PerTexProps_TexelSize;")?;
        }
        Ok(())
    }

    fn write_shared_functions(&self, _ctx: &EmitContext, out: &mut String) -> Result<()> {
        writeln!(out, "#define SPLAT_TEXTURE_COUNT {}", self.config.texture_tier.count())?;
        writeln!(out, "#define SPLAT_LAYER_COUNT {}", self.config.layer_count())?;
        writeln!(out, "#define SPLAT_SAMPLE(tex, uv, grads) {}", self.sample_macro())?;
        writeln!(out, "struct SplatGradients {{ float2 dx; float2 dy; float lod; }};")?;
        if self.config.world_uv {
            writeln!(out, "#define SPLAT_UV(i) (i.worldPos.xz)")?;
        } else {
            writeln!(out, "#define SPLAT_UV(i) (i.uv_Control0)")?;
        }
        Ok(())
    }

    fn write_functions(&self, _ctx: &EmitContext, out: &mut String) -> Result<()> {
        text::push_block(out, include_str!("../shaders/core_functions.hlsl"));
        if self.config.per_texture_uv_scale {
            text::push_block(out, include_str!("../shaders/per_texture_uv.hlsl"));
        }
        Ok(())
    }
}
