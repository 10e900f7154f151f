//! Detail noise, distance noise and distance resampling
//!
//! All three break up visible tiling at different view distances.

use std::fmt::Write;
use stratum_features::{
    feature_tokens, text, EmitContext, FeatureSet, FeatureToken, Module, QualityTier, Result,
    SampleBudget, TokenEnum,
};

feature_tokens! {
    /// Tokens owned by [`NoiseModule`]
    pub enum NoiseToken {
        DetailNoise => "_DETAILNOISE",
        DistanceNoise => "_DISTANCENOISE",
        DistanceResample => "_DISTANCERESAMPLE",
        ResampleBalanced => "_RESAMPLEBALANCED",
        ResampleFastest => "_RESAMPLEFASTEST",
    }
}

#[derive(Debug, Clone, Default)]
pub struct NoiseModule {
    pub detail_noise: bool,
    pub distance_noise: bool,
    pub distance_resample: bool,
    /// Layers re-sampled in the far blend
    pub resample_quality: QualityTier,
}

impl NoiseModule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resample_layers(quality: QualityTier) -> u32 {
        quality.select(4, 2, 1)
    }

    fn resample_quality_of(features: &FeatureSet) -> QualityTier {
        QualityTier::from_markers(
            features,
            NoiseToken::ResampleBalanced.as_str(),
            NoiseToken::ResampleFastest.as_str(),
        )
    }
}

impl Module for NoiseModule {
    fn name(&self) -> &str {
        "Noise"
    }

    fn version(&self) -> &str {
        env!("CARGO_PKG_VERSION")
    }

    fn compile_sort_order(&self) -> i32 {
        20
    }

    fn display_sort_order(&self) -> i32 {
        40
    }

    fn owns_token(&self, token: &str) -> bool {
        NoiseToken::owns(token)
    }

    fn pack(&mut self) -> Vec<FeatureToken> {
        let mut tokens = Vec::new();
        if self.detail_noise {
            tokens.push(NoiseToken::DetailNoise.token());
        }
        if self.distance_noise {
            tokens.push(NoiseToken::DistanceNoise.token());
        }
        if self.distance_resample {
            tokens.push(NoiseToken::DistanceResample.token());
            match self.resample_quality {
                QualityTier::Best => {}
                QualityTier::Balanced => tokens.push(NoiseToken::ResampleBalanced.token()),
                QualityTier::Fastest => tokens.push(NoiseToken::ResampleFastest.token()),
            }
        }
        tokens
    }

    fn unpack(&mut self, features: &FeatureSet) {
        self.detail_noise = features.contains(NoiseToken::DetailNoise.as_str());
        self.distance_noise = features.contains(NoiseToken::DistanceNoise.as_str());
        self.distance_resample = features.contains(NoiseToken::DistanceResample.as_str());
        self.resample_quality = Self::resample_quality_of(features);
    }

    fn compute_budget(&self, features: &FeatureSet, budget: &mut SampleBudget) {
        if features.contains(NoiseToken::DetailNoise.as_str()) {
            budget.plain_texture_samples += 1;
        }
        if features.contains(NoiseToken::DistanceNoise.as_str()) {
            budget.plain_texture_samples += 1;
        }
        if features.contains(NoiseToken::DistanceResample.as_str()) {
            let layers = Self::resample_layers(Self::resample_quality_of(features));
            budget.array_samples += layers;
            budget.max_samples += layers;
        }
    }

    fn write_properties(&self, _ctx: &EmitContext, out: &mut String) -> Result<()> {
        if self.detail_noise {
            writeln!(out, "_DetailNoise (\"Detail Noise\", 2D) = \"grey\" {{}}")?;
            writeln!(out, "_DetailNoiseScaleStrengthFade (\"Detail Scale/Strength/Fade\", Vector) = (4, 0.5, 5, 0)")?;
        }
        if self.distance_noise {
            writeln!(out, "_DistanceNoise (\"Distance Noise\", 2D) = \"grey\" {{}}")?;
            writeln!(out, "_DistanceNoiseScaleStrengthFade (\"Distance Scale/Strength/Fade\", Vector) = (0.25, 0.5, 100, 250)")?;
        }
        if self.distance_resample {
            writeln!(out, "_ResampleDistanceParams (\"Resample UV Scale/Start/Fade\", Vector) = (0.25, 100, 250, 0)")?;
        }
        Ok(())
    }

    fn write_per_material_buffer(&self, _ctx: &EmitContext, out: &mut String) -> Result<()> {
        if self.detail_noise {
            writeln!(out, "float4 _DetailNoiseScaleStrengthFade;")?;
        }
        if self.distance_noise {
            writeln!(out, "float4 _DistanceNoiseScaleStrengthFade;")?;
        }
        if self.distance_resample {
            writeln!(out, "float4 _ResampleDistanceParams;")?;
        }
        Ok(())
    }

    fn write_shared_functions(&self, _ctx: &EmitContext, out: &mut String) -> Result<()> {
        if self.distance_resample {
            writeln!(
                out,
                "#define RESAMPLE_LAYER_COUNT {}",
                Self::resample_layers(self.resample_quality)
            )?;
        }
        Ok(())
    }

    fn write_functions(&self, _ctx: &EmitContext, out: &mut String) -> Result<()> {
        if self.detail_noise {
            text::push_block(out, include_str!("../shaders/detail_noise.hlsl"));
        }
        if self.distance_noise {
            text::push_block(out, include_str!("../shaders/distance_noise.hlsl"));
        }
        if self.distance_resample {
            text::push_block(out, include_str!("../shaders/distance_resample.hlsl"));
        }
        Ok(())
    }
}
