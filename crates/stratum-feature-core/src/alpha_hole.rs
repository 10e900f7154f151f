use std::fmt::Write;
use stratum_features::{
    feature_tokens, text, EmitContext, FeatureSet, FeatureToken, Module, Result, SampleBudget,
    SubShaderTags, TokenEnum,
};

feature_tokens! {
    /// Tokens owned by [`AlphaHoleModule`]
    pub enum AlphaToken {
        Hole => "_ALPHAHOLE",
        HoleTexture => "_ALPHAHOLETEXTURE",
        AlphaTest => "_ALPHATEST",
    }
}

/// How holes are cut into the terrain surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AlphaMode {
    #[default]
    Off,
    /// One splat index is treated as a hole
    Hole,
    /// A dedicated mask texture marks holes
    HoleTexture,
}

/// Alpha clipping for terrain holes
#[derive(Debug, Clone, Default)]
pub struct AlphaHoleModule {
    pub mode: AlphaMode,
    /// Render in the alpha-test queue
    pub alpha_test: bool,
}

impl AlphaHoleModule {
    pub fn is_active(&self) -> bool {
        self.mode != AlphaMode::Off
    }
}

impl Module for AlphaHoleModule {
    fn name(&self) -> &str {
        "Alpha Hole"
    }

    fn version(&self) -> &str {
        env!("CARGO_PKG_VERSION")
    }

    fn compile_sort_order(&self) -> i32 {
        5
    }

    fn display_sort_order(&self) -> i32 {
        20
    }

    fn owns_token(&self, token: &str) -> bool {
        AlphaToken::owns(token)
    }

    fn pack(&mut self) -> Vec<FeatureToken> {
        let mut tokens = Vec::new();
        match self.mode {
            AlphaMode::Off => {}
            AlphaMode::Hole => tokens.push(AlphaToken::Hole.token()),
            AlphaMode::HoleTexture => tokens.push(AlphaToken::HoleTexture.token()),
        }
        if self.alpha_test {
            tokens.push(AlphaToken::AlphaTest.token());
        }
        tokens
    }

    fn unpack(&mut self, features: &FeatureSet) {
        self.mode = if features.contains(AlphaToken::HoleTexture.as_str()) {
            AlphaMode::HoleTexture
        } else if features.contains(AlphaToken::Hole.as_str()) {
            AlphaMode::Hole
        } else {
            AlphaMode::Off
        };
        self.alpha_test = features.contains(AlphaToken::AlphaTest.as_str());
    }

    fn declare_tags(&self, _ctx: &EmitContext, tags: &mut SubShaderTags) {
        if self.alpha_test {
            tags.set("Queue", "AlphaTest");
            tags.set("RenderType", "TransparentCutout");
        }
    }

    fn compute_budget(&self, features: &FeatureSet, budget: &mut SampleBudget) {
        if features.contains(AlphaToken::HoleTexture.as_str()) {
            budget.plain_texture_samples += 1;
        }
    }

    fn write_properties(&self, _ctx: &EmitContext, out: &mut String) -> Result<()> {
        match self.mode {
            AlphaMode::Off => {}
            AlphaMode::Hole => writeln!(out, "_HoleIndex (\"Hole Texture Index\", Int) = 0")?,
            AlphaMode::HoleTexture => {
                writeln!(out, "_AlphaHoleTexture (\"Hole Mask\", 2D) = \"white\" {{}}")?
            }
        }
        Ok(())
    }

    fn write_per_material_buffer(&self, _ctx: &EmitContext, out: &mut String) -> Result<()> {
        if self.mode == AlphaMode::Hole {
            writeln!(out, "int _HoleIndex;")?;
        }
        Ok(())
    }

    fn write_functions(&self, _ctx: &EmitContext, out: &mut String) -> Result<()> {
        if self.is_active() {
            text::push_block(out, include_str!("../shaders/alpha_hole.hlsl"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        for mode in [AlphaMode::Off, AlphaMode::Hole, AlphaMode::HoleTexture] {
            for alpha_test in [false, true] {
                let mut module = AlphaHoleModule { mode, alpha_test };
                let features: FeatureSet = module.pack().into_iter().collect();
                let mut restored = AlphaHoleModule::default();
                restored.unpack(&features);
                assert_eq!(restored.mode, mode);
                assert_eq!(restored.alpha_test, alpha_test);
            }
        }
    }

    #[test]
    fn test_hole_texture_costs_a_sample() {
        let module = AlphaHoleModule::default();
        let mut budget = SampleBudget::new();
        module.compute_budget(&["_ALPHAHOLE"].into_iter().collect(), &mut budget);
        assert_eq!(budget, SampleBudget::new());

        module.compute_budget(&["_ALPHAHOLETEXTURE"].into_iter().collect(), &mut budget);
        assert_eq!(budget.plain_texture_samples, 1);
    }
}
