use std::fmt::Write;
use stratum_features::{
    feature_tokens, text, EmitContext, FeatureSet, FeatureToken, Module, Result, TokenEnum,
};

feature_tokens! {
    /// Tokens owned by [`LightingModule`]
    pub enum LightingToken {
        Brdf1 => "_BDRF1",
        Brdf2 => "_BDRF2",
        Brdf3 => "_BDRF3",
        Lambert => "_BDRFLAMBERT",
        Unlit => "_UNLIT",
    }
}

/// Lighting model applied to the blended surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LightingModel {
    /// Whatever the render loop uses by default
    #[default]
    Standard,
    Brdf1,
    Brdf2,
    Brdf3,
    Lambert,
    Unlit,
}

impl LightingModel {
    pub const ALL: [LightingModel; 6] = [
        LightingModel::Standard,
        LightingModel::Brdf1,
        LightingModel::Brdf2,
        LightingModel::Brdf3,
        LightingModel::Lambert,
        LightingModel::Unlit,
    ];

    fn token(&self) -> Option<LightingToken> {
        match self {
            LightingModel::Standard => None,
            LightingModel::Brdf1 => Some(LightingToken::Brdf1),
            LightingModel::Brdf2 => Some(LightingToken::Brdf2),
            LightingModel::Brdf3 => Some(LightingToken::Brdf3),
            LightingModel::Lambert => Some(LightingToken::Lambert),
            LightingModel::Unlit => Some(LightingToken::Unlit),
        }
    }

    /// Unlit wins over any BRDF selection
    fn from_features(features: &FeatureSet) -> Self {
        [
            LightingModel::Unlit,
            LightingModel::Lambert,
            LightingModel::Brdf3,
            LightingModel::Brdf2,
            LightingModel::Brdf1,
        ]
        .into_iter()
        .find(|model| model.token().is_some_and(|t| features.contains(t.as_str())))
        .unwrap_or_default()
    }

    fn brdf_define(&self) -> Option<&'static str> {
        match self {
            LightingModel::Brdf1 => Some("BRDF1_Unity_PBS"),
            LightingModel::Brdf2 => Some("BRDF2_Unity_PBS"),
            LightingModel::Brdf3 => Some("BRDF3_Unity_PBS"),
            _ => None,
        }
    }
}

/// Lighting model selection
#[derive(Debug, Clone, Default)]
pub struct LightingModule {
    pub model: LightingModel,
}

impl Module for LightingModule {
    fn name(&self) -> &str {
        "Lighting"
    }

    fn version(&self) -> &str {
        env!("CARGO_PKG_VERSION")
    }

    fn display_sort_order(&self) -> i32 {
        -90
    }

    fn owns_token(&self, token: &str) -> bool {
        LightingToken::owns(token)
    }

    fn pack(&mut self) -> Vec<FeatureToken> {
        self.model.token().map(|t| t.token()).into_iter().collect()
    }

    fn unpack(&mut self, features: &FeatureSet) {
        self.model = LightingModel::from_features(features);
    }

    fn write_shared_functions(&self, _ctx: &EmitContext, out: &mut String) -> Result<()> {
        if let Some(brdf) = self.model.brdf_define() {
            writeln!(out, "#define UNITY_BRDF_PBS {}", brdf)?;
        }
        match self.model {
            LightingModel::Lambert => writeln!(out, "#define SPLAT_LAMBERT 1")?,
            LightingModel::Unlit => writeln!(out, "#define SPLAT_UNLIT 1")?,
            _ => {}
        }
        Ok(())
    }

    fn write_functions(&self, _ctx: &EmitContext, out: &mut String) -> Result<()> {
        let snippet = match self.model {
            LightingModel::Lambert => include_str!("../shaders/lighting_lambert.hlsl"),
            LightingModel::Unlit => include_str!("../shaders/lighting_unlit.hlsl"),
            _ => include_str!("../shaders/lighting_brdf.hlsl"),
        };
        text::push_block(out, snippet);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratum_features::{ArtifactKind, EnvironmentStamp};

    #[test]
    fn test_round_trip_every_model() {
        for model in LightingModel::ALL {
            let mut module = LightingModule { model };
            let features: FeatureSet = module.pack().into_iter().collect();
            let mut restored = LightingModule::default();
            restored.unpack(&features);
            assert_eq!(restored.model, model);
        }
    }

    #[test]
    fn test_brdf_define_in_shared_functions() {
        let module = LightingModule {
            model: LightingModel::Brdf1,
        };
        let features = FeatureSet::new();
        let env = EnvironmentStamp::default();
        let ctx = EmitContext::new(&features, ArtifactKind::Main, "Test", false, &env);

        let mut out = String::new();
        module.write_shared_functions(&ctx, &mut out).unwrap();
        assert_eq!(out, "#define UNITY_BRDF_PBS BRDF1_Unity_PBS\n");
    }

    #[test]
    fn test_unlit_overrides_brdf() {
        let features: FeatureSet = ["_BDRF2", "_UNLIT"].into_iter().collect();
        assert_eq!(LightingModel::from_features(&features), LightingModel::Unlit);
    }
}
