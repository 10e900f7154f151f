use std::fmt::Write;
use stratum_features::{
    feature_tokens, text, EmitContext, FeatureSet, FeatureToken, Module, Result, TokenEnum,
};

feature_tokens! {
    /// Tokens owned by [`DiggerModule`]
    pub enum DiggerToken {
        /// Request a digger artifact next to the main one
        Output => "_OUTPUTDIGGER",
        /// Set on the derived digger artifact itself
        Mesh => "_DIGGERMESH",
    }
}

/// Cave/overhang meshes that cut holes into the terrain
#[derive(Debug, Clone, Default)]
pub struct DiggerModule {
    pub output_digger: bool,
    pub digger_mesh: bool,
}

impl Module for DiggerModule {
    fn name(&self) -> &str {
        "Digger"
    }

    fn version(&self) -> &str {
        env!("CARGO_PKG_VERSION")
    }

    fn compile_sort_order(&self) -> i32 {
        40
    }

    fn display_sort_order(&self) -> i32 {
        60
    }

    fn owns_token(&self, token: &str) -> bool {
        DiggerToken::owns(token)
    }

    fn pack(&mut self) -> Vec<FeatureToken> {
        let mut tokens = Vec::new();
        if self.output_digger {
            tokens.push(DiggerToken::Output.token());
        }
        if self.digger_mesh {
            tokens.push(DiggerToken::Mesh.token());
        }
        tokens
    }

    fn unpack(&mut self, features: &FeatureSet) {
        self.output_digger = features.contains(DiggerToken::Output.as_str());
        self.digger_mesh = features.contains(DiggerToken::Mesh.as_str());
    }

    fn write_per_material_buffer(&self, _ctx: &EmitContext, out: &mut String) -> Result<()> {
        if self.digger_mesh {
            writeln!(out, "float4 _TerrainBlendBounds;")?;
        }
        Ok(())
    }

    fn write_functions(&self, _ctx: &EmitContext, out: &mut String) -> Result<()> {
        if self.digger_mesh {
            writeln!(out, "sampler2D _TerrainHolesTexture;")?;
            text::push_block(out, include_str!("../shaders/digger.hlsl"));
        }
        Ok(())
    }

    fn post_generation(&self, ctx: &EmitContext, out: &mut String) -> Result<()> {
        if self.digger_mesh {
            writeln!(out, "// Digger mesh shader generated for {}", ctx.shader_name)?;
            writeln!(out, "// Assign it to meshes produced by the digger tool only")?;
        }
        Ok(())
    }
}
