use super::{write_footer, write_shader_open, write_stamp};
use std::fmt::Write;
use stratum_features::{
    text, BackendAdapter, EmitContext, FooterInfo, HeaderInfo, PassInfo, Result, ShaderModel,
    TemplateLookup,
};

const FRAGMENT_STANDARD: &str = include_str!("../../templates/fragment_standard.txt");
const FRAGMENT_BLEND: &str = include_str!("../../templates/fragment_blend.txt");

/// Built-in render loop, emitted as a single-pass surface shader
#[derive(Debug, Clone)]
pub struct SurfaceBackend {
    fragment_standard: String,
    fragment_blend: String,
}

impl Default for SurfaceBackend {
    fn default() -> Self {
        Self {
            fragment_standard: FRAGMENT_STANDARD.to_string(),
            fragment_blend: FRAGMENT_BLEND.to_string(),
        }
    }
}

impl SurfaceBackend {
    pub const RENDER_LOOP_TOKEN: &'static str = "_RENDERLOOP_SURFACE";
}

impl BackendAdapter for SurfaceBackend {
    fn name(&self) -> &str {
        "Surface"
    }

    fn version(&self) -> &str {
        env!("CARGO_PKG_VERSION")
    }

    fn render_loop_token(&self) -> &str {
        Self::RENDER_LOOP_TOKEN
    }

    fn init(&mut self, templates: &TemplateLookup) {
        self.fragment_standard = templates.find_or("fragment_standard.txt", FRAGMENT_STANDARD);
        self.fragment_blend = templates.find_or("fragment_blend.txt", FRAGMENT_BLEND);
    }

    fn minimum_shader_model(&self) -> ShaderModel {
        ShaderModel::SM_3_5
    }

    fn write_header(&self, ctx: &EmitContext, header: &HeaderInfo, out: &mut String) -> Result<()> {
        write_stamp(ctx, "surface", out)?;
        write_shader_open(ctx, header, out)
    }

    fn write_pass_header(&self, ctx: &EmitContext, pass: &PassInfo, out: &mut String) -> Result<()> {
        writeln!(out, "      CGPROGRAM")?;
        let mut surface = String::from("#pragma surface surf Standard vertex:SplatVert fullforwardshadows");
        if pass.tessellated {
            surface.push_str(" tessellate:PatchConstant");
        }
        if ctx.is_blend {
            surface.push_str(" decal:blend");
        } else {
            surface.push_str(" addshadow");
        }
        writeln!(out, "      {}", surface)?;
        writeln!(out, "      #pragma target {}", pass.shader_model)?;
        writeln!(out, "      #include \"UnityPBSLighting.cginc\"")?;
        Ok(())
    }

    fn write_per_material_buffer(
        &self,
        _ctx: &EmitContext,
        module_buffer: &str,
        out: &mut String,
    ) -> Result<()> {
        writeln!(out, "float4 _Control0_TexelSize;")?;
        writeln!(out, "float _Contrast;")?;
        text::push_block(out, module_buffer);
        Ok(())
    }

    fn write_shared_code(&self, _ctx: &EmitContext, out: &mut String) -> Result<()> {
        writeln!(out, "UNITY_DECLARE_TEX2D(_Control0);")?;
        writeln!(out, "UNITY_DECLARE_TEX2DARRAY(_Diffuse);")?;
        writeln!(out, "UNITY_DECLARE_TEX2DARRAY(_NormalSAO);")?;
        writeln!(out, "struct Input")?;
        writeln!(out, "{{")?;
        writeln!(out, "   float2 uv_Control0;")?;
        writeln!(out, "   float3 worldPos;")?;
        writeln!(out, "   float3 worldNormal; INTERNAL_DATA")?;
        writeln!(out, "   int4 indexes;")?;
        writeln!(out, "   half4 weights;")?;
        writeln!(out, "}};")?;
        Ok(())
    }

    fn write_vertex_function(&self, _ctx: &EmitContext, out: &mut String) -> Result<()> {
        writeln!(out, "void SplatVert(inout appdata_full v, out Input o)")?;
        writeln!(out, "{{")?;
        writeln!(out, "   UNITY_INITIALIZE_OUTPUT(Input, o);")?;
        writeln!(out, "   v.tangent.xyz = cross(v.normal, float3(0, 0, 1));")?;
        writeln!(out, "   v.tangent.w = -1;")?;
        writeln!(out, "}}")?;
        Ok(())
    }

    fn write_body(&self, _ctx: &EmitContext, out: &mut String) -> Result<()> {
        writeln!(out, "void SplatBody(Input i, inout SurfaceOutputStandard o)")?;
        writeln!(out, "{{")?;
        writeln!(out, "   SplatGradients grads = (SplatGradients)0;")?;
        writeln!(out, "   half4 albedo = SampleSplats(i.indexes, i.weights, SPLAT_UV(i), grads);")?;
        writeln!(out, "   o.Albedo = albedo.rgb;")?;
        writeln!(out, "   o.Smoothness = albedo.a;")?;
        writeln!(out, "   o.Normal = SampleSplatNormals(i.indexes, i.weights, SPLAT_UV(i), grads);")?;
        writeln!(out, "}}")?;
        Ok(())
    }

    fn write_fragment_function(&self, ctx: &EmitContext, out: &mut String) -> Result<()> {
        let body = if ctx.is_blend {
            &self.fragment_blend
        } else {
            &self.fragment_standard
        };
        text::push_block(out, body);
        Ok(())
    }

    fn end_pass(&self, _ctx: &EmitContext, out: &mut String) -> Result<()> {
        writeln!(out, "      ENDCG")?;
        Ok(())
    }

    fn write_footer(&self, _ctx: &EmitContext, footer: &FooterInfo, out: &mut String) -> Result<()> {
        write_footer(footer, out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratum_features::{ArtifactKind, EnvironmentStamp, FeatureSet};

    #[test]
    fn test_blend_selects_blend_fragment() {
        let backend = SurfaceBackend::default();
        let features = FeatureSet::new();
        let env = EnvironmentStamp::default();

        let mut standard = String::new();
        let ctx = EmitContext::new(&features, ArtifactKind::Main, "Test", false, &env);
        backend.write_fragment_function(&ctx, &mut standard).unwrap();

        let mut blend = String::new();
        let ctx = EmitContext::new(&features, ArtifactKind::TerrainBlend, "Test", true, &env);
        backend.write_fragment_function(&ctx, &mut blend).unwrap();

        assert!(!standard.contains("TerrainBlendWeight"));
        assert!(blend.contains("TerrainBlendWeight"));
    }

    #[test]
    fn test_templates_override_builtins() {
        let mut backend = SurfaceBackend::default();
        backend.init(&TemplateLookup::new().with_entry("custom/fragment_standard.txt", "// custom"));

        let features = FeatureSet::new();
        let env = EnvironmentStamp::default();
        let ctx = EmitContext::new(&features, ArtifactKind::Main, "Test", false, &env);
        let mut out = String::new();
        backend.write_fragment_function(&ctx, &mut out).unwrap();
        assert_eq!(out, "// custom\n");
    }

    #[test]
    fn test_tessellation_pragma_follows_pass() {
        let backend = SurfaceBackend::default();
        let features: FeatureSet = ["_TESSPHONG"].into_iter().collect();
        let env = EnvironmentStamp::default();
        let ctx = EmitContext::new(&features, ArtifactKind::Main, "Test", false, &env);
        let mut pass = PassInfo {
            index: 0,
            shader_model: ShaderModel::SM_3_5,
            defines: "",
            module_buffer: "",
            tessellated: false,
        };

        let mut plain = String::new();
        backend.write_pass_header(&ctx, &pass, &mut plain).unwrap();
        assert!(!plain.contains("tessellate:"));

        pass.tessellated = true;
        pass.shader_model = ShaderModel::SM_4_6;
        let mut out = String::new();
        backend.write_pass_header(&ctx, &pass, &mut out).unwrap();
        assert!(out.contains("tessellate:PatchConstant"));
        assert!(out.contains("#pragma target 4.6"));
    }
}
