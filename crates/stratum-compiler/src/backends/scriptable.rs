use super::{write_footer, write_shader_open, write_stamp};
use std::fmt::Write;
use stratum_features::{
    text, BackendAdapter, EmitContext, FooterInfo, HeaderInfo, PassInfo, Result, ShaderModel,
    TemplateLookup,
};

const PASS_TEMPLATE: &str = include_str!("../../templates/pass_scriptable.txt");
const FRAGMENT_STANDARD: &str = include_str!("../../templates/fragment_scriptable.txt");
const FRAGMENT_BLEND: &str = include_str!("../../templates/fragment_scriptable_blend.txt");

/// (pass name, light mode)
const PASSES: [(&str, &str); 2] = [("Forward", "UniversalForward"), ("ShadowCaster", "ShadowCaster")];

/// Scriptable render pipeline: a forward pass plus a shadow caster
///
/// The program preamble of each pass comes from a template; the defines,
/// material buffer and shared code are substituted into it.
#[derive(Debug, Clone)]
pub struct ScriptableBackend {
    pass_template: String,
    fragment_standard: String,
    fragment_blend: String,
}

impl Default for ScriptableBackend {
    fn default() -> Self {
        Self {
            pass_template: PASS_TEMPLATE.to_string(),
            fragment_standard: FRAGMENT_STANDARD.to_string(),
            fragment_blend: FRAGMENT_BLEND.to_string(),
        }
    }
}

impl ScriptableBackend {
    pub const RENDER_LOOP_TOKEN: &'static str = "_RENDERLOOP_SCRIPTABLE";

    fn pass_pragmas(ctx: &EmitContext, pass: &PassInfo) -> String {
        let mut pragmas = String::new();
        if pass.tessellated {
            pragmas.push_str("   #pragma hull SplatHull\n   #pragma domain SplatDomain\n");
        }
        if ctx.pass_index == 1 {
            pragmas.push_str("   #define SHADOW_CASTER_PASS 1\n");
        }
        pragmas
    }
}

impl BackendAdapter for ScriptableBackend {
    fn name(&self) -> &str {
        "Scriptable"
    }

    fn version(&self) -> &str {
        env!("CARGO_PKG_VERSION")
    }

    fn render_loop_token(&self) -> &str {
        Self::RENDER_LOOP_TOKEN
    }

    fn init(&mut self, templates: &TemplateLookup) {
        self.pass_template = templates.find_or("pass_scriptable.txt", PASS_TEMPLATE);
        self.fragment_standard = templates.find_or("fragment_scriptable.txt", FRAGMENT_STANDARD);
        self.fragment_blend = templates.find_or("fragment_scriptable_blend.txt", FRAGMENT_BLEND);
    }

    fn minimum_shader_model(&self) -> ShaderModel {
        ShaderModel::SM_4_5
    }

    /// Blend meshes already cast shadows with their own material
    fn num_passes(&self, ctx: &EmitContext) -> usize {
        if ctx.is_blend {
            1
        } else {
            PASSES.len()
        }
    }

    fn uses_replace_methods(&self) -> bool {
        true
    }

    fn write_header(&self, ctx: &EmitContext, header: &HeaderInfo, out: &mut String) -> Result<()> {
        write_stamp(ctx, "scriptable", out)?;
        write_shader_open(ctx, header, out)?;
        writeln!(out, "      HLSLINCLUDE")?;
        writeln!(out, "      #include \"Packages/com.unity.render-pipelines.universal/ShaderLibrary/Core.hlsl\"")?;
        writeln!(out, "      ENDHLSL")?;
        Ok(())
    }

    fn write_pass_header(&self, ctx: &EmitContext, pass: &PassInfo, out: &mut String) -> Result<()> {
        let (name, light_mode) = PASSES.get(pass.index).copied().unwrap_or(PASSES[0]);

        let mut buffer = String::new();
        self.write_per_material_buffer(ctx, pass.module_buffer, &mut buffer)?;
        let mut shared = String::new();
        self.write_shared_code(ctx, &mut shared)?;
        let target = pass.shader_model.to_string();
        let pragmas = Self::pass_pragmas(ctx, pass);

        let header = text::replace_placeholders(
            &self.pass_template,
            &[
                ("PASSNAME", name),
                ("LIGHTMODE", light_mode),
                ("TARGET", &target),
                ("PASSPRAGMAS", pragmas.trim_end_matches('\n')),
                ("DEFINES", pass.defines.trim_end_matches('\n')),
                ("CBUFFER", buffer.trim_end_matches('\n')),
                ("SHAREDCODE", shared.trim_end_matches('\n')),
            ],
        );
        text::push_block(out, &header);
        Ok(())
    }

    fn write_per_material_buffer(
        &self,
        _ctx: &EmitContext,
        module_buffer: &str,
        out: &mut String,
    ) -> Result<()> {
        writeln!(out, "float4 _Control0_TexelSize;")?;
        text::push_block(out, module_buffer);
        Ok(())
    }

    fn write_shared_code(&self, _ctx: &EmitContext, out: &mut String) -> Result<()> {
        writeln!(out, "TEXTURE2D(_Control0); SAMPLER(sampler_Control0);")?;
        writeln!(out, "TEXTURE2D_ARRAY(_Diffuse); SAMPLER(sampler_Diffuse);")?;
        writeln!(out, "TEXTURE2D_ARRAY(_NormalSAO);")?;
        writeln!(out, "struct Varyings")?;
        writeln!(out, "{{")?;
        writeln!(out, "   float4 positionCS : SV_POSITION;")?;
        writeln!(out, "   float2 uv_Control0 : TEXCOORD0;")?;
        writeln!(out, "   float3 worldPos : TEXCOORD1;")?;
        writeln!(out, "   float3 worldNormal : TEXCOORD2;")?;
        writeln!(out, "   nointerpolation int4 indexes : TEXCOORD3;")?;
        writeln!(out, "   half4 weights : TEXCOORD4;")?;
        writeln!(out, "}};")?;
        writeln!(out, "struct SplatSurface {{ half3 Albedo; half3 Normal; half Smoothness; half Occlusion; half Alpha; }};")?;
        Ok(())
    }

    fn write_vertex_function(&self, _ctx: &EmitContext, out: &mut String) -> Result<()> {
        writeln!(out, "Varyings Vert(float4 positionOS : POSITION, float3 normalOS : NORMAL, float2 uv : TEXCOORD0)")?;
        writeln!(out, "{{")?;
        writeln!(out, "   Varyings o = (Varyings)0;")?;
        writeln!(out, "   o.worldPos = TransformObjectToWorld(positionOS.xyz);")?;
        writeln!(out, "   o.positionCS = TransformWorldToHClip(o.worldPos);")?;
        writeln!(out, "   o.worldNormal = TransformObjectToWorldNormal(normalOS);")?;
        writeln!(out, "   o.uv_Control0 = uv;")?;
        writeln!(out, "   return o;")?;
        writeln!(out, "}}")?;
        Ok(())
    }

    fn write_body(&self, _ctx: &EmitContext, out: &mut String) -> Result<()> {
        writeln!(out, "void SplatBody(Varyings i, inout SplatSurface o)")?;
        writeln!(out, "{{")?;
        writeln!(out, "   SplatGradients grads = (SplatGradients)0;")?;
        writeln!(out, "   half4 albedo = SampleSplats(i.indexes, i.weights, SPLAT_UV(i), grads);")?;
        writeln!(out, "   o.Albedo = albedo.rgb;")?;
        writeln!(out, "   o.Smoothness = albedo.a;")?;
        writeln!(out, "   o.Normal = SampleSplatNormals(i.indexes, i.weights, SPLAT_UV(i), grads);")?;
        writeln!(out, "   o.Alpha = 1;")?;
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
        writeln!(out, "   ENDHLSL")?;
        writeln!(out, "}}")?;
        Ok(())
    }

    fn write_footer(&self, _ctx: &EmitContext, footer: &FooterInfo, out: &mut String) -> Result<()> {
        write_footer(footer, out)
    }
}
