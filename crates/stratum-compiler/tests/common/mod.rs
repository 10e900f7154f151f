#![allow(dead_code)]

use stratum_compiler::{Compiler, CompilerConfig, CompilerContext, ScriptableBackend, SurfaceBackend};
use stratum_features::{
    BackendAdapter, EmitContext, EnvironmentStamp, Error, FeatureSet, FeatureToken, FooterInfo,
    HeaderInfo, Module, ModuleCatalog, PassInfo, Result, SampleBudget, ShaderModel,
    COMPILER_VERSION,
};

pub const LIGHTING_FUNCTIONS: &str = "// lighting functions\n";
pub const LIGHTING_SHARED: &str = "#define UNITY_BRDF_PBS BRDF1_Unity_PBS\n";
pub const TESSELLATION_FUNCTIONS: &str = "// tessellation functions\n";
pub const TESSELLATION_SHARED: &str = "// tessellation shared\n";
pub const OUTDATED_FUNCTIONS: &str = "// outdated functions\n";

pub fn features(tokens: &[&str]) -> FeatureSet {
    tokens.iter().copied().collect()
}

fn flag(enabled: bool, token: &str) -> Vec<FeatureToken> {
    if enabled {
        vec![FeatureToken::from(token)]
    } else {
        Vec::new()
    }
}

#[derive(Debug, Clone, Default)]
pub struct SyntheticLighting {
    pub brdf1: bool,
}

impl Module for SyntheticLighting {
    fn name(&self) -> &str {
        "Lighting"
    }
    fn version(&self) -> &str {
        COMPILER_VERSION
    }
    fn display_sort_order(&self) -> i32 {
        100
    }
    fn owns_token(&self, token: &str) -> bool {
        token == "_BDRF1"
    }
    fn pack(&mut self) -> Vec<FeatureToken> {
        flag(self.brdf1, "_BDRF1")
    }
    fn unpack(&mut self, features: &FeatureSet) {
        self.brdf1 = features.contains("_BDRF1");
    }
    fn write_shared_functions(&self, _ctx: &EmitContext, out: &mut String) -> Result<()> {
        if self.brdf1 {
            out.push_str(LIGHTING_SHARED);
        }
        Ok(())
    }
    fn write_functions(&self, _ctx: &EmitContext, out: &mut String) -> Result<()> {
        out.push_str(LIGHTING_FUNCTIONS);
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct SyntheticTessellation {
    pub distance: bool,
}

impl Module for SyntheticTessellation {
    fn name(&self) -> &str {
        "Tessellation"
    }
    fn version(&self) -> &str {
        COMPILER_VERSION
    }
    fn compile_sort_order(&self) -> i32 {
        10
    }
    fn display_sort_order(&self) -> i32 {
        -10
    }
    fn owns_token(&self, token: &str) -> bool {
        token == "_TESSDISTANCE"
    }
    fn pack(&mut self) -> Vec<FeatureToken> {
        flag(self.distance, "_TESSDISTANCE")
    }
    fn unpack(&mut self, features: &FeatureSet) {
        self.distance = features.contains("_TESSDISTANCE");
    }
    fn required_shader_model(&self) -> Option<ShaderModel> {
        self.distance.then_some(ShaderModel::SM_4_6)
    }
    fn tessellates(&self) -> bool {
        self.distance
    }
    fn write_shared_functions(&self, _ctx: &EmitContext, out: &mut String) -> Result<()> {
        out.push_str(TESSELLATION_SHARED);
        Ok(())
    }
    fn write_functions(&self, _ctx: &EmitContext, out: &mut String) -> Result<()> {
        out.push_str(TESSELLATION_FUNCTIONS);
        Ok(())
    }
}

/// Built against another release
#[derive(Debug, Clone, Default)]
pub struct OutdatedModule;

impl Module for OutdatedModule {
    fn name(&self) -> &str {
        "Outdated"
    }
    fn version(&self) -> &str {
        "0.0.1"
    }
    fn owns_token(&self, token: &str) -> bool {
        token == "_OUTDATED"
    }
    fn pack(&mut self) -> Vec<FeatureToken> {
        Vec::new()
    }
    fn unpack(&mut self, _features: &FeatureSet) {}
    fn compute_budget(&self, _features: &FeatureSet, budget: &mut SampleBudget) {
        budget.array_samples += 100;
    }
    fn write_properties(&self, _ctx: &EmitContext, out: &mut String) -> Result<()> {
        out.push_str("_Outdated (\"Outdated\", Float) = 0\n");
        Ok(())
    }
    fn write_functions(&self, _ctx: &EmitContext, out: &mut String) -> Result<()> {
        out.push_str(OUTDATED_FUNCTIONS);
        Ok(())
    }
}

/// Always tessellates, but was built against another release
#[derive(Debug, Clone, Default)]
pub struct OutdatedTessellation;

impl Module for OutdatedTessellation {
    fn name(&self) -> &str {
        "Outdated Tessellation"
    }
    fn version(&self) -> &str {
        "0.0.1"
    }
    fn owns_token(&self, _token: &str) -> bool {
        false
    }
    fn pack(&mut self) -> Vec<FeatureToken> {
        Vec::new()
    }
    fn unpack(&mut self, _features: &FeatureSet) {}
    fn tessellates(&self) -> bool {
        true
    }
}

/// Fails while emitting blend artifacts
#[derive(Debug, Clone, Default)]
pub struct BlendBreaker;

impl Module for BlendBreaker {
    fn name(&self) -> &str {
        "Blend Breaker"
    }
    fn version(&self) -> &str {
        COMPILER_VERSION
    }
    fn owns_token(&self, _token: &str) -> bool {
        false
    }
    fn pack(&mut self) -> Vec<FeatureToken> {
        Vec::new()
    }
    fn unpack(&mut self, _features: &FeatureSet) {}
    fn write_functions(&self, ctx: &EmitContext, _out: &mut String) -> Result<()> {
        if ctx.is_blend {
            return Err(Error::Config("blend variant unsupported".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct CostA;

impl Module for CostA {
    fn name(&self) -> &str {
        "Cost A"
    }
    fn version(&self) -> &str {
        COMPILER_VERSION
    }
    fn owns_token(&self, token: &str) -> bool {
        token == "_COSTA"
    }
    fn pack(&mut self) -> Vec<FeatureToken> {
        Vec::new()
    }
    fn unpack(&mut self, _features: &FeatureSet) {}
    fn compute_budget(&self, features: &FeatureSet, budget: &mut SampleBudget) {
        if features.contains("_COSTA") {
            budget.array_samples += 6;
            budget.max_samples += 3;
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CostB;

impl Module for CostB {
    fn name(&self) -> &str {
        "Cost B"
    }
    fn version(&self) -> &str {
        COMPILER_VERSION
    }
    fn owns_token(&self, token: &str) -> bool {
        token == "_COSTB"
    }
    fn pack(&mut self) -> Vec<FeatureToken> {
        Vec::new()
    }
    fn unpack(&mut self, _features: &FeatureSet) {}
    fn compute_budget(&self, features: &FeatureSet, budget: &mut SampleBudget) {
        if features.contains("_COSTB") {
            budget.plain_texture_samples += 2;
            budget.tessellation_samples += 4;
            budget.dependent_read_sites += 1;
        }
    }
}

/// Scriptable backend reporting another release
#[derive(Default)]
pub struct OutdatedBackend(ScriptableBackend);

impl BackendAdapter for OutdatedBackend {
    fn name(&self) -> &str {
        "Outdated Scriptable"
    }
    fn version(&self) -> &str {
        "0.0.1"
    }
    fn render_loop_token(&self) -> &str {
        "_RENDERLOOP_OUTDATED"
    }
    fn minimum_shader_model(&self) -> ShaderModel {
        self.0.minimum_shader_model()
    }
    fn write_header(&self, ctx: &EmitContext, header: &HeaderInfo, out: &mut String) -> Result<()> {
        self.0.write_header(ctx, header, out)
    }
    fn write_pass_header(&self, ctx: &EmitContext, pass: &PassInfo, out: &mut String) -> Result<()> {
        self.0.write_pass_header(ctx, pass, out)
    }
    fn write_per_material_buffer(&self, ctx: &EmitContext, buffer: &str, out: &mut String) -> Result<()> {
        self.0.write_per_material_buffer(ctx, buffer, out)
    }
    fn write_shared_code(&self, ctx: &EmitContext, out: &mut String) -> Result<()> {
        self.0.write_shared_code(ctx, out)
    }
    fn write_vertex_function(&self, ctx: &EmitContext, out: &mut String) -> Result<()> {
        self.0.write_vertex_function(ctx, out)
    }
    fn write_body(&self, ctx: &EmitContext, out: &mut String) -> Result<()> {
        self.0.write_body(ctx, out)
    }
    fn write_fragment_function(&self, ctx: &EmitContext, out: &mut String) -> Result<()> {
        self.0.write_fragment_function(ctx, out)
    }
    fn end_pass(&self, ctx: &EmitContext, out: &mut String) -> Result<()> {
        self.0.end_pass(ctx, out)
    }
    fn write_footer(&self, ctx: &EmitContext, footer: &FooterInfo, out: &mut String) -> Result<()> {
        self.0.write_footer(ctx, footer, out)
    }
}

pub fn environment() -> EnvironmentStamp {
    EnvironmentStamp::new("test-engine", "test-os")
}

pub fn synthetic_catalog() -> ModuleCatalog {
    ModuleCatalog::new()
        .with_module::<SyntheticTessellation>()
        .with_module::<SyntheticLighting>()
        .with_default_backend::<SurfaceBackend>()
        .with_backend::<ScriptableBackend>()
}

pub fn compiler(catalog: ModuleCatalog) -> Compiler {
    let context = CompilerContext::new().with_environment(environment());
    Compiler::new(catalog, context, CompilerConfig::default())
}
