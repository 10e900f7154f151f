//! Stratum - feature-module shader composition for terrain materials
//!
//! A material is a flat set of feature tokens. Independent modules turn those
//! tokens into typed settings and shader fragments; the compiler stitches the
//! fragments into complete shaders through a backend for the target render
//! loop, along with the base-map, terrain-blend and digger variants.
//!
//! ```no_run
//! use stratum::prelude::*;
//!
//! let mut compiler = stratum::default_compiler(CompilerContext::new(), CompilerConfig::default());
//! let features: FeatureSet = ["_MAX8TEXTURES", "_BDRF1", "_TESSDISTANCE"].into_iter().collect();
//! let output = compiler.compile_all(&CompileRequest::new(features, "Rock").with_base_artifact("Rock_Base"));
//! for artifact in output.compiled() {
//!     println!("{}", artifact.text);
//! }
//! ```

pub use stratum_compiler as compiler;
pub use stratum_feature_core as core;
pub use stratum_feature_noise as noise;
pub use stratum_feature_tessellation as tessellation;
pub use stratum_feature_terrain_blend as terrain_blend;
pub use stratum_features as features;

use stratum_compiler::{Compiler, CompilerConfig, CompilerContext, ScriptableBackend, SurfaceBackend};
use stratum_features::ModuleCatalog;

pub mod prelude {
    pub use crate::compiler::{
        CompileDiagnostics, CompileOutput, CompileRequest, CompiledArtifact, Compiler,
        CompilerConfig, CompilerContext, KeywordStore, MemoryKeywordStore,
    };
    pub use crate::features::{
        ArtifactKind, Diagnostic, DiagnosticKind, EnvironmentStamp, FeatureSet, FeatureToken,
        Module, ModuleRegistry, SampleBudget, TemplateLookup,
    };
}

/// Every built-in module, with the surface backend as default
pub fn default_catalog() -> ModuleCatalog {
    ModuleCatalog::new()
        .with_module::<core::CoreModule>()
        .with_module::<core::LightingModule>()
        .with_module::<core::AlphaHoleModule>()
        .with_module::<tessellation::TessellationModule>()
        .with_module::<noise::NoiseModule>()
        .with_module::<terrain_blend::TerrainBlendModule>()
        .with_module::<terrain_blend::DiggerModule>()
        .with_default_backend::<SurfaceBackend>()
        .with_backend::<ScriptableBackend>()
}

/// Compiler over [`default_catalog`]
pub fn default_compiler(context: CompilerContext, config: CompilerConfig) -> Compiler {
    log::debug!("Building compiler with {} built-in modules", default_catalog().module_count());
    Compiler::new(default_catalog(), context, config)
}
