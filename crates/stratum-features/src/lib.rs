//! Stratum feature system
//!
//! A material is configured through a flat set of boolean feature tokens.
//! Modules are independently authored capability units: each one owns a slice
//! of those tokens, hydrates typed state from them and contributes code
//! fragments to the shader the compiler assembles.
//!
//! This crate holds the leaf types shared by every module crate and by the
//! compiler:
//!
//! - [`FeatureToken`] / [`FeatureSet`] - the serialized configuration
//! - [`Module`] - the capability contract (pack/unpack codec + emission hooks)
//! - [`BackendAdapter`] - the per render-loop phase writer
//! - [`ModuleRegistry`] - discovery, version filtering and the two sort orders
//! - [`SampleBudget`] - additive texture sampling cost model

mod backend;
mod budget;
mod context;
mod diagnostics;
mod feature_set;
mod module;
mod registry;
mod shader_model;
mod templates;
mod token;
pub mod text;

pub use backend::{BackendAdapter, FooterInfo, HeaderInfo, PassInfo, SubShaderTags};
pub use budget::{compute_budget, BudgetLimits, BudgetOverrun, QualityTier, SampleBudget};
pub use context::{ArtifactKind, EmitContext, EnvironmentStamp};
pub use diagnostics::{Diagnostic, DiagnosticKind, Phase};
pub use feature_set::FeatureSet;
pub use module::{pack_modules, unpack_modules, Module, ModuleExt};
pub use registry::{
    sort_modules_for_compile, sort_modules_for_display, BackendFactory, ModuleCatalog,
    ModuleFactory, ModuleRegistry,
};
pub use shader_model::ShaderModel;
pub use templates::TemplateLookup;
pub use token::{FeatureToken, TokenEnum, TokenKind};

/// Version every module and backend must report to take part in a compile.
pub const COMPILER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result type for feature system operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while configuring or emitting a shader
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{contributor} failed during {phase}: {message}")]
    Emission {
        phase: Phase,
        contributor: String,
        message: String,
    },

    #[error("Format error: {0}")]
    Format(#[from] std::fmt::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown backend: {0}")]
    UnknownBackend(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// Emission error raised from inside a hook
    pub fn emission(phase: Phase, contributor: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Emission {
            phase,
            contributor: contributor.into(),
            message: message.into(),
        }
    }
}
