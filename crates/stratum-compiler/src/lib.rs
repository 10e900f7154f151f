//! Stratum shader compiler
//!
//! Drives registered modules and one backend adapter through a fixed phase
//! sequence and assembles the resulting shader text.
//!
//! A request produces the main artifact plus up to three derived ones:
//!
//! - **base map** when a base artifact name is given
//! - **terrain blend** when `_TERRAINBLENDING` is active
//! - **digger** when `_OUTPUTDIGGER` is active
//!
//! Each derived artifact is compiled from a pure token transform of the
//! request's feature set (see [`derive`]).

mod artifact;
mod backends;
mod compiler;
mod config;
mod context;
pub mod derive;
mod store;

pub use artifact::{ArtifactResult, CompileDiagnostics, CompileOutput, CompileRequest, CompiledArtifact};
pub use backends::{ScriptableBackend, SurfaceBackend};
pub use compiler::Compiler;
pub use config::CompilerConfig;
pub use context::CompilerContext;
pub use derive::ArtifactKinds;
pub use store::{KeywordStore, MemoryKeywordStore};
