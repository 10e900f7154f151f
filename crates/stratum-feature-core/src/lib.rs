//! Core splat modules
//!
//! Every terrain material carries these: texture tier and sampling
//! ([`CoreModule`]), the lighting model ([`LightingModule`]) and hole
//! clipping ([`AlphaHoleModule`]).

mod alpha_hole;
mod splat;
mod lighting;

pub use alpha_hole::{AlphaHoleModule, AlphaMode, AlphaToken};
pub use splat::{
    CoreConfig, CoreModule, CoreToken, ForcedModel, SamplerMode, TextureTier,
};
pub use lighting::{LightingModel, LightingModule, LightingToken};
