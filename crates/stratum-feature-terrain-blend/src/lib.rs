//! Terrain blending and digger meshes
//!
//! Both modules only emit code into derived artifacts: the terrain-blend
//! artifact for object meshes resting on the terrain, and the digger artifact
//! for meshes that replace cut-away terrain.

mod digger;
mod terrain_blend;

pub use digger::{DiggerModule, DiggerToken};
pub use terrain_blend::{TerrainBlendModule, TerrainBlendToken};
