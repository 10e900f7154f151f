//! Derived artifact token transforms
//!
//! Pure `FeatureSet -> FeatureSet` functions. Each is idempotent and never
//! looks at module state.

use crate::artifact::CompileRequest;
use bitflags::bitflags;
use stratum_features::FeatureSet;

pub const BASEMAP_TOKEN: &str = "_SPLATBASEMAP";
pub const TERRAIN_BLENDING_TOKEN: &str = "_TERRAINBLENDING";
pub const OUTPUT_DIGGER_TOKEN: &str = "_OUTPUTDIGGER";
pub const DIGGER_MESH_TOKEN: &str = "_DIGGERMESH";
/// Every tessellation token starts with this
pub const TESSELLATION_PREFIX: &str = "_TESS";
pub const DETAIL_NOISE_TOKENS: [&str; 2] = ["_DETAILNOISE", "_DISTANCENOISE"];
pub const ALPHA_TOKENS: [&str; 3] = ["_ALPHAHOLE", "_ALPHAHOLETEXTURE", "_ALPHATEST"];

/// Terrain-blend disable markers and the token each one strips
pub const BLEND_DISABLE_MARKERS: [(&str, &str); 3] = [
    ("_TBDISABLE_DETAILNOISE", "_DETAILNOISE"),
    ("_TBDISABLE_DISTANCENOISE", "_DISTANCENOISE"),
    ("_TBDISABLE_DISTANCERESAMPLE", "_DISTANCERESAMPLE"),
];

bitflags! {
    /// Artifacts a request produces besides the main one
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ArtifactKinds: u32 {
        const BASE_MAP = 1 << 0;
        const TERRAIN_BLEND = 1 << 1;
        const DIGGER = 1 << 2;
    }
}

impl ArtifactKinds {
    pub fn for_request(request: &CompileRequest) -> Self {
        let mut kinds = ArtifactKinds::empty();
        if request.base_artifact_name.is_some() {
            kinds |= ArtifactKinds::BASE_MAP;
        }
        if request.features.contains(TERRAIN_BLENDING_TOKEN) {
            kinds |= ArtifactKinds::TERRAIN_BLEND;
        }
        if request.features.contains(OUTPUT_DIGGER_TOKEN) {
            kinds |= ArtifactKinds::DIGGER;
        }
        kinds
    }
}

fn strip_tessellation(features: &mut FeatureSet) {
    features.retain(|token| !token.has_prefix(TESSELLATION_PREFIX));
}

/// Distant/fallback shader: no tessellation, no close-up noise
pub fn derive_base_map(features: &FeatureSet) -> FeatureSet {
    let mut derived = features.clone();
    strip_tessellation(&mut derived);
    derived.remove_all(&DETAIL_NOISE_TOKENS);
    derived.insert(BASEMAP_TOKEN);
    derived
}

/// Object-blend shader
///
/// Each active disable marker strips the feature it names. Markers stay so the
/// terrain-blend module still sees them.
pub fn derive_terrain_blend(features: &FeatureSet) -> FeatureSet {
    let mut derived = features.clone();
    for (marker, dependent) in BLEND_DISABLE_MARKERS {
        if features.contains(marker) {
            derived.remove(dependent);
        }
    }
    derived.remove_all(&[OUTPUT_DIGGER_TOKEN, DIGGER_MESH_TOKEN]);
    derived
}

/// Digger mesh shader
pub fn derive_digger(features: &FeatureSet) -> FeatureSet {
    let mut derived = features.clone();
    strip_tessellation(&mut derived);
    derived.remove_all(&ALPHA_TOKENS);
    derived.remove_all(&[TERRAIN_BLENDING_TOKEN, OUTPUT_DIGGER_TOKEN]);
    derived.insert(DIGGER_MESH_TOKEN);
    derived
}
