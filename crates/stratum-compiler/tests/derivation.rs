mod common;

use common::*;
use stratum_compiler::derive::{
    derive_digger, ALPHA_TOKENS, BASEMAP_TOKEN, BLEND_DISABLE_MARKERS, DETAIL_NOISE_TOKENS,
    DIGGER_MESH_TOKEN, OUTPUT_DIGGER_TOKEN, TERRAIN_BLENDING_TOKEN,
};
use stratum_compiler::{CompileRequest, MemoryKeywordStore, KeywordStore};
use stratum_feature_core::{AlphaHoleModule, CoreModule, LightingModule};
use stratum_feature_noise::NoiseModule;
use stratum_feature_tessellation::{TessToken, TESS_TOKEN_PREFIX};
use stratum_feature_terrain_blend::{DiggerModule, TerrainBlendModule};
use stratum_features::{ArtifactKind, Module, TokenEnum};

#[test]
fn test_compile_all_produces_requested_artifacts() {
    let catalog = synthetic_catalog().with_module::<TerrainBlendModule>().with_module::<DiggerModule>();
    let mut compiler = compiler(catalog);
    let request = CompileRequest::new(
        features(&["_TESSDISTANCE", "_TERRAINBLENDING", "_OUTPUTDIGGER"]),
        "Rock",
    )
    .with_base_artifact("Rock_Base");

    let output = compiler.compile_all(&request);
    assert!(output.is_complete());

    let names: Vec<&str> = output.compiled().map(|a| a.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Stratum/Rock",
            "Stratum/Rock_Base",
            "Stratum/Rock_TerrainObjectBlend",
            "Stratum/Rock_Digger",
        ]
    );

    let base = output.text(ArtifactKind::BaseMap);
    assert!(base.contains("#define _SPLATBASEMAP 1"));
    assert!(!base.contains("#define _TESSDISTANCE 1"));
    assert!(!base.contains("#pragma target 4.6"));

    let blend = output.text(ArtifactKind::TerrainBlend);
    assert!(blend.contains("TerrainBlendWeight"));
    assert!(blend.contains("CustomEditor \"StratumBlendableShaderGUI\""));
    assert!(blend.contains("Fallback Off"));

    let digger = output.text(ArtifactKind::Digger);
    assert!(digger.contains("#define _DIGGERMESH 1"));
    assert!(!digger.contains("#define _TERRAINBLENDING 1"));
    assert!(digger.contains("// Digger mesh shader generated for Stratum/Rock_Digger"));
}

#[test]
fn test_no_derived_artifacts_by_default() {
    let mut compiler = compiler(synthetic_catalog());
    let output = compiler.compile_all(&CompileRequest::new(features(&["_BDRF1"]), "Rock"));
    assert_eq!(output.artifacts.len(), 1);
    assert_eq!(output.text(ArtifactKind::Digger), "");
}

#[test]
fn test_failure_is_isolated_per_artifact() {
    let catalog = synthetic_catalog().with_module::<BlendBreaker>();
    let mut compiler = compiler(catalog);
    let request = CompileRequest::new(features(&["_TERRAINBLENDING", "_OUTPUTDIGGER"]), "Rock")
        .with_base_artifact("Rock_Base");

    let output = compiler.compile_all(&request);

    assert!(!output.is_complete());
    assert!(output.get(ArtifactKind::Main).unwrap().is_ok());
    assert!(output.get(ArtifactKind::BaseMap).unwrap().is_ok());
    assert!(output.get(ArtifactKind::TerrainBlend).unwrap().is_err());
    assert!(output.get(ArtifactKind::Digger).unwrap().is_err());
    assert_eq!(output.failures().count(), 2);
    assert_eq!(output.text(ArtifactKind::TerrainBlend), "");
}

#[test]
fn test_derived_artifacts_ignore_previous_state() {
    let catalog = synthetic_catalog().with_module::<DiggerModule>();
    let request = CompileRequest::new(features(&["_BDRF1", "_TESSDISTANCE", "_OUTPUTDIGGER"]), "Rock");

    let mut fresh = compiler(catalog.clone());
    let fresh_digger = fresh.compile_all(&request).text(ArtifactKind::Digger).to_string();

    let mut reused = compiler(catalog);
    reused.compile_all(&CompileRequest::new(features(&["_OUTPUTDIGGER"]), "Rock"));
    let reused_digger = reused.compile_all(&request).text(ArtifactKind::Digger).to_string();

    assert_eq!(fresh_digger, reused_digger);
    assert!(!fresh_digger.contains("#pragma target 4.6"));
}

#[test]
fn test_digger_transform_is_idempotent() {
    let input = features(&["_TERRAINBLENDING", "_ALPHATEST", "_TESSPHONG", "_OUTPUTDIGGER", "_MAX4TEXTURES"]);
    let once = derive_digger(&input);
    assert_eq!(derive_digger(&once), once);
}

#[test]
fn test_derivation_tokens_are_owned_by_modules() {
    let modules: Vec<Box<dyn Module>> = vec![
        Box::new(CoreModule::default()),
        Box::new(LightingModule::default()),
        Box::new(AlphaHoleModule::default()),
        Box::new(NoiseModule::default()),
        Box::new(TerrainBlendModule::default()),
        Box::new(DiggerModule::default()),
    ];
    let owned = |token: &str| modules.iter().any(|m| m.owns_token(token));

    let mut tokens = vec![BASEMAP_TOKEN, TERRAIN_BLENDING_TOKEN, OUTPUT_DIGGER_TOKEN, DIGGER_MESH_TOKEN];
    tokens.extend(DETAIL_NOISE_TOKENS);
    tokens.extend(ALPHA_TOKENS);
    for (marker, dependent) in BLEND_DISABLE_MARKERS {
        tokens.push(marker);
        tokens.push(dependent);
    }
    for token in tokens {
        assert!(owned(token), "{} is not owned by any module", token);
    }

    assert!(TessToken::ALL.iter().all(|t| t.as_str().starts_with(TESS_TOKEN_PREFIX)));
}

#[test]
fn test_compile_material_reads_store() {
    let mut store = MemoryKeywordStore::new();
    store.set("rock", features(&["_BDRF1"]));

    let mut compiler = compiler(synthetic_catalog());
    let output = compiler.compile_material(&store, "rock", "Rock", None).unwrap();
    assert!(output.text(ArtifactKind::Main).contains(LIGHTING_SHARED.trim_end()));
    assert!(output.get(ArtifactKind::BaseMap).is_none());

    assert!(compiler.compile_material(&store, "sand", "Sand", None).is_err());
}

#[test]
fn test_compile_material_with_base_artifact() {
    let mut store = MemoryKeywordStore::new();
    store.set("rock", features(&["_BDRF1", "_TESSDISTANCE"]));

    let mut compiler = compiler(synthetic_catalog());
    let output = compiler
        .compile_material(&store, "rock", "Rock", Some("Rock_Base"))
        .unwrap();

    assert!(output.is_complete());
    let base = output.get(ArtifactKind::BaseMap).unwrap().as_ref().unwrap();
    assert_eq!(base.name, "Stratum/Rock_Base");
    assert!(base.text.contains("#define _SPLATBASEMAP 1"));
    assert!(output
        .text(ArtifactKind::Main)
        .contains("Dependency \"BaseMapShader\" = \"Stratum/Rock_Base\""));
}
