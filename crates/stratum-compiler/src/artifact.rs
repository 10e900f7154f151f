//! Compile requests and their results

use std::fmt;
use stratum_features::{ArtifactKind, Diagnostic, FeatureSet, SampleBudget};

/// One compile request
#[derive(Debug, Clone, Default)]
pub struct CompileRequest {
    pub features: FeatureSet,
    /// Shader name of the main artifact, without prefix
    pub target_name: String,
    /// Name of the base/fallback artifact; also requests it from `compile_all`
    pub base_artifact_name: Option<String>,
    pub is_blend_variant: bool,
}

impl CompileRequest {
    pub fn new(features: FeatureSet, target_name: impl Into<String>) -> Self {
        Self {
            features,
            target_name: target_name.into(),
            base_artifact_name: None,
            is_blend_variant: false,
        }
    }

    pub fn with_base_artifact(mut self, name: impl Into<String>) -> Self {
        self.base_artifact_name = Some(name.into());
        self
    }

    pub fn with_blend_variant(mut self, is_blend: bool) -> Self {
        self.is_blend_variant = is_blend;
        self
    }
}

/// Successfully emitted shader text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledArtifact {
    pub kind: ArtifactKind,
    /// Fully qualified shader name
    pub name: String,
    pub text: String,
    pub budget: SampleBudget,
    /// Non-fatal findings: excluded contributors, backend fallback, budget overruns
    pub diagnostics: Vec<Diagnostic>,
}

/// Why an artifact produced no text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileDiagnostics {
    pub artifact: ArtifactKind,
    /// Contributors excluded before the failure
    pub excluded: Vec<Diagnostic>,
    pub failure: Option<Diagnostic>,
}

impl CompileDiagnostics {
    pub fn new(artifact: ArtifactKind) -> Self {
        Self {
            artifact,
            excluded: Vec::new(),
            failure: None,
        }
    }
}

impl fmt::Display for CompileDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} artifact failed", self.artifact)?;
        if let Some(failure) = &self.failure {
            write!(f, ": {}", failure)?;
        }
        if !self.excluded.is_empty() {
            write!(f, " ({} contributors excluded)", self.excluded.len())?;
        }
        Ok(())
    }
}

impl std::error::Error for CompileDiagnostics {}

pub type ArtifactResult = std::result::Result<CompiledArtifact, CompileDiagnostics>;

/// Every artifact produced from one request, in compile order
#[derive(Debug, Default)]
pub struct CompileOutput {
    pub artifacts: Vec<ArtifactResult>,
}

impl CompileOutput {
    /// Successfully compiled artifacts
    pub fn compiled(&self) -> impl Iterator<Item = &CompiledArtifact> {
        self.artifacts.iter().filter_map(|a| a.as_ref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = &CompileDiagnostics> {
        self.artifacts.iter().filter_map(|a| a.as_ref().err())
    }

    pub fn get(&self, kind: ArtifactKind) -> Option<&ArtifactResult> {
        self.artifacts.iter().find(|a| match a {
            Ok(artifact) => artifact.kind == kind,
            Err(diagnostics) => diagnostics.artifact == kind,
        })
    }

    pub fn is_complete(&self) -> bool {
        self.artifacts.iter().all(|a| a.is_ok())
    }

    /// Text of `kind`; empty when it failed or was not requested
    pub fn text(&self, kind: ArtifactKind) -> &str {
        match self.get(kind) {
            Some(Ok(artifact)) => &artifact.text,
            _ => "",
        }
    }
}
