//! Structured, non-fatal compile diagnostics

use std::fmt;

/// Emission phase, used to locate failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Discover,
    Header,
    Properties,
    PassHeader,
    Defines,
    PerMaterialBuffer,
    SharedCode,
    SharedFunctions,
    Functions,
    VertexFunction,
    AfterVertexFunctions,
    Body,
    FragmentFunction,
    EndPass,
    Footer,
    PostGeneration,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Discover => "discover",
            Phase::Header => "header",
            Phase::Properties => "properties",
            Phase::PassHeader => "pass header",
            Phase::Defines => "defines",
            Phase::PerMaterialBuffer => "per-material buffer",
            Phase::SharedCode => "shared code",
            Phase::SharedFunctions => "shared functions",
            Phase::Functions => "functions",
            Phase::VertexFunction => "vertex function",
            Phase::AfterVertexFunctions => "after-vertex functions",
            Phase::Body => "body",
            Phase::FragmentFunction => "fragment function",
            Phase::EndPass => "end pass",
            Phase::Footer => "footer",
            Phase::PostGeneration => "post generation",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// Contributor built for another release; excluded from emission
    VersionMismatch { expected: String, found: String },
    /// Requested backend was unusable; the default backend was used instead
    BackendFallback { requested: String },
    /// Estimated sampling cost over a configured limit
    BudgetExceeded { metric: &'static str, value: u32, limit: u32 },
    /// A phase or hook returned an error; the artifact was discarded
    EmissionFailure { phase: Phase, message: String },
}

/// One diagnostic, attributed to a module or backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub contributor: String,
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    pub fn version_mismatch(contributor: &str, expected: &str, found: &str) -> Self {
        Self {
            contributor: contributor.to_string(),
            kind: DiagnosticKind::VersionMismatch {
                expected: expected.to_string(),
                found: found.to_string(),
            },
        }
    }

    pub fn backend_fallback(contributor: &str, requested: &str) -> Self {
        Self {
            contributor: contributor.to_string(),
            kind: DiagnosticKind::BackendFallback {
                requested: requested.to_string(),
            },
        }
    }

    pub fn is_version_mismatch(&self) -> bool {
        matches!(self.kind, DiagnosticKind::VersionMismatch { .. })
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DiagnosticKind::VersionMismatch { expected, found } => write!(
                f,
                "{} is version {} but the compiler is {}; it was excluded",
                self.contributor, found, expected
            ),
            DiagnosticKind::BackendFallback { requested } => write!(
                f,
                "{} replaced unusable backend {}",
                self.contributor, requested
            ),
            DiagnosticKind::BudgetExceeded { metric, value, limit } => {
                write!(f, "{} raises {} to {} (limit {})", self.contributor, metric, value, limit)
            }
            DiagnosticKind::EmissionFailure { phase, message } => {
                write!(f, "{} failed during {}: {}", self.contributor, phase, message)
            }
        }
    }
}
