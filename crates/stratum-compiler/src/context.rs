use stratum_features::{EnvironmentStamp, TemplateLookup};

/// Inputs shared by every compile, built once by the host
#[derive(Debug, Clone, Default)]
pub struct CompilerContext {
    /// Recorded in every header so output depends only on explicit inputs
    pub environment: EnvironmentStamp,
    /// Handed to modules and backends at discovery
    pub templates: TemplateLookup,
    /// Slots in the bound texture array; caps the `SplatCount` tag
    pub texture_array_slots: Option<u32>,
}

impl CompilerContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_environment(mut self, environment: EnvironmentStamp) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_templates(mut self, templates: TemplateLookup) -> Self {
        self.templates = templates;
        self
    }

    pub fn with_texture_array_slots(mut self, slots: u32) -> Self {
        self.texture_array_slots = Some(slots);
        self
    }
}
