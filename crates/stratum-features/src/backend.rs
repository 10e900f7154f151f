//! Backend adapter trait
//!
//! A backend writes the render-loop specific scaffolding around module code.
//! The compiler always drives it through the same phase sequence:
//!
//! 1. `write_header` (once)
//! 2. per pass: `write_pass_header`, then - unless `uses_replace_methods()` -
//!    token defines, `write_per_material_buffer` and `write_shared_code`;
//!    module shared functions and functions; `write_vertex_function`;
//!    module after-vertex functions; `write_body`; `write_fragment_function`;
//!    `end_pass`
//! 3. `write_footer` (once), followed by module post generation

use crate::context::EmitContext;
use crate::shader_model::ShaderModel;
use crate::templates::TemplateLookup;
use crate::Result;
use std::collections::BTreeMap;

/// Subshader tags, kept sorted so output is deterministic
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubShaderTags {
    tags: BTreeMap<String, String>,
}

impl SubShaderTags {
    /// Tag carrying the highest texture tier declared by any module
    pub const SPLAT_COUNT: &'static str = "SplatCount";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.tags.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(|v| v.as_str())
    }

    /// Raise the splat count tag to at least `count`
    pub fn raise_splat_count(&mut self, count: u32) {
        let current = self.splat_count().unwrap_or(0);
        if count > current {
            self.set(Self::SPLAT_COUNT, count.to_string());
        }
    }

    pub fn splat_count(&self) -> Option<u32> {
        self.get(Self::SPLAT_COUNT).and_then(|v| v.parse().ok())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tags.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

/// Inputs to `write_header`
#[derive(Debug, Clone, Copy)]
pub struct HeaderInfo<'a> {
    /// Concatenated module property declarations
    pub properties: &'a str,
    pub tags: &'a SubShaderTags,
}

/// Inputs to `write_pass_header`
#[derive(Debug, Clone, Copy)]
pub struct PassInfo<'a> {
    pub index: usize,
    pub shader_model: ShaderModel,
    /// `#define` lines for every active token
    pub defines: &'a str,
    /// Concatenated module per-material buffer fields
    pub module_buffer: &'a str,
    /// Some active module emits hull/domain stages
    pub tessellated: bool,
}

/// Inputs to `write_footer`
#[derive(Debug, Clone, Copy, Default)]
pub struct FooterInfo<'a> {
    /// Base map shader this artifact depends on
    pub dependency: Option<&'a str>,
    pub custom_editor: Option<&'a str>,
    pub fallback: Option<&'a str>,
}

/// Strategy for one target rendering technology
pub trait BackendAdapter: Send + Sync {
    fn name(&self) -> &str;

    /// Release this backend was built for
    fn version(&self) -> &str;

    /// Token selecting this backend
    fn render_loop_token(&self) -> &str;

    /// Resolve named template fragments
    fn init(&mut self, templates: &TemplateLookup) {
        let _ = templates;
    }

    fn minimum_shader_model(&self) -> ShaderModel;

    fn num_passes(&self, ctx: &EmitContext) -> usize {
        let _ = ctx;
        1
    }

    /// Template backends splice defines, buffers and shared code into their
    /// pass header instead of having the compiler write them as phases
    fn uses_replace_methods(&self) -> bool {
        false
    }

    fn write_header(&self, ctx: &EmitContext, header: &HeaderInfo, out: &mut String) -> Result<()>;

    fn write_pass_header(&self, ctx: &EmitContext, pass: &PassInfo, out: &mut String) -> Result<()>;

    /// Backend fields followed by `module_buffer`
    fn write_per_material_buffer(
        &self,
        ctx: &EmitContext,
        module_buffer: &str,
        out: &mut String,
    ) -> Result<()>;

    fn write_shared_code(&self, ctx: &EmitContext, out: &mut String) -> Result<()>;

    fn write_vertex_function(&self, ctx: &EmitContext, out: &mut String) -> Result<()>;

    fn write_body(&self, ctx: &EmitContext, out: &mut String) -> Result<()>;

    fn write_fragment_function(&self, ctx: &EmitContext, out: &mut String) -> Result<()>;

    /// Close the program block opened by `write_pass_header`
    fn end_pass(&self, ctx: &EmitContext, out: &mut String) -> Result<()>;

    fn write_footer(&self, ctx: &EmitContext, footer: &FooterInfo, out: &mut String) -> Result<()>;
}
