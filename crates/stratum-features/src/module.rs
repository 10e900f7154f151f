//! Module trait definition
//!
//! This is the core interface every capability module implements.
//!
//! **Lifecycle:**
//! 1. `init()` - called once when the registry is discovered
//! 2. `unpack()` - hydrate typed state from a feature set (every compile)
//! 3. emission hooks - called in compile order, only for version-matching modules
//! 4. `pack()` - flatten typed state back into tokens (GUI writes)

use crate::backend::SubShaderTags;
use crate::budget::SampleBudget;
use crate::context::EmitContext;
use crate::feature_set::FeatureSet;
use crate::shader_model::ShaderModel;
use crate::templates::TemplateLookup;
use crate::token::FeatureToken;
use crate::Result;

/// Module trait - implemented by all capability modules
pub trait Module: Send + Sync + ModuleExt {
    /// Display name
    fn name(&self) -> &str;

    /// Release this module was built for
    ///
    /// Modules report their crate version; only modules matching
    /// [`COMPILER_VERSION`](crate::COMPILER_VERSION) take part in emission.
    fn version(&self) -> &str;

    /// Lower values emit code earlier. Ties sort by type name.
    fn compile_sort_order(&self) -> i32 {
        0
    }

    /// Lower values are shown earlier in configuration UIs. Ties sort by type name.
    fn display_sort_order(&self) -> i32 {
        0
    }

    /// Resolve named template fragments
    fn init(&mut self, templates: &TemplateLookup) {
        let _ = templates;
    }

    /// True if `token` belongs to this module's closed token set
    fn owns_token(&self, token: &str) -> bool;

    /// Flatten typed state into tokens
    ///
    /// May normalize dependent defaults first; calling it twice yields the
    /// same tokens.
    fn pack(&mut self) -> Vec<FeatureToken>;

    /// Hydrate every owned field from token presence
    ///
    /// Must ignore tokens the module does not own.
    fn unpack(&mut self, features: &FeatureSet);

    /// Minimum shader model this module needs for the current state
    fn required_shader_model(&self) -> Option<ShaderModel> {
        None
    }

    /// True while this module emits hull/domain stages
    ///
    /// Backends add their tessellation pragmas only when some active module
    /// reports this.
    fn tessellates(&self) -> bool {
        false
    }

    /// True if this module only contributes code to blend artifacts
    ///
    /// Its cost is then left out of the budget of every other artifact.
    fn blend_only(&self) -> bool {
        false
    }

    /// Contribute subshader-level tags (e.g. the active texture tier)
    fn declare_tags(&self, ctx: &EmitContext, tags: &mut SubShaderTags) {
        let _ = (ctx, tags);
    }

    /// Add this module's sampling cost for `features` to `budget`
    ///
    /// Must only depend on tokens the module owns so totals stay additive.
    fn compute_budget(&self, features: &FeatureSet, budget: &mut SampleBudget) {
        let _ = (features, budget);
    }

    fn write_properties(&self, ctx: &EmitContext, out: &mut String) -> Result<()> {
        let _ = (ctx, out);
        Ok(())
    }

    fn write_per_material_buffer(&self, ctx: &EmitContext, out: &mut String) -> Result<()> {
        let _ = (ctx, out);
        Ok(())
    }

    /// Code other modules may call, emitted before any `write_functions`
    fn write_shared_functions(&self, ctx: &EmitContext, out: &mut String) -> Result<()> {
        let _ = (ctx, out);
        Ok(())
    }

    fn write_functions(&self, ctx: &EmitContext, out: &mut String) -> Result<()> {
        let _ = (ctx, out);
        Ok(())
    }

    /// Post-process vertex output (tessellation stages and the like)
    fn write_after_vertex_functions(&self, ctx: &EmitContext, out: &mut String) -> Result<()> {
        let _ = (ctx, out);
        Ok(())
    }

    /// Free-form trailing text appended after the footer
    fn post_generation(&self, ctx: &EmitContext, out: &mut String) -> Result<()> {
        let _ = (ctx, out);
        Ok(())
    }
}

/// Helper trait for downcasting, naming and cloning module trait objects
pub trait ModuleExt {
    fn as_any(&self) -> &dyn std::any::Any;
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any;
    /// Unqualified type name, used as the sort tie-break
    fn type_name(&self) -> &'static str;
    fn clone_box(&self) -> Box<dyn Module>;
}

impl<T: Module + Clone + 'static> ModuleExt for T {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }

    fn type_name(&self) -> &'static str {
        let full = std::any::type_name::<T>();
        full.rsplit("::").next().unwrap_or(full)
    }

    fn clone_box(&self) -> Box<dyn Module> {
        Box::new(self.clone())
    }
}

impl Clone for Box<dyn Module> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Pack every module into one feature set
pub fn pack_modules(modules: &mut [Box<dyn Module>]) -> FeatureSet {
    let mut features = FeatureSet::new();
    for module in modules.iter_mut() {
        features.extend(module.pack());
    }
    features
}

/// Unpack one feature set into every module
pub fn unpack_modules(features: &FeatureSet, modules: &mut [Box<dyn Module>]) {
    for module in modules.iter_mut() {
        module.unpack(features);
    }
}
