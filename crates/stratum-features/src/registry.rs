//! Module registry
//!
//! Modules are not discovered by scanning types at runtime. A
//! [`ModuleCatalog`] lists constructors explicitly; the registry instantiates
//! each of them exactly once, the first time it is discovered.

use crate::backend::BackendAdapter;
use crate::budget::{compute_budget, SampleBudget};
use crate::feature_set::FeatureSet;
use crate::module::{pack_modules, unpack_modules, Module};
use crate::templates::TemplateLookup;
use crate::token::FeatureToken;
use crate::{Error, Result};

/// Constructor of one module
pub type ModuleFactory = fn() -> Box<dyn Module>;

/// Constructor of one backend
pub type BackendFactory = fn() -> Box<dyn BackendAdapter>;

fn make_module<M: Module + Default + 'static>() -> Box<dyn Module> {
    Box::new(M::default())
}

fn make_backend<B: BackendAdapter + Default + 'static>() -> Box<dyn BackendAdapter> {
    Box::new(B::default())
}

/// Static list of everything a registry can instantiate
#[derive(Clone, Default)]
pub struct ModuleCatalog {
    modules: Vec<ModuleFactory>,
    backends: Vec<BackendFactory>,
    default_backend: Option<usize>,
}

impl ModuleCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_module<M: Module + Default + 'static>(self) -> Self {
        self.with_module_factory(make_module::<M>)
    }

    pub fn with_module_factory(mut self, factory: ModuleFactory) -> Self {
        self.modules.push(factory);
        self
    }

    pub fn with_backend<B: BackendAdapter + Default + 'static>(self) -> Self {
        self.with_backend_factory(make_backend::<B>)
    }

    pub fn with_backend_factory(mut self, factory: BackendFactory) -> Self {
        self.backends.push(factory);
        self
    }

    /// Register the backend used when no render-loop token matches
    pub fn with_default_backend<B: BackendAdapter + Default + 'static>(mut self) -> Self {
        self.default_backend = Some(self.backends.len());
        self.backends.push(make_backend::<B>);
        self
    }

    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    pub fn backend_count(&self) -> usize {
        self.backends.len()
    }
}

/// Sort by `(display_sort_order, type name)`; stable
pub fn sort_modules_for_display(modules: &mut [Box<dyn Module>]) {
    modules.sort_by(|a, b| {
        a.display_sort_order()
            .cmp(&b.display_sort_order())
            .then_with(|| a.type_name().cmp(b.type_name()))
    });
}

/// Sort by `(compile_sort_order, type name)`; stable
pub fn sort_modules_for_compile(modules: &mut [Box<dyn Module>]) {
    modules.sort_by(|a, b| {
        a.compile_sort_order()
            .cmp(&b.compile_sort_order())
            .then_with(|| a.type_name().cmp(b.type_name()))
    });
}

/// Registry owning every discovered module and backend
pub struct ModuleRegistry {
    catalog: ModuleCatalog,
    modules: Vec<Box<dyn Module>>,
    backends: Vec<Box<dyn BackendAdapter>>,
    default_backend: usize,
    selected_backend: usize,
    /// The last unpacked set named the selected backend's token itself
    explicit_render_loop: bool,
    /// Tokens seen by `unpack` that nothing owns; re-emitted by `pack`
    passthrough: Vec<FeatureToken>,
    populated: bool,
}

impl ModuleRegistry {
    pub fn new(catalog: ModuleCatalog) -> Self {
        Self {
            catalog,
            modules: Vec::new(),
            backends: Vec::new(),
            default_backend: 0,
            selected_backend: 0,
            explicit_render_loop: false,
            passthrough: Vec::new(),
            populated: false,
        }
    }

    /// Instantiate and initialize everything in the catalog
    ///
    /// Does nothing once the registry is populated.
    pub fn discover(&mut self, templates: &TemplateLookup) -> Result<()> {
        if self.populated {
            return Ok(());
        }

        if self.catalog.backends.is_empty() {
            return Err(Error::Config("no backend registered in the module catalog".into()));
        }

        self.modules = self.catalog.modules.iter().map(|factory| factory()).collect();
        for module in &mut self.modules {
            module.init(templates);
            log::debug!("Discovered module {} ({})", module.name(), module.version());
        }

        self.backends = self.catalog.backends.iter().map(|factory| factory()).collect();
        for backend in &mut self.backends {
            backend.init(templates);
            log::debug!("Discovered backend {} ({})", backend.name(), backend.version());
        }

        self.default_backend = self.catalog.default_backend.unwrap_or(0);
        self.selected_backend = self.default_backend;
        self.sort_for_display();
        self.populated = true;

        log::info!(
            "Module registry populated: {} modules, {} backends",
            self.modules.len(),
            self.backends.len()
        );
        Ok(())
    }

    pub fn is_populated(&self) -> bool {
        self.populated
    }

    /// Modules in display order
    pub fn modules(&self) -> &[Box<dyn Module>] {
        &self.modules
    }

    pub fn modules_mut(&mut self) -> &mut [Box<dyn Module>] {
        &mut self.modules
    }

    pub fn backends(&self) -> &[Box<dyn BackendAdapter>] {
        &self.backends
    }

    pub fn sort_for_display(&mut self) {
        sort_modules_for_display(&mut self.modules);
    }

    pub fn sort_for_compile(&mut self) {
        sort_modules_for_compile(&mut self.modules);
    }

    /// Index of the backend whose render-loop token appears first in the
    /// backend list, or of the default backend
    pub fn resolve_backend(&self, features: &FeatureSet) -> usize {
        self.backends
            .iter()
            .position(|backend| features.contains(backend.render_loop_token()))
            .unwrap_or(self.default_backend)
    }

    /// Select the backend for `features` and return it
    pub fn select_backend(&mut self, features: &FeatureSet) -> Option<&dyn BackendAdapter> {
        self.selected_backend = self.resolve_backend(features);
        self.explicit_render_loop = self
            .backends
            .get(self.selected_backend)
            .map_or(false, |backend| features.contains(backend.render_loop_token()));
        self.selected_backend()
    }

    /// Select a backend by name
    pub fn set_backend(&mut self, name: &str) -> Result<()> {
        let index = self
            .backends
            .iter()
            .position(|backend| backend.name() == name)
            .ok_or_else(|| Error::UnknownBackend(name.to_string()))?;
        self.selected_backend = index;
        Ok(())
    }

    pub fn backend(&self, index: usize) -> Option<&dyn BackendAdapter> {
        self.backends.get(index).map(|b| &**b)
    }

    pub fn selected_backend(&self) -> Option<&dyn BackendAdapter> {
        self.backend(self.selected_backend)
    }

    pub fn default_backend(&self) -> Option<&dyn BackendAdapter> {
        self.backend(self.default_backend)
    }

    pub fn default_backend_index(&self) -> usize {
        self.default_backend
    }

    /// True if a module or backend claims `token`
    pub fn owns_token(&self, token: &str) -> bool {
        self.modules.iter().any(|m| m.owns_token(token))
            || self.backends.iter().any(|b| b.render_loop_token() == token)
    }

    /// Flatten every module, the selected backend and passthrough tokens
    pub fn pack(&mut self) -> FeatureSet {
        let mut features = pack_modules(&mut self.modules);
        if self.selected_backend != self.default_backend || self.explicit_render_loop {
            if let Some(backend) = self.backends.get(self.selected_backend) {
                features.insert(backend.render_loop_token());
            }
        }
        features.extend(self.passthrough.iter());
        features
    }

    /// Hydrate every module and select the backend
    pub fn unpack(&mut self, features: &FeatureSet) {
        unpack_modules(features, &mut self.modules);
        self.select_backend(features);

        let passthrough: Vec<FeatureToken> = features
            .iter()
            .filter(|token| !self.owns_token(token.as_str()))
            .cloned()
            .collect();
        for token in &passthrough {
            log::trace!("Keeping unowned token {}", token);
        }
        self.passthrough = passthrough;
    }

    /// Tokens from the last `unpack` that nothing owns
    pub fn passthrough(&self) -> &[FeatureToken] {
        &self.passthrough
    }

    /// Per-compile deep copy of every module, in display order
    pub fn snapshot(&self) -> Vec<Box<dyn Module>> {
        self.modules.iter().map(|m| m.clone_box()).collect()
    }

    pub fn compute_budget(&self, features: &FeatureSet) -> SampleBudget {
        compute_budget(&self.modules, features)
    }

    pub fn get(&self, name: &str) -> Option<&dyn Module> {
        self.modules.iter().find(|m| m.name() == name).map(|m| &**m)
    }

    pub fn get_typed<T: Module + 'static>(&self) -> Option<&T> {
        self.modules.iter().find_map(|m| m.as_any().downcast_ref::<T>())
    }

    pub fn get_typed_mut<T: Module + 'static>(&mut self) -> Option<&mut T> {
        self.modules
            .iter_mut()
            .find_map(|m| m.as_any_mut().downcast_mut::<T>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{FooterInfo, HeaderInfo, PassInfo};
    use crate::context::EmitContext;
    use crate::shader_model::ShaderModel;
    use crate::COMPILER_VERSION;

    #[derive(Clone, Default)]
    struct Zeta {
        on: bool,
    }

    impl Module for Zeta {
        fn name(&self) -> &str {
            "Zeta"
        }
        fn version(&self) -> &str {
            COMPILER_VERSION
        }
        fn compile_sort_order(&self) -> i32 {
            -5
        }
        fn owns_token(&self, token: &str) -> bool {
            token == "_ZETA"
        }
        fn pack(&mut self) -> Vec<FeatureToken> {
            if self.on {
                vec!["_ZETA".into()]
            } else {
                Vec::new()
            }
        }
        fn unpack(&mut self, features: &FeatureSet) {
            self.on = features.contains("_ZETA");
        }
    }

    #[derive(Clone, Default)]
    struct Alpha;

    impl Module for Alpha {
        fn name(&self) -> &str {
            "Alpha"
        }
        fn version(&self) -> &str {
            COMPILER_VERSION
        }
        fn display_sort_order(&self) -> i32 {
            10
        }
        fn owns_token(&self, _token: &str) -> bool {
            false
        }
        fn pack(&mut self) -> Vec<FeatureToken> {
            Vec::new()
        }
        fn unpack(&mut self, _features: &FeatureSet) {}
    }

    #[derive(Clone, Default)]
    struct Mid;

    impl Module for Mid {
        fn name(&self) -> &str {
            "Mid"
        }
        fn version(&self) -> &str {
            COMPILER_VERSION
        }
        fn owns_token(&self, _token: &str) -> bool {
            false
        }
        fn pack(&mut self) -> Vec<FeatureToken> {
            Vec::new()
        }
        fn unpack(&mut self, _features: &FeatureSet) {}
    }

    macro_rules! stub_backend {
        ($name:ident, $token:literal) => {
            #[derive(Default)]
            struct $name;

            impl BackendAdapter for $name {
                fn name(&self) -> &str {
                    stringify!($name)
                }
                fn version(&self) -> &str {
                    COMPILER_VERSION
                }
                fn render_loop_token(&self) -> &str {
                    $token
                }
                fn minimum_shader_model(&self) -> ShaderModel {
                    ShaderModel::SM_3_0
                }
                fn write_header(&self, _: &EmitContext, _: &HeaderInfo, _: &mut String) -> Result<()> {
                    Ok(())
                }
                fn write_pass_header(&self, _: &EmitContext, _: &PassInfo, _: &mut String) -> Result<()> {
                    Ok(())
                }
                fn write_per_material_buffer(&self, _: &EmitContext, _: &str, _: &mut String) -> Result<()> {
                    Ok(())
                }
                fn write_shared_code(&self, _: &EmitContext, _: &mut String) -> Result<()> {
                    Ok(())
                }
                fn write_vertex_function(&self, _: &EmitContext, _: &mut String) -> Result<()> {
                    Ok(())
                }
                fn write_body(&self, _: &EmitContext, _: &mut String) -> Result<()> {
                    Ok(())
                }
                fn write_fragment_function(&self, _: &EmitContext, _: &mut String) -> Result<()> {
                    Ok(())
                }
                fn end_pass(&self, _: &EmitContext, _: &mut String) -> Result<()> {
                    Ok(())
                }
                fn write_footer(&self, _: &EmitContext, _: &FooterInfo, _: &mut String) -> Result<()> {
                    Ok(())
                }
            }
        };
    }

    stub_backend!(ForwardStub, "_LOOP_FORWARD");
    stub_backend!(DeferredStub, "_LOOP_DEFERRED");

    fn registry() -> ModuleRegistry {
        let catalog = ModuleCatalog::new()
            .with_module::<Zeta>()
            .with_module::<Alpha>()
            .with_module::<Mid>()
            .with_backend::<DeferredStub>()
            .with_default_backend::<ForwardStub>();
        let mut registry = ModuleRegistry::new(catalog);
        registry.discover(&TemplateLookup::new()).unwrap();
        registry
    }

    fn names(modules: &[Box<dyn Module>]) -> Vec<&str> {
        modules.iter().map(|m| m.name()).collect()
    }

    #[test]
    fn test_discover_is_idempotent() {
        let mut registry = registry();
        registry.discover(&TemplateLookup::new()).unwrap();
        assert_eq!(registry.modules().len(), 3);
        assert_eq!(registry.backends().len(), 2);
    }

    #[test]
    fn test_discover_without_backend_fails() {
        let mut registry = ModuleRegistry::new(ModuleCatalog::new().with_module::<Mid>());
        assert!(registry.discover(&TemplateLookup::new()).is_err());
        assert!(!registry.is_populated());
    }

    #[test]
    fn test_display_and_compile_orders_are_independent() {
        let mut registry = registry();
        // display: Mid(0), Zeta(0), Alpha(10) - ties by type name
        assert_eq!(names(registry.modules()), vec!["Mid", "Zeta", "Alpha"]);

        // compile: Zeta(-5), then Alpha(0) and Mid(0) by type name
        registry.sort_for_compile();
        assert_eq!(names(registry.modules()), vec!["Zeta", "Alpha", "Mid"]);

        registry.sort_for_display();
        assert_eq!(names(registry.modules()), vec!["Mid", "Zeta", "Alpha"]);
    }

    #[test]
    fn test_select_backend_falls_back_to_default() {
        let mut registry = registry();
        let chosen = registry.select_backend(&FeatureSet::new()).unwrap();
        assert_eq!(chosen.name(), "ForwardStub");

        let features: FeatureSet = ["_LOOP_DEFERRED"].into_iter().collect();
        let chosen = registry.select_backend(&features).unwrap();
        assert_eq!(chosen.name(), "DeferredStub");
    }

    #[test]
    fn test_set_backend_by_name() {
        let mut registry = registry();
        registry.set_backend("DeferredStub").unwrap();
        assert!(registry.pack().contains("_LOOP_DEFERRED"));
        assert!(matches!(registry.set_backend("Nope"), Err(Error::UnknownBackend(_))));
    }

    #[test]
    fn test_unknown_tokens_survive_round_trip() {
        let mut registry = registry();
        let features: FeatureSet = ["_ZETA", "_FROM_THE_FUTURE", "_LOOP_DEFERRED"].into_iter().collect();
        registry.unpack(&features);

        assert_eq!(registry.passthrough().len(), 1);
        let packed = registry.pack();
        assert!(packed.same_tokens(&features));
    }

    #[test]
    fn test_default_backend_token_is_not_packed() {
        let mut registry = registry();
        registry.unpack(&FeatureSet::new());
        assert!(registry.pack().is_empty());
    }

    #[test]
    fn test_stored_default_backend_token_round_trips() {
        let mut registry = registry();
        let features: FeatureSet = ["_ZETA", "_LOOP_FORWARD"].into_iter().collect();
        registry.unpack(&features);

        assert!(registry.passthrough().is_empty());
        assert!(registry.pack().same_tokens(&features));

        registry.unpack(&["_ZETA"].into_iter().collect::<FeatureSet>());
        assert!(!registry.pack().contains("_LOOP_FORWARD"));
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut registry = registry();
        let mut snapshot = registry.snapshot();
        let on: FeatureSet = ["_ZETA"].into_iter().collect();
        unpack_modules(&on, &mut snapshot);

        assert!(pack_modules(&mut snapshot).contains("_ZETA"));
        assert!(!registry.pack().contains("_ZETA"));
    }

    #[test]
    fn test_typed_lookup() {
        let mut registry = registry();
        registry.get_typed_mut::<Zeta>().unwrap().on = true;
        assert!(registry.get_typed::<Zeta>().unwrap().on);
        assert!(registry.get("Alpha").is_some());
    }
}
