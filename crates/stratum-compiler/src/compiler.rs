//! Compiler orchestrator
//!
//! Every artifact is emitted from a fresh snapshot of the registry's modules,
//! unpacked from that artifact's own feature set. The registry's modules are
//! never touched by a compile, so display order and GUI state survive it.

use crate::artifact::{ArtifactResult, CompileDiagnostics, CompileOutput, CompileRequest, CompiledArtifact};
use crate::config::CompilerConfig;
use crate::context::CompilerContext;
use crate::derive::{derive_base_map, derive_digger, derive_terrain_blend, ArtifactKinds};
use crate::store::KeywordStore;
use std::fmt::Write;
use stratum_features::{
    compute_budget, sort_modules_for_compile, text, unpack_modules, ArtifactKind, BackendAdapter,
    Diagnostic, DiagnosticKind, EmitContext, Error, FeatureSet, FooterInfo, HeaderInfo, Module,
    ModuleCatalog, ModuleRegistry, PassInfo, Phase, Result, SampleBudget, ShaderModel,
    SubShaderTags, COMPILER_VERSION,
};

/// Directives written by the backend footer
#[derive(Debug, Clone, Default)]
struct FooterPlan {
    dependency: Option<String>,
    custom_editor: Option<String>,
    fallback: Option<String>,
}

/// Everything needed to emit one artifact
#[derive(Debug, Clone)]
struct ArtifactPlan {
    kind: ArtifactKind,
    name: String,
    features: FeatureSet,
    is_blend: bool,
    footer: FooterPlan,
}

/// Attach phase and contributor to an error raised by a hook
fn in_phase(result: Result<()>, phase: Phase, contributor: &str) -> Result<()> {
    result.map_err(|err| match err {
        err @ Error::Emission { .. } => err,
        other => Error::emission(phase, contributor, other.to_string()),
    })
}

fn failure_diagnostic(err: Error) -> Diagnostic {
    match err {
        Error::Emission {
            phase,
            contributor,
            message,
        } => Diagnostic {
            contributor,
            kind: DiagnosticKind::EmissionFailure { phase, message },
        },
        other => Diagnostic {
            contributor: "compiler".to_string(),
            kind: DiagnosticKind::EmissionFailure {
                phase: Phase::Discover,
                message: other.to_string(),
            },
        },
    }
}

/// `#define TOKEN 1` for every active token
fn token_defines(features: &FeatureSet) -> String {
    let mut defines = String::new();
    for token in features {
        defines.push_str("#define ");
        defines.push_str(token.as_str());
        defines.push_str(" 1\n");
    }
    defines
}

pub struct Compiler {
    registry: ModuleRegistry,
    context: CompilerContext,
    config: CompilerConfig,
}

impl Compiler {
    pub fn new(catalog: ModuleCatalog, context: CompilerContext, config: CompilerConfig) -> Self {
        Self {
            registry: ModuleRegistry::new(catalog),
            context,
            config,
        }
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    /// Registry access for GUI code; discovers it first
    pub fn registry_mut(&mut self) -> Result<&mut ModuleRegistry> {
        self.discover()?;
        Ok(&mut self.registry)
    }

    pub fn context(&self) -> &CompilerContext {
        &self.context
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Populate the registry; later calls do nothing
    pub fn discover(&mut self) -> Result<()> {
        self.registry.discover(&self.context.templates)
    }

    /// Sampling cost of `features` over every version-matching module
    ///
    /// Blend-only modules are included, so this covers every artifact the
    /// features can produce. Compiled artifacts carry their own budget.
    pub fn compute_budget(&mut self, features: &FeatureSet) -> Result<SampleBudget> {
        self.discover()?;
        Ok(self.registry.compute_budget(features))
    }

    /// Compile the main artifact of `request` only
    pub fn compile(&mut self, request: &CompileRequest) -> ArtifactResult {
        let plan = self.main_plan(request);
        self.compile_plan(&plan)
    }

    /// Compile the main artifact and every derived artifact the request asks for
    ///
    /// Artifacts are compiled strictly one after another. A failure discards
    /// only the artifact it happened in; the others are still attempted.
    pub fn compile_all(&mut self, request: &CompileRequest) -> CompileOutput {
        let kinds = ArtifactKinds::for_request(request);
        let mut plans = vec![self.main_plan(request)];

        if let Some(base) = &request.base_artifact_name {
            plans.push(ArtifactPlan {
                kind: ArtifactKind::BaseMap,
                name: self.config.qualified_name(base),
                features: derive_base_map(&request.features),
                is_blend: false,
                footer: FooterPlan {
                    dependency: None,
                    custom_editor: self.config.custom_editor.clone(),
                    fallback: self.config.fallback_shader.clone(),
                },
            });
        }
        if kinds.contains(ArtifactKinds::TERRAIN_BLEND) {
            let name = format!("{}{}", request.target_name, self.config.blend_suffix);
            plans.push(ArtifactPlan {
                kind: ArtifactKind::TerrainBlend,
                name: self.config.qualified_name(&name),
                features: derive_terrain_blend(&request.features),
                is_blend: true,
                footer: FooterPlan {
                    dependency: None,
                    custom_editor: self.config.blend_custom_editor.clone(),
                    fallback: None,
                },
            });
        }
        if kinds.contains(ArtifactKinds::DIGGER) {
            let name = format!("{}{}", request.target_name, self.config.digger_suffix);
            plans.push(ArtifactPlan {
                kind: ArtifactKind::Digger,
                name: self.config.qualified_name(&name),
                features: derive_digger(&request.features),
                is_blend: true,
                footer: FooterPlan::default(),
            });
        }

        let artifacts = plans.iter().map(|plan| self.compile_plan(plan)).collect();
        CompileOutput { artifacts }
    }

    /// Compile every artifact of a stored material
    ///
    /// `base_artifact_name` adds the base-map artifact and makes the main
    /// shader depend on it.
    pub fn compile_material(
        &mut self,
        store: &dyn KeywordStore,
        material_id: &str,
        target_name: &str,
        base_artifact_name: Option<&str>,
    ) -> Result<CompileOutput> {
        let features = store
            .get(material_id)
            .ok_or_else(|| Error::Config(format!("no keywords stored for material {}", material_id)))?;
        let mut request = CompileRequest::new(features, target_name);
        if let Some(base) = base_artifact_name {
            request = request.with_base_artifact(base);
        }
        Ok(self.compile_all(&request))
    }

    fn main_plan(&self, request: &CompileRequest) -> ArtifactPlan {
        let base = request
            .base_artifact_name
            .as_deref()
            .map(|name| self.config.qualified_name(name));
        let custom_editor = if request.is_blend_variant {
            self.config.blend_custom_editor.clone()
        } else {
            self.config.custom_editor.clone()
        };
        let fallback = base.clone().or_else(|| self.config.fallback_shader.clone());

        ArtifactPlan {
            kind: ArtifactKind::Main,
            name: self.config.qualified_name(&request.target_name),
            features: request.features.clone(),
            is_blend: request.is_blend_variant,
            footer: FooterPlan {
                dependency: base,
                custom_editor,
                fallback,
            },
        }
    }

    fn compile_plan(&mut self, plan: &ArtifactPlan) -> ArtifactResult {
        let mut diagnostics = CompileDiagnostics::new(plan.kind);
        if let Err(err) = self.discover() {
            log::error!("Module discovery failed: {}", err);
            diagnostics.failure = Some(failure_diagnostic(err));
            return Err(diagnostics);
        }

        log::info!("Compiling {} artifact {}", plan.kind, plan.name);

        let mut modules = self.registry.snapshot();
        unpack_modules(&plan.features, &mut modules);
        sort_modules_for_compile(&mut modules);

        let (active, excluded): (Vec<Box<dyn Module>>, Vec<Box<dyn Module>>) = modules
            .into_iter()
            .partition(|module| module.version() == COMPILER_VERSION);
        for module in &excluded {
            let diagnostic = Diagnostic::version_mismatch(module.name(), COMPILER_VERSION, module.version());
            log::warn!("{}", diagnostic);
            diagnostics.excluded.push(diagnostic);
        }

        let backend = match self.usable_backend(&plan.features, &mut diagnostics) {
            Some(backend) => backend,
            None => return Err(diagnostics),
        };

        let budget = compute_budget(
            active.iter().filter(|module| plan.is_blend || !module.blend_only()),
            &plan.features,
        );
        let mut notes = diagnostics.excluded.clone();
        for overrun in self.config.budget.overruns(&budget) {
            let diagnostic = Diagnostic {
                contributor: plan.name.clone(),
                kind: DiagnosticKind::BudgetExceeded {
                    metric: overrun.metric,
                    value: overrun.value,
                    limit: overrun.limit,
                },
            };
            log::warn!("{}", diagnostic);
            notes.push(diagnostic);
        }

        match self.emit(plan, backend, &active) {
            Ok(text) => {
                log::info!("Compiled {} ({} bytes)", plan.name, text.len());
                Ok(CompiledArtifact {
                    kind: plan.kind,
                    name: plan.name.clone(),
                    text,
                    budget,
                    diagnostics: notes,
                })
            }
            Err(err) => {
                log::error!("Discarding {} artifact {}: {}", plan.kind, plan.name, err);
                diagnostics.failure = Some(failure_diagnostic(err));
                Err(diagnostics)
            }
        }
    }

    /// Backend for `features`, falling back to the default when the
    /// requested one was built for another release
    fn usable_backend(
        &self,
        features: &FeatureSet,
        diagnostics: &mut CompileDiagnostics,
    ) -> Option<&dyn BackendAdapter> {
        let requested = self.registry.backend(self.registry.resolve_backend(features))?;
        if requested.version() == COMPILER_VERSION {
            return Some(requested);
        }

        let mismatch = Diagnostic::version_mismatch(requested.name(), COMPILER_VERSION, requested.version());
        log::warn!("{}", mismatch);
        diagnostics.excluded.push(mismatch);

        let fallback = self.registry.default_backend()?;
        if fallback.version() != COMPILER_VERSION || fallback.name() == requested.name() {
            diagnostics.failure = Some(Diagnostic::version_mismatch(
                fallback.name(),
                COMPILER_VERSION,
                fallback.version(),
            ));
            return None;
        }

        let note = Diagnostic::backend_fallback(fallback.name(), requested.name());
        log::warn!("{}", note);
        diagnostics.excluded.push(note);
        Some(fallback)
    }

    fn shader_model(
        backend: &dyn BackendAdapter,
        modules: &[Box<dyn Module>],
        features: &FeatureSet,
    ) -> ShaderModel {
        modules
            .iter()
            .filter_map(|module| module.required_shader_model())
            .chain(ShaderModel::forced_by(features))
            .fold(backend.minimum_shader_model(), ShaderModel::max)
    }

    fn emit(
        &self,
        plan: &ArtifactPlan,
        backend: &dyn BackendAdapter,
        modules: &[Box<dyn Module>],
    ) -> Result<String> {
        let ctx = EmitContext::new(
            &plan.features,
            plan.kind,
            &plan.name,
            plan.is_blend,
            &self.context.environment,
        );
        let shader_model = Self::shader_model(backend, modules, &plan.features);
        log::debug!("{} targets shader model {} with {} backend", plan.name, shader_model, backend.name());

        let mut tags = SubShaderTags::new();
        tags.set("RenderType", "Opaque");
        tags.set("Queue", "Geometry+100");
        for module in modules {
            module.declare_tags(&ctx, &mut tags);
        }
        if let (Some(slots), Some(count)) = (self.context.texture_array_slots, tags.splat_count()) {
            if count > slots {
                tags.set(SubShaderTags::SPLAT_COUNT, slots.to_string());
            }
        }

        let mut properties = String::new();
        for module in modules {
            in_phase(module.write_properties(&ctx, &mut properties), Phase::Properties, module.name())?;
        }

        let mut out = String::new();
        let header = HeaderInfo {
            properties: &properties,
            tags: &tags,
        };
        in_phase(backend.write_header(&ctx, &header, &mut out), Phase::Header, backend.name())?;

        let defines = token_defines(&plan.features);
        let tessellated = modules.iter().any(|module| module.tessellates());
        for pass_index in 0..backend.num_passes(&ctx) {
            let ctx = ctx.for_pass(pass_index);
            log::debug!("{}: pass {}", plan.name, pass_index);

            let mut module_buffer = String::new();
            for module in modules {
                in_phase(
                    module.write_per_material_buffer(&ctx, &mut module_buffer),
                    Phase::PerMaterialBuffer,
                    module.name(),
                )?;
            }

            let pass = PassInfo {
                index: pass_index,
                shader_model,
                defines: &defines,
                module_buffer: &module_buffer,
                tessellated,
            };
            in_phase(backend.write_pass_header(&ctx, &pass, &mut out), Phase::PassHeader, backend.name())?;

            if !backend.uses_replace_methods() {
                text::push_block(&mut out, &defines);
                in_phase(
                    backend.write_per_material_buffer(&ctx, &module_buffer, &mut out),
                    Phase::PerMaterialBuffer,
                    backend.name(),
                )?;
                in_phase(backend.write_shared_code(&ctx, &mut out), Phase::SharedCode, backend.name())?;
            }

            // every module's shared functions precede any module's functions
            for module in modules {
                in_phase(
                    module.write_shared_functions(&ctx, &mut out),
                    Phase::SharedFunctions,
                    module.name(),
                )?;
            }
            for module in modules {
                in_phase(module.write_functions(&ctx, &mut out), Phase::Functions, module.name())?;
            }

            in_phase(backend.write_vertex_function(&ctx, &mut out), Phase::VertexFunction, backend.name())?;
            for module in modules {
                in_phase(
                    module.write_after_vertex_functions(&ctx, &mut out),
                    Phase::AfterVertexFunctions,
                    module.name(),
                )?;
            }

            in_phase(backend.write_body(&ctx, &mut out), Phase::Body, backend.name())?;
            in_phase(
                backend.write_fragment_function(&ctx, &mut out),
                Phase::FragmentFunction,
                backend.name(),
            )?;
            in_phase(backend.end_pass(&ctx, &mut out), Phase::EndPass, backend.name())?;
        }

        let footer = FooterInfo {
            dependency: plan.footer.dependency.as_deref(),
            custom_editor: plan.footer.custom_editor.as_deref(),
            fallback: plan.footer.fallback.as_deref(),
        };
        in_phase(backend.write_footer(&ctx, &footer, &mut out), Phase::Footer, backend.name())?;

        let mut trailing = String::new();
        for module in modules {
            in_phase(module.post_generation(&ctx, &mut trailing), Phase::PostGeneration, module.name())?;
        }
        if !trailing.is_empty() {
            writeln!(out)?;
            out.push_str(&trailing);
        }

        Ok(text::normalize_line_endings(&out))
    }
}
