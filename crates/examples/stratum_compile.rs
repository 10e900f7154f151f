//! Compile a terrain material from the command line
//!
//! ```text
//! stratum-compile _MAX8TEXTURES _BDRF1 _TESSDISTANCE --name Rock --base Rock_Base
//! stratum-compile --store materials.json --material rock --name Rock --out shaders/
//! ```

use clap::Parser;
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use stratum::prelude::*;

#[derive(Parser, Debug)]
#[command(name = "stratum-compile", version, about = "Compile terrain shaders from feature tokens")]
struct Args {
    /// Feature tokens to compile
    tokens: Vec<String>,

    /// JSON keyword store to read the material from
    #[arg(long, requires = "material")]
    store: Option<PathBuf>,

    /// Material id inside the store
    #[arg(long)]
    material: Option<String>,

    /// Shader name; the configured prefix is added when missing
    #[arg(long, default_value = "Terrain")]
    name: String,

    /// Also compile a base-map artifact under this name
    #[arg(long)]
    base: Option<String>,

    /// TOML compiler configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Template files picked up by the backends
    #[arg(long, num_args = 1..)]
    templates: Vec<PathBuf>,

    /// Directory to write artifacts into instead of stdout
    #[arg(long)]
    out: Option<PathBuf>,
}

fn file_name(artifact: &CompiledArtifact) -> String {
    let stem = artifact.name.rsplit('/').next().unwrap_or(&artifact.name);
    format!("{}.shader", stem)
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => CompilerConfig::load(path)?,
        None => CompilerConfig::default(),
    };
    let context = CompilerContext::new()
        .with_environment(EnvironmentStamp::new(
            concat!("stratum ", env!("CARGO_PKG_VERSION")),
            std::env::consts::OS,
        ))
        .with_templates(TemplateLookup::from_paths(&args.templates)?);
    let mut compiler = stratum::default_compiler(context, config);

    let output = match (&args.store, &args.material) {
        (Some(path), Some(material)) => {
            let store = MemoryKeywordStore::from_json(&fs::read_to_string(path)?)?;
            compiler.compile_material(&store, material, &args.name, args.base.as_deref())?
        }
        _ => {
            let features: FeatureSet = args.tokens.iter().map(String::as_str).collect();
            let mut request = CompileRequest::new(features, args.name.as_str());
            if let Some(base) = &args.base {
                request = request.with_base_artifact(base.as_str());
            }
            compiler.compile_all(&request)
        }
    };

    for artifact in output.compiled() {
        for diagnostic in &artifact.diagnostics {
            log::warn!("{}: {}", artifact.name, diagnostic);
        }
        match &args.out {
            Some(dir) => {
                fs::create_dir_all(dir)?;
                let path = dir.join(file_name(artifact));
                fs::write(&path, &artifact.text)?;
                log::info!("Wrote {} ({}) to {}", artifact.name, artifact.kind, path.display());
            }
            None => println!("{}", artifact.text),
        }
    }

    let mut failed = false;
    for failure in output.failures() {
        log::error!("{}", failure);
        failed = true;
    }
    if failed {
        return Err("one or more artifacts failed to compile".into());
    }
    Ok(())
}
