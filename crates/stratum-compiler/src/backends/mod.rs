//! Built-in backend adapters
//!
//! [`SurfaceBackend`] targets the built-in surface-shader render loop and is
//! the default. [`ScriptableBackend`] targets the scriptable render pipeline
//! and splices its program preamble from a pass template.

mod scriptable;
mod surface;

pub use scriptable::ScriptableBackend;
pub use surface::SurfaceBackend;

use std::fmt::Write;
use stratum_features::{text, EmitContext, FooterInfo, HeaderInfo, Result, COMPILER_VERSION};

/// Comment block identifying the generator and build environment
fn write_stamp(ctx: &EmitContext, backend: &str, out: &mut String) -> Result<()> {
    writeln!(out, "// Generated by stratum {} ({} backend)", COMPILER_VERSION, backend)?;
    writeln!(
        out,
        "// engine: {}, platform: {}",
        ctx.environment.engine, ctx.environment.platform
    )?;
    writeln!(out, "// artifact: {}", ctx.artifact)?;
    writeln!(out, "// features: {}", ctx.features)?;
    Ok(())
}

/// `Shader "name" { Properties { .. } SubShader { Tags { .. }`
///
/// Leaves the subshader open; [`write_footer`] closes it.
fn write_shader_open(ctx: &EmitContext, header: &HeaderInfo, out: &mut String) -> Result<()> {
    writeln!(out, "Shader \"{}\"", ctx.shader_name)?;
    writeln!(out, "{{")?;
    writeln!(out, "   Properties")?;
    writeln!(out, "   {{")?;
    text::push_indented(out, header.properties, 6);
    writeln!(out, "   }}")?;
    writeln!(out, "   SubShader")?;
    writeln!(out, "   {{")?;
    if !header.tags.is_empty() {
        let tags: Vec<String> = header
            .tags
            .iter()
            .map(|(key, value)| format!("\"{}\"=\"{}\"", key, value))
            .collect();
        writeln!(out, "      Tags {{ {} }}", tags.join(" "))?;
    }
    Ok(())
}

/// Close the subshader and write the dependency/editor/fallback directives
fn write_footer(footer: &FooterInfo, out: &mut String) -> Result<()> {
    writeln!(out, "   }}")?;
    if let Some(dependency) = footer.dependency {
        writeln!(out, "   Dependency \"BaseMapShader\" = \"{}\"", dependency)?;
    }
    if let Some(editor) = footer.custom_editor {
        writeln!(out, "   CustomEditor \"{}\"", editor)?;
    }
    match footer.fallback {
        Some(fallback) => writeln!(out, "   Fallback \"{}\"", fallback)?,
        None => writeln!(out, "   Fallback Off")?,
    }
    writeln!(out, "}}")?;
    Ok(())
}
