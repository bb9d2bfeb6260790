use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::info;

use super::emit::{emit_file, EmitOptions};
use super::plan::plan_schema;
use crate::error::GenError;
use crate::schema::{extract_schema, ExtractOptions, Schema};

/// Options for one generator run.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    pub extract: ExtractOptions,
    pub emit: EmitOptions,
    /// Render without touching the output path
    pub dry_run: bool,
}

/// Result of rendering a source file in memory.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub schema: Schema,
    pub code: String,
}

/// Summary of a generator run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateReport {
    pub output: PathBuf,
    pub services: usize,
    pub endpoints: usize,
    pub records: usize,
    pub bytes: usize,
    pub written: bool,
}

/// Extract, plan and emit without any filesystem access.
pub fn render_source(source: &str, opts: &GenerateOptions) -> Result<Rendered, GenError> {
    let schema = extract_schema(source, &opts.extract)?;
    let plans = plan_schema(&schema)?;
    let code = emit_file(&plans, &opts.emit)?;
    Ok(Rendered { schema, code })
}

/// Generate handler code for `input` into `output`.
///
/// The output is rendered fully in memory first. Any fatal error leaves the
/// output path untouched.
pub fn generate_file(
    input: &Path,
    output: &Path,
    opts: &GenerateOptions,
) -> anyhow::Result<GenerateReport> {
    let source = fs::read_to_string(input)
        .with_context(|| format!("failed to read source file {}", input.display()))?;
    let rendered = render_source(&source, opts)
        .with_context(|| format!("failed to generate from {}", input.display()))?;

    let mut report = GenerateReport {
        output: output.to_path_buf(),
        services: rendered.schema.services.len(),
        endpoints: rendered.schema.endpoint_count(),
        records: rendered.schema.records.len(),
        bytes: rendered.code.len(),
        written: false,
    };

    if opts.dry_run {
        info!(output = %output.display(), bytes = report.bytes, "dry run, nothing written");
        return Ok(report);
    }

    write_atomic(output, rendered.code.as_bytes())?;
    report.written = true;
    info!(
        output = %output.display(),
        services = report.services,
        endpoints = report.endpoints,
        "generated handlers"
    );
    Ok(report)
}

/// Write `contents` to `path` through a temp file in the same directory and
/// an atomic rename.
pub fn write_atomic(path: &Path, contents: &[u8]) -> anyhow::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to create temp file in {}", dir.display()))?;
    tmp.write_all(contents)
        .with_context(|| format!("failed to write temp file for {}", path.display()))?;
    tmp.as_file()
        .sync_all()
        .with_context(|| format!("failed to sync temp file for {}", path.display()))?;
    tmp.persist(path)
        .with_context(|| format!("failed to move output into place at {}", path.display()))?;
    Ok(())
}
