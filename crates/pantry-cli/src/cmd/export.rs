//! `pantry export`: write a downloadable copy of the pantry.
//!
//! The bytes are exactly what the data file would hold, so an export can be
//! dropped in as a data file elsewhere.

use crate::cmd::Context;
use crate::output::{CliError, pretty_kv, render, render_error};
use clap::Args;
use pantry_core::error::ErrorCode;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Destination file. Defaults to the configured export name
    /// (pantry_export.csv) in the current directory.
    #[arg(short, long, value_name = "PATH", conflicts_with = "stdout")]
    pub output: Option<PathBuf>,

    /// Write the CSV to stdout instead of a file.
    #[arg(long)]
    pub stdout: bool,
}

#[derive(Debug, Serialize)]
struct ExportOutput {
    ok: bool,
    path: String,
    content_type: &'static str,
    items: usize,
    bytes: usize,
}

fn destination(args: &ExportArgs, project_root: &Path, configured_name: &str) -> PathBuf {
    args.output
        .clone()
        .unwrap_or_else(|| project_root.join(configured_name))
}

pub fn run_export(args: &ExportArgs, ctx: &Context<'_>) -> anyhow::Result<()> {
    let (store, cfg) = ctx.open_store()?;
    let export = store.export();

    if args.stdout {
        let mut out = std::io::stdout().lock();
        out.write_all(&export.bytes)?;
        out.flush()?;
        return Ok(());
    }

    let path = destination(args, ctx.project_root, &cfg.export.file_name);
    if let Err(e) = std::fs::write(&path, &export.bytes) {
        let message = format!("failed to write {}: {e}", path.display());
        render_error(
            ctx.output,
            &CliError::from_code(ErrorCode::ExportWriteFailed, &message),
        )?;
        anyhow::bail!("{message}");
    }
    tracing::info!(path = %path.display(), bytes = export.bytes.len(), "exported pantry");

    let payload = ExportOutput {
        ok: true,
        path: path.display().to_string(),
        content_type: export.content_type,
        items: store.len(),
        bytes: export.bytes.len(),
    };
    if ctx.quiet && !ctx.output.is_json() {
        return Ok(());
    }
    render(ctx.output, &payload, |p, w| {
        writeln!(w, "✓ Exported {} item(s)", p.items)?;
        pretty_kv(w, "file", &p.path)?;
        pretty_kv(w, "type", p.content_type)
    })
}
