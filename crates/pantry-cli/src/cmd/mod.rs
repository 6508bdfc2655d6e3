pub mod add;
pub mod categories;
pub mod clear;
pub mod completions;
pub mod export;
pub mod list;
pub mod remove;
pub mod save;

use crate::output::{CliError, OutputMode, render_error};
use pantry_core::Store;
use pantry_core::config::{self, ProjectConfig};
use pantry_core::error::ErrorCode;
use std::path::Path;

/// Per-invocation settings shared by every command.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    pub output: OutputMode,
    pub quiet: bool,
    pub project_root: &'a Path,
    /// `--data` override for the data file.
    pub data: Option<&'a Path>,
}

impl Context<'_> {
    /// Load the project config, rendering a structured error if it is broken.
    pub fn project_config(&self) -> anyhow::Result<ProjectConfig> {
        config::load_project_config(self.project_root).inspect_err(|e| {
            render_error(
                self.output,
                &CliError::from_code(ErrorCode::ConfigParseError, format!("{e:#}")),
            )
            .ok();
        })
    }

    /// Open the store for this invocation.
    pub fn open_store(&self) -> anyhow::Result<(Store, ProjectConfig)> {
        let cfg = self.project_config()?;
        let path = config::resolve_data_path(self.project_root, self.data, &cfg);
        tracing::debug!(path = %path.display(), "opening pantry store");
        Ok((Store::open(path), cfg))
    }
}

/// Render a store failure and turn it into the command's error.
pub(crate) fn fail(output: OutputMode, err: &pantry_core::store::StoreError) -> anyhow::Error {
    render_error(output, &CliError::from(err)).ok();
    anyhow::anyhow!("{err}")
}
