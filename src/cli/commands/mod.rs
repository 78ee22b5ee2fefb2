pub mod extract;
pub mod init;
pub mod lookup;

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::debug;

use super::args::CommonArgs;
use crate::config::{ConfigLoadResult, load_config};

/// Load the project configuration starting from `--root` or the current
/// directory.
pub(super) fn project_config(common: &CommonArgs) -> Result<ConfigLoadResult> {
    let start_dir = match &common.root {
        Some(root) => root.clone(),
        None => std::env::current_dir().context("Failed to read current directory")?,
    };
    let start_dir: PathBuf = start_dir
        .canonicalize()
        .with_context(|| format!("Project root does not exist: {}", start_dir.display()))?;

    let loaded = load_config(&start_dir)?;
    debug!(
        root = %loaded.root.display(),
        from_file = loaded.from_file,
        "configuration loaded"
    );
    Ok(loaded)
}
