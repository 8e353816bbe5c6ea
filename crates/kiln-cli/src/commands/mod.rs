//! Subcommand implementations

pub mod lower;
pub mod names;

use anyhow::Context;
use kiln_engine::{CompilerOptions, KilnConfig};
use std::path::Path;

const DEFAULT_CONFIG: &str = "kiln.toml";

/// Options from `--config`, or from ./kiln.toml when it exists
pub fn load_options(explicit: Option<&Path>) -> anyhow::Result<CompilerOptions> {
    let path = match explicit {
        Some(path) => path,
        None if Path::new(DEFAULT_CONFIG).is_file() => Path::new(DEFAULT_CONFIG),
        None => return Ok(CompilerOptions::default()),
    };
    let config = KilnConfig::from_file(path).with_context(|| format!("loading {}", path.display()))?;
    tracing::debug!(path = %path.display(), ?config, "configuration loaded");
    Ok(config.compiler)
}

/// Read and deserialize a JSON input file
pub fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}
