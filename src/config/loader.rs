use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;

pub const CONFIG_FILE: &str = "dex.json";

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct DexConfig {
    /// Replaces the built-in default headers when present.
    #[serde(rename = "defaultHeaders")]
    pub default_headers: Option<HashMap<String, String>>,
    #[serde(rename = "outputDir")]
    pub output_dir: Option<String>,
    #[serde(rename = "logFile")]
    pub log_file: Option<String>,
    #[serde(rename = "timeoutSecs")]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: DexConfig,
    /// The file that was read, reported in the startup log.
    pub path: PathBuf,
    pub dir: PathBuf,
}

/// Loads `dex.json` from a directory, or the given file directly.
/// Returns `None` when there is nothing to load.
pub fn load_config(target: &Path) -> Result<Option<LoadedConfig>> {
    let cwd = std::env::current_dir().context("resolving current directory")?;
    let resolved = if target.is_absolute() {
        target.to_path_buf()
    } else {
        cwd.join(target)
    };

    let (file_path, dir) = if resolved.is_dir() {
        (resolved.join(CONFIG_FILE), resolved)
    } else {
        let dir = resolved
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or(cwd);
        (resolved, dir)
    };

    if !file_path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(&file_path)
        .with_context(|| format!("reading config {}", file_path.display()))?;

    let config: DexConfig = serde_json::from_str(&contents)
        .with_context(|| format!("parsing config {}", file_path.display()))?;

    Ok(Some(LoadedConfig {
        config,
        path: file_path,
        dir,
    }))
}
