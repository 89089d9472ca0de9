use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{bail, Result};

use crate::request::Headers;

use super::LoadedConfig;

pub const DEFAULT_LOG_FILE: &str = "requests.log";

pub fn default_headers() -> Headers {
    Headers::from([
        ("Content-Type".to_string(), "application/json".to_string()),
        ("Accept".to_string(), "application/json".to_string()),
    ])
}

/// Everything the batch driver needs, resolved from defaults, `dex.json` and
/// command line flags in that order.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub default_headers: Headers,
    pub output_dir: PathBuf,
    pub log_file: PathBuf,
    pub timeout: Option<Duration>,
}

/// Command line values that win over the config file. Paths are expected to be
/// resolved by the caller.
#[derive(Debug, Clone, Default)]
pub struct RunOverrides {
    pub output_dir: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
    pub headers: Vec<(String, String)>,
}

fn resolve_relative(base: &Path, value: &str) -> PathBuf {
    let candidate = Path::new(value);
    if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        base.join(candidate)
    }
}

impl RunConfig {
    pub fn resolve(
        base_dir: &Path,
        loaded: Option<&LoadedConfig>,
        overrides: RunOverrides,
    ) -> Self {
        let mut config = Self {
            default_headers: default_headers(),
            output_dir: base_dir.to_path_buf(),
            log_file: base_dir.join(DEFAULT_LOG_FILE),
            timeout: None,
        };

        if let Some(loaded) = loaded {
            let file = &loaded.config;
            if let Some(headers) = &file.default_headers {
                config.default_headers = headers
                    .iter()
                    .map(|(name, value)| (name.clone(), value.clone()))
                    .collect();
            }
            if let Some(dir) = &file.output_dir {
                config.output_dir = resolve_relative(&loaded.dir, dir);
            }
            if let Some(log_file) = &file.log_file {
                config.log_file = resolve_relative(&loaded.dir, log_file);
            }
            if let Some(secs) = file.timeout_secs {
                config.timeout = Some(Duration::from_secs(secs));
            }
        }

        if let Some(dir) = overrides.output_dir {
            config.output_dir = dir;
        }
        if let Some(log_file) = overrides.log_file {
            config.log_file = log_file;
        }
        if let Some(secs) = overrides.timeout_secs {
            config.timeout = Some(Duration::from_secs(secs));
        }
        config.default_headers.extend(overrides.headers);

        config
    }
}

/// Parses a `Name: Value` header argument.
pub fn parse_header(raw: &str) -> Result<(String, String)> {
    let Some((name, value)) = raw.split_once(':') else {
        bail!("invalid header {raw:?}, expected NAME:VALUE");
    };
    let name = name.trim();
    if name.is_empty() {
        bail!("invalid header {raw:?}, name is empty");
    }
    Ok((name.to_string(), value.trim().to_string()))
}
