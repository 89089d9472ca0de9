mod loader;
mod run;

pub use loader::{load_config, DexConfig, LoadedConfig, CONFIG_FILE};
pub use run::{default_headers, parse_header, RunConfig, RunOverrides, DEFAULT_LOG_FILE};
