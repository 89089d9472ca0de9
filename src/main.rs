use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use dex::batch::run_batch_file;
use dex::config::{load_config, parse_header, RunConfig, RunOverrides};
use dex::logging::init_logging;
use dex::records::{write_records, RequestRecord};
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "dex",
    version,
    about = "Send a batch of requests to target servers and export Postman collections",
    disable_help_subcommand = true,
    args_conflicts_with_subcommands = true
)]
struct Cli {
    /// CSV file with Method,Endpoint,Resource,Querystring,Encoding rows
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Directory or file containing dex.json
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory receiving collection_status_<code>.json files
    #[arg(short, long = "output-dir")]
    output_dir: Option<PathBuf>,

    /// File the request summaries are appended to
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,

    /// Per-request timeout in seconds (no timeout by default)
    #[arg(short, long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Extra header sent with every request
    #[arg(short = 'H', long = "header", value_name = "NAME:VALUE")]
    headers: Vec<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write an input CSV template
    Init {
        /// Where to write the template
        #[arg(value_name = "PATH", default_value = "requests.csv")]
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let base_dir = std::env::current_dir().context("resolving current directory")?;

    if let Some(Commands::Init { path }) = &cli.command {
        return write_template(&resolve_relative(&base_dir, path));
    }

    let Some(input) = cli.input.as_ref() else {
        bail!("missing INPUT csv file (see --help)");
    };
    let input = resolve_relative(&base_dir, input);

    let config_target = cli
        .config
        .as_ref()
        .map(|p| resolve_relative(&base_dir, p))
        .unwrap_or_else(|| base_dir.clone());
    let loaded = load_config(&config_target).context("loading configuration")?;
    if let Some(loaded) = &loaded {
        info!(path = %loaded.path.display(), "loaded configuration");
    }

    let headers = cli
        .headers
        .iter()
        .map(|raw| parse_header(raw))
        .collect::<Result<Vec<_>>>()?;
    let overrides = RunOverrides {
        output_dir: cli.output_dir.as_ref().map(|p| resolve_relative(&base_dir, p)),
        log_file: cli.log_file.as_ref().map(|p| resolve_relative(&base_dir, p)),
        timeout_secs: cli.timeout,
        headers,
    };
    let run_config = RunConfig::resolve(&base_dir, loaded.as_ref(), overrides);

    run_batch_file(&run_config, &input).await?;
    println!("Done.");
    Ok(())
}

fn write_template(path: &Path) -> Result<()> {
    if path.exists() {
        bail!("{} already exists", path.display());
    }
    let example = RequestRecord {
        method: "GET".to_string(),
        endpoint: "https://example.com".to_string(),
        resource: "/".to_string(),
        querystring: String::new(),
        encoding: "utf-8".to_string(),
    };
    write_records(path, &[example])?;
    println!("Template written to {}", path.display());
    Ok(())
}

fn resolve_relative(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
