use std::{
    fs::{self, File, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::{
    collection::CollectionExporter,
    config::RunConfig,
    executor::{
        execute_request, print_execution_result, print_failure, print_statistics,
        ExecutionOptions,
    },
    records::read_descriptors,
    request::{ExecutedRequest, RequestDescriptor},
    summary::{format_summary, BatchStatistics},
};

/// Outcome of one batch run.
#[derive(Debug)]
pub struct BatchReport {
    /// Every descriptor in input order; failed sends stay pending.
    pub requests: Vec<ExecutedRequest>,
    pub failures: usize,
    pub statistics: Option<BatchStatistics>,
    pub collections: Vec<PathBuf>,
}

impl BatchReport {
    pub fn completed(&self) -> impl Iterator<Item = &ExecutedRequest> {
        self.requests.iter().filter(|request| request.is_executed())
    }
}

/// Reads descriptors from `input` and runs them.
pub async fn run_batch_file(config: &RunConfig, input: &Path) -> Result<BatchReport> {
    let descriptors = read_descriptors(input, &config.default_headers)?;
    info!(count = descriptors.len(), input = %input.display(), "loaded requests");
    run_batch(config, descriptors).await
}

/// Sends every descriptor in order, one at a time.
///
/// A request that fails to send is reported and skipped; it is left out of the
/// statistics and the exported collections. Errors writing the log or the
/// collections abort the run.
pub async fn run_batch(
    config: &RunConfig,
    descriptors: Vec<RequestDescriptor>,
) -> Result<BatchReport> {
    let exporter = CollectionExporter::new(&config.output_dir);
    for path in exporter.remove_previous()? {
        info!(path = %path.display(), "removed previous collection");
    }

    let mut log = open_log(&config.log_file)?;
    let options = ExecutionOptions {
        timeout: config.timeout,
    };

    let mut requests = Vec::with_capacity(descriptors.len());
    let mut failures = 0;
    for descriptor in descriptors {
        let request = match execute_request(&descriptor, &options).await {
            Ok(executed) => executed,
            Err(err) => {
                warn!(url = %descriptor.full_url(), "request failed: {err:#}");
                print_failure(&descriptor, &err);
                failures += 1;
                ExecutedRequest::pending(descriptor)
            }
        };

        print_execution_result(&request);
        writeln!(log, "{}", format_summary(&request))
            .with_context(|| format!("writing log {}", config.log_file.display()))?;
        requests.push(request);
    }

    let completed: Vec<ExecutedRequest> = requests
        .iter()
        .filter(|request| request.is_executed())
        .cloned()
        .collect();

    let statistics = match BatchStatistics::from_requests(&completed) {
        Ok(statistics) => {
            print_statistics(&statistics);
            Some(statistics)
        }
        Err(err) => {
            warn!("skipping statistics: {err}");
            None
        }
    };

    let collections = exporter.export(&completed)?;
    for path in &collections {
        println!("Saved {}", path.display());
    }
    println!("Postman collections saved.");

    Ok(BatchReport {
        requests,
        failures,
        statistics,
        collections,
    })
}

fn open_log(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating log directory {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log {}", path.display()))
}
