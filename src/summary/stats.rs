use std::{collections::HashMap, fmt::Write as _};

use thiserror::Error;

use crate::request::ExecutedRequest;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatisticsError {
    #[error("cannot compute statistics for an empty batch")]
    Empty,
    #[error("request {url} has not been executed")]
    Incomplete { url: String },
    #[error("{successful} successful requests reported out of {total}")]
    Inconsistent { successful: usize, total: usize },
}

/// Latency and outcome summary of a batch. Durations are whole milliseconds.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchStatistics {
    pub total_requests: usize,
    pub successful_requests: usize,
    pub failed_requests: usize,
    pub total_elapsed_ms: u64,
    pub min_ms: u64,
    pub max_ms: u64,
    pub mean_ms: f64,
    pub median_ms: f64,
    pub mode_ms: u64,
    /// Sample standard deviation; needs at least two requests.
    pub std_deviation: Option<f64>,
    /// Sample variance; needs at least two requests.
    pub variance: Option<f64>,
}

impl BatchStatistics {
    /// Every request must have completed; otherwise nothing is computed.
    pub fn from_requests<'a, I>(requests: I) -> Result<Self, StatisticsError>
    where
        I: IntoIterator<Item = &'a ExecutedRequest>,
    {
        let mut durations = Vec::new();
        let mut successful = 0;

        for request in requests {
            let status = request
                .status_code()
                .map_err(|_| StatisticsError::Incomplete {
                    url: request.descriptor().full_url(),
                })?;
            if (200..300).contains(&status) {
                successful += 1;
            }
            durations.push(request.duration_ms());
        }

        Self::from_durations(&durations, successful)
    }

    pub fn from_durations(durations: &[u64], successful: usize) -> Result<Self, StatisticsError> {
        if durations.is_empty() {
            return Err(StatisticsError::Empty);
        }

        let count = durations.len();
        if successful > count {
            return Err(StatisticsError::Inconsistent {
                successful,
                total: count,
            });
        }
        let total: u64 = durations.iter().sum();
        let mean = total as f64 / count as f64;

        let mut sorted = durations.to_vec();
        sorted.sort_unstable();
        let median = if count % 2 == 1 {
            sorted[count / 2] as f64
        } else {
            (sorted[count / 2 - 1] + sorted[count / 2]) as f64 / 2.0
        };

        let variance = (count > 1).then(|| {
            let squares: f64 = durations
                .iter()
                .map(|&value| (value as f64 - mean).powi(2))
                .sum();
            squares / (count - 1) as f64
        });

        Ok(Self {
            total_requests: count,
            successful_requests: successful,
            failed_requests: count - successful,
            total_elapsed_ms: total,
            min_ms: sorted[0],
            max_ms: sorted[count - 1],
            mean_ms: mean,
            median_ms: median,
            mode_ms: mode(durations),
            std_deviation: variance.map(f64::sqrt),
            variance,
        })
    }

    pub fn render(&self) -> String {
        let rule = "=".repeat(50);
        let optional = |value: Option<f64>| {
            value
                .map(|v| format!("{v:.2}"))
                .unwrap_or_else(|| "n/a".to_string())
        };

        let mut out = String::new();
        let _ = writeln!(out, "Request Statistics");
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "Total Requests: {}", self.total_requests);
        let _ = writeln!(out, "Successful Requests: {}", self.successful_requests);
        let _ = writeln!(out, "Failed Requests: {}", self.failed_requests);
        let _ = writeln!(out, "Total Elapsed Time: {} ms", self.total_elapsed_ms);
        let _ = writeln!(out, "Minimum Duration: {} ms", self.min_ms);
        let _ = writeln!(out, "Maximum Duration: {} ms", self.max_ms);
        let _ = writeln!(out, "Mean Duration: {:.2} ms", self.mean_ms);
        let _ = writeln!(out, "Median Duration: {:.2} ms", self.median_ms);
        let _ = writeln!(out, "Mode Duration: {} ms", self.mode_ms);
        let _ = writeln!(out, "Standard Deviation: {}", optional(self.std_deviation));
        let _ = writeln!(out, "Variance: {}", optional(self.variance));
        let _ = write!(out, "{rule}");
        out
    }
}

/// Most frequent value; ties go to the value seen first.
fn mode(values: &[u64]) -> u64 {
    let mut counts: HashMap<u64, usize> = HashMap::new();
    for &value in values {
        *counts.entry(value).or_default() += 1;
    }
    let highest = counts.values().copied().max().unwrap_or(0);
    values
        .iter()
        .copied()
        .find(|value| counts.get(value) == Some(&highest))
        .unwrap_or_default()
}
