mod line;
mod stats;

pub use line::{format_size, format_summary};
pub use stats::{BatchStatistics, StatisticsError};
