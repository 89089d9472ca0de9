use colored::{Color, Colorize};

use crate::{
    request::{ExecutedRequest, RequestDescriptor},
    summary::{format_summary, BatchStatistics},
};

fn status_color(status: u16) -> Color {
    if status >= 400 {
        Color::Red
    } else if status >= 300 {
        Color::Yellow
    } else {
        Color::Green
    }
}

/// Prints the summary line, colouring the leading `status=` field.
pub fn print_execution_result(request: &ExecutedRequest) {
    let line = format_summary(request);
    let (status_field, rest) = line.split_once(", ").unwrap_or((line.as_str(), ""));
    let status_field = match request.status_code() {
        Ok(status) => status_field.color(status_color(status)).to_string(),
        Err(_) => status_field.dimmed().to_string(),
    };
    println!("{}, {}", status_field, rest);
}

pub fn print_failure(descriptor: &RequestDescriptor, error: &anyhow::Error) {
    println!(
        "{} {} {}",
        "Error:".red().bold(),
        format!("{} {}", descriptor.method(), descriptor.full_url()).cyan(),
        format!("({error:#})").dimmed()
    );
}

pub fn print_statistics(statistics: &BatchStatistics) {
    println!();
    println!("{}", statistics.render());
    println!();
}
