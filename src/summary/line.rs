use std::fmt;

use crate::request::ExecutedRequest;

const ISSUED_AT_FORMAT: &str = "%A, %B %d, %Y %I:%M %p";
const NONE_MARKER: &str = "'None'";

/// Human readable size using 1024 thresholds, e.g. `1,023 bytes` or `1.50 MB`.
pub fn format_size(size_bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];

    if size_bytes < 1024 {
        return format!("{} bytes", group_thousands(&size_bytes.to_string()));
    }

    let mut value = size_bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rendered = format!("{value:.2}");
    let (whole, fraction) = rendered.split_once('.').unwrap_or((rendered.as_str(), "00"));
    format!("{}.{} {}", group_thousands(whole), fraction, UNITS[unit])
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// One-line summary of a request. Works for requests that were never sent.
pub fn format_summary(request: &ExecutedRequest) -> String {
    let status = request
        .status_code()
        .map(|status| status.to_string())
        .unwrap_or_else(|_| NONE_MARKER.to_string());
    let when = request
        .issued_at()
        .map(|at| format!("'{}'", at.format(ISSUED_AT_FORMAT)))
        .unwrap_or_else(|| NONE_MARKER.to_string());
    let descriptor = request.descriptor();

    format!(
        "status={}, when={}, duration='{} ms', size='{}', url='{} {}'",
        status,
        when,
        request.duration_ms(),
        format_size(request.response_size() as u64),
        descriptor.method(),
        descriptor.full_url()
    )
}

impl fmt::Display for ExecutedRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_summary(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{fixtures, Method, RequestDescriptor};
    use pretty_assertions::assert_eq;
    use regex::Regex;

    #[test]
    fn format_size_uses_byte_tier_below_1024() {
        assert_eq!(format_size(0), "0 bytes");
        assert_eq!(format_size(999), "999 bytes");
        assert_eq!(format_size(1023), "1,023 bytes");
    }

    #[test]
    fn format_size_scales_units() {
        assert_eq!(format_size(1024), "1.00 KB");
        assert_eq!(format_size(1536), "1.50 KB");
        assert_eq!(format_size(1024 * 1024 - 1), "1,024.00 KB");
        assert_eq!(format_size(1024 * 1024), "1.00 MB");
        assert_eq!(format_size(1024u64.pow(3)), "1.00 GB");
        assert_eq!(format_size(1024u64.pow(4)), "1.00 TB");
        assert_eq!(format_size(2048 * 1024u64.pow(4)), "2,048.00 TB");
    }

    #[test]
    fn summary_of_pending_request_uses_placeholders() {
        let descriptor = RequestDescriptor::new(Method::Post, "example.com", "/items")
            .with_query("a=1");
        let line = format_summary(&ExecutedRequest::pending(descriptor));
        assert_eq!(
            line,
            "status='None', when='None', duration='0 ms', size='0 bytes', url='POST http://example.com/items?a=1'"
        );
    }

    #[test]
    fn summary_of_executed_request_has_fixed_field_order() {
        let request = fixtures::executed("/users", 200, 15);
        let line = request.to_string();
        let pattern = Regex::new(
            r"^status=200, when='[A-Z][a-z]+day, [A-Z][a-z]+ \d{2}, \d{4} \d{2}:\d{2} (AM|PM)', duration='15 ms', size='2 bytes', url='GET https://example.com/users'$",
        )
        .unwrap();
        assert!(pattern.is_match(&line), "unexpected summary: {line}");
    }
}
