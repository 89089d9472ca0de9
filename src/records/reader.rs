use std::path::Path;

use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};

use crate::request::{Encoding, Headers, Method, RequestDescriptor, RequestError};

pub const HEADER: [&str; 5] = ["Method", "Endpoint", "Resource", "Querystring", "Encoding"];

/// One data row of the input CSV, field for field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestRecord {
    pub method: String,
    pub endpoint: String,
    pub resource: String,
    pub querystring: String,
    pub encoding: String,
}

impl RequestRecord {
    /// Columns are read by position; missing trailing cells are empty.
    fn from_row(row: &StringRecord) -> Self {
        let cell = |index: usize| row.get(index).unwrap_or_default().to_string();
        Self {
            method: cell(0),
            endpoint: cell(1),
            resource: cell(2),
            querystring: cell(3),
            encoding: cell(4),
        }
    }

    pub fn to_descriptor(&self, headers: &Headers) -> Result<RequestDescriptor, RequestError> {
        let method: Method = self.method.parse()?;
        let encoding: Encoding = self.encoding.parse()?;
        Ok(RequestDescriptor::new(method, &self.endpoint, &self.resource)
            .with_query(&self.querystring)
            .with_headers(headers.clone())
            .with_encoding(encoding))
    }

    fn cells(&self) -> [&str; 5] {
        [
            &self.method,
            &self.endpoint,
            &self.resource,
            &self.querystring,
            &self.encoding,
        ]
    }
}

/// Reads every data row. The first row is treated as the header and skipped.
pub fn read_records(path: &Path) -> Result<Vec<RequestRecord>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_path(path)
        .with_context(|| format!("reading request records {}", path.display()))?;

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.with_context(|| format!("parsing request records {}", path.display()))?;
        if row.iter().all(str::is_empty) {
            continue;
        }
        records.push(RequestRecord::from_row(&row));
    }
    Ok(records)
}

/// Reads the CSV and builds one descriptor per row, attaching `headers` to each.
pub fn read_descriptors(path: &Path, headers: &Headers) -> Result<Vec<RequestDescriptor>> {
    read_records(path)?
        .iter()
        .enumerate()
        .map(|(index, record)| {
            // header is line 1
            record.to_descriptor(headers).with_context(|| {
                format!("{}: invalid record on line {}", path.display(), index + 2)
            })
        })
        .collect()
}

pub fn write_records(path: &Path, records: &[RequestRecord]) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer
        .write_record(HEADER)
        .with_context(|| format!("writing {}", path.display()))?;
    for record in records {
        writer
            .write_record(record.cells())
            .with_context(|| format!("writing {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("writing {}", path.display()))
}
