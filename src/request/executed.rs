use std::time::Duration;

use chrono::{DateTime, Local};
use serde_json::Value;

use super::{RequestDescriptor, RequestError};

/// What one execution of a descriptor produced.
#[derive(Debug, Clone)]
pub struct ResponseData {
    pub issued_at: DateTime<Local>,
    pub elapsed: Duration,
    pub status: u16,
    pub raw: Vec<u8>,
    pub text: String,
}

/// A descriptor paired with the outcome of sending it, if it has been sent.
#[derive(Debug, Clone)]
pub struct ExecutedRequest {
    descriptor: RequestDescriptor,
    response: Option<ResponseData>,
}

impl ExecutedRequest {
    pub fn pending(descriptor: RequestDescriptor) -> Self {
        Self {
            descriptor,
            response: None,
        }
    }

    pub fn completed(descriptor: RequestDescriptor, response: ResponseData) -> Self {
        Self {
            descriptor,
            response: Some(response),
        }
    }

    pub fn descriptor(&self) -> &RequestDescriptor {
        &self.descriptor
    }

    pub fn is_executed(&self) -> bool {
        self.response.is_some()
    }

    pub fn response(&self) -> Result<&ResponseData, RequestError> {
        self.response.as_ref().ok_or(RequestError::NotExecuted)
    }

    pub fn status_code(&self) -> Result<u16, RequestError> {
        self.response().map(|response| response.status)
    }

    pub fn is_success(&self) -> Result<bool, RequestError> {
        self.status_code()
            .map(|status| (200..300).contains(&status))
    }

    pub fn raw_body(&self) -> Result<&[u8], RequestError> {
        self.response().map(|response| response.raw.as_slice())
    }

    pub fn text(&self) -> Result<&str, RequestError> {
        self.response().map(|response| response.text.as_str())
    }

    /// Parses the decoded body as JSON. Parsing happens on every call.
    pub fn json(&self) -> Result<Value, RequestError> {
        let text = self.text()?;
        Ok(serde_json::from_str(text)?)
    }

    pub fn issued_at(&self) -> Option<DateTime<Local>> {
        self.response.as_ref().map(|response| response.issued_at)
    }

    /// Zero until the request has been executed.
    pub fn elapsed(&self) -> Duration {
        self.response
            .as_ref()
            .map(|response| response.elapsed)
            .unwrap_or_default()
    }

    /// Elapsed time rounded to the nearest whole millisecond.
    pub fn duration_ms(&self) -> u64 {
        let nanos = self.elapsed().as_nanos();
        ((nanos + 500_000) / 1_000_000) as u64
    }

    pub fn response_size(&self) -> usize {
        self.response
            .as_ref()
            .map(|response| response.raw.len())
            .unwrap_or(0)
    }

    /// Drops the execution outcome and keeps the descriptor.
    pub fn reset(&mut self) {
        self.response = None;
    }
}
