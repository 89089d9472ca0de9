use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::Local;
use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::request::{ExecutedRequest, Method, RequestDescriptor, ResponseData};

#[derive(Debug, Clone, Default)]
pub struct ExecutionOptions {
    /// Applies to the whole exchange. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

/// Sends one request and waits for the complete response body.
///
/// A new client is built per call with idle pooling disabled, so nothing is
/// shared between descriptors. The measured duration covers connection setup
/// through the last body byte.
pub async fn execute_request(
    descriptor: &RequestDescriptor,
    options: &ExecutionOptions,
) -> Result<ExecutedRequest> {
    let mut client_builder = Client::builder().pool_max_idle_per_host(0);
    if let Some(timeout) = options.timeout {
        client_builder = client_builder.timeout(timeout);
    }
    let client = client_builder.build().context("building HTTP client")?;

    let full_url = descriptor.full_url();
    let url = Url::parse(&full_url).with_context(|| format!("invalid request URL {full_url}"))?;
    let mut request_builder = client.request(http_method(descriptor.method()), url);

    for (name, value) in descriptor.headers() {
        request_builder = request_builder.header(name, value);
    }

    let issued_at = Local::now();
    let start = Instant::now();
    let response = request_builder
        .send()
        .await
        .with_context(|| format!("sending {} {}", descriptor.method(), full_url))?;
    let status = response.status();
    let bytes = response
        .bytes()
        .await
        .with_context(|| format!("reading response body from {full_url}"))?;
    let elapsed = start.elapsed();

    let text = descriptor
        .encoding()
        .decode(&bytes)
        .with_context(|| format!("decoding response body from {full_url}"))?;

    debug!(
        url = %full_url,
        status = status.as_u16(),
        bytes = bytes.len(),
        elapsed_ms = elapsed.as_millis() as u64,
        "request completed"
    );

    Ok(ExecutedRequest::completed(
        descriptor.clone(),
        ResponseData {
            issued_at,
            elapsed,
            status: status.as_u16(),
            raw: bytes.to_vec(),
            text,
        },
    ))
}

fn http_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
        Method::Head => reqwest::Method::HEAD,
    }
}
