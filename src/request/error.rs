use thiserror::Error;

use super::Encoding;

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("response is not available; send the request first")]
    NotExecuted,
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),
    #[error("unsupported encoding: {0}")]
    UnsupportedEncoding(String),
    #[error("response body is not valid {0}")]
    Decode(Encoding),
    #[error("response body is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
