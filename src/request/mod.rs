use std::collections::BTreeMap;

mod encoding;
mod error;
mod executed;
mod model;

/// Header name to value. Sorted so exported collections are stable between runs.
pub type Headers = BTreeMap<String, String>;

pub use encoding::Encoding;
pub use error::RequestError;
pub use executed::{ExecutedRequest, ResponseData};
pub use model::{Method, RequestDescriptor, Scheme};

#[cfg(test)]
pub(crate) use executed::fixtures;
