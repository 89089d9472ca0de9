use std::collections::HashMap;

use crate::request::{ExecutedRequest, RequestError};

/// Executed requests that share one HTTP status code, in input order.
#[derive(Debug)]
pub struct StatusGroup<'a> {
    pub status: u16,
    pub requests: Vec<&'a ExecutedRequest>,
}

/// Partitions requests by status code. Groups appear in the order their first
/// member appears in `requests`.
pub fn group_by_status(
    requests: &[ExecutedRequest],
) -> Result<Vec<StatusGroup<'_>>, RequestError> {
    let mut groups: Vec<StatusGroup<'_>> = Vec::new();
    let mut index: HashMap<u16, usize> = HashMap::new();

    for request in requests {
        let status = request.status_code()?;
        let slot = *index.entry(status).or_insert_with(|| {
            groups.push(StatusGroup {
                status,
                requests: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].requests.push(request);
    }

    Ok(groups)
}
