use std::{fmt, str::FromStr};

use super::{Encoding, Headers, RequestError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
        }
    }
}

impl FromStr for Method {
    type Err = RequestError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "PATCH" => Ok(Method::Patch),
            "DELETE" => Ok(Method::Delete),
            "HEAD" => Ok(Method::Head),
            _ => Err(RequestError::UnsupportedMethod(value.trim().to_string())),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scheme {
    #[default]
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }

    /// Splits an endpoint such as `https://example.com` into its scheme and host.
    /// Endpoints without a recognised prefix are treated as plain `http`.
    fn split_endpoint(endpoint: &str) -> (Scheme, String) {
        let endpoint = endpoint.trim();
        if let Some(host) = endpoint.strip_prefix("https://") {
            (Scheme::Https, host.to_string())
        } else if let Some(host) = endpoint.strip_prefix("http://") {
            (Scheme::Http, host.to_string())
        } else {
            (Scheme::Http, endpoint.to_string())
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything needed to issue one HTTP call.
///
/// A descriptor is built once from an input record and never changes while a
/// request is in flight; the only mutation offered is [`add_query_param`].
///
/// [`add_query_param`]: RequestDescriptor::add_query_param
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    method: Method,
    scheme: Scheme,
    host: String,
    resource: String,
    query: Option<String>,
    headers: Headers,
    encoding: Encoding,
}

impl RequestDescriptor {
    pub fn new(method: Method, endpoint: &str, resource: &str) -> Self {
        let (scheme, host) = Scheme::split_endpoint(endpoint);
        Self {
            method,
            scheme,
            host,
            resource: resource.trim().to_string(),
            query: None,
            headers: Headers::new(),
            encoding: Encoding::default(),
        }
    }

    pub fn with_query(mut self, query: &str) -> Self {
        self.query = normalize_query(query);
        self
    }

    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Normalized query string including the leading `?`, if any.
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    pub fn base_url(&self) -> String {
        format!(
            "{}://{}/{}",
            self.scheme,
            self.host.trim_end_matches('/'),
            self.resource.trim_start_matches('/')
        )
    }

    pub fn full_url(&self) -> String {
        match &self.query {
            Some(query) => format!("{}{}", self.base_url(), query),
            None => self.base_url(),
        }
    }

    /// Resource split on `/` with leading and trailing slashes removed.
    pub fn path_segments(&self) -> Vec<String> {
        let trimmed = self.resource.trim_matches('/');
        if trimmed.is_empty() {
            return Vec::new();
        }
        trimmed.split('/').map(str::to_string).collect()
    }

    /// Raw `key=value` pairs of the query string. Segments without `=` are skipped.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let Some(query) = &self.query else {
            return Vec::new();
        };
        query
            .trim_start_matches('?')
            .split('&')
            .filter_map(|segment| segment.split_once('='))
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    pub fn add_query_param(&mut self, key: &str, value: &str) {
        match &mut self.query {
            Some(query) => {
                query.push('&');
                query.push_str(key);
                query.push('=');
                query.push_str(value);
            }
            None => self.query = Some(format!("?{key}={value}")),
        }
    }
}

fn normalize_query(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "?" {
        None
    } else if trimmed.starts_with('?') {
        Some(trimmed.to_string())
    } else {
        Some(format!("?{trimmed}"))
    }
}
