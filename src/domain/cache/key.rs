//! Request identity used to address stored responses

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of a request inside a cache region: method plus absolute URL.
///
/// The method is upper-cased and the URL fragment is dropped; the query
/// string is part of the identity. Headers never participate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequestKey {
    method: String,
    url: String,
}

impl RequestKey {
    /// Creates a key for the given method and URL
    pub fn new(method: &str, url: &str) -> Self {
        Self {
            method: method.to_ascii_uppercase(),
            url: strip_fragment(url).to_string(),
        }
    }

    /// Creates a key for a GET request
    pub fn get(url: &str) -> Self {
        Self::new("GET", url)
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Flat representation used as a field name by persistent backends
    pub fn to_storage_key(&self) -> String {
        format!("{} {}", self.method, self.url)
    }

    /// Parses the flat representation produced by [`RequestKey::to_storage_key`]
    pub fn from_storage_key(raw: &str) -> Option<Self> {
        let (method, url) = raw.split_once(' ')?;

        if method.is_empty() || url.is_empty() {
            return None;
        }

        Some(Self::new(method, url))
    }
}

impl fmt::Display for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.url)
    }
}

fn strip_fragment(url: &str) -> &str {
    url.split_once('#').map_or(url, |(base, _)| base)
}
