//! Fixed list of assets populated at install time

use std::collections::HashSet;

use url::Url;

use crate::domain::DomainError;

use super::entity::AssetRequest;

/// Ordered, non-empty list of asset paths
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    entries: Vec<String>,
}

impl Manifest {
    pub fn new<I, S>(entries: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries: Vec<String> = entries.into_iter().map(Into::into).collect();

        if entries.is_empty() {
            return Err(DomainError::validation("Manifest must not be empty"));
        }

        if let Some(blank) = entries.iter().position(|e| e.trim().is_empty()) {
            return Err(DomainError::validation(format!(
                "Manifest entry {} is blank",
                blank
            )));
        }

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolves every entry against `scope` into a GET request.
    ///
    /// Root-relative entries (`/style.css`) land under the scope path, the
    /// same place the proxy maps an incoming `/style.css` to. Fails on
    /// entries that do not form a valid URL and on entries that resolve to
    /// the same request.
    pub fn resolve(&self, scope: &Url) -> Result<Vec<AssetRequest>, DomainError> {
        let mut seen = HashSet::with_capacity(self.entries.len());
        let mut requests = Vec::with_capacity(self.entries.len());

        for entry in &self.entries {
            let url = scope.join(&scoped_entry(entry)).map_err(|e| {
                DomainError::validation(format!("Invalid manifest entry '{}': {}", entry, e))
            })?;

            let request = AssetRequest::get(url.as_str());

            if !seen.insert(request.key()) {
                return Err(DomainError::validation(format!(
                    "Duplicate manifest entry '{}' ({})",
                    entry, url
                )));
            }

            requests.push(request);
        }

        Ok(requests)
    }
}

fn scoped_entry(entry: &str) -> String {
    match entry.strip_prefix('/') {
        Some(rest) if !rest.starts_with('/') => format!("./{}", rest),
        _ => entry.to_string(),
    }
}
