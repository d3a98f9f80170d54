//! Version-qualified cache naming and the stale-cache rule

use std::fmt;

use crate::domain::DomainError;

/// Application prefix plus version suffix, naming the current cache region.
///
/// A region belongs to the application family when its name *contains* the
/// prefix anywhere, not only at the start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheVersion {
    prefix: String,
    version: String,
    cache_name: String,
}

impl CacheVersion {
    pub fn new(prefix: impl Into<String>, version: impl Into<String>) -> Result<Self, DomainError> {
        let prefix = prefix.into();
        let version = version.into();

        if prefix.is_empty() {
            return Err(DomainError::validation("Application prefix must not be empty"));
        }

        if version.is_empty() {
            return Err(DomainError::validation("Version must not be empty"));
        }

        let cache_name = format!("{}{}", prefix, version);

        Ok(Self {
            prefix,
            version,
            cache_name,
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Name of the current cache region
    pub fn cache_name(&self) -> &str {
        &self.cache_name
    }

    pub fn is_current(&self, name: &str) -> bool {
        name == self.cache_name
    }

    pub fn belongs_to_family(&self, name: &str) -> bool {
        name.contains(&self.prefix)
    }

    /// A region from an earlier (or any other) version of this application
    pub fn is_stale(&self, name: &str) -> bool {
        self.belongs_to_family(name) && !self.is_current(name)
    }

    /// Names to preserve: every non-family region plus the current one
    pub fn keep_list(&self, existing: &[String]) -> Vec<String> {
        let mut keep: Vec<String> = existing
            .iter()
            .filter(|name| !self.is_stale(name))
            .cloned()
            .collect();

        if !keep.iter().any(|name| self.is_current(name)) {
            keep.push(self.cache_name.clone());
        }

        keep
    }
}

impl fmt::Display for CacheVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.cache_name)
    }
}
