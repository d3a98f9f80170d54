use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Network error: {url} - {message}")]
    Network { url: String, message: String },

    #[error("Population failed for cache '{cache}': {message}")]
    Population { cache: String, message: String },

    #[error("Failed to delete cache '{cache}': {message}")]
    Deletion { cache: String, message: String },

    #[error("Cache error: {message}")]
    Cache { message: String },
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn network(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Network {
            url: url.into(),
            message: message.into(),
        }
    }

    pub fn population(cache: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Population {
            cache: cache.into(),
            message: message.into(),
        }
    }

    pub fn deletion(cache: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Deletion {
            cache: cache.into(),
            message: message.into(),
        }
    }

    pub fn cache(message: impl Into<String>) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    /// Returns true for failures of a live network fetch
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }
}
