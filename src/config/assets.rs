//! Build-time cache constants of the deployed site

use url::Url;

use crate::domain::cache::{CacheVersion, Manifest};
use crate::domain::lifecycle::LifecycleSettings;
use crate::domain::DomainError;

/// Shared by every version of this application's caches
pub const APP_PREFIX: &str = "FoodFest-";

/// Bump on every deployment that changes cached assets
pub const VERSION: &str = "version_01";

/// Pages, stylesheets and bundles; images are not pre-cached
pub const FILES_TO_CACHE: &[&str] = &[
    "./index.html",
    "./events.html",
    "./tickets.html",
    "./schedule.html",
    "./assets/css/style.css",
    "./assets/css/bootstrap.css",
    "./assets/css/tickets.css",
    "./dist/app.bundle.js",
    "./dist/events.bundle.js",
    "./dist/tickets.bundle.js",
    "./dist/schedule.bundle.js",
];

/// Lifecycle settings for the compiled-in version, scoped to `origin`
pub fn lifecycle_settings(origin: &str) -> Result<LifecycleSettings, DomainError> {
    let scope = Url::parse(origin).map_err(|e| {
        DomainError::configuration(format!("Invalid upstream origin '{}': {}", origin, e))
    })?;

    if scope.cannot_be_a_base() {
        return Err(DomainError::configuration(format!(
            "Upstream origin '{}' cannot be used as a base URL",
            origin
        )));
    }

    Ok(LifecycleSettings {
        version: CacheVersion::new(APP_PREFIX, VERSION)?,
        manifest: Manifest::new(FILES_TO_CACHE.iter().copied())?,
        scope,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compiled_in_settings() {
        let settings = lifecycle_settings("https://example.github.io/food-fest/").unwrap();

        assert_eq!(settings.version.cache_name(), "FoodFest-version_01");
        assert_eq!(settings.manifest.len(), 11);

        let requests = settings.manifest.resolve(&settings.scope).unwrap();
        assert_eq!(
            requests[0].url,
            "https://example.github.io/food-fest/index.html"
        );
    }

    #[test]
    fn test_rejects_invalid_origin() {
        assert!(lifecycle_settings("not a url").is_err());
        assert!(lifecycle_settings("mailto:team@example.com").is_err());
    }
}
