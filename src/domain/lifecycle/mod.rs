//! Lifecycle domain - install, activate and fetch handling

mod installer;
mod interceptor;
mod manager;
mod reconciler;

pub use installer::{InstallReport, Installer};
pub use interceptor::{InterceptedResponse, RequestInterceptor, ResponseSource};
pub use manager::{CacheLifecycleManager, LifecycleSettings};
pub use reconciler::{ActivationReport, DeletionFailure, Reconciler};
