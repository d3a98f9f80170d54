//! Infrastructure layer - Storage backends, network access and logging

pub mod cache;
pub mod logging;
pub mod network;
