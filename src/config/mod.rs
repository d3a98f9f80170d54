mod app_config;
pub mod assets;

pub use app_config::{
    AppConfig, LogFormat, LoggingConfig, ServerConfig, StorageConfig, UpstreamConfig,
};
