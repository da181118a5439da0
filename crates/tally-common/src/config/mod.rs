//! Configuration structs

mod app_config;

pub use app_config::{
    AdminConfig, AggregationConfig, AppConfig, AppSettings, ConfigError, DatabaseConfig,
    Environment, GifConfig, PlatformConfig, RenderConfig, RetentionConfig, ServerConfig,
};
