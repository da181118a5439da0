//! Application configuration structs
//!
//! Loads configuration from environment variables (with .env support).

use serde::Deserialize;
use std::env;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub database: DatabaseConfig,
    pub platform: PlatformConfig,
    pub gif: GifConfig,
    pub render: RenderConfig,
    pub aggregation: AggregationConfig,
    pub retention: RetentionConfig,
    pub admin: AdminConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Chat-platform REST API configuration (membership gateway)
#[derive(Debug, Clone, Deserialize)]
pub struct PlatformConfig {
    #[serde(default = "default_platform_base_url")]
    pub base_url: String,
    pub bot_token: String,
}

/// GIF-search provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GifConfig {
    #[serde(default = "default_gif_base_url")]
    pub base_url: String,
    /// Absent disables the GIF-search commands
    pub api_key: Option<String>,
}

/// Card-renderer asset configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_font_path")]
    pub font_path: String,
    /// CJK-capable fallback font, used when the main font lacks glyphs
    pub fallback_font_path: Option<String>,
}

/// Aggregation behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AggregationConfig {
    /// Fixed UTC offset (hours) used to resolve calendar-day window bounds
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,
}

/// Message-log retention configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RetentionConfig {
    #[serde(default = "default_message_days")]
    pub message_days: u32,
    #[serde(default = "default_prune_interval_hours")]
    pub prune_interval_hours: u32,
}

/// Bot administration configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    /// Bearer token required to mint authorization codes
    pub token: String,
}

// Default value functions
fn default_app_name() -> String {
    "tally".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_platform_base_url() -> String {
    "https://discord.com/api/v10".to_string()
}

fn default_gif_base_url() -> String {
    "https://tenor.googleapis.com/v2".to_string()
}

fn default_font_path() -> String {
    "./assets/fonts/main.ttf".to_string()
}

fn default_utc_offset_hours() -> i32 {
    9 // the reference deployment ranks by KST calendar days
}

fn default_message_days() -> u32 {
    30
}

fn default_prune_interval_hours() -> u32 {
    24
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Ok(Self {
            app: AppSettings {
                name: env::var("APP_NAME").unwrap_or_else(|_| default_app_name()),
                env: env::var("APP_ENV")
                    .ok()
                    .and_then(|s| match s.to_lowercase().as_str() {
                        "production" => Some(Environment::Production),
                        "staging" => Some(Environment::Staging),
                        "development" => Some(Environment::Development),
                        _ => None,
                    })
                    .unwrap_or_default(),
            },
            api: ServerConfig {
                host: env::var("API_HOST").unwrap_or_else(|_| default_host()),
                port: env::var("API_PORT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .ok_or(ConfigError::MissingVar("API_PORT"))?,
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL")
                    .map_err(|_| ConfigError::MissingVar("DATABASE_URL"))?,
                max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_max_connections),
                min_connections: env::var("DATABASE_MIN_CONNECTIONS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_min_connections),
            },
            platform: PlatformConfig {
                base_url: env::var("PLATFORM_BASE_URL")
                    .unwrap_or_else(|_| default_platform_base_url()),
                bot_token: env::var("BOT_TOKEN").map_err(|_| ConfigError::MissingVar("BOT_TOKEN"))?,
            },
            gif: GifConfig {
                base_url: env::var("GIF_BASE_URL").unwrap_or_else(|_| default_gif_base_url()),
                api_key: env::var("GIF_API_KEY").ok(),
            },
            render: RenderConfig {
                font_path: env::var("RENDER_FONT_PATH").unwrap_or_else(|_| default_font_path()),
                fallback_font_path: env::var("RENDER_FALLBACK_FONT_PATH").ok(),
            },
            aggregation: AggregationConfig {
                utc_offset_hours: env::var("AGGREGATION_UTC_OFFSET_HOURS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_utc_offset_hours),
            },
            retention: RetentionConfig {
                message_days: env::var("RETENTION_MESSAGE_DAYS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_message_days),
                prune_interval_hours: env::var("RETENTION_PRUNE_INTERVAL_HOURS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_prune_interval_hours),
            },
            admin: AdminConfig {
                token: env::var("ADMIN_TOKEN").map_err(|_| ConfigError::MissingVar("ADMIN_TOKEN"))?,
            },
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_is_production() {
        assert!(!Environment::Development.is_production());
        assert!(!Environment::Staging.is_production());
        assert!(Environment::Production.is_production());
    }

    #[test]
    fn test_environment_is_development() {
        assert!(Environment::Development.is_development());
        assert!(!Environment::Staging.is_development());
        assert!(!Environment::Production.is_development());
    }

    #[test]
    fn test_server_address() {
        let config = ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 8080,
        };
        assert_eq!(config.address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_default_values() {
        assert_eq!(default_app_name(), "tally");
        assert_eq!(default_host(), "127.0.0.1");
        assert_eq!(default_max_connections(), 20);
        assert_eq!(default_utc_offset_hours(), 9);
        assert_eq!(default_message_days(), 30);
    }
}
