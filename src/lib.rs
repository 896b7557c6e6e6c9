//! CarePortal core library
//!
//! This module exports the symptom triage engine and the appointment
//! categorizer used by the patient/provider portal, plus the HTTP surface
//! that serves them.

pub mod api;
pub mod engine;
pub mod error;
pub mod models;

pub use crate::engine::appointments::{categorize, filter_by_search, status_color, status_label};
pub use crate::engine::severity::compute_severity;
pub use crate::engine::triage::{assess, TriageSession};
pub use crate::error::{ApiError, InvalidInput, ProtocolError, TriageError};

/// Application configuration
pub mod config {
    use serde::Deserialize;

    #[derive(Debug, Clone, Deserialize)]
    pub struct Config {
        pub server: ServerConfig,
        pub log: LogConfig,
        #[serde(default)]
        pub triage: TriageConfig,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ServerConfig {
        pub host: String,
        pub port: u16,
        /// Origins allowed by CORS; empty allows any origin.
        #[serde(default)]
        pub cors_origins: Vec<String>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct LogConfig {
        /// `EnvFilter` directive, e.g. `info` or `careportal=debug,actix_web=info`
        pub level: String,
        pub format: LogFormat,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum LogFormat {
        Pretty,
        Json,
    }

    #[derive(Debug, Clone, Default, Deserialize)]
    pub struct TriageConfig {
        /// JSON file replacing the built-in triage protocol
        pub protocol_path: Option<String>,
    }

    /// Load configuration from defaults, files and environment
    pub fn load_config() -> Result<Config, ::config::ConfigError> {
        let env = std::env::var("CAREPORTAL_ENV").unwrap_or_else(|_| "development".into());

        ::config::Config::builder()
            // Start with default settings
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080_i64)?
            .set_default("log.level", "info")?
            .set_default("log.format", "pretty")?
            .add_source(::config::File::with_name("config/default").required(false))
            // Override with environment-specific settings
            .add_source(::config::File::with_name(&format!("config/{}", env)).required(false))
            // Override with environment variables, e.g. CAREPORTAL_SERVER__PORT
            .add_source(
                ::config::Environment::with_prefix("CAREPORTAL")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }

}
