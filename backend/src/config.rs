//! Configuration management for the borer inspection service
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with BIS_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use shared::Language;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Log output format ("pretty" or "json")
    pub log_format: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Inspection session limits
    pub sessions: SessionConfig,

    /// Report export configuration
    pub report: ReportConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    /// Maximum number of live inspection sessions
    pub max_sessions: usize,

    /// Sessions untouched for this many minutes are dropped when a new
    /// session is created
    pub idle_timeout_minutes: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_sessions: 1000,
            idle_timeout_minutes: 120,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReportConfig {
    /// Title printed at the top of the PDF report
    pub title: String,

    /// Default report language code ("es" or "en")
    pub language: String,

    pub spreadsheet_filename: String,
    pub document_filename: String,
    pub csv_filename: String,
}

impl ReportConfig {
    pub fn language(&self) -> Language {
        Language::from_code(&self.language)
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("BIS_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("log_format", "pretty")?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("sessions.max_sessions", 1000)?
            .set_default("sessions.idle_timeout_minutes", 120)?
            .set_default("report.title", "Resultados del Análisis de Diatrea SPP")?
            .set_default("report.language", "es")?
            .set_default("report.spreadsheet_filename", "analisis_diatrea.xlsx")?
            .set_default("report.document_filename", "analisis_diatrea.pdf")?
            .set_default("report.csv_filename", "muestreo_diatrea.csv")?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (BIS_ prefix)
            .add_source(
                Environment::with_prefix("BIS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: "Resultados del Análisis de Diatrea SPP".to_string(),
            language: "es".to_string(),
            spreadsheet_filename: "analisis_diatrea.xlsx".to_string(),
            document_filename: "analisis_diatrea.pdf".to_string(),
            csv_filename: "muestreo_diatrea.csv".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            log_format: "pretty".to_string(),
            server: ServerConfig::default(),
            sessions: SessionConfig::default(),
            report: ReportConfig::default(),
        }
    }
}
