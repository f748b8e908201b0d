//! # configs
//!
//! Environment-driven application configuration. Defaults suit local
//! development; every field can be overridden with a `FEEDBACK_*` variable
//! (e.g. `FEEDBACK_PORT=8080`). The binaries load `.env` before calling
//! [`AppConfig::load`].

use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigsError {
    #[error("configuration error: {0}")]
    Load(#[from] config::ConfigError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Directory holding the collection documents
    /// (`users.json`, `feedbacks.json`, `categories.json`).
    pub data_dir: String,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigsError> {
        let config = config::Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 3000)?
            .set_default("data_dir", "./data")?
            .add_source(config::Environment::with_prefix("FEEDBACK").try_parsing(true))
            .build()?;
        Ok(config.try_deserialize()?)
    }
}
