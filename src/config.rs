use crate::error::ConfigError;
use ::config::{Config, File, FileFormat};
use serde::Deserialize;

/// Environment variable holding the minimum volume age, e.g. `30m` or `7d`.
pub const MIN_AGE_ENV: &str = "ebsMinimumAge";
pub const DEFAULT_MIN_AGE: &str = "5m";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Kept as written; it is parsed when volumes are filtered.
    pub ebs_minimum_age: String,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::load(std::env::var(MIN_AGE_ENV).ok())
    }

    pub fn load(min_age: Option<String>) -> Result<Self, ConfigError> {
        let env = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            .set_default("ebs_minimum_age", DEFAULT_MIN_AGE)?
            // Both files are optional; a deployed function usually has neither
            .add_source(File::new("config/default", FileFormat::Toml).required(false))
            .add_source(File::new(&format!("config/{}", env), FileFormat::Toml).required(false))
            .set_override_option("ebs_minimum_age", min_age)?
            .build()?;

        Ok(s.try_deserialize()?)
    }
}
