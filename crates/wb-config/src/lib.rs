//! wb-config: canonical configuration file format and validation.

pub mod schema;
pub mod validate;

pub use schema::*;
pub use validate::{ValidationError, validate_config};

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub fn load_yaml(path: &std::path::Path) -> ConfigResult<WellbeingConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: WellbeingConfig = serde_yaml::from_str(&content)?;
    validate_config(&config)?;
    Ok(config)
}

pub fn save_yaml(path: &std::path::Path, config: &WellbeingConfig) -> ConfigResult<()> {
    validate_config(config)?;
    let content = serde_yaml::to_string(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load `path` when given, otherwise fall back to the built-in OECD defaults.
pub fn load_or_default(path: Option<&std::path::Path>) -> ConfigResult<WellbeingConfig> {
    match path {
        Some(p) => load_yaml(p),
        None => Ok(WellbeingConfig::default()),
    }
}
