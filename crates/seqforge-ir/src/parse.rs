use crate::config::{ConfigError, GenerationConfig};
use crate::types::SystemModel;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

pub fn parse_model(json: &str) -> Result<SystemModel, ParseError> {
    Ok(serde_json::from_str(json)?)
}

/// Parse and validate a generation configuration.
pub fn parse_config(json: &str) -> Result<GenerationConfig, ParseError> {
    let config: GenerationConfig = serde_json::from_str(json)?;
    config.validate()?;
    Ok(config)
}
