use thiserror::Error;

use crate::meta::MetaError;
use crate::model::CoreError;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid space descriptor: {0}")]
    Invalid(String),

    #[error("descriptor I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("descriptor serialization failure: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("descriptor YAML serialization failure: {0}")]
    SerdeYaml(#[from] serde_yaml::Error),

    #[error("metadata rejected: {0}")]
    Meta(#[from] MetaError),

    #[error("space construction failed: {0}")]
    Core(#[from] CoreError),
}
