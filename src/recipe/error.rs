use thiserror::Error;

use crate::model::CoreError;

pub type Result<T> = std::result::Result<T, RecipeError>;

#[derive(Debug, Error)]
pub enum RecipeError {
    #[error("recipe specification parse failure: {0}")]
    Parse(String),

    #[error("recipe I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("recipe serialization failure: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("recipe YAML serialization failure: {0}")]
    SerdeYaml(#[from] serde_yaml::Error),

    #[error("transform step failed: {0}")]
    Core(#[from] CoreError),
}
