use thiserror::Error;

use crate::catalog::CatalogError;
use crate::construct::PlacementError;

#[derive(Error, Debug)]
pub enum ShipwrightError {
    #[error("Invalid construction rules: {}", .0.join(", "))]
    InvalidRules(Vec<String>),

    #[error("Placement error: {0}")]
    Placement(#[from] PlacementError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Plan error: {0}")]
    Plan(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ShipwrightError>;
