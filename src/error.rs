use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MonsoonError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Config file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("Invalid date: {value} (expected DD.MM.YYYY)")]
    InvalidDate { value: String },
}

pub type Result<T> = std::result::Result<T, MonsoonError>;
