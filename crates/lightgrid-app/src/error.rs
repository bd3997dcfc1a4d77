//! Application shell errors.

use lightgrid_core::{ConfigError, ManifestError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid viewport '{0}', expected WIDTHxHEIGHT")]
    InvalidViewport(String),
    #[error("Usage: {0}")]
    Usage(String),
    #[error("Required element #{0} is missing")]
    MissingElement(String),
    #[error("Element #{0} has the wrong type")]
    WrongElement(String),
    #[error("No browser window available")]
    NoWindow,
    #[error("Failed to fetch {url}: HTTP {status}")]
    Fetch { url: String, status: u16 },
    #[error("JavaScript error: {0}")]
    Js(String),
}

/// Result type for shell operations.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for AppError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        AppError::Js(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}
