//! Structured error types for virtgrid.
//!
//! Scroll and width paths never fail; these errors come from configuration,
//! column definitions and viewport adjusters.

/// All errors that can occur while configuring or adjusting a render container.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// A column width value that is neither pixels, a percentage, nor a star token.
    #[error("Invalid column width: {0}")]
    InvalidWidth(String),

    /// Grid options that cannot produce sane geometry.
    #[error("Invalid grid options: {0}")]
    InvalidConfig(String),

    /// JSON (de)serialization error from serde_json.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A registered viewport adjuster failed.
    #[error("Viewport adjuster failed: {0}")]
    Adjuster(String),

    /// Catch-all for string errors.
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;

impl From<String> for GridError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for GridError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

impl From<GridError> for wasm_bindgen::JsValue {
    fn from(e: GridError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
