use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MapprError {
    // Config-related errors
    #[error("Failed to get config directory")]
    ConfigDirNotFound,

    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize config: {0}")]
    SerializationFailed(#[from] toml::ser::Error),

    #[error("Failed to deserialize config: {0}")]
    DeserializationFailed(#[from] toml::de::Error),

    #[error("Config file not found at path: {path}")]
    ConfigFileNotFound { path: PathBuf },

    #[error("Config validation failed: {reason}")]
    ConfigValidationFailed { reason: String },

    // Terrain-related errors
    #[error("Invalid grid dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Invalid terrain data: {reason}")]
    InvalidTerrainData { reason: String },

    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    #[error("Failed to encode report: {0}")]
    ReportEncoding(#[from] serde_json::Error),
}

/// Result type alias for all fallible operations
pub type MapprResult<T> = Result<T, MapprError>;

/// Flattens a `validator` report into a single readable line.
pub(crate) fn describe_validation(errors: &validator::ValidationErrors) -> String {
    let mut details: Vec<String> = errors
        .field_errors()
        .iter()
        .map(|(field, errors)| {
            let messages: Vec<String> = errors.iter().map(|e| e.code.to_string()).collect();
            format!("{field}: {}", messages.join(", "))
        })
        .collect();
    details.sort();

    if details.is_empty() {
        // Nested struct failures do not show up in field_errors
        errors.to_string()
    } else {
        details.join("; ")
    }
}
