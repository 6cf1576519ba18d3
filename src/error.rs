/// Inference errors
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A required table entry or setting is missing or invalid
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The chosen variant needs batch output that the shaping options do not produce
    #[error("unsupported configuration: {0}")]
    UnsupportedConfiguration(String),

    /// A batch and its length vector (or the network output) disagree on shape
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// A predicted class index with no label
    #[error("no label found for class index {0}")]
    UnknownLabel(usize),

    /// Unable to read an artifact file
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Unable to parse an artifact file
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Raised by the network's forward or decode step
    #[error(transparent)]
    Network(#[from] anyhow::Error),
}

/// Result type for inference operations
pub type Result<T> = std::result::Result<T, Error>;
