use thiserror::Error;

/// Core error type shared across schemaforge crates.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed options detected before any table is produced.
    #[error("invalid configuration: {0}")]
    Configuration(String),
    /// A user hook failed; the message is propagated unmodified.
    #[error("hook failed for {entity}: {message}")]
    Hook { entity: String, message: String },
    /// The source collector could not produce raw columns.
    #[error("collector error: {0}")]
    Collector(String),
    /// The schema violates internal invariants.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Build a hook error naming the table or column the hook was invoked for.
    pub fn hook(entity: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Hook {
            entity: entity.into(),
            message: message.into(),
        }
    }
}

/// Convenience alias for results returned by schemaforge crates.
pub type Result<T> = std::result::Result<T, Error>;
