/// Convenience result type used across the crate.
pub type CollageResult<T> = Result<T, CollageError>;

/// Top-level error taxonomy used by engine and caller-side APIs.
///
/// Missing optional assets and unresolvable fonts are not errors; the engine degrades through
/// fallbacks instead. Errors come from invalid geometry and from the I/O edges.
#[derive(thiserror::Error, Debug)]
pub enum CollageError {
    /// Invalid user-provided geometry or configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// Font data that could not be used at all.
    #[error("font error: {0}")]
    Font(String),

    /// Asset bytes that could not be decoded or written.
    #[error("asset error: {0}")]
    Asset(String),

    /// Caller-side precondition, e.g. not enough populated slots for an export.
    #[error("precondition failed: {0}")]
    Precondition(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CollageError {
    /// Build a [`CollageError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CollageError::Font`] value.
    pub fn font(msg: impl Into<String>) -> Self {
        Self::Font(msg.into())
    }

    /// Build a [`CollageError::Asset`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`CollageError::Precondition`] value.
    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::Precondition(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
