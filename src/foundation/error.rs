/// Convenience result type used across cardframe.
pub type CardResult<T> = Result<T, CardError>;

/// Top-level error taxonomy used by the editing and rendering APIs.
#[derive(thiserror::Error, Debug)]
pub enum CardError {
    /// Invalid user-provided data (template geometry, paths, scripts).
    #[error("validation error: {0}")]
    Validation(String),

    /// A photo, template artwork, or font could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// Errors while rasterizing a canvas.
    #[error("render error: {0}")]
    Render(String),

    /// Export was requested while the export canvas cannot be produced.
    #[error("export unavailable: {0}")]
    ExportUnavailable(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CardError {
    /// Build a [`CardError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CardError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`CardError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`CardError::ExportUnavailable`] value.
    pub fn export_unavailable(msg: impl Into<String>) -> Self {
        Self::ExportUnavailable(msg.into())
    }

    /// Build a [`CardError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
