/// Convenience result type used across fourcut.
pub type FourcutResult<T> = Result<T, FourcutError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum FourcutError {
    /// Invalid user-provided frame, catalog, or configuration data.
    #[error("validation error: {0}")]
    Validation(String),

    /// A photo or logo could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// The raster backend rejected a surface or paint.
    #[error("render error: {0}")]
    Render(String),

    /// A screen-flow transition was requested from the wrong state.
    #[error("session error: {0}")]
    Session(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FourcutError {
    /// Build a [`FourcutError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`FourcutError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`FourcutError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`FourcutError::Session`] value.
    pub fn session(msg: impl Into<String>) -> Self {
        Self::Session(msg.into())
    }

    /// Build a [`FourcutError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
