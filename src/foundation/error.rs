/// Convenience result type used across layerscope.
pub type LayerScopeResult<T> = Result<T, LayerScopeError>;

/// Error taxonomy for decoding, assembly and persistence.
#[derive(thiserror::Error, Debug)]
pub enum LayerScopeError {
    /// A wire message that does not decode into a packet.
    #[error("decode error: {0}")]
    Decode(String),

    /// Framing or command-channel data that breaks the protocol.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// A texture payload the cache cannot accept.
    #[error("texture error: {0}")]
    Texture(String),

    /// A missing or damaged archive.
    #[error("persistence error: {0}")]
    Persist(String),

    /// Errors when serializing or deserializing frames.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LayerScopeError {
    /// Build a [`LayerScopeError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`LayerScopeError::Protocol`] value.
    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }

    /// Build a [`LayerScopeError::Texture`] value.
    pub fn texture(msg: impl Into<String>) -> Self {
        Self::Texture(msg.into())
    }

    /// Build a [`LayerScopeError::Persist`] value.
    pub fn persist(msg: impl Into<String>) -> Self {
        Self::Persist(msg.into())
    }

    /// Build a [`LayerScopeError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<prost::DecodeError> for LayerScopeError {
    fn from(err: prost::DecodeError) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<serde_json::Error> for LayerScopeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

impl From<std::io::Error> for LayerScopeError {
    fn from(err: std::io::Error) -> Self {
        Self::Other(anyhow::Error::new(err))
    }
}

impl From<image::ImageError> for LayerScopeError {
    fn from(err: image::ImageError) -> Self {
        Self::Persist(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
