use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

/// Opaque reference usable as an image source, usually a `data:` URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self(source.into())
    }

    /// Encodes raw image bytes as a base64 `data:` URI.
    #[must_use]
    pub fn from_bytes(mime: &str, bytes: &[u8]) -> Self {
        Self(format!("data:{mime};base64,{}", STANDARD.encode(bytes)))
    }

    #[must_use]
    pub fn from_png_bytes(bytes: &[u8]) -> Self {
        Self::from_bytes("image/png", bytes)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
