//! Typed binary payloads attached to requests or returned by image generation.

use base64::Engine as _;
use bytes::Bytes;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

/// A content-typed binary payload.
///
/// Exactly one of `content` / `base64` is expected to carry the payload. When raw
/// bytes are present they take precedence for encoding.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct Blob {
    pub content_type: String,
    #[serde(skip)]
    pub content: Option<Bytes>,
    #[serde(default)]
    pub base64: Option<String>,
}

impl Blob {
    pub fn from_bytes(content_type: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            content_type: content_type.into(),
            content: Some(content.into()),
            base64: None,
        }
    }

    pub fn from_base64(content_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            content_type: content_type.into(),
            content: None,
            base64: Some(data.into()),
        }
    }

    /// Base64 text of the payload, encoding raw bytes when they are present.
    pub fn to_base64(&self) -> Option<String> {
        match (&self.content, &self.base64) {
            (Some(bytes), _) if !bytes.is_empty() => {
                Some(base64::engine::general_purpose::STANDARD.encode(bytes))
            }
            (_, Some(text)) if !text.is_empty() => Some(text.clone()),
            _ => None,
        }
    }

    /// A blob can be attached to a completion only when it has both a content type
    /// and a non-empty payload.
    pub fn is_attachable(&self) -> bool {
        !self.content_type.is_empty() && self.to_base64().is_some()
    }

    /// `data:<content-type>;base64,<data>`
    pub fn data_uri(&self) -> Option<String> {
        if self.content_type.is_empty() {
            return None;
        }
        self.to_base64()
            .map(|data| format!("data:{};base64,{}", self.content_type, data))
    }

    /// Decoded payload bytes.
    pub fn decode(&self) -> Option<Vec<u8>> {
        if let Some(bytes) = &self.content {
            if !bytes.is_empty() {
                return Some(bytes.to_vec());
            }
        }
        let text = self.base64.as_deref()?;
        base64::engine::general_purpose::STANDARD.decode(text).ok()
    }
}

impl Serialize for Blob {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("Blob", 2)?;
        state.serialize_field("content_type", &self.content_type)?;
        state.serialize_field("base64", &self.to_base64().unwrap_or_default())?;
        state.end()
    }
}
