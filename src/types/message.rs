//! Chat-completion message format sent to providers

use serde::{Deserialize, Serialize};

use super::blob::Blob;

/// Role used for messages carrying user-supplied attachments.
pub const ATTACHMENT_ROLE: &str = "user";

/// A single completion message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionMessage {
    pub role: String,
    pub content: MessageContent,
}

impl CompletionMessage {
    pub fn text(role: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: MessageContent::Text(text.into()),
        }
    }

    /// Attachment message referencing the blob through a single data-URI field.
    /// Returns `None` when the blob has no content type or no payload.
    pub fn attachment(blob: &Blob) -> Option<Self> {
        let url = blob.data_uri()?;
        Some(Self {
            role: ATTACHMENT_ROLE.to_string(),
            content: MessageContent::Parts(vec![ContentPart::ImageUrl {
                image_url: ImageUrl { url },
            }]),
        })
    }

    pub fn is_attachment(&self) -> bool {
        matches!(self.content, MessageContent::Parts(_))
    }

    pub fn as_text(&self) -> Option<&str> {
        match &self.content {
            MessageContent::Text(t) => Some(t),
            MessageContent::Parts(_) => None,
        }
    }
}

/// Message content (plain text or an array of content parts)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ContentPart {
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}
