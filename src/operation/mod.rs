//! 操作类型：补全、向量、审核与图像生成。
//!
//! # Operation Kinds
//!
//! Every service performs exactly one operation kind. The kind determines the
//! provider endpoint, the request body shape ([`body`]) and how the response is
//! normalized ([`crate::normalize`]).

pub mod body;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use body::build_request_body;

/// Closed set of operations a service can perform.
///
/// The endpoint-style tags used by older service documents (`v1/completions`, ...)
/// are accepted as aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    #[serde(rename = "completion", alias = "v1/completions", alias = "v1/chat/completions")]
    Completion,
    #[serde(rename = "embedding", alias = "v1/embeddings")]
    Embedding,
    #[serde(rename = "moderation", alias = "v1/moderations")]
    Moderation,
    #[serde(rename = "image-generation", alias = "v1/images/generations")]
    ImageGeneration,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completion => "completion",
            Self::Embedding => "embedding",
            Self::Moderation => "moderation",
            Self::ImageGeneration => "image-generation",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_tags_are_aliases() {
        let kind: OperationKind = serde_json::from_str("\"v1/images/generations\"").unwrap();
        assert_eq!(kind, OperationKind::ImageGeneration);
        let kind: OperationKind = serde_json::from_str("\"moderation\"").unwrap();
        assert_eq!(kind, OperationKind::Moderation);
        assert!(serde_json::from_str::<OperationKind>("\"v1/audio\"").is_err());
    }
}
