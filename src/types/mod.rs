//! 类型系统模块：参数值、二进制附件与补全消息。
//!
//! # Types Module
//!
//! Core data types shared by every stage of the engine.
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Value`] | Closed recursive parameter value (JSON data plus [`Blob`]) |
//! | [`Params`] | A parameter bag, keyed by parameter name |
//! | [`Blob`] | Content-typed binary payload (raw bytes or base64 text) |
//! | [`CompletionMessage`] | Chat message sent to completion providers |
//!
//! ## Example
//!
//! ```rust
//! use ai_intelligence::types::{Blob, Params, Value};
//!
//! let mut params = Params::new();
//! params.insert("text".to_string(), Value::from("The food was great"));
//! params.insert("photo".to_string(), Value::Blob(Blob::from_bytes("image/png", vec![1, 2, 3])));
//! assert_eq!(params["text"].length(), 18);
//! ```

pub mod blob;
pub mod message;
pub mod value;

pub use blob::Blob;
pub use message::{CompletionMessage, ContentPart, ImageUrl, MessageContent, ATTACHMENT_ROLE};
pub use value::{params_from_json, Params, Value};
