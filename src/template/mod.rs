//! 模板展开：占位符替换、附件收集、动态 token 预算与响应格式 schema。
//!
//! # Template & Schema Expander
//!
//! Pure functions that turn a service's completion template plus a prepared
//! parameter bag into the pieces of a provider request.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`placeholder`] | Single-pass `{{params.<name>}}` substitution |
//! | [`messages`] | Message expansion and blob attachment |
//! | [`tokens`] | Dynamic `max_tokens` budget |
//! | [`schema`] | Placeholder expansion inside JSON schemas |
//!
//! ```rust
//! use ai_intelligence::template::expand;
//! use ai_intelligence::types::{Params, Value};
//!
//! let mut params = Params::new();
//! params.insert("lang".to_string(), Value::from("French"));
//! assert_eq!(expand("Translate to {{params.lang}}", &params), "Translate to French");
//! ```

pub mod messages;
pub mod placeholder;
pub mod schema;
pub mod tokens;

pub use messages::{build_messages, collect_blobs};
pub use placeholder::{expand, referenced_names};
pub use schema::{expand_response_format, expand_schema};
pub use tokens::compute_max_tokens;
