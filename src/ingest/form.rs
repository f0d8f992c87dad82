//! `multipart/form-data` request bodies.

use bytes::Bytes;

use super::{from_document, Inbound};
use crate::types::{Blob, Params, Value};
use crate::{Error, ErrorContext, Result};

/// Name of the part carrying the JSON request document.
pub const REQUEST_PART: &str = "request";

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// One multipart part, already read into memory.
#[derive(Debug, Clone, PartialEq)]
pub enum FormPart {
    /// A plain form value.
    Value { name: String, text: String },
    /// An uploaded file.
    File {
        name: String,
        content_type: Option<String>,
        data: Bytes,
    },
}

impl FormPart {
    pub fn name(&self) -> &str {
        match self {
            FormPart::Value { name, .. } | FormPart::File { name, .. } => name,
        }
    }
}

/// Build an [`Inbound`] from multipart parts.
///
/// The `request` part is parsed first. Plain values are merged next, then
/// files as [`Blob`]s, each at the dot-separated path given by its part name.
/// Without a `request` part the remaining parts form a single request whose
/// model comes from a `model` value or `query_model`.
pub fn from_parts(parts: Vec<FormPart>, query_model: Option<&str>) -> Result<Inbound> {
    let mut request_doc = None;
    let mut values = Vec::new();
    let mut files = Vec::new();
    for part in parts {
        match part {
            FormPart::Value { name, text } if name == REQUEST_PART && request_doc.is_none() => {
                request_doc = Some(Bytes::from(text));
            }
            FormPart::File { name, data, .. } if name == REQUEST_PART && request_doc.is_none() => {
                request_doc = Some(data);
            }
            FormPart::Value { name, text } => values.push((name, Value::String(text))),
            FormPart::File {
                name,
                content_type,
                data,
            } => {
                let content_type = content_type
                    .filter(|ct| !ct.is_empty())
                    .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());
                files.push((name, Value::Blob(Blob::from_bytes(content_type, data))));
            }
        }
    }

    match request_doc {
        Some(doc) => {
            let doc: serde_json::Value = serde_json::from_slice(&doc).map_err(|e| {
                Error::request_with_context(
                    "invalid input: malformed 'request' part",
                    ErrorContext::new().with_details(e.to_string()).with_source("ingest"),
                )
            })?;
            let mut inbound = from_document(doc, query_model)?;
            for (key, value) in values.into_iter().chain(files) {
                inbound.merge(&key, value)?;
            }
            Ok(inbound)
        }
        None => {
            let mut params = Params::new();
            for (key, value) in values.into_iter().chain(files) {
                crate::utils::PathMapper::merge_path(&mut params, &key, value).map_err(|e| {
                    Error::request_with_context(
                        format!("invalid input: {}", e),
                        ErrorContext::new().with_field_path(key.as_str()).with_source("ingest"),
                    )
                })?;
            }
            Inbound::single(params, query_model)
        }
    }
}
