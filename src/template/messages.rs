//! Completion message expansion and blob attachment.

use crate::service::CompletionTemplate;
use crate::types::{Blob, CompletionMessage, Params, Value};

use super::placeholder;

/// Expand a completion template into provider messages.
///
/// Text messages come first, in template order. One attachment message per blob
/// found in `params` follows.
pub fn build_messages(template: &CompletionTemplate, params: &Params) -> Vec<CompletionMessage> {
    let mut messages: Vec<CompletionMessage> = template
        .messages
        .iter()
        .map(|m| {
            let joined = m.joined();
            CompletionMessage::text(m.role.clone(), placeholder::expand(&joined, params))
        })
        .collect();

    messages.extend(
        collect_blobs(params)
            .iter()
            .filter_map(CompletionMessage::attachment),
    );
    messages
}

/// Every attachable blob in the parameter tree, depth-first.
///
/// Order follows parameter name order (bags are sorted maps), then array index
/// order, so the same bag always yields the same attachment order.
pub fn collect_blobs(params: &Params) -> Vec<Blob> {
    let mut blobs = Vec::new();
    for value in params.values() {
        walk(value, &mut blobs);
    }
    blobs
}

fn walk(value: &Value, out: &mut Vec<Blob>) {
    match value {
        Value::Blob(blob) => {
            if blob.is_attachable() {
                out.push(blob.clone());
            }
        }
        Value::Array(items) => {
            for item in items {
                walk(item, out);
            }
        }
        Value::Object(map) => {
            if let Some(blob) = value.as_blob() {
                out.push(blob);
            }
            for nested in map.values() {
                walk(nested, out);
            }
        }
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {}
    }
}
