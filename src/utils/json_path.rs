//! Path mapper for field extraction from provider responses and dot-path merging
//! into parameter bags.
//!
//! Supported read paths:
//! - Nested path access (e.g., "results.flagged")
//! - Array indexing (e.g., "choices[0].message.content", "data.0.b64_json")

use serde_json::Value as Json;

use crate::types::{Params, Value};

/// Path mapper error
#[derive(Debug, thiserror::Error)]
pub enum PathMapperError {
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Cannot set value at path '{path}': '{segment}' already holds a non-object value")]
    Conflict { path: String, segment: String },
}

/// Path mapper for extracting and merging values using dot-notation paths
pub struct PathMapper;

impl PathMapper {
    /// Get value from JSON using dot-notation path (supports array indexing)
    ///
    /// Examples:
    /// - "choices[0].message.content"
    /// - "data.0.embedding"
    pub fn get_path<'a>(obj: &'a Json, path: &str) -> Option<&'a Json> {
        if path.is_empty() {
            return None;
        }

        let normalized = path.trim().trim_start_matches("$.");
        let mut current = obj;

        for part in normalized.split('.') {
            if part.is_empty() {
                return None;
            }

            // Check if part contains array index, e.g., "choices[0]"
            if let Some(bracket_pos) = part.find('[') {
                let key = &part[..bracket_pos];
                let idx = part[bracket_pos + 1..].trim_end_matches(']').parse::<usize>().ok()?;

                if !key.is_empty() {
                    current = current.as_object()?.get(key)?;
                }
                current = current.as_array()?.get(idx)?;
            } else {
                current = match current {
                    Json::Object(map) => map.get(part)?,
                    Json::Array(arr) => arr.get(part.parse::<usize>().ok()?)?,
                    _ => return None,
                };
            }
        }

        Some(current)
    }

    pub fn get_str<'a>(obj: &'a Json, path: &str) -> Option<&'a str> {
        Self::get_path(obj, path).and_then(Json::as_str)
    }

    /// Merge `value` into `root` at a dot-separated path, creating intermediate
    /// objects as needed.
    ///
    /// When the final key already exists the value is appended: an existing array
    /// grows by one, any other existing value becomes a two-item array.
    pub fn merge_path(root: &mut Params, path: &str, value: Value) -> Result<(), PathMapperError> {
        let parts: Vec<&str> = path.split('.').collect();
        if parts.iter().any(|p| p.is_empty()) {
            return Err(PathMapperError::InvalidPath(path.to_string()));
        }
        let (last, intermediate) = parts
            .split_last()
            .ok_or_else(|| PathMapperError::InvalidPath(path.to_string()))?;

        let mut current = root;
        for part in intermediate {
            let slot = current
                .entry(part.to_string())
                .or_insert_with(|| Value::Object(Params::new()));
            current = match slot {
                Value::Object(map) => map,
                _ => {
                    return Err(PathMapperError::Conflict {
                        path: path.to_string(),
                        segment: part.to_string(),
                    })
                }
            };
        }

        match current.remove(*last) {
            None => {
                current.insert(last.to_string(), value);
            }
            Some(Value::Array(mut items)) => {
                items.push(value);
                current.insert(last.to_string(), Value::Array(items));
            }
            Some(existing) => {
                current.insert(last.to_string(), Value::Array(vec![existing, value]));
            }
        }
        Ok(())
    }
}
