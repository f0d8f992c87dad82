//! 请求解析：将 JSON 或 multipart 请求统一为具名请求集合。
//!
//! # Request Ingestor
//!
//! Three inbound shapes normalize to a [`Batch`]:
//!
//! 1. a single JSON object carrying `model` (or with `?model=` supplied
//!    out-of-band), keyed by its model name;
//! 2. a JSON object whose values are all objects, one request per key; an
//!    entry without `model` uses its own key;
//! 3. a multipart form whose `request` part holds shape 1 or 2, with further
//!    value and file parts merged in by dot-separated path.
//!
//! After ingestion every entry has a string `model`.

pub mod form;
pub mod json;

use serde_json::Value as Json;

use crate::batch::{model_of, Batch, ERRORS_KEY, MODEL_KEY};
use crate::types::{params_from_json, Params, Value};
use crate::utils::PathMapper;
use crate::{Error, ErrorContext, Result};

pub use form::{from_parts, FormPart};
pub use json::from_json;

/// How the caller addressed the engine; decides the response shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    /// One request, keyed by its model name in the batch.
    Single { name: String },
    Batch,
}

/// A parsed inbound call.
#[derive(Debug, Clone, PartialEq)]
pub struct Inbound {
    pub shape: Shape,
    pub batch: Batch,
}

impl Inbound {
    pub fn single(params: Params, query_model: Option<&str>) -> Result<Self> {
        let mut params = params;
        let name = match params.get(MODEL_KEY) {
            Some(_) => model_of(&params)?.to_string(),
            None => {
                let model = query_model.filter(|m| !m.is_empty()).ok_or_else(|| {
                    Error::request("invalid input: 'model' parameter is required")
                })?;
                params.insert(MODEL_KEY.to_string(), Value::from(model));
                model.to_string()
            }
        };
        let mut batch = Batch::new();
        batch.insert(name.clone(), params);
        Ok(Self {
            shape: Shape::Single { name },
            batch,
        })
    }

    pub fn batch(batch: Batch) -> Result<Self> {
        let mut batch = batch;
        if batch.contains_key(ERRORS_KEY) {
            return Err(Error::request(format!(
                "invalid input: '{}' is reserved and cannot name a request",
                ERRORS_KEY
            )));
        }
        for (name, params) in batch.iter_mut() {
            if !params.contains_key(MODEL_KEY) {
                params.insert(MODEL_KEY.to_string(), Value::from(name.as_str()));
            }
            model_of(params).map_err(|e| {
                Error::request_with_context(
                    e.to_string(),
                    ErrorContext::new().with_field_path(format!("{}.{}", name, MODEL_KEY)),
                )
            })?;
        }
        Ok(Self {
            shape: Shape::Batch,
            batch,
        })
    }

    /// Merge a form value into the request addressed by `key`.
    ///
    /// The first path segment selects a request when it names one; otherwise a
    /// lone request receives the whole path. In a multi-request batch a path
    /// that names no request is rejected.
    ///
    /// A lone request keeps unmatched leading segments, so `options.tone`
    /// lands at `options.tone` rather than being shortened to `tone`.
    pub fn merge(&mut self, key: &str, value: Value) -> Result<()> {
        let only = if self.batch.len() == 1 {
            self.batch.keys().next().cloned()
        } else {
            None
        };
        let (target, path) = match (key.split_once('.'), only) {
            (Some((first, rest)), _) if self.batch.contains_key(first) => {
                (first.to_string(), rest)
            }
            (_, Some(only)) => (only, key),
            _ => {
                return Err(Error::request_with_context(
                    "invalid input: form field does not address a request in this batch",
                    ErrorContext::new()
                        .with_field_path(key)
                        .with_source("ingest"),
                ))
            }
        };

        let params = self
            .batch
            .get_mut(&target)
            .ok_or_else(|| Error::request(format!("invalid input: unknown request '{}'", target)))?;
        PathMapper::merge_path(params, path, value).map_err(|e| {
            Error::request_with_context(
                format!("invalid input: {}", e),
                ErrorContext::new().with_field_path(key).with_source("ingest"),
            )
        })
    }
}

/// Classify a parsed JSON document as shape 1 or shape 2.
pub(crate) fn from_document(doc: Json, query_model: Option<&str>) -> Result<Inbound> {
    let Json::Object(map) = doc else {
        return Err(Error::request("invalid input: request body must be a JSON object"));
    };

    let is_batch = !map.contains_key(MODEL_KEY)
        && query_model.map_or(true, str::is_empty)
        && !map.is_empty()
        && map.values().all(Json::is_object);

    if is_batch {
        let batch = map
            .into_iter()
            .map(|(name, entry)| match entry {
                Json::Object(fields) => (name, params_from_json(fields)),
                _ => (name, Params::new()),
            })
            .collect();
        Inbound::batch(batch)
    } else {
        Inbound::single(params_from_json(map), query_model)
    }
}
