//! 响应归一化：将各操作的厂商响应映射为统一结果。
//!
//! # Response Normalizer
//!
//! One mapping per [`OperationKind`]. Each returns a typed [`Intelligence`]
//! value or [`Error::MissingField`] naming the path that was absent from the
//! provider's response.

use serde::Serialize;
use serde_json::Value as Json;
use std::collections::BTreeMap;

use crate::operation::OperationKind;
use crate::types::Blob;
use crate::utils::PathMapper;
use crate::{Error, Result};

const COMPLETION_CONTENT: &str = "choices[0].message.content";
const EMBEDDING_DATA: &str = "data";
const MODERATION_RESULT: &str = "results[0]";
const IMAGE_DATA: &str = "data[0].b64_json";

/// Content type of generated images.
pub const GENERATED_IMAGE_TYPE: &str = "image/png";

/// Canonical result of one intelligence request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Intelligence {
    /// Message content, or the JSON it encodes when it parses.
    Completion(Json),
    /// One vector per input item, in input order.
    Embeddings(Vec<Vec<f64>>),
    Moderation(Moderation),
    Image(Blob),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Moderation {
    pub flagged: bool,
    pub categories: BTreeMap<String, bool>,
    pub category_scores: BTreeMap<String, f64>,
}

/// Map a provider response into the canonical result for `operation`.
pub fn normalize(operation: OperationKind, response: &Json) -> Result<Intelligence> {
    match operation {
        OperationKind::Completion => completion(response),
        OperationKind::Embedding => embeddings(response),
        OperationKind::Moderation => moderation(response),
        OperationKind::ImageGeneration => image(response),
    }
}

fn completion(response: &Json) -> Result<Intelligence> {
    let content = PathMapper::get_str(response, COMPLETION_CONTENT)
        .ok_or_else(|| Error::missing_field("completion", COMPLETION_CONTENT))?;
    let value = serde_json::from_str::<Json>(content)
        .unwrap_or_else(|_| Json::String(content.to_string()));
    Ok(Intelligence::Completion(value))
}

fn embeddings(response: &Json) -> Result<Intelligence> {
    let data = PathMapper::get_path(response, EMBEDDING_DATA)
        .and_then(Json::as_array)
        .ok_or_else(|| Error::missing_field("embedding", EMBEDDING_DATA))?;

    let mut indexed = Vec::with_capacity(data.len());
    for (position, item) in data.iter().enumerate() {
        let vector = item
            .get("embedding")
            .and_then(Json::as_array)
            .ok_or_else(|| Error::missing_field("embedding", format!("data[{}].embedding", position)))?
            .iter()
            .map(|n| {
                n.as_f64().ok_or_else(|| {
                    Error::missing_field("embedding", format!("data[{}].embedding", position))
                })
            })
            .collect::<Result<Vec<f64>>>()?;
        // providers may return items out of order; `index` is authoritative
        let index = item
            .get("index")
            .and_then(Json::as_u64)
            .map(|i| i as usize)
            .unwrap_or(position);
        indexed.push((index, vector));
    }
    indexed.sort_by_key(|(index, _)| *index);

    Ok(Intelligence::Embeddings(
        indexed.into_iter().map(|(_, v)| v).collect(),
    ))
}

fn moderation(response: &Json) -> Result<Intelligence> {
    let result = PathMapper::get_path(response, MODERATION_RESULT)
        .ok_or_else(|| Error::missing_field("moderation", MODERATION_RESULT))?;
    let flagged = result
        .get("flagged")
        .and_then(Json::as_bool)
        .ok_or_else(|| Error::missing_field("moderation", "results[0].flagged"))?;

    let categories = result
        .get("categories")
        .and_then(Json::as_object)
        .map(|map| {
            map.iter()
                .filter_map(|(k, v)| v.as_bool().map(|b| (k.clone(), b)))
                .collect()
        })
        .unwrap_or_default();
    let category_scores = result
        .get("category_scores")
        .and_then(Json::as_object)
        .map(|map| {
            map.iter()
                .filter_map(|(k, v)| v.as_f64().map(|s| (k.clone(), s)))
                .collect()
        })
        .unwrap_or_default();

    Ok(Intelligence::Moderation(Moderation {
        flagged,
        categories,
        category_scores,
    }))
}

fn image(response: &Json) -> Result<Intelligence> {
    let data = PathMapper::get_str(response, IMAGE_DATA)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| Error::missing_field("image-generation", IMAGE_DATA))?;
    Ok(Intelligence::Image(Blob::from_base64(GENERATED_IMAGE_TYPE, data)))
}
