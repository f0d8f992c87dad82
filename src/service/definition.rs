//! Service definition structures
//!
//! A service definition is the declarative description of one callable capability:
//! which model and provider to use, which operation it performs, which parameters
//! it accepts, and how completion prompts are templated.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::operation::OperationKind;
use crate::provider::Provider;
use crate::types::Value;

/// One logical service, keyed by its name in the service document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceDefinition {
    /// Display name; always equal to the key the definition was loaded under.
    #[serde(skip)]
    pub name: String,
    pub model: String,
    pub provider: Provider,
    #[serde(rename = "type")]
    pub operation: OperationKind,
    #[serde(default)]
    pub params: BTreeMap<String, ParamSpec>,
    #[serde(default, rename = "completions", skip_serializing_if = "Option::is_none")]
    pub completion: Option<CompletionTemplate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<ImagesConfig>,
}

impl ServiceDefinition {
    pub fn image_limits(&self) -> Option<&ImageGenerationLimits> {
        self.images.as_ref().map(|i| &i.generations)
    }
}

/// Declared parameter. When `required` is set, `default` is ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParamSpec {
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

/// Completion prompt template and sampling settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompletionTemplate {
    #[serde(default)]
    pub messages: Vec<MessageTemplate>,
    #[serde(default)]
    pub temperature: f64,
    #[serde(default)]
    pub max_tokens: MaxTokensPolicy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormatSpec>,
}

/// A templated message. Fragments are joined by newline before substitution.
#[derive(Debug, Clone, Serialize)]
pub struct MessageTemplate {
    pub role: String,
    pub content: Vec<String>,
}

impl<'de> Deserialize<'de> for MessageTemplate {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Content {
            // Shorthand: content: "You are a summarization assistant."
            One(String),
            Many(Vec<String>),
        }

        #[derive(Deserialize)]
        struct Input {
            role: String,
            #[serde(default)]
            content: Option<Content>,
        }

        let input = Input::deserialize(deserializer)?;
        let content = match input.content {
            None => Vec::new(),
            Some(Content::One(s)) => vec![s],
            Some(Content::Many(v)) => v,
        };
        Ok(MessageTemplate {
            role: input.role,
            content,
        })
    }
}

impl MessageTemplate {
    pub fn joined(&self) -> String {
        self.content.join("\n")
    }
}

/// Dynamic `max_tokens` budget. A zero `min`/`max` means the bound is unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaxTokensPolicy {
    #[serde(default, rename = "value")]
    pub base: i64,
    #[serde(default)]
    pub add: Vec<AddRule>,
    #[serde(default)]
    pub min: i64,
    #[serde(default)]
    pub max: i64,
}

/// Adds `measure(params[param]) * multiply + add` to the budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddRule {
    pub param: String,
    #[serde(default)]
    pub measure: Measure,
    /// Zero or negative means "no multiplier".
    #[serde(default)]
    pub multiply: f64,
    #[serde(default)]
    pub add: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Measure {
    Length,
    #[serde(alias = "sum-item-length")]
    SumItemLength,
    #[serde(alias = "max-item-length")]
    MaxItemLength,
    #[default]
    #[serde(other)]
    NumericValue,
}

/// Structured-output settings. `json_schema` may contain `{{params.X}}` placeholders
/// in keys and string values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseFormatSpec {
    #[serde(rename = "type")]
    pub format_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_schema: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImagesConfig {
    #[serde(default)]
    pub generations: ImageGenerationLimits,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageGenerationLimits {
    /// Upper bound for the number of images per request; zero means unbounded.
    #[serde(default)]
    pub max_count: u32,
}
