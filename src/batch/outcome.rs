//! Aggregated batch results.

use serde_json::{Map, Value as Json};
use std::collections::BTreeMap;

use crate::normalize::Intelligence;

/// Key under which failed entries are reported in a batch response.
pub const ERRORS_KEY: &str = "errors";

/// Disjoint success and failure maps, keyed by request name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchOutcome {
    pub results: BTreeMap<String, Intelligence>,
    pub errors: BTreeMap<String, String>,
}

impl BatchOutcome {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_success(&mut self, name: impl Into<String>, result: Intelligence) {
        let name = name.into();
        self.errors.remove(&name);
        self.results.insert(name, result);
    }

    pub fn add_failure(&mut self, name: impl Into<String>, message: impl Into<String>) {
        let name = name.into();
        self.results.remove(&name);
        self.errors.insert(name, message.into());
    }

    pub fn all_succeeded(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.results.len() + self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `{"<name>": <result>, ..., "errors": {"<name>": "<message>"}}`; the
    /// `errors` key is present only when some entry failed.
    pub fn into_response_body(self) -> Json {
        let mut body = Map::new();
        for (name, result) in self.results {
            body.insert(name, serde_json::to_value(result).unwrap_or(Json::Null));
        }
        if !self.errors.is_empty() {
            let errors: Map<String, Json> = self
                .errors
                .into_iter()
                .map(|(name, message)| (name, Json::String(message)))
                .collect();
            body.insert(ERRORS_KEY.to_string(), Json::Object(errors));
        }
        Json::Object(body)
    }
}
