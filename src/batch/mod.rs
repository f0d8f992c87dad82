//! 批量分发模块：并发执行具名请求并按名称隔离失败。
//!
//! # Batch Dispatcher
//!
//! A [`Batch`] maps caller-chosen request names to parameter bags. Every entry
//! runs as its own task; once all of them finish, successes and failures are
//! collected into the two disjoint maps of a [`BatchOutcome`].
//!
//! Each entry moves `pending → in-flight → succeeded | failed` and is reported
//! exactly once. No entry's failure cancels or delays another.
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`execute`] | Fan-out/fan-in over a batch |
//! | [`BatchOutcome`] | Results and errors keyed by request name |

mod executor;
mod outcome;

use std::collections::BTreeMap;

use crate::types::{Params, Value};
use crate::{Error, Result};

pub use executor::execute;
pub use outcome::{BatchOutcome, ERRORS_KEY};

/// Request name → parameter bag (which carries the `model` entry).
pub type Batch = BTreeMap<String, Params>;

/// Parameter naming the service a request targets.
pub const MODEL_KEY: &str = "model";

/// The `model` entry of a request.
pub fn model_of(params: &Params) -> Result<&str> {
    match params.get(MODEL_KEY) {
        Some(Value::String(model)) if !model.is_empty() => Ok(model),
        Some(Value::String(_)) | None | Some(Value::Null) => {
            Err(Error::request("invalid input: 'model' parameter is required"))
        }
        Some(_) => Err(Error::request("invalid input: 'model' parameter must be a string")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_of() {
        let mut params = Params::new();
        assert!(model_of(&params).is_err());
        params.insert(MODEL_KEY.into(), Value::from("summary"));
        assert_eq!(model_of(&params).unwrap(), "summary");
        params.insert(MODEL_KEY.into(), Value::from(serde_json::json!(3)));
        assert_eq!(
            model_of(&params).unwrap_err().to_string(),
            "invalid input: 'model' parameter must be a string"
        );
    }
}
