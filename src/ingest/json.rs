//! `application/json` request bodies.

use super::{from_document, Inbound};
use crate::{Error, ErrorContext, Result};

/// Parse a JSON request body. `query_model` is the out-of-band `?model=` value.
pub fn from_json(body: &[u8], query_model: Option<&str>) -> Result<Inbound> {
    let doc: serde_json::Value = serde_json::from_slice(body).map_err(|e| {
        Error::request_with_context(
            "invalid input: malformed JSON body",
            ErrorContext::new().with_details(e.to_string()).with_source("ingest"),
        )
    })?;
    from_document(doc, query_model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::Shape;
    use crate::types::Value;

    #[test]
    fn test_single_request() {
        let inbound = from_json(br#"{"model": "summary", "text": "hi"}"#, None).unwrap();
        assert_eq!(
            inbound.shape,
            Shape::Single {
                name: "summary".into()
            }
        );
        assert_eq!(inbound.batch["summary"]["text"], Value::from("hi"));
    }

    #[test]
    fn test_query_model_fills_single() {
        let inbound = from_json(br#"{"text": "hi"}"#, Some("summary")).unwrap();
        assert_eq!(inbound.batch["summary"]["model"], Value::from("summary"));

        // a body model wins over the query
        let inbound = from_json(br#"{"model": "translate"}"#, Some("summary")).unwrap();
        assert!(inbound.batch.contains_key("translate"));
    }

    #[test]
    fn test_batch_assigns_missing_models() {
        let inbound = from_json(
            br#"{"summary": {"text": "a"}, "second": {"model": "summary", "text": "b"}}"#,
            None,
        )
        .unwrap();
        assert_eq!(inbound.shape, Shape::Batch);
        assert_eq!(inbound.batch["summary"]["model"], Value::from("summary"));
        assert_eq!(inbound.batch["second"]["model"], Value::from("summary"));
    }

    #[test]
    fn test_request_shape_errors() {
        assert!(from_json(b"not json", None).is_err());
        assert!(from_json(br#"[1, 2]"#, None).is_err());
        assert_eq!(
            from_json(br#"{"text": "hi"}"#, None).unwrap_err().to_string(),
            "invalid input: 'model' parameter is required"
        );
        assert!(from_json(br#"{"model": 7}"#, None).is_err());
        assert!(from_json(br#"{"errors": {"model": "summary"}}"#, None).is_err());
        assert!(from_json(br#"{"a": {"model": ["x"]}}"#, None).is_err());
    }
}
