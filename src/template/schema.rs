//! Placeholder expansion inside response-format JSON schemas.

use serde_json::{Map, Value as Json};

use crate::service::ResponseFormatSpec;
use crate::types::Params;

use super::placeholder;

/// Deep-copy `schema`, expanding placeholders in every object key and string
/// value. Non-string scalars pass through unchanged.
pub fn expand_schema(schema: &Json, params: &Params) -> Json {
    match schema {
        Json::Object(map) => {
            let mut expanded = Map::with_capacity(map.len());
            for (key, value) in map {
                expanded.insert(
                    placeholder::expand(key, params).into_owned(),
                    expand_schema(value, params),
                );
            }
            Json::Object(expanded)
        }
        Json::Array(items) => Json::Array(items.iter().map(|v| expand_schema(v, params)).collect()),
        Json::String(s) => Json::String(placeholder::expand(s, params).into_owned()),
        other => other.clone(),
    }
}

/// The `response_format` request field for a service, with its schema expanded.
pub fn expand_response_format(spec: &ResponseFormatSpec, params: &Params) -> Json {
    let mut out = Map::new();
    out.insert("type".to_string(), Json::String(spec.format_type.clone()));
    if let Some(schema) = &spec.json_schema {
        out.insert("json_schema".to_string(), expand_schema(schema, params));
    }
    Json::Object(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Value;
    use serde_json::json;

    #[test]
    fn test_keys_and_strings_expanded() {
        let schema = json!({
            "name": "extraction",
            "strict": true,
            "schema": {
                "type": "object",
                "properties": {
                    "{{params.label}}": {"type": "string", "description": "The {{params.label}} found"}
                },
                "required": ["{{params.label}}"],
                "additionalProperties": false,
                "maxProperties": 3
            }
        });
        let mut params = Params::new();
        params.insert("label".into(), Value::from("person"));

        let expanded = expand_schema(&schema, &params);
        assert_eq!(
            expanded,
            json!({
                "name": "extraction",
                "strict": true,
                "schema": {
                    "type": "object",
                    "properties": {
                        "person": {"type": "string", "description": "The person found"}
                    },
                    "required": ["person"],
                    "additionalProperties": false,
                    "maxProperties": 3
                }
            })
        );
        // the configured document is untouched
        assert!(schema["schema"]["properties"].get("{{params.label}}").is_some());
    }

    #[test]
    fn test_format_without_schema() {
        let spec = ResponseFormatSpec {
            format_type: "json_object".into(),
            json_schema: None,
        };
        assert_eq!(
            expand_response_format(&spec, &Params::new()),
            json!({"type": "json_object"})
        );
    }
}
