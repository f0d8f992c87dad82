//! Provider request bodies, one shape per operation kind.

use serde_json::{json, Map, Value as Json};

use super::OperationKind;
use crate::service::{CompletionTemplate, ServiceDefinition};
use crate::template;
use crate::types::{Params, Value};
use crate::{Error, Result};

/// Build the JSON body sent to the provider for a prepared parameter bag.
pub fn build_request_body(service: &ServiceDefinition, params: &Params) -> Result<Json> {
    match service.operation {
        OperationKind::Completion => Ok(completion_body(service, params)),
        OperationKind::Embedding => embedding_body(service, params),
        OperationKind::Moderation => moderation_body(service, params),
        OperationKind::ImageGeneration => image_body(service, params),
    }
}

fn completion_body(service: &ServiceDefinition, params: &Params) -> Json {
    let default_template = CompletionTemplate::default();
    let tpl = service.completion.as_ref().unwrap_or(&default_template);

    let mut body = Map::new();
    body.insert("model".into(), Json::String(service.model.clone()));
    body.insert(
        "messages".into(),
        serde_json::to_value(template::build_messages(tpl, params)).unwrap_or_default(),
    );
    let max_tokens = template::compute_max_tokens(&tpl.max_tokens, params);
    if max_tokens > 0 {
        body.insert("max_tokens".into(), json!(max_tokens));
    }
    body.insert("temperature".into(), json!(tpl.temperature));
    if let Some(format) = &tpl.response_format {
        body.insert(
            "response_format".into(),
            template::expand_response_format(format, params),
        );
    }
    Json::Object(body)
}

fn embedding_body(service: &ServiceDefinition, params: &Params) -> Result<Json> {
    let texts: Vec<String> = match params.get("texts") {
        Some(Value::Array(items)) => items.iter().map(Value::to_param_string).collect(),
        Some(Value::String(s)) => vec![s.clone()],
        _ => Vec::new(),
    };
    if texts.is_empty() {
        return Err(Error::InvalidParameter("'texts' parameter is required".into()));
    }
    let input: Vec<String> = texts.iter().map(|t| t.replace('\n', " ")).collect();
    Ok(json!({ "model": service.model, "input": input }))
}

fn moderation_body(service: &ServiceDefinition, params: &Params) -> Result<Json> {
    let text = non_empty_string(params, "text")
        .ok_or_else(|| Error::InvalidParameter("'text' parameter is required".into()))?;
    Ok(json!({ "model": service.model, "input": text }))
}

fn image_body(service: &ServiceDefinition, params: &Params) -> Result<Json> {
    let prompt = non_empty_string(params, "prompt")
        .ok_or_else(|| Error::InvalidParameter("'prompt' parameter is required".into()))?;

    let mut body = Map::new();
    body.insert("model".into(), Json::String(service.model.clone()));
    body.insert("prompt".into(), Json::String(prompt));
    body.insert("response_format".into(), Json::String("b64_json".into()));
    for key in ["size", "quality", "style"] {
        if let Some(v) = non_empty_string(params, key) {
            body.insert(key.into(), Json::String(v));
        }
    }

    if let Some(requested) = params.get("count").and_then(Value::as_f64) {
        let mut n = requested.max(1.0) as u64;
        if let Some(limits) = service.image_limits() {
            if limits.max_count > 0 {
                n = n.min(u64::from(limits.max_count));
            }
        }
        body.insert("n".into(), json!(n));
    }
    Ok(Json::Object(body))
}

fn non_empty_string(params: &Params, key: &str) -> Option<String> {
    let value = params.get(key)?;
    let text = match value {
        Value::Null => return None,
        Value::String(s) => s.clone(),
        other => other.to_param_string(),
    };
    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Blob;

    fn service(raw: Json) -> ServiceDefinition {
        let mut def: ServiceDefinition = serde_json::from_value(raw).unwrap();
        def.name = "svc".into();
        def
    }

    fn params(raw: Json) -> Params {
        match Value::from(raw) {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_completion_body() {
        let svc = service(json!({
            "model": "gpt-4o-mini",
            "provider": "openai",
            "type": "completion",
            "params": {"text": {"required": true}, "label": {"default": "person"}},
            "completions": {
                "messages": [{"role": "user", "content": ["Extract: {{params.text}}"]}],
                "temperature": 0.2,
                "max_tokens": {"value": 20, "add": [{"param": "text", "measure": "length"}]},
                "response_format": {
                    "type": "json_schema",
                    "json_schema": {"name": "out", "schema": {"properties": {"{{params.label}}": {"type": "string"}}}}
                }
            }
        }));
        let mut p = params(json!({"text": "Ada Lovelace", "label": "person"}));
        p.insert("photo".into(), Value::Blob(Blob::from_base64("image/png", "AAAA")));

        let body = build_request_body(&svc, &p).unwrap();
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["max_tokens"], 32);
        assert_eq!(body["temperature"], 0.2);
        assert_eq!(body["messages"][0]["content"], "Extract: Ada Lovelace");
        assert_eq!(
            body["messages"][1]["content"][0]["image_url"]["url"],
            "data:image/png;base64,AAAA"
        );
        assert_eq!(
            body["response_format"]["json_schema"]["schema"]["properties"]["person"]["type"],
            "string"
        );
    }

    #[test]
    fn test_completion_without_budget_omits_max_tokens() {
        let svc = service(json!({"model": "llama3", "provider": "groq", "type": "completion"}));
        let body = build_request_body(&svc, &Params::new()).unwrap();
        assert!(body.get("max_tokens").is_none());
        assert!(body.get("response_format").is_none());
        assert_eq!(body["messages"], json!([]));
    }

    #[test]
    fn test_embedding_body() {
        let svc = service(json!({"model": "text-embedding-3-small", "provider": "openai", "type": "embedding"}));
        let body = build_request_body(&svc, &params(json!({"texts": ["a\nb", "c"]}))).unwrap();
        assert_eq!(body["input"], json!(["a b", "c"]));

        let body = build_request_body(&svc, &params(json!({"texts": "single"}))).unwrap();
        assert_eq!(body["input"], json!(["single"]));

        let err = build_request_body(&svc, &params(json!({"texts": []}))).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)));
    }

    #[test]
    fn test_moderation_requires_text() {
        let svc = service(json!({"model": "omni-moderation-latest", "provider": "openai", "type": "moderation"}));
        let body = build_request_body(&svc, &params(json!({"text": "hello"}))).unwrap();
        assert_eq!(body, json!({"model": "omni-moderation-latest", "input": "hello"}));
        assert!(build_request_body(&svc, &params(json!({"text": ""}))).is_err());
    }

    #[test]
    fn test_image_count_clamped() {
        let svc = service(json!({
            "model": "dall-e-3",
            "provider": "openai",
            "type": "image-generation",
            "images": {"generations": {"max_count": 2}}
        }));
        let body = build_request_body(
            &svc,
            &params(json!({"prompt": "a lighthouse", "count": "5", "size": "1024x1024"})),
        )
        .unwrap();
        assert_eq!(body["n"], 2);
        assert_eq!(body["size"], "1024x1024");
        assert_eq!(body["response_format"], "b64_json");
        assert!(body.get("style").is_none());
    }
}
