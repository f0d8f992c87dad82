use axum::extract::{FromRequest, Multipart, Query, Request, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use bytes::Bytes;
use serde::Deserialize;
use serde_json::{json, Map, Value as JsonValue};
use tracing::debug;

use super::AppState;
use crate::engine::RequestContext;
use crate::ingest::{self, FormPart, Inbound, Shape};
use crate::{Error, ErrorContext, Result};

#[derive(Debug, Default, Deserialize)]
pub struct ModelQuery {
    pub model: Option<String>,
}

/// `POST /intelligence`
pub async fn intelligence(
    State(state): State<AppState>,
    Query(query): Query<ModelQuery>,
    request: Request,
) -> Response {
    let inbound = match read_inbound(&state, query.model.as_deref(), request).await {
        Ok(inbound) => inbound,
        Err(e) => return error_response(&e),
    };

    // Dropping this future (client gone) cancels outstanding provider calls.
    let ctx = RequestContext::new();
    let _cancel_guard = ctx.cancel_on_drop();

    match inbound.shape {
        Shape::Single { name } => {
            let params = inbound.batch.get(&name).cloned().unwrap_or_default();
            match state.engine.get_intelligence(&ctx, &name, &params).await {
                Ok(result) => {
                    let mut body = Map::new();
                    body.insert(name, serde_json::to_value(result).unwrap_or(JsonValue::Null));
                    (StatusCode::OK, Json(JsonValue::Object(body))).into_response()
                }
                Err(e) => error_response(&e),
            }
        }
        Shape::Batch => {
            let outcome = state.engine.execute_batch(&ctx, inbound.batch).await;
            let status = if outcome.all_succeeded() {
                StatusCode::OK
            } else {
                StatusCode::BAD_REQUEST
            };
            (status, Json(outcome.into_response_body())).into_response()
        }
    }
}

/// `GET /healthz`
pub async fn healthz(State(state): State<AppState>) -> Json<JsonValue> {
    Json(json!({
        "status": "ok",
        "services": state.engine.registry().len(),
    }))
}

async fn read_inbound(
    state: &AppState,
    query_model: Option<&str>,
    request: Request,
) -> Result<Inbound> {
    let is_multipart = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.starts_with("multipart/form-data"))
        .unwrap_or(false);

    if is_multipart {
        let multipart = Multipart::from_request(request, state)
            .await
            .map_err(|e| ingest_error("malformed multipart body", e.body_text()))?;
        let parts = read_parts(multipart).await?;
        debug!(parts = parts.len(), "multipart request received");
        ingest::from_parts(parts, query_model)
    } else {
        let body = Bytes::from_request(request, state)
            .await
            .map_err(|e| ingest_error("cannot read request body", e.body_text()))?;
        ingest::from_json(&body, query_model)
    }
}

async fn read_parts(mut multipart: Multipart) -> Result<Vec<FormPart>> {
    let mut parts = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ingest_error("malformed multipart body", e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let is_file = field.file_name().is_some();
        let content_type = field.content_type().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| ingest_error("cannot read multipart field", e.body_text()))?;

        if is_file {
            parts.push(FormPart::File {
                name,
                content_type,
                data,
            });
        } else {
            let text = String::from_utf8(data.to_vec()).map_err(|_| {
                Error::request_with_context(
                    "invalid input: form value is not valid UTF-8",
                    ErrorContext::new().with_field_path(name.as_str()),
                )
            })?;
            parts.push(FormPart::Value { name, text });
        }
    }
    Ok(parts)
}

fn ingest_error(message: &str, details: String) -> Error {
    Error::request_with_context(
        format!("invalid input: {}", message),
        ErrorContext::new().with_details(details).with_source("ingest"),
    )
}

fn error_response(error: &Error) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": error.to_string() })),
    )
        .into_response()
}
