//! HTTP 接口：`POST /intelligence` 与健康检查。
//!
//! # HTTP Server
//!
//! | Route | Description |
//! |-------|-------------|
//! | `POST /intelligence` | JSON or multipart request, single or batch shape, optional `?model=` |
//! | `GET /healthz` | `{"status":"ok","services":<count>}` |
//!
//! A single request answers `{"<model>": <result>}` or `{"error": "<message>"}`.
//! A batch answers its results plus an `errors` object when any entry failed.
//! Any failure turns the status into `400 Bad Request`.

pub mod handlers;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::engine::Engine;

#[derive(Clone)]
pub struct AppState {
    pub engine: Engine,
}

/// Build the router. `max_body_bytes` bounds JSON and multipart bodies alike.
pub fn router(engine: Engine, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/intelligence", post(handlers::intelligence))
        .route("/healthz", get(handlers::healthz))
        .with_state(AppState { engine })
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TraceLayer::new_for_http())
}
