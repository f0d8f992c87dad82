//! HTTP surface tests driven through the router with `oneshot`

mod common;

use ai_intelligence::server;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use common::MockProviderFixture;
use http_body_util::BodyExt;
use mockito::Matcher;
use serde_json::{json, Value};
use tower::ServiceExt;

const LIMIT: usize = 1 << 20;

fn app(fixture: &MockProviderFixture) -> Router {
    server::router(fixture.engine(), LIMIT)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_healthz_reports_service_count() {
    let fixture = MockProviderFixture::new().await;
    let request = Request::builder().uri("/healthz").body(Body::empty()).unwrap();
    let (status, body) = send(app(&fixture), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok", "services": 8}));
}

#[tokio::test]
async fn test_single_request_success() {
    let mut fixture = MockProviderFixture::new().await;
    fixture.mock_completion("A short summary.").await;

    let (status, body) = send(
        app(&fixture),
        post_json("/intelligence", json!({"model": "summary", "text": "long text"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"summary": "A short summary."}));
}

#[tokio::test]
async fn test_model_from_query() {
    let mut fixture = MockProviderFixture::new().await;
    fixture.mock_completion("ok").await;

    let (status, body) = send(
        app(&fixture),
        post_json("/intelligence?model=summary", json!({"text": "long text"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"summary": "ok"}));
}

#[tokio::test]
async fn test_single_vs_batch_error_shapes() {
    let fixture = MockProviderFixture::new().await;

    let (status, body) = send(
        app(&fixture),
        post_json("/intelligence", json!({"model": "summary"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "required parameter 'text' is missing"}));

    let (status, body) = send(
        app(&fixture),
        post_json("/intelligence", json!({"only": {"model": "summary"}})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"errors": {"only": "required parameter 'text' is missing"}})
    );
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn test_batch_partial_failure_keeps_successes() {
    let mut fixture = MockProviderFixture::new().await;
    fixture.mock_completion("fine").await;

    let (status, body) = send(
        app(&fixture),
        post_json(
            "/intelligence",
            json!({
                "a": {"model": "summary"},
                "summary": {"text": "some text"}
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({
            "summary": "fine",
            "errors": {"a": "required parameter 'text' is missing"}
        })
    );
}

#[tokio::test]
async fn test_malformed_json_is_request_error() {
    let fixture = MockProviderFixture::new().await;
    let request = Request::builder()
        .method("POST")
        .uri("/intelligence")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(app(&fixture), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("invalid input: malformed JSON body"));
}

#[tokio::test]
async fn test_multipart_file_becomes_attachment() {
    let mut fixture = MockProviderFixture::new().await;
    let mock = fixture
        .server
        .mock("POST", "/v1/chat/completions")
        .match_body(Matcher::Regex(
            r#""url":"data:image/png;base64,iVBORw0KGgo=""#.into(),
        ))
        .with_status(200)
        .with_body(json!({"choices": [{"message": {"content": "A tiny PNG."}}]}).to_string())
        .create_async()
        .await;

    let boundary = "X-INTELLIGENCE-BOUNDARY";
    let png: &[u8] = b"\x89PNG\r\n\x1a\n";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"request\"\r\n\r\n{{\"model\": \"describe\"}}\r\n\
             --{b}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"dot.png\"\r\nContent-Type: image/png\r\n\r\n",
            b = boundary
        )
        .as_bytes(),
    );
    body.extend_from_slice(png);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

    let request = Request::builder()
        .method("POST")
        .uri("/intelligence")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .unwrap();

    let (status, body) = send(app(&fixture), request).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body, json!({"describe": "A tiny PNG."}));
    mock.assert_async().await;
}
