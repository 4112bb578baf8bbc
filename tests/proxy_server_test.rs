use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::routing::post as route_post;
use axum::Router;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::{json, Value};
use tower::ServiceExt;

use multi_doc_extract::server::proxy::{
    INVALID_BASE64_MESSAGE, INVALID_BODY_MESSAGE, MISSING_API_KEY_MESSAGE, MISSING_FIELDS_MESSAGE,
    UPSTREAM_FAILURE_MESSAGE,
};
use multi_doc_extract::clients::ProxyClient;
use multi_doc_extract::error::{
    AUTH_ERROR_MESSAGE, GENERIC_ERROR_MESSAGE, NO_READABLE_TEXT_MESSAGE, RATE_LIMITED_MESSAGE,
};
use multi_doc_extract::server::{proxy_router, ProxyState};
use multi_doc_extract::{
    run_batch, ExtractionClient, InputFile, MockExtractionClient, MockResponse,
};

const TEST_BODY_LIMIT: usize = 1024 * 1024;

fn router_with(client: MockExtractionClient) -> Router {
    let client: Arc<dyn ExtractionClient> = Arc::new(client);
    proxy_router(ProxyState::new(Some(client)), TEST_BODY_LIMIT)
}

fn post(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn payload(content: &str, mime_type: &str) -> String {
    json!({ "base64Data": STANDARD.encode(content), "mimeType": mime_type }).to_string()
}

#[tokio::test]
async fn test_extract_returns_text() {
    let app = router_with(MockExtractionClient::new().on("scan", MockResponse::text("Hello")));

    let response = app
        .oneshot(post("/api/extract-text", payload("scan", "image/png")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({ "text": "Hello" }));
}

#[tokio::test]
async fn test_legacy_path_is_served() {
    let app = router_with(MockExtractionClient::new());

    let response = app
        .oneshot(post("/.netlify/functions/extract-text", payload("plain", "text/plain")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["text"], "plain");
}

#[tokio::test]
async fn test_get_is_method_not_allowed() {
    let app = router_with(MockExtractionClient::new());

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/extract-text")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"Method Not Allowed");
}

#[tokio::test]
async fn test_missing_fields_is_bad_request() {
    let bodies = [
        json!({ "mimeType": "application/pdf" }).to_string(),
        json!({ "base64Data": "aGVsbG8=" }).to_string(),
        json!({ "base64Data": "", "mimeType": "application/pdf" }).to_string(),
        json!({}).to_string(),
    ];

    for body in bodies {
        let app = router_with(MockExtractionClient::new());
        let response = app.oneshot(post("/api/extract-text", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], MISSING_FIELDS_MESSAGE);
    }
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = router_with(MockExtractionClient::new());
    let response = app
        .oneshot(post("/api/extract-text", "{not json"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], INVALID_BODY_MESSAGE);
}

#[tokio::test]
async fn test_invalid_base64_is_bad_request() {
    let client = MockExtractionClient::new();
    let app = router_with(client);
    let body = json!({ "base64Data": "***not base64***", "mimeType": "image/png" }).to_string();

    let response = app.oneshot(post("/api/extract-text", body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], INVALID_BASE64_MESSAGE);
}

#[tokio::test]
async fn test_missing_server_key_is_internal_error() {
    let app = proxy_router(ProxyState::new(None), TEST_BODY_LIMIT);

    let response = app
        .oneshot(post("/api/extract-text", payload("x", "application/pdf")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["error"], MISSING_API_KEY_MESSAGE);
    assert_eq!(body["errorKind"], "AUTH_ERROR");
}

#[tokio::test]
async fn test_upstream_failure_is_internal_error() {
    let app = router_with(
        MockExtractionClient::new().with_fallback(MockResponse::fail("Gemini API error (HTTP 500)")),
    );

    let response = app
        .oneshot(post("/api/extract-text", payload("x", "application/pdf")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["error"], UPSTREAM_FAILURE_MESSAGE);
    assert_eq!(body["errorKind"], "GENERIC_EXTRACTION_ERROR");
    assert!(body.get("text").is_none());
}

#[tokio::test]
async fn test_upstream_rate_limit_kind_is_reported() {
    let app = router_with(
        MockExtractionClient::new()
            .with_fallback(MockResponse::fail("Gemini API error (HTTP 429): quota")),
    );

    let response = app
        .oneshot(post("/api/extract-text", payload("x", "application/pdf")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["error"], UPSTREAM_FAILURE_MESSAGE);
    assert_eq!(body["errorKind"], "RATE_LIMITED");
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let app = proxy_router(ProxyState::new(None), 64);
    let response = app
        .oneshot(post("/api/extract-text", payload(&"x".repeat(1024), "text/plain")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_health() {
    let app = router_with(MockExtractionClient::new());
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

/// 在本机随机端口上启动路由，返回提取接口地址
async fn spawn_server(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/api/extract-text", addr)
}

fn scripted_upstream() -> MockExtractionClient {
    MockExtractionClient::new()
        .on("ok", MockResponse::text("Hello"))
        .on("quota", MockResponse::fail("Gemini API error (HTTP 429): quota"))
        .on("key", MockResponse::fail("API key not valid"))
        .on("blank", MockResponse::text(" \n"))
        .on("boom", MockResponse::fail("connection reset by peer"))
}

#[tokio::test]
async fn test_proxy_path_matches_direct_path() {
    let files: Vec<InputFile> = ["ok", "quota", "key", "blank", "boom"]
        .iter()
        .map(|c| InputFile::from_bytes(format!("{}.pdf", c), "application/pdf", *c))
        .collect();

    let direct = run_batch(&scripted_upstream(), &files).await;

    let endpoint = spawn_server(router_with(scripted_upstream())).await;
    let proxy = ProxyClient::new(endpoint, Duration::from_secs(10));
    let proxied = run_batch(&proxy, &files).await;

    assert_eq!(direct, proxied);
    let errors: Vec<Option<&str>> = proxied.iter().map(|r| r.error.as_deref()).collect();
    assert_eq!(
        errors,
        vec![
            None,
            Some(RATE_LIMITED_MESSAGE),
            Some(AUTH_ERROR_MESSAGE),
            Some(NO_READABLE_TEXT_MESSAGE),
            Some(GENERIC_ERROR_MESSAGE),
        ]
    );
}

#[tokio::test]
async fn test_proxy_without_server_key_reports_auth_error() {
    let endpoint = spawn_server(proxy_router(ProxyState::new(None), TEST_BODY_LIMIT)).await;
    let proxy = ProxyClient::new(endpoint, Duration::from_secs(10));

    let results = run_batch(&proxy, &[InputFile::from_bytes("a.pdf", "application/pdf", "x")]).await;

    assert_eq!(results[0].error.as_deref(), Some(AUTH_ERROR_MESSAGE));
}

#[tokio::test]
async fn test_malformed_success_response_is_generic_error() {
    let stubs = [
        Router::new().route("/api/extract-text", route_post(|| async { "<html>not the proxy</html>" })),
        Router::new().route(
            "/api/extract-text",
            route_post(|| async { axum::Json(json!({ "status": "ok" })) }),
        ),
    ];

    for stub in stubs {
        let endpoint = spawn_server(stub).await;
        let proxy = ProxyClient::new(endpoint, Duration::from_secs(10));

        let results =
            run_batch(&proxy, &[InputFile::from_bytes("a.pdf", "application/pdf", "x")]).await;

        assert_eq!(results[0].text, None);
        assert_eq!(results[0].error.as_deref(), Some(GENERIC_ERROR_MESSAGE));
    }
}
