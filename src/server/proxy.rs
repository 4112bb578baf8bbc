//! 提取代理服务
//!
//! 对外暴露与直接调用等价的提取能力：
//!   POST /api/extract-text                  : `{base64Data, mimeType}` → `{text}` | `{error}`
//!   POST /.netlify/functions/extract-text   : 同上，兼容旧路径
//!   GET  /health                            : 存活检查
//!
//! 上游失败时 `errorKind` 携带分类结果（`AUTH_ERROR` / `RATE_LIMITED` / ...）。

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::{debug, error, info, warn};

use crate::clients::proxy_client::{ProxyRequest, ProxyResponse};
use crate::clients::ExtractionClient;
use crate::error::ErrorKind;
use crate::services::classify_error;

pub const MISSING_FIELDS_MESSAGE: &str = "Missing base64Data or mimeType";
pub const INVALID_BODY_MESSAGE: &str = "Invalid request body";
pub const INVALID_BASE64_MESSAGE: &str = "Invalid base64Data";
pub const MISSING_API_KEY_MESSAGE: &str = "Server configuration error: API Key is missing.";
pub const UPSTREAM_FAILURE_MESSAGE: &str = "Failed to extract text from file.";

/// 代理路由共享的状态
///
/// `client` 为 None 表示服务端没有配置上游密钥
#[derive(Clone)]
pub struct ProxyState {
    pub client: Option<Arc<dyn ExtractionClient>>,
}

impl ProxyState {
    pub fn new(client: Option<Arc<dyn ExtractionClient>>) -> Self {
        Self { client }
    }
}

/// 构建代理服务路由
pub fn proxy_router(state: ProxyState, max_body_bytes: usize) -> Router {
    let extract = post(extract_text).fallback(method_not_allowed);

    Router::new()
        .route("/api/extract-text", extract.clone())
        .route("/.netlify/functions/extract-text", extract)
        .route("/health", get(|| async { "OK" }))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state)
}

fn error_response(status: StatusCode, message: &str) -> Response {
    classified_error_response(status, message, None)
}

/// 带分类的错误响应，调用方据此得到与直连一致的错误类别
fn classified_error_response(
    status: StatusCode,
    message: &str,
    error_kind: Option<ErrorKind>,
) -> Response {
    (
        status,
        Json(ProxyResponse {
            text: None,
            error: Some(message.to_string()),
            error_kind,
        }),
    )
        .into_response()
}

/// 非 POST 请求
async fn method_not_allowed() -> Response {
    (StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed").into_response()
}

/// POST: 提取一个文件的文本
async fn extract_text(State(state): State<ProxyState>, body: Bytes) -> Response {
    let Some(client) = state.client.as_ref() else {
        error!("服务端未配置 API_KEY");
        return classified_error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            MISSING_API_KEY_MESSAGE,
            Some(ErrorKind::AuthError),
        );
    };

    let request: ProxyRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            warn!("请求体解析失败: {}", e);
            return error_response(StatusCode::BAD_REQUEST, INVALID_BODY_MESSAGE);
        }
    };

    let (base64_data, mime_type) = match (request.base64_data, request.mime_type) {
        (Some(data), Some(mime)) if !data.is_empty() && !mime.is_empty() => (data, mime),
        _ => return error_response(StatusCode::BAD_REQUEST, MISSING_FIELDS_MESSAGE),
    };

    let bytes = match STANDARD.decode(base64_data.trim()) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("base64 解码失败: {}", e);
            return error_response(StatusCode::BAD_REQUEST, INVALID_BASE64_MESSAGE);
        }
    };

    debug!("收到提取请求，类型: {}，大小: {} 字节", mime_type, bytes.len());

    match client.extract_text(&bytes, &mime_type).await {
        Ok(text) => {
            info!("✓ 代理提取成功，{} 个字符", text.chars().count());
            (
                StatusCode::OK,
                Json(ProxyResponse {
                    text: Some(text),
                    ..ProxyResponse::default()
                }),
            )
                .into_response()
        }
        Err(e) => {
            let kind = classify_error(&e);
            error!("代理提取失败 ({}, {:?}): {:#}", client.name(), kind, e);
            classified_error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                UPSTREAM_FAILURE_MESSAGE,
                Some(kind),
            )
        }
    }
}
