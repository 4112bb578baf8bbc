//! 代理服务客户端
//!
//! 把文件交给 `serve` 子命令启动的代理服务，请求与响应格式见 `server::proxy`。

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::ExtractionClient;
use crate::error::{ClassifiedError, ErrorKind};
use crate::utils::truncate_text;

/// 代理请求体
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyRequest {
    pub base64_data: Option<String>,
    pub mime_type: Option<String>,
}

/// 代理响应体，成功时只有 `text`，失败时有 `error`
///
/// 上游提取失败时 `errorKind` 携带服务端的分类结果
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
}

pub struct ProxyClient {
    client: Client,
    endpoint: String,
}

impl ProxyClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!("HTTP 客户端创建失败，使用默认配置: {}", e);
                Client::new()
            });

        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl ExtractionClient for ProxyClient {
    fn name(&self) -> &str {
        "proxy"
    }

    async fn extract_text(&self, data: &[u8], mime_type: &str) -> Result<String> {
        debug!("发送到代理服务: {}，文件大小: {} 字节", self.endpoint, data.len());

        let body = ProxyRequest {
            base64_data: Some(STANDARD.encode(data)),
            mime_type: Some(mime_type.to_string()),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("代理请求失败: {}", self.endpoint))?;

        let status = response.status();
        let raw = response.text().await.context("读取代理响应失败")?;

        if !status.is_success() {
            let parsed: ProxyResponse = serde_json::from_str(&raw).unwrap_or_default();
            let detail = format!(
                "Proxy error (HTTP {}): {}",
                status.as_u16(),
                parsed.error.unwrap_or(raw)
            );
            warn!("代理服务返回错误: {}", detail);
            return Err(match parsed.error_kind {
                Some(kind) => ClassifiedError { kind, detail }.into(),
                None => anyhow::anyhow!(detail),
            });
        }

        // 2xx 但不符合 `{text}` 约定的响应不是空结果
        match serde_json::from_str::<ProxyResponse>(&raw) {
            Ok(ProxyResponse { text: Some(text), .. }) => Ok(text),
            Ok(_) => Err(malformed_response("缺少 text 字段")),
            Err(e) => Err(malformed_response(&format!("{} ({})", e, truncate_text(&raw, 80)))),
        }
    }
}

fn malformed_response(reason: &str) -> anyhow::Error {
    warn!("代理响应格式错误: {}", reason);
    ClassifiedError {
        kind: ErrorKind::GenericExtractionError,
        detail: format!("代理响应格式错误: {}", reason),
    }
    .into()
}
