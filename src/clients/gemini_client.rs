//! Gemini generateContent 客户端
//!
//! 文件以 base64 内联数据的形式和固定指令一起发送。

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{ExtractionClient, EXTRACTION_PROMPT};
use crate::config::Config;

/// Gemini 客户端
pub struct GeminiClient {
    client: Client,
    api_key: String,
    api_base_url: String,
    model_name: String,
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part<'a> {
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData<'a>,
    },
    Text {
        text: &'a str,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData<'a> {
    mime_type: &'a str,
    data: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl GeminiClient {
    pub fn new(config: &Config, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!("HTTP 客户端创建失败，使用默认配置: {}", e);
                Client::new()
            });

        Self {
            client,
            api_key: config.api_key.trim().to_string(),
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            model_name: config.model_name.clone(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base_url, self.model_name)
    }
}

/// 把第一个候选结果的所有文本片段拼起来；没有候选时返回空字符串
fn collect_text(response: GenerateContentResponse) -> String {
    response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<String>()
        })
        .unwrap_or_default()
}

#[async_trait]
impl ExtractionClient for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn extract_text(&self, data: &[u8], mime_type: &str) -> Result<String> {
        if self.api_key.is_empty() {
            anyhow::bail!("API key is missing");
        }

        debug!(
            "调用 Gemini API，模型: {}，文件大小: {} 字节",
            self.model_name,
            data.len()
        );

        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type,
                            data: STANDARD.encode(data),
                        },
                    },
                    Part::Text {
                        text: EXTRACTION_PROMPT,
                    },
                ],
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .context("Gemini HTTP 请求失败")?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&error_body)
                .map(|e| e.error.message)
                .unwrap_or(error_body);
            warn!("Gemini API 返回错误 (HTTP {}): {}", status.as_u16(), message);
            anyhow::bail!("Gemini API error (HTTP {}): {}", status.as_u16(), message);
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .context("无法解析 Gemini 响应")?;

        debug!("Gemini API 调用成功");

        Ok(collect_text(parsed))
    }
}
