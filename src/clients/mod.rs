//! 提取客户端 - 外部能力层
//!
//! 只负责"把一个文件的字节变成文本"，不关心批处理和结果汇总。
//! 所有实现都挂在 [`ExtractionClient`] 这一接口后面，测试时可替换成
//! [`MockExtractionClient`]。

pub mod gemini_client;
pub mod mock_client;
pub mod openai_compat_client;
pub mod proxy_client;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use crate::config::{Config, ExtractionProvider};
use crate::error::ConfigError;

pub use gemini_client::GeminiClient;
pub use mock_client::{MockExtractionClient, MockResponse};
pub use openai_compat_client::OpenAiCompatClient;
pub use proxy_client::ProxyClient;

/// 发给模型的固定指令
pub const EXTRACTION_PROMPT: &str = "Extract all readable text from this file. \
If it is an image or a scanned PDF, use OCR. \
If it is a text document, a PDF, or a spreadsheet, extract the textual content in a structured way. \
Do not provide any explanation or markdown formatting, only the raw extracted text.";

/// 文本提取能力
///
/// 输入文件字节和 MIME 类型，返回提取出的纯文本。返回的文本不做任何
/// 裁剪；失败信息应保留上游的原始描述（状态码、错误消息），以便分类。
#[async_trait]
pub trait ExtractionClient: Send + Sync {
    /// 用于日志的名称
    fn name(&self) -> &str;

    async fn extract_text(&self, data: &[u8], mime_type: &str) -> Result<String>;
}

/// 根据配置创建提取客户端
pub fn build_client(config: &Config) -> Result<Arc<dyn ExtractionClient>, ConfigError> {
    let timeout = Duration::from_secs(config.request_timeout_secs);
    let client: Arc<dyn ExtractionClient> = match config.provider()? {
        ExtractionProvider::Gemini => Arc::new(GeminiClient::new(config, timeout)),
        ExtractionProvider::OpenAi => Arc::new(OpenAiCompatClient::new(config)),
        ExtractionProvider::Proxy => Arc::new(ProxyClient::new(&config.proxy_url, timeout)),
    };
    Ok(client)
}
