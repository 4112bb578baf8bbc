//! OpenAI 兼容网关客户端
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点和模型
//! - 文件以 `data:<mime>;base64,...` 形式放进用户消息的图片部分，
//!   适用于 Gemini 的 OpenAI 兼容端点以及其他支持视觉输入的网关

use anyhow::Result;
use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestMessageContentPartImage,
        ChatCompletionRequestMessageContentPartText, ChatCompletionRequestUserMessageArgs,
        ChatCompletionRequestUserMessageContent, ChatCompletionRequestUserMessageContentPart,
        CreateChatCompletionRequestArgs, ImageDetail, ImageUrl,
    },
    Client,
};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::{debug, warn};

use super::{ExtractionClient, EXTRACTION_PROMPT};
use crate::config::Config;

const GEMINI_NATIVE_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// OpenAI 兼容客户端
pub struct OpenAiCompatClient {
    client: Client<OpenAIConfig>,
    model_name: String,
    has_api_key: bool,
}

impl OpenAiCompatClient {
    /// 创建新的客户端
    pub fn new(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(config.api_key.trim())
            .with_api_base(compat_base_url(&config.api_base_url));

        Self {
            client: Client::with_config(openai_config),
            model_name: config.model_name.clone(),
            has_api_key: config.has_api_key(),
        }
    }
}

/// Gemini 原生地址换成它的 OpenAI 兼容地址，其他地址原样使用
fn compat_base_url(api_base_url: &str) -> String {
    let base = api_base_url.trim_end_matches('/');
    if base == GEMINI_NATIVE_BASE {
        format!("{}/openai", base)
    } else {
        base.to_string()
    }
}

fn data_url(data: &[u8], mime_type: &str) -> String {
    format!("data:{};base64,{}", mime_type, STANDARD.encode(data))
}

#[async_trait]
impl ExtractionClient for OpenAiCompatClient {
    fn name(&self) -> &str {
        "openai-compat"
    }

    async fn extract_text(&self, data: &[u8], mime_type: &str) -> Result<String> {
        if !self.has_api_key {
            anyhow::bail!("API key is missing");
        }

        debug!(
            "调用 OpenAI 兼容接口，模型: {}，文件大小: {} 字节",
            self.model_name,
            data.len()
        );

        let content_parts = vec![
            ChatCompletionRequestUserMessageContentPart::ImageUrl(
                ChatCompletionRequestMessageContentPartImage {
                    image_url: ImageUrl {
                        url: data_url(data, mime_type),
                        detail: Some(ImageDetail::High),
                    },
                },
            ),
            ChatCompletionRequestUserMessageContentPart::Text(
                ChatCompletionRequestMessageContentPartText {
                    text: EXTRACTION_PROMPT.to_string(),
                },
            ),
        ];

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(ChatCompletionRequestUserMessageContent::Array(content_parts))
            .build()?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(vec![ChatCompletionRequestMessage::User(user_msg)])
            .temperature(0.0)
            .max_tokens(8192u32)
            .build()?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("OpenAI 兼容接口调用失败: {}", e);
            anyhow::anyhow!("OpenAI compatible API call failed: {}", e)
        })?;

        debug!("OpenAI 兼容接口调用成功");

        // 没有内容按空文本处理，由上层判定为"无可读文本"
        Ok(response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .unwrap_or_default())
    }
}
