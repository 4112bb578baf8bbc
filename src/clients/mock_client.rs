use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use super::ExtractionClient;

/// 预设的返回结果
#[derive(Debug, Clone)]
pub enum MockResponse {
    Text(String),
    Fail(String),
}

impl MockResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self::Fail(message.into())
    }
}

struct Scripted {
    response: MockResponse,
    delay: Duration,
}

/// 按文件内容返回预设结果的提取客户端
///
/// 未登记的内容返回 `fallback`（默认把内容按 UTF-8 原样返回）。
pub struct MockExtractionClient {
    scripted: HashMap<Vec<u8>, Scripted>,
    fallback: Option<MockResponse>,
    calls: AtomicUsize,
    completed: Mutex<Vec<Vec<u8>>>,
}

impl MockExtractionClient {
    pub fn new() -> Self {
        Self {
            scripted: HashMap::new(),
            fallback: None,
            calls: AtomicUsize::new(0),
            completed: Mutex::new(Vec::new()),
        }
    }

    pub fn with_fallback(mut self, response: MockResponse) -> Self {
        self.fallback = Some(response);
        self
    }

    pub fn on(self, content: impl AsRef<[u8]>, response: MockResponse) -> Self {
        self.on_delayed(content, response, Duration::ZERO)
    }

    pub fn on_delayed(
        mut self,
        content: impl AsRef<[u8]>,
        response: MockResponse,
        delay: Duration,
    ) -> Self {
        self.scripted
            .insert(content.as_ref().to_vec(), Scripted { response, delay });
        self
    }

    /// 被调用的次数
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// 各次调用完成的先后顺序（按文件内容记录）
    pub fn completion_order(&self) -> Vec<String> {
        self.completed
            .lock()
            .map(|done| {
                done.iter()
                    .map(|c| String::from_utf8_lossy(c).to_string())
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl Default for MockExtractionClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExtractionClient for MockExtractionClient {
    fn name(&self) -> &str {
        "mock"
    }

    async fn extract_text(&self, data: &[u8], _mime_type: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let (response, delay) = match self.scripted.get(data) {
            Some(s) => (s.response.clone(), s.delay),
            None => (
                self.fallback
                    .clone()
                    .unwrap_or_else(|| MockResponse::Text(String::from_utf8_lossy(data).to_string())),
                Duration::ZERO,
            ),
        };

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if let Ok(mut done) = self.completed.lock() {
            done.push(data.to_vec());
        }

        match response {
            MockResponse::Text(text) => Ok(text),
            MockResponse::Fail(message) => Err(anyhow::anyhow!(message)),
        }
    }
}
