//! 代理服务层
//!
//! 把提取能力放到 HTTP 后面，让没有上游密钥的调用方（`ProxyClient`）也能使用。

pub mod proxy;

use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::clients::{ExtractionClient, GeminiClient, OpenAiCompatClient};
use crate::config::{Config, ExtractionProvider};
use crate::error::{AppResult, ConfigError, ServerError};

pub use proxy::{proxy_router, ProxyState};

/// 创建服务端使用的上游客户端
///
/// 没有配置密钥时返回 None，请求到来时再回 500；
/// 服务端自身不能再转发给代理。
pub fn build_upstream(config: &Config) -> Result<Option<Arc<dyn ExtractionClient>>, ConfigError> {
    let provider = config.provider()?;
    if provider == ExtractionProvider::Proxy {
        return Err(ConfigError::InvalidValue {
            field: "provider".to_string(),
            value: "proxy".to_string(),
        });
    }

    if !config.has_api_key() {
        warn!("⚠️ 未配置 API_KEY，所有提取请求都会返回 500");
        return Ok(None);
    }

    let timeout = Duration::from_secs(config.request_timeout_secs);
    let client: Arc<dyn ExtractionClient> = match provider {
        ExtractionProvider::OpenAi => Arc::new(OpenAiCompatClient::new(config)),
        _ => Arc::new(GeminiClient::new(config, timeout)),
    };
    Ok(Some(client))
}

/// 启动代理服务
pub async fn serve(config: &Config) -> AppResult<()> {
    config.validate()?;
    let upstream = build_upstream(config)?;
    let app = proxy_router(ProxyState::new(upstream), config.max_body_bytes);

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .map_err(|source| ServerError::BindFailed {
            addr: config.bind_addr.clone(),
            source,
        })?;

    info!("🌐 代理服务已启动: http://{}/api/extract-text", config.bind_addr);

    axum::serve(listener, app)
        .await
        .map_err(ServerError::ServeFailed)?;

    Ok(())
}
