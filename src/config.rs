use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::ConfigError;

/// 提取服务提供方
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionProvider {
    /// 直接调用 Gemini generateContent
    Gemini,
    /// OpenAI 兼容网关
    OpenAi,
    /// 经由代理服务转发
    Proxy,
}

impl FromStr for ExtractionProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "openai" => Ok(Self::OpenAi),
            "proxy" => Ok(Self::Proxy),
            other => Err(ConfigError::UnknownProvider {
                name: other.to_string(),
            }),
        }
    }
}

/// 程序配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    // --- 提取服务配置 ---
    /// 上游 API 密钥，为空表示未配置
    pub api_key: String,
    /// 提取服务: gemini / openai / proxy
    pub provider: String,
    pub api_base_url: String,
    pub model_name: String,
    /// 代理模式下的转发地址
    pub proxy_url: String,
    /// 单个请求的超时时间（秒）
    pub request_timeout_secs: u64,
    // --- 代理服务配置 ---
    pub bind_addr: String,
    pub max_body_bytes: usize,
    // --- 输出配置 ---
    /// 导出文件存放目录
    pub output_dir: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            provider: "gemini".to_string(),
            api_base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model_name: "gemini-2.5-flash".to_string(),
            proxy_url: "http://127.0.0.1:8888/api/extract-text".to_string(),
            request_timeout_secs: 120,
            bind_addr: "127.0.0.1:8888".to_string(),
            max_body_bytes: 25 * 1024 * 1024,
            output_dir: "output".to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// 先读取 TOML 配置文件（如果提供），再用环境变量覆盖
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(path) => Self::from_toml_file(path)?,
            None => Self::default(),
        };
        Ok(base.with_env_overrides())
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::TomlParseFailed {
            path: path.display().to_string(),
            source,
        })
    }

    fn with_env_overrides(self) -> Self {
        let base = self;
        Self {
            api_key: std::env::var("API_KEY").unwrap_or(base.api_key),
            provider: std::env::var("EXTRACTION_PROVIDER").unwrap_or(base.provider),
            api_base_url: std::env::var("API_BASE_URL").unwrap_or(base.api_base_url),
            model_name: std::env::var("MODEL_NAME").unwrap_or(base.model_name),
            proxy_url: std::env::var("PROXY_URL").unwrap_or(base.proxy_url),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(base.request_timeout_secs),
            bind_addr: std::env::var("BIND_ADDR").unwrap_or(base.bind_addr),
            max_body_bytes: std::env::var("MAX_BODY_BYTES").ok().and_then(|v| v.parse().ok()).unwrap_or(base.max_body_bytes),
            output_dir: std::env::var("OUTPUT_DIR").unwrap_or(base.output_dir),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(base.verbose_logging),
        }
    }

    pub fn provider(&self) -> Result<ExtractionProvider, ConfigError> {
        self.provider.parse()
    }

    /// 是否配置了上游密钥
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.provider()?;
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "request_timeout_secs".to_string(),
                value: "0".to_string(),
            });
        }
        if self.max_body_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_body_bytes".to_string(),
                value: "0".to_string(),
            });
        }
        Ok(())
    }
}
