use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 应用程序错误类型
///
/// 单个文件的提取失败不会出现在这里：它们在批处理内部被转换成
/// `ExtractionResult::error`。这里只包含边界层的致命错误。
#[derive(Debug, Error)]
pub enum AppError {
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 导出错误
    #[error("导出错误: {0}")]
    Export(#[from] ExportError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 代理服务错误
    #[error("服务错误: {0}")]
    Server(#[from] ServerError),
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 文件不存在
    #[error("文件不存在: {path}")]
    NotFound { path: String },
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 目录不存在
    #[error("目录不存在: {path}")]
    DirectoryNotFound { path: String },
}

/// 导出错误
#[derive(Debug, Error)]
pub enum ExportError {
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// ZIP 打包失败
    #[error("ZIP 打包失败: {0}")]
    Zip(#[from] zip::result::ZipError),
    /// 写入流失败
    #[error("写入失败: {0}")]
    Io(#[from] std::io::Error),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 未知的提取服务提供方
    #[error("未知的提取服务: {name}（可选: gemini / openai / proxy）")]
    UnknownProvider { name: String },
    /// 字段取值非法
    #[error("配置项 {field} 取值非法: {value}")]
    InvalidValue { field: String, value: String },
    /// 读取配置文件失败
    #[error("读取配置文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// 代理服务错误
#[derive(Debug, Error)]
pub enum ServerError {
    /// 监听地址非法或绑定失败
    #[error("无法绑定地址 {addr}: {source}")]
    BindFailed {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    /// 服务运行中断
    #[error("服务运行失败: {0}")]
    ServeFailed(#[source] std::io::Error),
}

/// 单个文件提取失败的分类
///
/// 每一类都对应一条固定的、面向用户的提示语。
/// 序列化为 `AUTH_ERROR` 这样的代码，在代理响应的 `errorKind` 中传递。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// 远端调用成功，但没有可用的文本
    EmptyResult,
    /// 凭证无效或缺失
    AuthError,
    /// 触发限流（HTTP 429）
    RateLimited,
    /// 其他任何失败（网络、输入格式、未知上游错误）
    GenericExtractionError,
}

pub const NO_READABLE_TEXT_MESSAGE: &str = "no readable text found";
pub const AUTH_ERROR_MESSAGE: &str = "The API key is invalid or not configured.";
pub const RATE_LIMITED_MESSAGE: &str = "Too many requests. Please wait a moment before trying again.";
pub const GENERIC_ERROR_MESSAGE: &str = "Text extraction failed. Please try again.";
/// 失败本身不携带任何信息时使用
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred.";

impl ErrorKind {
    /// 面向用户的提示语
    pub fn user_message(self) -> &'static str {
        match self {
            ErrorKind::EmptyResult => NO_READABLE_TEXT_MESSAGE,
            ErrorKind::AuthError => AUTH_ERROR_MESSAGE,
            ErrorKind::RateLimited => RATE_LIMITED_MESSAGE,
            ErrorKind::GenericExtractionError => GENERIC_ERROR_MESSAGE,
        }
    }
}

/// 上游已经分好类的提取失败
///
/// 客户端返回它时，流程层直接采用 `kind`，不再按描述文本重新分类。
#[derive(Debug, Error)]
#[error("{detail}")]
pub struct ClassifiedError {
    pub kind: ErrorKind,
    pub detail: String,
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建文件读取错误
    pub fn file_read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建导出写入错误
    pub fn export_write_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::Export(ExportError::WriteFailed {
            path: path.into(),
            source,
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages_are_distinct() {
        let kinds = [
            ErrorKind::EmptyResult,
            ErrorKind::AuthError,
            ErrorKind::RateLimited,
            ErrorKind::GenericExtractionError,
        ];
        for (i, a) in kinds.iter().enumerate() {
            for b in kinds.iter().skip(i + 1) {
                assert_ne!(a.user_message(), b.user_message());
            }
        }
        assert_eq!(ErrorKind::EmptyResult.user_message(), "no readable text found");
    }

    #[test]
    fn test_error_kind_codes() {
        assert_eq!(
            serde_json::to_value(ErrorKind::RateLimited).unwrap(),
            serde_json::json!("RATE_LIMITED")
        );
        let kind: ErrorKind = serde_json::from_str("\"AUTH_ERROR\"").unwrap();
        assert_eq!(kind, ErrorKind::AuthError);
    }

    #[test]
    fn test_error_display_wraps_source() {
        let err = AppError::file_read_failed(
            "a.pdf",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        let text = err.to_string();
        assert!(text.contains("a.pdf"));
        assert!(text.contains("gone"));
    }
}
