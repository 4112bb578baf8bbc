//! 失败分类 - 业务能力层
//!
//! 只根据失败描述文本判断类别，不依赖任何传输方式。

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{ClassifiedError, ErrorKind, UNEXPECTED_ERROR_MESSAGE};

fn auth_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)api[ _]key[ _](not[ _]valid|invalid|is[ _]missing)").unwrap()
    })
}

fn rate_limit_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)429|resource[ _]exhausted|too many requests|rate[ _]limit").unwrap()
    })
}

/// 根据失败描述判断错误类别
///
/// 凭证问题优先于限流判断。
pub fn classify(detail: &str) -> ErrorKind {
    if auth_pattern().is_match(detail) {
        ErrorKind::AuthError
    } else if rate_limit_pattern().is_match(detail) {
        ErrorKind::RateLimited
    } else {
        ErrorKind::GenericExtractionError
    }
}

/// 把失败描述转换成面向用户的提示语
///
/// 完全没有描述时返回通用的"意外错误"提示
pub fn user_message_for(detail: &str) -> &'static str {
    if detail.trim().is_empty() {
        UNEXPECTED_ERROR_MESSAGE
    } else {
        classify(detail).user_message()
    }
}

/// 对客户端返回的错误分类，已带类别的错误直接采用其类别
pub fn classify_error(error: &anyhow::Error) -> ErrorKind {
    match error.downcast_ref::<ClassifiedError>() {
        Some(classified) => classified.kind,
        None => classify(&format!("{:#}", error)),
    }
}

/// 同 [`user_message_for`]，输入为客户端返回的错误
pub fn user_message_for_error(error: &anyhow::Error) -> &'static str {
    match error.downcast_ref::<ClassifiedError>() {
        Some(classified) => classified.kind.user_message(),
        None => user_message_for(&format!("{:#}", error)),
    }
}
