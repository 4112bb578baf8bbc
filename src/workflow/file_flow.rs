//! 单文件处理流程 - 流程层
//!
//! 核心职责：定义"一个文件"的完整处理流程
//!
//! 流程顺序：
//! 1. 读取文件内容
//! 2. 调用提取客户端（编码在客户端内部完成）
//! 3. 判断结果：有可读文本 → 成功；空白 → 无可读文本；失败 → 分类后的提示语
//!
//! 任何一步失败都只影响本文件，流程本身永远返回一条结果。

use tracing::{debug, info, warn};

use crate::clients::ExtractionClient;
use crate::error::{ErrorKind, NO_READABLE_TEXT_MESSAGE};
use crate::models::{ExtractionResult, InputFile};
use crate::services::user_message_for_error;
use crate::utils::logging::truncate_text;
use crate::workflow::file_ctx::FileCtx;

/// 单文件处理流程
///
/// - 不持有客户端，只借用
/// - 不重试：一次失败即为本批次中该文件的最终结果
pub struct FileFlow<'a> {
    client: &'a dyn ExtractionClient,
    verbose_logging: bool,
}

impl<'a> FileFlow<'a> {
    pub fn new(client: &'a dyn ExtractionClient, verbose_logging: bool) -> Self {
        Self {
            client,
            verbose_logging,
        }
    }

    pub async fn run(&self, file: &InputFile, ctx: &FileCtx) -> ExtractionResult {
        debug!("{} 开始处理，类型: {}", ctx, file.mime_type());

        // ========== 读取 ==========
        let bytes = match file.read_bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("{} ❌ 读取失败: {}", ctx, e);
                return ExtractionResult::failure(
                    file.name(),
                    ErrorKind::GenericExtractionError.user_message(),
                );
            }
        };

        // ========== 提取 ==========
        match self.client.extract_text(&bytes, file.mime_type()).await {
            Ok(text) if is_blank(&text) => {
                warn!("{} ⚠️ 未找到可读文本", ctx);
                ExtractionResult::failure(file.name(), NO_READABLE_TEXT_MESSAGE)
            }
            Ok(text) => {
                info!("{} ✓ 提取成功，{} 个字符", ctx, text.chars().count());
                if self.verbose_logging {
                    debug!("{} 预览: {}", ctx, truncate_text(&text, 80));
                }
                ExtractionResult::success(file.name(), text)
            }
            Err(e) => {
                warn!("{} ❌ 提取失败 ({}): {:#}", ctx, self.client.name(), e);
                ExtractionResult::failure(file.name(), user_message_for_error(&e))
            }
        }
    }
}

/// 只含空白（包括 BOM）的文本视为没有可读内容
fn is_blank(text: &str) -> bool {
    text.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
        .is_empty()
}
