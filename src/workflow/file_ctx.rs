//! 文件处理上下文
//!
//! 封装"我正在处理批次中的第几个文件"这一信息

use std::fmt::Display;

/// 文件处理上下文
#[derive(Debug, Clone)]
pub struct FileCtx {
    /// 文件在批次中的序号（从1开始，仅用于日志显示）
    pub file_index: usize,

    /// 批次中的文件总数
    pub total: usize,

    /// 文件名
    pub file_name: String,
}

impl FileCtx {
    /// 创建新的文件上下文
    pub fn new(file_index: usize, total: usize, file_name: impl Into<String>) -> Self {
        Self {
            file_index,
            total,
            file_name: file_name.into(),
        }
    }
}

impl Display for FileCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[文件 {}/{} {}]", self.file_index, self.total, self.file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let ctx = FileCtx::new(2, 5, "scan.png");
        assert_eq!(ctx.to_string(), "[文件 2/5 scan.png]");
    }
}
