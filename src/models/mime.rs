//! 根据扩展名识别 MIME 类型

use std::path::Path;

use phf::phf_map;

/// 默认接受的文件类型（目录扫描时使用）
pub const ACCEPTED_EXTENSIONS: &[&str] = &["pdf", "docx", "txt", "jpg", "jpeg", "png", "xlsx", "csv"];

static MIME_TYPES: phf::Map<&'static str, &'static str> = phf_map! {
    // 文档
    "pdf" => "application/pdf",
    "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "doc" => "application/msword",
    "txt" => "text/plain",
    "md" => "text/markdown",
    "html" => "text/html",
    "htm" => "text/html",
    "rtf" => "application/rtf",
    // 表格
    "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "xls" => "application/vnd.ms-excel",
    "csv" => "text/csv",
    // 图片
    "jpg" => "image/jpeg",
    "jpeg" => "image/jpeg",
    "png" => "image/png",
    "gif" => "image/gif",
    "webp" => "image/webp",
    "bmp" => "image/bmp",
    "tif" => "image/tiff",
    "tiff" => "image/tiff",
    "heic" => "image/heic",
};

fn lowercase_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// 根据扩展名识别 MIME 类型，未知类型返回 `application/octet-stream`
pub fn detect_mime_type(path: &Path) -> &'static str {
    lowercase_extension(path)
        .and_then(|ext| MIME_TYPES.get(ext.as_str()).copied())
        .unwrap_or("application/octet-stream")
}

/// 是否属于默认接受的文件类型
pub fn is_accepted_file(path: &Path) -> bool {
    lowercase_extension(path)
        .map(|ext| ACCEPTED_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}
