//! 结果导出 - 业务能力层
//!
//! 从结果集派生两种视图：拼接后的全文，以及每个文件一份 `.txt` 的导出包。
//! 派生视图是纯函数；写文件的部分单独提供。

use std::fs::File;
use std::io::{Seek, Write};
use std::path::Path;

use tracing::{debug, info};
use zip::write::FileOptions;

use crate::error::{AppError, AppResult, ExportError};
use crate::models::ExtractionResult;

/// 默认的压缩包文件名
pub const DEFAULT_ARCHIVE_NAME: &str = "extractions.zip";

/// 导出包中的一项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportEntry {
    pub file_name: String,
    pub content: String,
}

/// 拼接所有成功结果的文本
///
/// 每项渲染为 `--- 文件名 ---\n\n文本`，项之间空一行；失败项不出现。
pub fn concatenated_text(results: &[ExtractionResult]) -> String {
    results
        .iter()
        .filter_map(|r| r.text.as_ref().map(|text| format!("--- {} ---\n\n{}", r.file_name, text)))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// 去掉最后一个 `.` 及其后的扩展名，再加上 `.txt`
///
/// 没有 `.` 的名字整体保留
pub fn export_file_name(original: &str) -> String {
    let base = match original.rsplit_once('.') {
        Some((stem, _ext)) => stem,
        None => original,
    };
    format!("{}.txt", base)
}

/// 为每个成功结果生成一份导出文件
pub fn export_bundle(results: &[ExtractionResult]) -> Vec<ExportEntry> {
    results
        .iter()
        .filter_map(|r| {
            r.text.as_ref().map(|text| ExportEntry {
                file_name: export_file_name(&r.file_name),
                content: text.clone(),
            })
        })
        .collect()
}

/// 同名项合并：保留第一次出现的位置，内容取最后一次
fn merge_duplicate_names(bundle: &[ExportEntry]) -> Vec<&ExportEntry> {
    let mut merged: Vec<&ExportEntry> = Vec::with_capacity(bundle.len());
    for entry in bundle {
        match merged.iter_mut().find(|e| e.file_name == entry.file_name) {
            Some(slot) => {
                debug!("导出包中存在同名文件，后者覆盖前者: {}", entry.file_name);
                *slot = entry;
            }
            None => merged.push(entry),
        }
    }
    merged
}

/// 把导出包写成 zip
///
/// 导出包为空时什么也不写，返回 `false`
pub fn write_zip_archive<W: Write + Seek>(
    bundle: &[ExportEntry],
    writer: W,
) -> Result<bool, ExportError> {
    if bundle.is_empty() {
        return Ok(false);
    }

    let mut zip = zip::ZipWriter::new(writer);
    let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    for entry in merge_duplicate_names(bundle) {
        zip.start_file(entry.file_name.as_str(), options)?;
        zip.write_all(entry.content.as_bytes())?;
    }
    zip.finish()?;

    Ok(true)
}

/// 把导出包保存为 zip 文件，导出包为空时不创建文件
pub fn save_zip_archive(bundle: &[ExportEntry], path: &Path) -> AppResult<bool> {
    if bundle.is_empty() {
        info!("没有可导出的文本，跳过压缩包");
        return Ok(false);
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| AppError::export_write_failed(parent.display().to_string(), e))?;
    }
    let file = File::create(path)
        .map_err(|e| AppError::export_write_failed(path.display().to_string(), e))?;
    let written = write_zip_archive(bundle, file)?;

    info!("📦 已导出 {} 个文本文件到 {}", bundle.len(), path.display());
    Ok(written)
}

/// 保存拼接后的全文，文本为空时不创建文件
pub fn save_text(text: &str, path: &Path) -> AppResult<bool> {
    if text.is_empty() {
        return Ok(false);
    }
    std::fs::write(path, text)
        .map_err(|e| AppError::export_write_failed(path.display().to_string(), e))?;
    info!("📝 全文已保存至: {}", path.display());
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};

    fn sample_results() -> Vec<ExtractionResult> {
        vec![
            ExtractionResult::success("a.txt", "X"),
            ExtractionResult::failure("b.txt", "e"),
            ExtractionResult::success("c.txt", "Y"),
        ]
    }

    #[test]
    fn test_concatenated_text_skips_failures() {
        assert_eq!(
            concatenated_text(&sample_results()),
            "--- a.txt ---\n\nX\n\n--- c.txt ---\n\nY"
        );
    }

    #[test]
    fn test_concatenated_text_empty() {
        assert_eq!(concatenated_text(&[]), "");
        assert_eq!(concatenated_text(&[ExtractionResult::failure("x.pdf", "e")]), "");
    }

    #[test]
    fn test_export_file_name() {
        assert_eq!(export_file_name("report.final.pdf"), "report.final.txt");
        assert_eq!(export_file_name("noext"), "noext.txt");
        assert_eq!(export_file_name("scan.PNG"), "scan.txt");
        assert_eq!(export_file_name("trailing."), "trailing.txt");
        assert_eq!(export_file_name(".bashrc"), ".txt");
    }

    #[test]
    fn test_export_bundle() {
        let bundle = export_bundle(&sample_results());
        assert_eq!(
            bundle,
            vec![
                ExportEntry { file_name: "a.txt".into(), content: "X".into() },
                ExportEntry { file_name: "c.txt".into(), content: "Y".into() },
            ]
        );
        assert!(export_bundle(&[]).is_empty());
    }

    #[test]
    fn test_write_zip_archive_contents() {
        let bundle = export_bundle(&[
            ExtractionResult::success("invoice.pdf", "total 42"),
            ExtractionResult::success("photo.jpg", "hello"),
            ExtractionResult::success("invoice.docx", "total 43"),
        ]);

        let mut buffer = Cursor::new(Vec::new());
        assert!(write_zip_archive(&bundle, &mut buffer).unwrap());

        let mut archive = zip::ZipArchive::new(Cursor::new(buffer.into_inner())).unwrap();
        assert_eq!(archive.len(), 2);

        let mut first = archive.by_index(0).unwrap();
        assert_eq!(first.name(), "invoice.txt");
        let mut content = String::new();
        first.read_to_string(&mut content).unwrap();
        assert_eq!(content, "total 43");
    }

    #[test]
    fn test_write_zip_archive_empty_bundle() {
        let mut buffer = Cursor::new(Vec::new());
        assert!(!write_zip_archive(&[], &mut buffer).unwrap());
        assert!(buffer.into_inner().is_empty());
    }

    #[test]
    fn test_save_zip_archive_skips_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join(DEFAULT_ARCHIVE_NAME);

        assert!(!save_zip_archive(&[], &path).unwrap());
        assert!(!path.exists());

        let bundle = export_bundle(&sample_results());
        assert!(save_zip_archive(&bundle, &path).unwrap());
        assert!(path.exists());
    }

    #[test]
    fn test_save_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("all.txt");

        assert!(!save_text("", &path).unwrap());
        assert!(!path.exists());

        assert!(save_text("--- a ---\n\nX", &path).unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "--- a ---\n\nX");
    }
}
