use crate::error::{AppError, AppResult, FileError};
use crate::models::input_file::InputFile;
use crate::models::mime::is_accepted_file;
use std::path::{Path, PathBuf};
use tokio::fs;

/// 扫描文件夹中所有可接受类型的文件（不递归），按文件名排序
pub async fn load_input_dir(folder_path: &Path) -> AppResult<Vec<InputFile>> {
    if !fs::try_exists(folder_path).await.unwrap_or(false) {
        return Err(FileError::DirectoryNotFound {
            path: folder_path.display().to_string(),
        }
        .into());
    }

    let mut paths = Vec::new();
    let mut entries = fs::read_dir(folder_path)
        .await
        .map_err(|e| AppError::file_read_failed(folder_path.display().to_string(), e))?;

    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| AppError::file_read_failed(folder_path.display().to_string(), e))?
    {
        let path = entry.path();
        let is_file = entry.file_type().await.map(|t| t.is_file()).unwrap_or(false);
        if !is_file {
            continue;
        }
        if is_accepted_file(&path) {
            paths.push(path);
        } else {
            tracing::debug!("跳过不支持的文件类型: {}", path.display());
        }
    }

    paths.sort();
    tracing::info!("在 {} 中找到 {} 个待提取文件", folder_path.display(), paths.len());

    Ok(paths.into_iter().map(InputFile::from_path).collect())
}

/// 把命令行给出的路径展开成输入文件列表
///
/// 目录按 [`load_input_dir`] 展开；显式给出的文件不论扩展名都会提交，
/// 即使它不存在（读取失败会作为该文件自己的错误结果返回）。
pub async fn collect_input_files(paths: &[PathBuf]) -> AppResult<Vec<InputFile>> {
    let mut files = Vec::new();

    for path in paths {
        let is_dir = fs::metadata(path).await.map(|m| m.is_dir()).unwrap_or(false);
        if is_dir {
            files.extend(load_input_dir(path).await?);
        } else {
            if !is_accepted_file(path) {
                tracing::warn!("文件类型可能不受支持: {}", path.display());
            }
            files.push(InputFile::from_path(path.clone()));
        }
    }

    Ok(files)
}
