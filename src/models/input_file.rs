use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult, FileError};
use crate::models::mime::detect_mime_type;

/// 文件内容来源
#[derive(Clone)]
enum FileSource {
    /// 已在内存中的字节
    Memory(Vec<u8>),
    /// 磁盘路径，在该文件自己的处理流程中才读取
    Path(PathBuf),
}

impl fmt::Debug for FileSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileSource::Memory(bytes) => write!(f, "Memory({} bytes)", bytes.len()),
            FileSource::Path(path) => write!(f, "Path({})", path.display()),
        }
    }
}

/// 待提取的输入文件
///
/// 选定后不可变
#[derive(Debug, Clone)]
pub struct InputFile {
    name: String,
    mime_type: String,
    source: FileSource,
}

impl InputFile {
    /// 由内存中的字节创建
    pub fn from_bytes(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            source: FileSource::Memory(bytes.into()),
        }
    }

    /// 由磁盘路径创建，MIME 类型按扩展名识别
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        let mime_type = detect_mime_type(&path).to_string();
        Self {
            name,
            mime_type,
            source: FileSource::Path(path),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// 读取文件内容
    ///
    /// 内存来源直接借用，路径来源异步读取
    pub async fn read_bytes(&self) -> AppResult<Cow<'_, [u8]>> {
        match &self.source {
            FileSource::Memory(bytes) => Ok(Cow::Borrowed(bytes.as_slice())),
            FileSource::Path(path) => read_path(path).await.map(Cow::Owned),
        }
    }
}

async fn read_path(path: &Path) -> AppResult<Vec<u8>> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(bytes),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(FileError::NotFound {
            path: path.display().to_string(),
        }
        .into()),
        Err(e) => Err(AppError::file_read_failed(path.display().to_string(), e)),
    }
}
