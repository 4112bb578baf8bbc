//! 批量文件处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责一批文件的并发提取和结果导出。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：校验配置、创建提取客户端
//! 2. **批量加载**：展开命令行给出的文件和目录（`Vec<InputFile>`）
//! 3. **并发提取**：所有文件同时提交，等待全部结束（不因单个失败而中断）
//! 4. **顺序还原**：结果顺序与提交顺序一致，和完成先后无关
//! 5. **结果导出**：zip 导出包、全文拼接
//! 6. **全局统计**：汇总成功/失败数量
//!
//! ## 设计特点
//!
//! - **单任务协作式并发**：不 spawn，所有文件的 future 由 `join_all` 一起驱动
//! - **无共享可变状态**：每个文件的流程只写自己那一项结果
//! - **不重试、不取消、不加超时**：超时由提取客户端负责

use crate::clients::{build_client, ExtractionClient};
use crate::config::Config;
use crate::models::{collect_input_files, BatchStats, InputFile, ResultSet};
use crate::services::{concatenated_text, export_bundle, save_text, save_zip_archive, DEFAULT_ARCHIVE_NAME};
use crate::utils::logging::{log_batch_complete, log_batch_start, log_startup, print_final_stats};
use crate::workflow::{FileCtx, FileFlow};
use anyhow::{Context, Result};
use futures::future::join_all;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// 并发提取一批文件
///
/// - 空列表直接返回空结果，不调用客户端
/// - 返回的结果与 `files` 按下标一一对应
pub async fn run_batch(client: &dyn ExtractionClient, files: &[InputFile]) -> ResultSet {
    run_batch_with_options(client, files, false).await
}

/// 同 [`run_batch`]，可打开详细日志
pub async fn run_batch_with_options(
    client: &dyn ExtractionClient,
    files: &[InputFile],
    verbose_logging: bool,
) -> ResultSet {
    if files.is_empty() {
        warn!("⚠️ 没有待处理的文件");
        return Vec::new();
    }

    let total = files.len();
    log_batch_start(total);

    let flow = FileFlow::new(client, verbose_logging);
    let flow = &flow;

    // 为每个文件创建一个 future，一次性全部交给 join_all
    let tasks = files.iter().enumerate().map(|(idx, file)| async move {
        let ctx = FileCtx::new(idx + 1, total, file.name());
        flow.run(file, &ctx).await
    });

    // join_all 按输入顺序返回结果
    let results: ResultSet = join_all(tasks).await;

    log_batch_complete(&BatchStats::from_results(&results));

    results
}

/// 全文输出位置
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextOutput {
    Stdout,
    File(PathBuf),
}

impl TextOutput {
    /// `-` 表示标准输出
    pub fn parse(value: &str) -> Self {
        if value == "-" {
            TextOutput::Stdout
        } else {
            TextOutput::File(PathBuf::from(value))
        }
    }
}

/// 导出选项
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// 压缩包路径，None 时使用 `output_dir/extractions.zip`
    pub zip_path: Option<PathBuf>,
    /// 不生成压缩包
    pub skip_zip: bool,
    /// 全文输出位置
    pub text_output: Option<TextOutput>,
}

/// 应用主结构
pub struct App {
    config: Config,
    client: Arc<dyn ExtractionClient>,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        config.validate().context("配置校验失败")?;
        let client = build_client(&config).context("创建提取客户端失败")?;
        Ok(Self::with_client(config, client))
    }

    /// 使用指定的提取客户端
    pub fn with_client(config: Config, client: Arc<dyn ExtractionClient>) -> Self {
        log_startup(client.name(), &config.model_name);
        Self { config, client }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// 运行应用主逻辑：加载 → 提取 → 导出
    pub async fn run(&self, paths: &[PathBuf], options: &ExportOptions) -> Result<ResultSet> {
        info!("\n📁 正在整理待提取的文件...");
        let files = collect_input_files(paths).await?;

        if files.is_empty() {
            warn!("⚠️ 没有找到待提取的文件，程序结束");
            return Ok(Vec::new());
        }

        info!("✓ 找到 {} 个待提取的文件", files.len());

        let results = self.process_files(&files).await;

        let archive = self.export(&results, options)?;

        print_final_stats(&BatchStats::from_results(&results), archive.as_deref());

        Ok(results)
    }

    /// 提取已加载的文件
    pub async fn process_files(&self, files: &[InputFile]) -> ResultSet {
        run_batch_with_options(self.client.as_ref(), files, self.config.verbose_logging).await
    }

    /// 导出结果，返回实际写出的压缩包路径
    fn export(&self, results: &ResultSet, options: &ExportOptions) -> Result<Option<String>> {
        let mut archive = None;

        if !options.skip_zip {
            let zip_path = options
                .zip_path
                .clone()
                .unwrap_or_else(|| Path::new(&self.config.output_dir).join(DEFAULT_ARCHIVE_NAME));
            if save_zip_archive(&export_bundle(results), &zip_path)? {
                archive = Some(zip_path.display().to_string());
            }
        }

        match &options.text_output {
            Some(TextOutput::Stdout) => {
                let text = concatenated_text(results);
                if !text.is_empty() {
                    let mut stdout = std::io::stdout().lock();
                    writeln!(stdout, "{}", text).context("写入标准输出失败")?;
                }
            }
            Some(TextOutput::File(path)) => {
                save_text(&concatenated_text(results), path)?;
            }
            None => {}
        }

        Ok(archive)
    }
}
