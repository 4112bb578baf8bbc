//! # Multi Doc Extract
//!
//! 批量从文档和图片中提取纯文本的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 外部能力层（Clients）
//! - `clients/` - 把一个文件的字节变成文本，只暴露 `ExtractionClient` 能力
//! - `GeminiClient` - 直接调用 Gemini generateContent
//! - `OpenAiCompatClient` - OpenAI 兼容接口
//! - `ProxyClient` - 转发给本项目的代理服务
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 错误分类、结果导出（全文拼接 / zip 导出包）
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个文件"的完整处理流程
//! - `FileCtx` - 上下文封装（文件序号 + 文件名）
//! - `FileFlow` - 流程编排（读取 → 提取 → 判断结果）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 批量并发提取，结果按提交顺序返回
//!
//! ### ⑤ 代理服务（Server）
//! - `server/` - `POST /api/extract-text`，把提取能力放到 HTTP 后面

pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod server;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{build_client, ExtractionClient, MockExtractionClient, MockResponse};
pub use config::{Config, ExtractionProvider};
pub use error::{AppError, AppResult, ErrorKind};
pub use models::{ExtractionResult, InputFile, ResultSet};
pub use orchestrator::{run_batch, App, ExportOptions, TextOutput};
pub use services::{concatenated_text, export_bundle};
pub use workflow::{FileCtx, FileFlow};
