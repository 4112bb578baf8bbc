//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量处理和结果导出，是整个系统的"指挥中心"。
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<InputFile>)
//!     ↓
//! workflow::FileFlow (处理单个 InputFile)
//!     ↓
//! services (能力层：错误分类 / 导出)
//!     ↓
//! clients (外部能力：ExtractionClient)
//! ```
//!
//! ## 设计原则
//!
//! 1. **单一职责**：batch_processor 管批量，FileFlow 管单个文件
//! 2. **向下依赖**：编排层 → workflow → services / clients
//! 3. **无业务判断**：只做调度、导出和统计

pub mod batch_processor;

// 重新导出主要类型
pub use batch_processor::{run_batch, run_batch_with_options, App, ExportOptions, TextOutput};
