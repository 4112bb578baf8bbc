/// 日志工具模块
///
/// 提供日志初始化以及批处理过程的格式化输出
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::models::BatchStats;

/// 初始化日志
///
/// 优先使用 `RUST_LOG`，否则按 `verbose` 选择 `debug` 或 `info`。
/// 重复调用是安全的（后续调用不生效）。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// 记录程序启动信息
///
/// # 参数
/// - `provider`: 提取服务名称
/// - `model`: 模型名称
pub fn log_startup(provider: &str, model: &str) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 多文档文本提取");
    info!("🤖 提取服务: {} (模型: {})", provider, model);
    info!("{}", "=".repeat(60));
}

/// 记录批次开始信息
///
/// # 参数
/// - `total`: 文件总数
pub fn log_batch_start(total: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📦 开始处理本批文件，共 {} 个（全部并发提交）", total);
    info!("{}", "=".repeat(60));
}

/// 记录批次完成信息
pub fn log_batch_complete(stats: &BatchStats) {
    info!("\n{}", "─".repeat(60));
    info!("✓ 本批完成: 成功 {}/{}", stats.success, stats.total);
    info!("{}", "─".repeat(60));
}

/// 打印最终统计信息
///
/// # 参数
/// - `stats`: 批处理统计
/// - `archive_path`: 导出的压缩包路径（没有导出时为 None）
pub fn print_final_stats(stats: &BatchStats, archive_path: Option<&str>) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", stats.success, stats.total);
    info!("❌ 失败: {}", stats.failed);
    info!("{}", "=".repeat(60));
    if let Some(path) = archive_path {
        info!("\n导出文件已保存至: {}", path);
    }
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度（按字符计）
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
