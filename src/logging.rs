// ==========================================
// 日志系统初始化
// ==========================================
// 使用 tracing 和 tracing-subscriber
// 支持环境变量配置日志级别, 可选 JSON 输出
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// 日志输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// 初始化日志系统 (文本格式)
///
/// # 环境变量
/// - RUST_LOG: 日志级别过滤器（默认: info）
///   例如: RUST_LOG=debug 或 RUST_LOG=pig_logistics::engine=trace
///
/// # 示例
/// ```no_run
/// use pig_logistics::logging;
/// logging::init();
/// ```
pub fn init() {
    init_with_format(LogFormat::Text);
}

/// 按指定格式初始化日志系统 (失败时输出到 stderr)
pub fn init_with_format(format: LogFormat) {
    let builder = fmt()
        .with_env_filter(default_filter())
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true);

    let result = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    if let Err(e) = result {
        eprintln!("日志系统初始化失败 (已存在全局 subscriber?): {}", e);
    }
}

/// 初始化测试环境的日志系统
///
/// 本 crate 输出 debug 级别, 经测试捕获器输出;
/// 同一测试进程内多次调用时仅首次生效
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("pig_logistics=debug"))
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_init_is_reported_not_fatal() {
        init_test();
        // 全局 subscriber 已存在, 失败写入 stderr 而不 panic
        init_with_format(LogFormat::Json);
        init();
        tracing::info!("logging still usable");
    }
}
