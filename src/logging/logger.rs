// src/logging/logger.rs

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

/// 未设置 `RUST_LOG` 时的默认过滤规则
pub const DEFAULT_FILTER: &str = "publisher_stat=info";

/// 初始化全局 tracing 日志：JSON 格式，按小时滚动写入 `log_dir/file_name`。
///
/// 返回的 guard 需要一直持有，drop 时会把缓冲区刷到磁盘。
pub fn init_tracing(
    log_dir: &str,
    file_name: &str,
) -> Result<WorkerGuard, Box<dyn std::error::Error>> {
    let log_file = rolling::hourly(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(log_file);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let subscriber = Registry::default()
        .with(filter)
        .with(fmt::layer().json().with_writer(non_blocking));
    tracing::subscriber::set_global_default(subscriber)?;

    Ok(guard)
}
