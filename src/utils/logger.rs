use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn default_filter(verbose: bool) -> EnvFilter {
    let fallback = if verbose {
        "wine_mlops=debug,tower_http=debug,info"
    } else {
        "wine_mlops=info,tower_http=info"
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// 開啟日誌檔；目錄無法建立時回傳 `None`，只輸出到 stdout
fn file_appender(dir: &Path, name: &str) -> Option<RollingFileAppender> {
    match RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(name)
        .build(dir)
    {
        Ok(appender) => Some(appender),
        Err(e) => {
            // subscriber 尚未初始化，只能寫到 stderr
            eprintln!(
                "⚠️  Cannot open log file {}: {}; logging to stdout only",
                dir.join(name).display(),
                e
            );
            None
        }
    }
}

/// 初始化 CLI 日誌。若提供 `log_file`，同時寫入純文字日誌檔。
///
/// 回傳的 guard 必須存活到程式結束，否則檔案中最後的日誌可能遺失。
pub fn init_cli_logger(verbose: bool, log_file: Option<(&Path, &str)>) -> Option<WorkerGuard> {
    let (file_layer, guard) = match log_file.and_then(|(dir, name)| file_appender(dir, name)) {
        Some(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(default_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .with(file_layer)
        .init();

    guard
}

/// JSON 格式日誌，給容器部署使用
pub fn init_json_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(default_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .json(),
        )
        .init();
}
