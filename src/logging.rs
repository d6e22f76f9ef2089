use std::fs;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

const LOG_FILE_PREFIX: &str = "tabradio.log";
const DEFAULT_FILTER: &str = "info,reqwest=warn,hyper=warn,hyper_util=warn";

pub struct LogGuard(#[allow(dead_code)] Option<WorkerGuard>);

#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    pub dir: Option<PathBuf>,
    pub filter: Option<String>,
    /// 一次性子命令：warn 以上同时打到 stderr
    pub stderr: bool,
}

/// 日志目录；不可写时退回系统临时目录
fn resolve_log_dir(data_dir: &Path, dir: Option<PathBuf>) -> PathBuf {
    let log_dir = dir.unwrap_or_else(|| data_dir.join("logs"));
    match fs::create_dir_all(&log_dir) {
        Ok(()) => log_dir,
        Err(_) => {
            let fallback = std::env::temp_dir().join("tabradio-logs");
            let _ = fs::create_dir_all(&fallback);
            fallback
        }
    }
}

fn resolve_filter(filter: Option<&str>) -> EnvFilter {
    match filter {
        Some(s) if !s.trim().is_empty() => {
            EnvFilter::try_new(s).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
        }
        _ => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
    }
}

pub fn init(data_dir: &Path, cfg: LogConfig) -> LogGuard {
    let log_dir = resolve_log_dir(data_dir, cfg.dir);

    let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE_PREFIX);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(file_writer);

    let stderr_layer = cfg.stderr.then(|| {
        fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .with_filter(tracing_subscriber::filter::LevelFilter::WARN)
    });

    let subscriber = tracing_subscriber::registry()
        .with(resolve_filter(cfg.filter.as_deref()))
        .with(file_layer)
        .with(stderr_layer);

    let _ = subscriber.try_init();
    tracing::info!(log_dir = %log_dir.display(), "tracing 已初始化");

    LogGuard(Some(guard))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_dir_defaults_under_data_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        let got = resolve_log_dir(dir.path(), None);
        assert_eq!(got, dir.path().join("logs"));
        assert!(got.is_dir());
    }

    #[test]
    fn explicit_filter_wins() {
        let f = resolve_filter(Some("debug"));
        assert_eq!(f.to_string(), "debug");
    }
}
