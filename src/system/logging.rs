//! tracing subscriber setup from `[logging]`

use std::io::Write;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{Builder, Rotation};
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

type BoxedWriter = Box<dyn Write + Send + Sync>;

/// stdout, a plain append-only file, or daily-rotated files
fn open_writer(config: &LoggingConfig, file: Option<&str>) -> anyhow::Result<BoxedWriter> {
    let Some(file) = file else {
        return Ok(Box::new(std::io::stdout()));
    };

    if !config.enable_rotation {
        let handle = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(file)?;
        return Ok(Box::new(handle));
    }

    // logs/linkfolio.log → logs/linkfolio.2026-01-31.log
    let path = Path::new(file);
    let dir = path.parent().unwrap_or(Path::new("."));
    let prefix = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("linkfolio");
    let appender = Builder::new()
        .rotation(Rotation::DAILY)
        .filename_prefix(prefix)
        .filename_suffix("log")
        .max_log_files(config.max_backups.max(1) as usize)
        .build(dir)?;
    Ok(Box::new(appender))
}

/// Install the global subscriber
///
/// Call once, after configuration is loaded. `RUST_LOG` overrides
/// `logging.level`. Keep the returned guard alive until exit or buffered
/// lines are lost.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<WorkerGuard> {
    let file = config.file.as_deref().filter(|f| !f.is_empty());
    let (writer, guard) = tracing_appender::non_blocking(open_writer(config, file)?);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(file.is_none());

    match config.format.as_str() {
        "json" => builder.json().init(),
        _ => builder.init(),
    }

    Ok(guard)
}
