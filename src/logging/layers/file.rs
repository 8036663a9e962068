use crate::logging::config::LoggingConfig;
use crate::Result;
use anyhow::{anyhow, Context};
use std::fs::{create_dir_all, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::{self as tracing_fmt, writer::BoxMakeWriter};
use tracing_subscriber::layer::{Layer, Layered};
use tracing_subscriber::registry::LookupSpan;

const LOG_FILE_NAME: &str = "tessera.log";

/// File sink layer; plain or JSON lines depending on configuration.
pub type FileLayer<S> = Box<dyn Layer<S> + Send + Sync>;

/// Layer stack that already wraps the provided subscriber.
pub type FileLayerStack<S> = Layered<Option<FileLayer<S>>, S>;

/// Determine the file the logging file sink appends to.
///
/// Relative `log_dir` values resolve against the directory holding the config
/// file; without one the sink lives under `~/.tessera/logs`.
pub fn log_file_path(config: &LoggingConfig, config_dir: Option<&Path>) -> Result<PathBuf> {
    let directory = match &config.log_dir {
        Some(custom) if custom.is_absolute() => custom.clone(),
        Some(custom) => match config_dir {
            Some(base) => base.join(custom),
            None => home_base()?.join(custom),
        },
        None => home_base()?.join(".tessera").join("logs"),
    };
    Ok(directory.join(LOG_FILE_NAME))
}

/// Build a tracing layer that writes to `log_file` via a non-blocking writer.
/// Disabled sinks return `None`.
pub fn file_layer<S>(
    log_file: &Path,
    config: &LoggingConfig,
) -> Result<Option<(FileLayer<S>, WorkerGuard)>>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    if !config.enable_file {
        return Ok(None);
    }

    ensure_log_dir(log_file)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("failed to open log file {}", log_file.display()))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);
    let writer = BoxMakeWriter::new(move || non_blocking.clone());
    let layer: FileLayer<S> = if config.json {
        Box::new(tracing_fmt::layer().json().with_writer(writer))
    } else {
        Box::new(
            tracing_fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_thread_ids(false)
                .with_thread_names(false),
        )
    };
    Ok(Some((layer, guard)))
}

fn ensure_log_dir(log_file: &Path) -> Result<()> {
    let directory = log_file.parent().ok_or_else(|| {
        anyhow!(
            "log file path {} has no parent directory",
            log_file.display()
        )
    })?;
    create_dir_all(directory)
        .with_context(|| format!("failed to create log directory {}", directory.display()))?;
    Ok(())
}

fn home_base() -> Result<PathBuf> {
    dirs_next::home_dir().ok_or_else(|| anyhow!("$HOME directory unavailable"))
}
