use anyhow::{Context, Result};
use flexi_logger::{Cleanup, Criterion, Duplicate, FileSpec, Logger, LoggerHandle, Naming};
use std::path::Path;

/// Initialize logging: a rotated log file in `log_dir`, duplicated to stdout.
///
/// If the log directory is unusable, falls back to stdout only so the update
/// can still proceed. The returned handle must stay alive for the whole run.
pub fn init_logging(log_dir: &Path, basename: &str) -> Result<LoggerHandle> {
    match init_file_logging(log_dir, basename) {
        Ok(handle) => Ok(handle),
        Err(e) => {
            let handle = Logger::try_with_env_or_str("info")?
                .log_to_stdout()
                .start()
                .context("Failed to start stdout logger")?;
            log::warn!("File logging unavailable, logging to stdout only: {e:#}");
            Ok(handle)
        }
    }
}

fn init_file_logging(log_dir: &Path, basename: &str) -> Result<LoggerHandle> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let handle = Logger::try_with_env_or_str("info")?
        .log_to_file(
            FileSpec::default()
                .directory(log_dir)
                .basename(basename)
                .suffix("log"),
        )
        .rotate(
            Criterion::Size(5_000_000),
            Naming::Numbers,
            Cleanup::KeepLogFiles(10),
        )
        .duplicate_to_stdout(Duplicate::Info)
        .start()?;

    Ok(handle)
}
