//! File logging. The terminal belongs to the UI, so nothing is logged to stderr.

use std::path::Path;

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::info;

use crate::errors::RashodyError;

const LOG_FILE_BASENAME: &str = "rashody";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 2 * 1024 * 1024;
const MAX_LOG_FILES: usize = 3;

/// Starts rolling file logs in `log_dir`. Keep the handle alive until exit.
pub fn init_logging(level: &str, log_dir: &Path) -> Result<LoggerHandle, RashodyError> {
    std::fs::create_dir_all(log_dir)?;
    let logger = Logger::try_with_str(level)?
        .log_to_file(
            FileSpec::default()
                .directory(log_dir)
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()?;

    info!(
        "event=app_start module=logging level={} version={}",
        level,
        env!("CARGO_PKG_VERSION")
    );
    Ok(logger)
}
