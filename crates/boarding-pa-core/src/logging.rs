// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use anyhow::{Context, Result};
use log::LevelFilter;
use simplelog::{ConfigBuilder, WriteLogger};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

/// `<log_dir>/<YYYY-MM-DD>.log`, dated in UTC.
pub fn daily_log_path(log_dir: &Path) -> PathBuf {
    log_dir.join(format!("{}.log", chrono::Utc::now().format("%Y-%m-%d")))
}

/// Sends every log record to today's log file. Nothing is written to the
/// console, so the announcement tools stay silent.
pub fn init_file_logger(log_dir: &Path, level: LevelFilter) -> Result<PathBuf> {
    fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let path = daily_log_path(log_dir);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .add_filter_allow_str("boarding_pa")
        .build();

    WriteLogger::init(level, config, file).context("Logger already initialised")?;
    Ok(path)
}
