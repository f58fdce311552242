// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::OnceLock;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// `RUST_LOG` wins over the configured level.
fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Routes tracing output to `log_path`. The terminal belongs to the UI, so
/// stderr is only used when the file cannot be opened.
pub fn init_logging(default_level: &str, log_path: &Path) {
    let opened = log_path
        .parent()
        .map_or(Ok(()), fs::create_dir_all)
        .and_then(|()| OpenOptions::new().create(true).append(true).open(log_path));

    match opened {
        Ok(file) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(file);
            let installed = tracing_subscriber::fmt()
                .with_env_filter(env_filter(default_level))
                .with_target(false)
                .with_ansi(false)
                .with_writer(non_blocking)
                .try_init();
            if installed.is_ok() {
                let _ = LOG_GUARD.set(guard);
                tracing::info!(path = %log_path.display(), "logging initialized");
            }
        }
        Err(error) => {
            let installed = tracing_subscriber::fmt()
                .with_env_filter(env_filter(default_level))
                .with_target(false)
                .with_writer(std::io::stderr)
                .try_init();
            if installed.is_ok() {
                tracing::warn!(
                    path = %log_path.display(),
                    error = %error,
                    "failed to open log file; using stderr"
                );
            }
        }
    }
}
