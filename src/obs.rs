//! Tracing initialization for the relay.
//!
//! Installs a console layer (filtered by `RUST_LOG`, defaulting to `info`)
//! and a non-blocking file layer appending to the configured log path. The
//! returned guard must stay alive for the lifetime of the process or buffered
//! log lines are dropped on exit.

// std
use std::{fs, io::ErrorKind};
// crates.io
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, prelude::*};
// self
use crate::{_prelude::*, error::ConfigError};

const FILE_FILTER: &str = "info,oauth1_relay=debug";

/// Initializes the global tracing subscriber, logging to stderr and `log_path`.
pub fn init(log_path: &Path) -> Result<WorkerGuard, ConfigError> {
	let dir = log_path
		.parent()
		.filter(|parent| !parent.as_os_str().is_empty())
		.unwrap_or_else(|| Path::new("."));

	fs::create_dir_all(dir).map_err(|source| ConfigError::LogFile {
		path: log_path.display().to_string(),
		source,
	})?;

	let file_name = log_path.file_name().ok_or_else(|| ConfigError::LogFile {
		path: log_path.display().to_string(),
		source: std::io::Error::new(ErrorKind::InvalidInput, "log path has no file name"),
	})?;
	let appender = tracing_appender::rolling::never(dir, file_name);
	let (writer, guard) = tracing_appender::non_blocking(appender);

	tracing_subscriber::registry()
		.with(
			tracing_subscriber::fmt::layer().with_target(true).with_filter(
				EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
			),
		)
		.with(
			tracing_subscriber::fmt::layer()
				.with_ansi(false)
				.with_target(true)
				.with_writer(writer)
				.with_filter(EnvFilter::new(FILE_FILTER)),
		)
		.init();

	Ok(guard)
}
