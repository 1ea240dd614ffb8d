//! Run logging.
//!
//! Every entry point installs one subscriber with two layers: a human
//! readable layer on stderr and a JSON layer appending to
//! `<log_dir>/<operation>-<YYYY-MM-DD>.log`, dated in UTC. The level filter
//! comes from `RUST_LOG` and defaults to `info`.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::{Dir, OpenOptions};
use chrono::NaiveDate;
use mockable::Clock;
use std::fs::File;
use std::io;
use std::sync::Mutex;
use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_FILTER: &str = "info";

/// Errors raised while setting up run logging.
#[derive(Debug, Error)]
pub enum JournalError {
    /// The log directory or file could not be opened.
    #[error("failed to open run log {path}: {source}")]
    Open {
        /// Path being opened.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        source: io::Error,
    },

    /// A global subscriber is already installed.
    #[error("failed to install log subscriber: {0}")]
    Install(String),
}

/// Returns the UTC calendar day used to name log files.
#[must_use]
pub fn log_day(clock: &impl Clock) -> NaiveDate {
    clock.utc().date_naive()
}

/// Returns the log file path for one operation on one day.
#[must_use]
pub fn log_path(log_dir: &Utf8Path, operation: &str, day: NaiveDate) -> Utf8PathBuf {
    log_dir.join(format!("{operation}-{}.log", day.format("%Y-%m-%d")))
}

/// Opens (creating as needed) the append-only log file for `operation`.
///
/// # Errors
///
/// Returns [`JournalError::Open`] when the directory cannot be created or
/// the file cannot be opened for appending.
pub fn open_log_file(
    log_dir: &Utf8Path,
    operation: &str,
    day: NaiveDate,
) -> Result<(Utf8PathBuf, File), JournalError> {
    let path = log_path(log_dir, operation, day);
    let open_err = |source| JournalError::Open {
        path: path.clone(),
        source,
    };
    Dir::create_ambient_dir_all(log_dir, ambient_authority()).map_err(open_err)?;
    let dir = Dir::open_ambient_dir(log_dir, ambient_authority()).map_err(open_err)?;
    let file_name = path.file_name().unwrap_or(operation);
    let file = dir
        .open_with(file_name, OpenOptions::new().append(true).create(true))
        .map_err(open_err)?;
    Ok((path, file.into_std()))
}

/// Installs the global subscriber for one run.
///
/// Returns the path of the JSON log file.
///
/// # Errors
///
/// Returns [`JournalError`] when the log file cannot be opened or a
/// subscriber is already installed.
pub fn init(
    log_dir: &Utf8Path,
    operation: &str,
    day: NaiveDate,
) -> Result<Utf8PathBuf, JournalError> {
    let (path, file) = open_log_file(log_dir, operation, day)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let console = fmt::layer().with_writer(io::stderr).with_target(false);
    let journal = fmt::layer()
        .json()
        .flatten_event(true)
        .with_current_span(false)
        .with_writer(Mutex::new(file));

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(journal)
        .try_init()
        .map_err(|err| JournalError::Install(err.to_string()))?;
    Ok(path)
}
