//! Line sources for a scan
//!
//! A source is opened, read once from start to end, and closed. Open and
//! read failures are fatal to the scan; malformed lines are not.

pub mod file_reader;

pub use file_reader::{scan_reader, AsyncLogReader, LogReader};

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a scan
#[derive(Error, Debug)]
pub enum InputError {
    #[error("Cannot open log file {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error while reading log: {0}")]
    Read(#[from] std::io::Error),
}
