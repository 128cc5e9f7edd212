use crate::detection::LineClassifier;
use crate::models::ScanReport;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use super::InputError;

/// Reads an auth log file once, start to end, and classifies every line
pub struct LogReader {
    file_path: PathBuf,
    lines_read: u64,
}

impl LogReader {
    /// Create a new reader for the given path
    pub fn new(file_path: PathBuf) -> Self {
        LogReader {
            file_path,
            lines_read: 0,
        }
    }

    /// Scan the whole file into a report
    ///
    /// The file is opened here and closed when this returns, on success or
    /// error. A failure to open or read is fatal; no partial report is
    /// returned.
    pub fn scan(&mut self, classifier: &LineClassifier) -> Result<ScanReport, InputError> {
        let file = File::open(&self.file_path).map_err(|source| InputError::Open {
            path: self.file_path.clone(),
            source,
        })?;
        log::debug!("Opened log file {:?}", self.file_path);

        let mut reader = BufReader::new(file);
        self.lines_read = 0;
        let report = scan_buffered(&mut reader, classifier, &mut self.lines_read)?;

        log::debug!(
            "Finished {:?}: {} line(s), {} event(s)",
            self.file_path,
            self.lines_read,
            report.len()
        );
        Ok(report)
    }

    /// Number of lines consumed by the last scan
    pub fn lines_read(&self) -> u64 {
        self.lines_read
    }

    pub fn file_path(&self) -> &PathBuf {
        &self.file_path
    }
}

/// Scan any buffered line source (stdin, a pipe, an in-memory buffer)
pub fn scan_reader<R: BufRead>(
    mut reader: R,
    classifier: &LineClassifier,
) -> Result<ScanReport, InputError> {
    let mut lines_read = 0;
    scan_buffered(&mut reader, classifier, &mut lines_read)
}

fn scan_buffered<R: BufRead>(
    reader: &mut R,
    classifier: &LineClassifier,
    lines_read: &mut u64,
) -> Result<ScanReport, InputError> {
    let mut report = ScanReport::new();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let bytes_read = reader.read_until(b'\n', &mut buf)?;
        if bytes_read == 0 {
            break; // EOF
        }
        *lines_read += 1;

        let line = String::from_utf8_lossy(trim_line_end(&buf));
        if let Some(event) = classifier.classify(&line) {
            report.record(event);
        }
    }

    Ok(report)
}

/// Strip a trailing `\n` or `\r\n`
pub(crate) fn trim_line_end(buf: &[u8]) -> &[u8] {
    let buf = buf.strip_suffix(b"\n").unwrap_or(buf);
    buf.strip_suffix(b"\r").unwrap_or(buf)
}

// ============================================
// Async Log Reader
// ============================================

use tokio::fs::File as AsyncFile;
use tokio::io::{AsyncBufReadExt, BufReader as AsyncBufReader};

/// Async version of LogReader for use inside a tokio runtime
///
/// Still a single sequential pass; only the file I/O is async.
pub struct AsyncLogReader {
    file_path: PathBuf,
    lines_read: u64,
}

impl AsyncLogReader {
    /// Create a new async reader for the given path
    pub fn new(file_path: PathBuf) -> Self {
        AsyncLogReader {
            file_path,
            lines_read: 0,
        }
    }

    /// Scan the whole file into a report (same semantics as `LogReader::scan`)
    pub async fn scan(&mut self, classifier: &LineClassifier) -> Result<ScanReport, InputError> {
        let file = AsyncFile::open(&self.file_path)
            .await
            .map_err(|source| InputError::Open {
                path: self.file_path.clone(),
                source,
            })?;
        let mut reader = AsyncBufReader::new(file);

        log::debug!("Async scan started for {:?}", self.file_path);

        let mut report = ScanReport::new();
        let mut buf = Vec::new();
        self.lines_read = 0;

        loop {
            buf.clear();
            let bytes_read = reader.read_until(b'\n', &mut buf).await?;
            if bytes_read == 0 {
                break;
            }
            self.lines_read += 1;

            let line = String::from_utf8_lossy(trim_line_end(&buf));
            if let Some(event) = classifier.classify(&line) {
                report.record(event);
            }
        }

        log::debug!(
            "Async scan finished for {:?}: {} line(s), {} event(s)",
            self.file_path,
            self.lines_read,
            report.len()
        );
        Ok(report)
    }

    /// Number of lines consumed by the last scan
    pub fn lines_read(&self) -> u64 {
        self.lines_read
    }
}
