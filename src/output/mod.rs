use crate::models::{FinalReport, LoginRecord};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File names written by `OutputHandler::write_split`
pub const FAILED_LOGINS_FILE: &str = "failed_logins.json";
pub const SUCCESSFUL_LOGINS_FILE: &str = "successful_logins.json";

/// Errors that can occur while writing a report
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Output handler for finished scan reports
pub struct OutputHandler {
    format: OutputFormat,
    writer: Option<Box<dyn Write + Send>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Jsonl,
    Console,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => OutputFormat::Json,
            "jsonl" => OutputFormat::Jsonl,
            "console" => OutputFormat::Console,
            _ => OutputFormat::Json, // Default
        }
    }
}

impl OutputHandler {
    /// Create a new output handler writing to `file_path`, or stdout when `None`
    ///
    /// An existing file is truncated.
    pub fn new(format: OutputFormat, file_path: Option<PathBuf>) -> Result<Self, OutputError> {
        let writer: Option<Box<dyn Write + Send>> = match file_path {
            Some(path) => {
                let file = File::create(path)?;
                Some(Box::new(BufWriter::new(file)))
            }
            None => None,
        };

        Ok(OutputHandler { format, writer })
    }

    /// Create a handler over an arbitrary writer
    pub fn with_writer(format: OutputFormat, writer: Box<dyn Write + Send>) -> Self {
        OutputHandler {
            format,
            writer: Some(writer),
        }
    }

    /// Write a finished report in the configured format
    pub fn write_report(&mut self, report: &FinalReport) -> Result<(), OutputError> {
        let output = match &self.format {
            OutputFormat::Json => format!("{}\n", serde_json::to_string_pretty(report)?),
            OutputFormat::Jsonl => format!("{}\n", serde_json::to_string(report)?),
            OutputFormat::Console => render_console(report),
        };
        self.write_output(&output)
    }

    fn write_output(&mut self, data: &str) -> Result<(), OutputError> {
        match &mut self.writer {
            Some(writer) => {
                writer.write_all(data.as_bytes())?;
                writer.flush()?;
            }
            None => {
                let stdout = std::io::stdout();
                let mut lock = stdout.lock();
                lock.write_all(data.as_bytes())?;
                lock.flush()?;
            }
        }
        Ok(())
    }

    /// Write `failed_logins.json` and `successful_logins.json` into `dir`
    ///
    /// Each file holds a pretty-printed array of events. Returns the paths written.
    pub fn write_split(report: &FinalReport, dir: &Path) -> Result<(PathBuf, PathBuf), OutputError> {
        fs::create_dir_all(dir)?;

        let failed_path = dir.join(FAILED_LOGINS_FILE);
        let successful_path = dir.join(SUCCESSFUL_LOGINS_FILE);

        write_records(&failed_path, report.failed_logins())?;
        write_records(&successful_path, report.successful_logins())?;

        Ok((failed_path, successful_path))
    }

    /// Flush any buffered output
    pub fn flush(&mut self) -> Result<(), OutputError> {
        if let Some(writer) = &mut self.writer {
            writer.flush()?;
        }
        Ok(())
    }
}

fn write_records(path: &Path, records: &[LoginRecord]) -> Result<(), OutputError> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

fn render_console(report: &FinalReport) -> String {
    let mut output = format!("Failed login attempts found: {}\n", report.failed_logins().len());
    for record in report.failed_logins() {
        output.push_str(&format!("User: {}, IP: {}\n", record.user, record.ip));
    }

    output.push_str(&format!(
        "\nSuccessful login attempts found: {}\n",
        report.successful_logins().len()
    ));
    for record in report.successful_logins() {
        output.push_str(&format!("User: {}, IP: {}\n", record.user, record.ip));
    }
    output
}
