pub mod config;
pub mod detection;
pub mod input;
pub mod models;
pub mod output;

// Re-export commonly used types
pub use models::{FinalReport, LogEvent, LoginRecord, ScanReport};
pub use detection::LineClassifier;
pub use input::{scan_reader, AsyncLogReader, InputError, LogReader};
pub use output::{OutputFormat, OutputHandler};
