pub mod event;
pub mod report;

pub use event::{LogEvent, LoginRecord};
pub use report::{FinalReport, ScanReport};
