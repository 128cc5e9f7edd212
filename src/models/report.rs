//! Result aggregation for a single scan
//!
//! `ScanReport` collects classified events in scan order while the scan is
//! running. `finalize` freezes it into a `FinalReport`, which is the only
//! form handed to output sinks.

use serde::Serialize;
use super::{LogEvent, LoginRecord};

/// In-progress aggregate of all events found during one scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    failed_logins: Vec<LoginRecord>,
    successful_logins: Vec<LoginRecord>,
}

impl ScanReport {
    /// Create an empty report
    pub fn new() -> Self {
        ScanReport {
            failed_logins: Vec::new(),
            successful_logins: Vec::new(),
        }
    }

    /// Append an event to the collection matching its variant
    ///
    /// Duplicates are kept; log lines are not assumed to be unique.
    pub fn record(&mut self, event: LogEvent) {
        match event {
            LogEvent::FailedLogin(record) => self.failed_logins.push(record),
            LogEvent::SuccessfulLogin(record) => self.successful_logins.push(record),
        }
    }

    /// Append the events of a report built from a later chunk of the same source
    ///
    /// Merging chunk reports in chunk order yields the same report as a
    /// single sequential scan.
    pub fn merge(&mut self, other: ScanReport) {
        self.failed_logins.extend(other.failed_logins);
        self.successful_logins.extend(other.successful_logins);
    }

    pub fn failed_logins(&self) -> &[LoginRecord] {
        &self.failed_logins
    }

    pub fn successful_logins(&self) -> &[LoginRecord] {
        &self.successful_logins
    }

    /// Total number of recorded events
    pub fn len(&self) -> usize {
        self.failed_logins.len() + self.successful_logins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Freeze the report for serialization
    pub fn finalize(self) -> FinalReport {
        FinalReport {
            failed_logins: self.failed_logins,
            successful_logins: self.successful_logins,
        }
    }
}

/// Completed scan report
///
/// Both keys are always serialized, as empty arrays when nothing matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinalReport {
    failed_logins: Vec<LoginRecord>,
    successful_logins: Vec<LoginRecord>,
}

impl FinalReport {
    pub fn failed_logins(&self) -> &[LoginRecord] {
        &self.failed_logins
    }

    pub fn successful_logins(&self) -> &[LoginRecord] {
        &self.successful_logins
    }
}
