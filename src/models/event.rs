use serde::{Deserialize, Serialize};

/// Fields extracted from a single SSH login line
///
/// Field order is the serialized key order: `timestamp`, `user`, `ip`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRecord {
    /// Leading time field, verbatim from the source line
    pub timestamp: String,
    pub user: String,
    pub ip: String,
}

impl LoginRecord {
    pub fn new(timestamp: &str, user: &str, ip: &str) -> Self {
        LoginRecord {
            timestamp: timestamp.to_string(),
            user: user.to_string(),
            ip: ip.to_string(),
        }
    }
}

/// A classified SSH login event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEvent {
    /// Rejected authentication (wrong credentials or nonexistent user)
    FailedLogin(LoginRecord),
    /// Accepted authentication
    SuccessfulLogin(LoginRecord),
}

impl LogEvent {
    pub fn record(&self) -> &LoginRecord {
        match self {
            LogEvent::FailedLogin(record) | LogEvent::SuccessfulLogin(record) => record,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, LogEvent::FailedLogin(_))
    }
}
