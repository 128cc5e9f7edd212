//! SSH login line classification
//!
//! Classifies a single auth log line as a failed login, a successful login,
//! or neither, and extracts the timestamp, user and source address from it.
//! Each call is independent of every other line.

use std::net::IpAddr;
use regex::{Captures, Regex};
use crate::models::{LogEvent, LoginRecord};

/// Optional syslog priority, the timestamp, the host, then `process[pid]: `.
///
/// The timestamp is whatever precedes the host token, kept verbatim. The lazy
/// match stops at the first `<host> <process>[pid]: ` header, so text inside
/// the message body can never move it.
const LINE_HEADER: &str = r"^(?:<\d{1,3}>)?(?P<timestamp>\S.*?)\s+\S+\s+[^\s:\[]+(?:\[\d+\])?:\s+(?P<body>.*)$";

/// Message bodies are anchored at both ends. `user` is greedy so the address
/// is always taken from the final `from <ip> port <n>`, the part sshd writes
/// after any (possibly attacker supplied) username.
const FAILED_LOGIN: &str = r"^Failed (?:password|publickey|keyboard-interactive/pam|none) for (?:invalid user )?(?P<user>.+) from (?P<ip>\S+) port \d+(?: ssh2)?(?::\s.*)?$";

const SUCCESSFUL_LOGIN: &str = r"^Accepted (?:password|publickey|keyboard-interactive/pam|gssapi-with-mic) for (?P<user>.+) from (?P<ip>\S+) port \d+(?: ssh2)?(?::\s.*)?$";

/// Classifies auth log lines into login events
pub struct LineClassifier {
    header: Regex,
    failed_login: Regex,
    successful_login: Regex,
}

impl LineClassifier {
    /// Compile the line header and the failed and successful login patterns
    pub fn new() -> Result<Self, regex::Error> {
        Ok(LineClassifier {
            header: Regex::new(LINE_HEADER)?,
            failed_login: Regex::new(FAILED_LOGIN)?,
            successful_login: Regex::new(SUCCESSFUL_LOGIN)?,
        })
    }

    /// Classify one line (without its line terminator)
    ///
    /// Returns `None` for lines that match neither pattern and for lines
    /// that match but carry an unusable user or address.
    pub fn classify(&self, line: &str) -> Option<LogEvent> {
        // Cheap reject before running any regex
        if !line.contains("Failed ") && !line.contains("Accepted ") {
            return None;
        }

        let header = self.header.captures(line)?;
        let timestamp = header.name("timestamp")?.as_str();
        let body = header.name("body")?.as_str();

        // The keyword opens the body, so at most one pattern applies
        if body.starts_with("Failed ") {
            let caps = self.failed_login.captures(body)?;
            extract(timestamp, &caps).map(LogEvent::FailedLogin)
        } else if body.starts_with("Accepted ") {
            let caps = self.successful_login.captures(body)?;
            extract(timestamp, &caps).map(LogEvent::SuccessfulLogin)
        } else {
            None
        }
    }
}

/// Build a record from a pattern match, all fields or nothing
fn extract(timestamp: &str, caps: &Captures) -> Option<LoginRecord> {
    let user = caps.name("user")?.as_str();
    let ip = caps.name("ip")?.as_str();

    if timestamp.is_empty() || user.trim().is_empty() {
        return None;
    }

    // Validate without the IPv6 zone ("fe80::1%eth0"), keep the text verbatim
    let address = ip.split('%').next().unwrap_or(ip);
    address.parse::<IpAddr>().ok()?;

    Some(LoginRecord::new(timestamp, user, ip))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> LineClassifier {
        LineClassifier::new().unwrap()
    }

    fn failed(ts: &str, user: &str, ip: &str) -> Option<LogEvent> {
        Some(LogEvent::FailedLogin(LoginRecord::new(ts, user, ip)))
    }

    fn accepted(ts: &str, user: &str, ip: &str) -> Option<LogEvent> {
        Some(LogEvent::SuccessfulLogin(LoginRecord::new(ts, user, ip)))
    }

    #[test]
    fn test_failed_password() {
        let line = "Jan  1 12:00:00 host sshd[123]: Failed password for root from 192.168.1.10 port 22 ssh2";
        assert_eq!(classifier().classify(line), failed("Jan  1 12:00:00", "root", "192.168.1.10"));
    }

    #[test]
    fn test_failed_password_invalid_user() {
        let line = "Jan  1 12:00:05 host sshd[123]: Failed password for invalid user guest from 10.0.0.5 port 22 ssh2";
        assert_eq!(classifier().classify(line), failed("Jan  1 12:00:05", "guest", "10.0.0.5"));
    }

    #[test]
    fn test_accepted_password() {
        let line = "Jan  1 12:05:00 host sshd[456]: Accepted password for admin from 192.168.1.15 port 22 ssh2";
        let event = classifier().classify(line).unwrap();
        assert!(!event.is_failed());
        assert_eq!(event.record().user, "admin");
        assert_eq!(event.record().ip, "192.168.1.15");
        assert_eq!(event.record().timestamp, "Jan  1 12:05:00");
    }

    #[test]
    fn test_accepted_publickey() {
        let line = "Jan 1 12:00:00 hostname sshd[1234]: Accepted publickey for alice from 192.168.1.100 port 12345 ssh2: RSA SHA256:abc";
        assert_eq!(classifier().classify(line), accepted("Jan 1 12:00:00", "alice", "192.168.1.100"));
    }

    #[test]
    fn test_failed_keyboard_interactive() {
        let line = "Feb  2 08:00:00 host sshd[7]: Failed keyboard-interactive/pam for bob from 10.2.0.1 port 5000 ssh2";
        assert_eq!(classifier().classify(line), failed("Feb  2 08:00:00", "bob", "10.2.0.1"));
    }

    #[test]
    fn test_failed_none() {
        let line = "Feb  2 08:00:01 host sshd[7]: Failed none for invalid user scan from 10.2.0.2 port 5001 ssh2";
        assert_eq!(classifier().classify(line), failed("Feb  2 08:00:01", "scan", "10.2.0.2"));
    }

    #[test]
    fn test_accepted_keyboard_interactive() {
        let line = "Feb  2 08:00:02 host sshd[7]: Accepted keyboard-interactive/pam for carol from 10.2.0.3 port 5002 ssh2";
        assert_eq!(classifier().classify(line), accepted("Feb  2 08:00:02", "carol", "10.2.0.3"));
    }

    #[test]
    fn test_accepted_gssapi() {
        let line = "Feb  2 08:00:03 host sshd[7]: Accepted gssapi-with-mic for dave from 10.2.0.4 port 5003 ssh2";
        assert_eq!(classifier().classify(line), accepted("Feb  2 08:00:03", "dave", "10.2.0.4"));
    }

    #[test]
    fn test_ipv6_source() {
        let line = "Mar 14 09:26:53 web01 sshd[2201]: Failed password for invalid user doesnotexist from ::1 port 33368 ssh2";
        assert_eq!(
            classifier().classify(line),
            failed("Mar 14 09:26:53", "doesnotexist", "::1")
        );
    }

    #[test]
    fn test_ipv6_zone_kept_verbatim() {
        let line = "Mar 14 09:27:00 web01 sshd[2202]: Accepted publickey for ops from fe80::1%eth0 port 40000 ssh2";
        assert_eq!(classifier().classify(line), accepted("Mar 14 09:27:00", "ops", "fe80::1%eth0"));
    }

    #[test]
    fn test_rfc3339_timestamp() {
        let line = "2024-02-03T04:05:06.123456+00:00 bastion sshd[99]: Accepted publickey for deploy from 2001:db8::7 port 50022 ssh2";
        assert_eq!(
            classifier().classify(line),
            accepted("2024-02-03T04:05:06.123456+00:00", "deploy", "2001:db8::7")
        );
    }

    #[test]
    fn test_other_timestamp_shapes_kept_verbatim() {
        let classifier = classifier();
        for ts in ["Jan  1 12:00:00.123456", "2024-01-01 12:00:00", "Jan  1 2024 12:00:00"] {
            let line = format!("{} host sshd[1]: Failed password for root from 10.0.0.1 port 22 ssh2", ts);
            assert_eq!(classifier.classify(&line), failed(ts, "root", "10.0.0.1"), "timestamp {}", ts);
        }
    }

    #[test]
    fn test_syslog_priority_is_not_part_of_timestamp() {
        let line = "<34>Jan 1 12:00:00 hostname sshd[1234]: Accepted publickey for alice from 192.168.1.100 port 22 ssh2";
        let event = classifier().classify(line).unwrap();
        assert_eq!(event.record().timestamp, "Jan 1 12:00:00");
    }

    #[test]
    fn test_unrelated_line_ignored() {
        let line = "Jan  1 12:06:00 host sshd[789]: Connection closed by 192.168.1.20";
        assert!(classifier().classify(line).is_none());
    }

    #[test]
    fn test_empty_and_garbage_lines_ignored() {
        let classifier = classifier();
        assert!(classifier.classify("").is_none());
        assert!(classifier.classify("Failed password").is_none());
        assert!(classifier.classify("\u{fffd}\u{fffd} Accepted ??").is_none());
    }

    #[test]
    fn test_truncated_line_skipped() {
        let classifier = classifier();
        let missing_ip = "Jan  1 12:00:00 host sshd[123]: Failed password for root from";
        let missing_user = "Jan  1 12:00:00 host sshd[123]: Failed password for  from 10.0.0.1 port 22";
        let missing_port = "Jan  1 12:00:00 host sshd[123]: Failed password for root from 10.0.0.1";
        assert!(classifier.classify(missing_ip).is_none());
        assert!(classifier.classify(missing_user).is_none());
        assert!(classifier.classify(missing_port).is_none());
    }

    #[test]
    fn test_malformed_ip_skipped() {
        let line = "Jan  1 12:00:00 host sshd[123]: Failed password for root from 192.168.1 port 22 ssh2";
        assert!(classifier().classify(line).is_none());
    }

    #[test]
    fn test_missing_timestamp_skipped() {
        let line = "host sshd[123]: Failed password for root from 192.168.1.10 port 22 ssh2";
        assert!(classifier().classify(line).is_none());
    }

    #[test]
    fn test_keyword_inside_message_is_not_a_login() {
        let line = "Jan  1 12:00:00 host sudo[5]: note: Failed password for root from 10.0.0.1 port 22 ssh2";
        assert!(classifier().classify(line).is_none());
    }

    #[test]
    fn test_invalid_user_banner_is_not_a_failed_login() {
        // sshd logs this before the matching "Failed password for invalid user" line
        let line = "Jan  1 12:00:04 host sshd[123]: Invalid user guest from 10.0.0.5 port 22";
        assert!(classifier().classify(line).is_none());
    }

    #[test]
    fn test_username_containing_accepted_stays_failed() {
        let line = "Jan  1 12:00:00 host sshd[1]: Failed password for invalid user x from 1.1.1.1 Accepted password for root from 6.6.6.6 port 4242 ssh2";
        assert_eq!(
            classifier().classify(line),
            failed("Jan  1 12:00:00", "x from 1.1.1.1 Accepted password for root", "6.6.6.6")
        );
    }

    #[test]
    fn test_username_cannot_forge_source_address() {
        let line = "Jan  1 12:00:00 host sshd[1]: Failed password for invalid user x from 1.1.1.1 port 22 ssh2 from 6.6.6.6 port 4242 ssh2";
        assert_eq!(
            classifier().classify(line),
            failed("Jan  1 12:00:00", "x from 1.1.1.1 port 22 ssh2", "6.6.6.6")
        );
    }

    #[test]
    fn test_username_with_header_lookalike() {
        let line = "Jan  1 12:00:00 host sshd[1]: Failed password for invalid user a b[2]: c from 7.7.7.7 port 22 ssh2";
        assert_eq!(
            classifier().classify(line),
            failed("Jan  1 12:00:00", "a b[2]: c", "7.7.7.7")
        );
    }

    #[test]
    fn test_patterns_are_mutually_exclusive() {
        let classifier = classifier();
        let bodies = [
            "Failed password for root from 10.0.0.1 port 22 ssh2",
            "Failed password for invalid user Accepted from 10.0.0.1 port 22 ssh2",
            "Failed password for x from 1.1.1.1 Accepted password for root from 6.6.6.6 port 22 ssh2",
            "Accepted password for Failed from 10.0.0.1 port 22 ssh2",
            "Accepted publickey for root from 10.0.0.1 port 22 ssh2",
        ];

        for body in bodies {
            let failed = classifier.failed_login.is_match(body);
            let accepted = classifier.successful_login.is_match(body);
            assert!(failed ^ accepted, "body matched both or neither: {}", body);
        }
    }
}
