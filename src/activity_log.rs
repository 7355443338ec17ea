use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use chrono::{DateTime, FixedOffset};
use tracing::warn;

use crate::{MessageResult, StatusResult};

pub const STATUS_LOG: &str = "tweet.log";
pub const MESSAGE_LOG: &str = "dm.log";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

pub fn status_line(status: &StatusResult) -> String {
    format!("{} {}", timestamp(&status.created_at), status.text)
}

pub fn message_line(message: &MessageResult) -> String {
    format!(
        "{} {} {}",
        timestamp(&message.created_at),
        message.recipient_screen_name,
        message.text
    )
}

/// Appends `line` to `<work_dir>/<file_name>`. Failures are logged, not returned.
pub fn record(work_dir: &Path, file_name: &str, line: &str) {
    if let Err(e) = append(work_dir, file_name, line) {
        warn!(file = file_name, error = %e, "could not write to {}", file_name);
    }
}

fn append(work_dir: &Path, file_name: &str, line: &str) -> io::Result<()> {
    fs::create_dir_all(work_dir)?;
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(work_dir.join(file_name))?;
    writeln!(file, "{}", line)
}

fn timestamp(at: &DateTime<FixedOffset>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod test {
    use chrono::DateTime;
    use tempfile::tempdir;

    use super::*;

    fn at() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2013-05-01T12:34:56-04:00").unwrap()
    }

    #[test]
    fn formats_status_line() {
        let status = StatusResult {
            id: "1".to_string(),
            text: "herald:1.0 released!".to_string(),
            created_at: at(),
        };
        assert_eq!(
            status_line(&status),
            "2013-05-01T12:34:56-0400 herald:1.0 released!"
        );
    }

    #[test]
    fn formats_message_line() {
        let message = MessageResult {
            id: "2".to_string(),
            recipient_screen_name: "maintainer".to_string(),
            text: "shipped".to_string(),
            created_at: at(),
        };
        assert_eq!(
            message_line(&message),
            "2013-05-01T12:34:56-0400 maintainer shipped"
        );
    }

    #[test]
    fn appends_one_line_per_record() {
        let dir = tempdir().unwrap();
        record(dir.path(), STATUS_LOG, "first");
        record(dir.path(), STATUS_LOG, "second");
        let text = fs::read_to_string(dir.path().join(STATUS_LOG)).unwrap();
        assert_eq!(text, "first\nsecond\n");
    }

    #[test]
    fn unwritable_log_is_swallowed() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(MESSAGE_LOG)).unwrap();
        record(dir.path(), MESSAGE_LOG, "ignored");
        assert!(dir.path().join(MESSAGE_LOG).is_dir());
    }
}
