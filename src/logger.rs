use chrono::{SecondsFormat, Utc};
use serde_json::{json, Map, Value};
use std::cell::Cell;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Appends one JSON object per line to `LogPath`, when configured.
///
/// Every entry carries `at` (UTC, RFC 3339) and `event`; the remaining keys
/// depend on the event. The first I/O failure is reported on stderr and turns
/// the logger off for the rest of the process.
#[derive(Debug)]
pub(crate) struct Logger {
    path: Option<PathBuf>,
    broken: Cell<bool>,
}

impl Logger {
    pub(crate) fn new(path: Option<PathBuf>) -> Self {
        Self {
            path,
            broken: Cell::new(false),
        }
    }

    pub(crate) fn transition(&self, verb: &str) {
        self.record("transition", json!({ "verb": verb }));
    }

    pub(crate) fn git(&self, args: &[String], exit_code: i32) {
        self.record("git", json!({ "args": args, "exit_code": exit_code }));
    }

    pub(crate) fn git_error(&self, args: &[String], error: &str) {
        self.record("git", json!({ "args": args, "error": error }));
    }

    pub(crate) fn quit(&self, reason: &str, code: i32) {
        self.record("quit", json!({ "reason": reason, "code": code }));
    }

    /// Writes `event` with the keys of `fields`, which must be a JSON object.
    pub(crate) fn record(&self, event: &str, fields: Value) {
        let Some(path) = &self.path else {
            return;
        };
        if self.broken.get() {
            return;
        }
        let mut entry = Map::new();
        entry.insert(
            "at".to_string(),
            Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)),
        );
        entry.insert("event".to_string(), Value::String(event.to_string()));
        if let Value::Object(fields) = fields {
            entry.extend(fields);
        }
        let mut line = Value::Object(entry).to_string();
        line.push('\n');

        let appended = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .and_then(|mut file| file.write_all(line.as_bytes()));
        if let Err(err) = appended {
            self.give_up(path, &err);
        }
    }

    fn give_up(&self, path: &Path, err: &std::io::Error) {
        if self.broken.replace(true) {
            return;
        }
        eprintln!(
            "mob: cannot write log file {} ({}), logging is off",
            path.display(),
            err
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entries(path: &Path) -> Vec<Value> {
        fs::read_to_string(path)
            .expect("read log")
            .lines()
            .map(|line| serde_json::from_str(line).expect("json line"))
            .collect()
    }

    #[test]
    fn git_calls_keep_arguments_as_a_list() {
        let temp = TempDir::new().expect("temp dir");
        let path = temp.path().join("mob.log");
        let logger = Logger::new(Some(path.clone()));

        logger.transition("next");
        let args = vec![
            "commit".to_string(),
            "--message".to_string(),
            "mob next [ci-skip]\nsecond line".to_string(),
        ];
        logger.git(&args, 0);

        let entries = entries(&path);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["event"], "transition");
        assert_eq!(entries[0]["verb"], "next");
        assert_eq!(entries[1]["event"], "git");
        assert_eq!(entries[1]["args"][2], "mob next [ci-skip]\nsecond line");
        assert_eq!(entries[1]["exit_code"], 0);
        let at = entries[1]["at"].as_str().expect("timestamp");
        assert!(at.ends_with('Z'), "expected UTC timestamp, got {at}");
    }

    #[test]
    fn quit_records_reason_and_code() {
        let temp = TempDir::new().expect("temp dir");
        let path = temp.path().join("mob.log");
        let logger = Logger::new(Some(path.clone()));

        logger.quit("git_failed:push origin mob-session", 1);

        let entries = entries(&path);
        assert_eq!(entries[0]["reason"], "git_failed:push origin mob-session");
        assert_eq!(entries[0]["code"], 1);
    }

    #[test]
    fn stops_after_first_failure() {
        let temp = TempDir::new().expect("temp dir");
        let dir = temp.path().join("missing");
        let path = dir.join("mob.log");
        let logger = Logger::new(Some(path.clone()));

        logger.transition("start");
        fs::create_dir(&dir).expect("create dir");
        logger.transition("next");

        assert!(!path.exists(), "logger should stay off after an error");
    }

    #[test]
    fn without_path_nothing_is_written() {
        let logger = Logger::new(None);
        logger.transition("status");
        assert!(!logger.broken.get());
    }
}
