//! A leveled message log with a transient status line.
//!
//! Everything here runs on the UI thread; the log is a plain owned value
//! that the application threads messages through and the status bar
//! renders each frame.

use std::collections::VecDeque;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LogLevel {
    Error,
    Warning,
    Note,
}

#[derive(Debug, Default)]
pub struct MessageLog {
    log: VecDeque<(String, LogLevel)>,
    status: Option<String>,
}

impl MessageLog {
    pub fn new() -> MessageLog {
        MessageLog {
            log: VecDeque::new(),
            status: None,
        }
    }

    pub fn log_count(&self) -> usize {
        self.log.len()
    }

    /// Index zero is the most recent message.
    pub fn get_log(&self, index: usize) -> Option<(String, LogLevel)> {
        self.log.get(index).cloned()
    }

    pub fn clear_log(&mut self) {
        self.log.clear()
    }

    pub fn log_error(&mut self, message: String) {
        self.log.push_front((message, LogLevel::Error));
    }

    pub fn log_warning(&mut self, message: String) {
        self.log.push_front((message, LogLevel::Warning));
    }

    pub fn log_note(&mut self, message: String) {
        self.log.push_front((message, LogLevel::Note));
    }

    /// The one-line status shown until the next update replaces it.
    pub fn set_status(&mut self, text: String) {
        self.status = Some(text);
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn most_recent_message_is_first() {
        let mut log = MessageLog::new();
        log.log_note("first".into());
        log.log_error("second".into());

        assert_eq!(log.log_count(), 2);
        assert_eq!(log.get_log(0), Some(("second".into(), LogLevel::Error)));
        assert_eq!(log.get_log(1), Some(("first".into(), LogLevel::Note)));
        assert_eq!(log.get_log(2), None);
    }

    #[test]
    fn clearing_the_log_keeps_the_status() {
        let mut log = MessageLog::new();
        log.log_warning("w".into());
        log.set_status("working".into());

        log.clear_log();

        assert_eq!(log.log_count(), 0);
        assert_eq!(log.status(), Some("working"));
    }

    #[test]
    fn status_replacement_and_clear() {
        let mut log = MessageLog::new();
        assert_eq!(log.status(), None);

        log.set_status("a".into());
        log.set_status("b".into());
        assert_eq!(log.status(), Some("b"));

        log.clear_status();
        assert_eq!(log.status(), None);
    }
}
