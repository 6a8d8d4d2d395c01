//! User-facing notices
//!
//! The wizard core never renders dialogs. Every message a user should
//! see goes through [`Reporter::notify`] as a [`Notice`]; the frontend
//! decides how to present it.

use async_channel::{Receiver, Sender};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// One user-visible message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub title: String,
    pub body: String,
}

impl Notice {
    pub fn info(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            title: title.into(),
            body: body.into(),
        }
    }

    pub fn warning(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            title: title.into(),
            body: body.into(),
        }
    }

    pub fn error(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            title: title.into(),
            body: body.into(),
        }
    }
}

/// Sink for user-visible notices
pub trait Reporter: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Reporter that forwards notices over a channel
///
/// Frontends receive on the async side from their event loop while
/// pipeline code sends from blocking or async contexts alike.
pub struct ChannelReporter {
    sender: Sender<Notice>,
}

impl ChannelReporter {
    pub fn new() -> (Self, Receiver<Notice>) {
        let (sender, receiver) = async_channel::unbounded();
        (Self { sender }, receiver)
    }
}

impl Reporter for ChannelReporter {
    fn notify(&self, notice: Notice) {
        if let Err(err) = self.sender.send_blocking(notice) {
            log::warn!("Dropping notice, no receiver attached: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_constructors() {
        let notice = Notice::warning("Backup", "Backup did not complete.");
        assert_eq!(notice.severity, Severity::Warning);
        assert_eq!(notice.title, "Backup");
        assert_eq!(notice.body, "Backup did not complete.");
    }

    #[test]
    fn test_channel_reporter_delivers_in_order() {
        let (reporter, receiver) = ChannelReporter::new();
        reporter.notify(Notice::info("Restore", "first"));
        reporter.notify(Notice::error("Restore", "second"));

        assert_eq!(receiver.recv_blocking().unwrap().body, "first");
        assert_eq!(receiver.recv_blocking().unwrap().body, "second");
    }
}
