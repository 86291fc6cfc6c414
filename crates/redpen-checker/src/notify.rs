//! User-visible failure notifications raised by the pipeline.
//!
//! Hosts implement [`Notifier`] to route messages to their notification
//! area. [`NotificationLog`] records them for hosts that print them later
//! and [`TracingNotifier`] forwards them to `tracing`.

use std::cell::RefCell;

use serde::Serialize;
use tracing::error;

const NOTIFY_TARGET: &str = "redpen_checker::notify";

/// Sink for user-visible messages.
pub trait Notifier {
    /// Reports a failure; `detail` carries captured tool output if any.
    fn error(&self, message: &str, detail: Option<&str>);
}

/// A recorded notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    /// Headline.
    pub message: String,
    /// Captured tool output, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Notifier that keeps every message in memory.
#[derive(Debug, Default)]
pub struct NotificationLog {
    entries: RefCell<Vec<Notification>>,
}

impl NotificationLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns the recorded notifications.
    pub fn take(&self) -> Vec<Notification> {
        self.entries.take()
    }

    /// Returns whether any error has been recorded.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.entries.borrow().is_empty()
    }
}

impl Notifier for NotificationLog {
    fn error(&self, message: &str, detail: Option<&str>) {
        self.entries.borrow_mut().push(Notification {
            message: message.to_owned(),
            detail: detail.map(str::to_owned),
        });
    }
}

/// Notifier that emits `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn error(&self, message: &str, detail: Option<&str>) {
        error!(target: NOTIFY_TARGET, detail = detail.unwrap_or_default(), "{message}");
    }
}
