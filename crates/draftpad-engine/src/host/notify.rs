use std::rc::Rc;

use crate::editing::scheduler::Clock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
    /// When the notification disappears, in clock milliseconds
    pub expires_at: i64,
}

/// Transient user-visible messages.
pub trait Notifier {
    fn show(&mut self, message: &str, kind: NotificationKind);
}

/// Keeps the newest notification visible for a fixed time. Showing a new
/// one replaces the current one.
pub struct NotificationCenter {
    clock: Rc<dyn Clock>,
    duration_ms: i64,
    current: Option<Notification>,
}

impl NotificationCenter {
    pub const DEFAULT_DURATION_MS: u64 = 3000;

    pub fn new(clock: Rc<dyn Clock>, duration_ms: u64) -> Self {
        Self {
            clock,
            duration_ms: i64::try_from(duration_ms).unwrap_or(i64::MAX),
            current: None,
        }
    }

    /// The visible notification, if it has not expired yet
    pub fn visible(&mut self) -> Option<&Notification> {
        let now = self.clock.now_ms();
        if self.current.as_ref().is_some_and(|n| now >= n.expires_at) {
            self.current = None;
        }
        self.current.as_ref()
    }
}

impl Notifier for NotificationCenter {
    fn show(&mut self, message: &str, kind: NotificationKind) {
        match kind {
            NotificationKind::Error => log::error!("{message}"),
            NotificationKind::Success | NotificationKind::Info => log::info!("{message}"),
        }
        self.current = Some(Notification {
            message: message.to_string(),
            kind,
            expires_at: self.clock.now_ms().saturating_add(self.duration_ms),
        });
    }
}
