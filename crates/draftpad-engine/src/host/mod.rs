//! Host collaborators: notifications, clipboard writes and confirmation.
//!
//! The engine only talks to these through traits. Each comes with one small
//! implementation that the CLI and the tests use.

pub mod clipboard;
pub mod notify;

pub use clipboard::{ClipboardError, ClipboardWriter, CopyMethod, copy_content};
pub use notify::{Notification, NotificationCenter, NotificationKind, Notifier};

/// Asks the user a yes/no question.
pub trait ConfirmPrompt {
    fn confirm(&mut self, message: &str) -> bool;
}

impl<F> ConfirmPrompt for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, message: &str) -> bool {
        self(message)
    }
}
