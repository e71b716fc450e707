use crate::host::notify::{NotificationKind, Notifier};

pub const COPY_SUCCEEDED: &str = "Copied to clipboard";
pub const COPY_FAILED: &str = "Copy failed, please select the text manually";

#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    #[error("clipboard method not available")]
    Unavailable,
    #[error("clipboard write rejected: {0}")]
    Rejected(String),
}

/// Clipboard write paths, from richest to most basic.
pub trait ClipboardWriter {
    /// Write markup together with its plain-text alternative
    fn write_rich(&mut self, html: &str, text: &str) -> Result<(), ClipboardError>;
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
    /// Last resort: select `text` and issue a copy command
    fn copy_selection(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// The write path that succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyMethod {
    Rich,
    Text,
    Selection,
}

/// Copy `html` and `text`, falling back through the writer's paths in
/// order. Success or final failure is reported through `notifier`.
pub fn copy_content(
    clipboard: &mut dyn ClipboardWriter,
    notifier: &mut dyn Notifier,
    html: &str,
    text: &str,
) -> Option<CopyMethod> {
    let method = match clipboard.write_rich(html, text) {
        Ok(()) => Some(CopyMethod::Rich),
        Err(rich) => {
            log::debug!("Rich clipboard write failed: {rich}");
            match clipboard.write_text(text) {
                Ok(()) => Some(CopyMethod::Text),
                Err(plain) => {
                    log::debug!("Plain clipboard write failed: {plain}");
                    match clipboard.copy_selection(text) {
                        Ok(()) => Some(CopyMethod::Selection),
                        Err(selection) => {
                            log::warn!("Every clipboard write failed, last error: {selection}");
                            None
                        }
                    }
                }
            }
        }
    };

    match method {
        Some(_) => notifier.show(COPY_SUCCEEDED, NotificationKind::Success),
        None => notifier.show(COPY_FAILED, NotificationKind::Error),
    }
    method
}
