//! Shopper-facing notification collaborator.
//!
//! The session reports outcomes (item added, order placed, validation
//! problems) through this trait instead of touching any UI directly.

/// Severity of a toast message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

/// Sink for transient shopper-facing messages.
pub trait Notifier: Send + Sync {
    /// Show a transient message. Implementations must not block.
    fn toast(&self, level: ToastLevel, message: &str);
}

/// A [`Notifier`] that discards everything; for headless use and tests
/// that do not assert on toasts.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn toast(&self, _level: ToastLevel, _message: &str) {}
}
