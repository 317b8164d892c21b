//! Host-facing notifications emitted by the printer binding.
//!
//! Host UI frameworks typically surface generation outcomes as events on
//! the component that requested the print. The session calls an optional
//! notifier with one of these after every generation attempt.

/// Outcome notification for one generation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrintEvent {
    /// The output document was (re)built successfully.
    Generated,
    /// Generation failed; carries the rendered failure message.
    GenerateError { message: String },
}

/// Callback signature for host bindings that want notifications.
pub type Notifier = Box<dyn Fn(&PrintEvent) + Send + Sync>;
