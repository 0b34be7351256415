//! Error types for the session controller.

use parley_core::ParleyError;

/// Rejections and capability failures surfaced by the session controller.
///
/// None of these are fatal: `EmptyDraft` and `SendInFlight` reject a single
/// call and leave the session untouched, `VoiceUnavailable` is shown to the
/// user as an inline notice.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("draft input is empty")]
    EmptyDraft,
    #[error("a send is already in flight")]
    SendInFlight,
    #[error("speech recognition is not available on this platform")]
    VoiceUnavailable,
}

impl From<SessionError> for ParleyError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::VoiceUnavailable => ParleyError::Voice(err.to_string()),
            other => ParleyError::Session(other.to_string()),
        }
    }
}
