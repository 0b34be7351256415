//! Voice capture seam for the session controller.
//!
//! Speech-to-text engine internals are out of scope; a recognizer is a
//! capability that asynchronously yields one final transcript or fails.
//! Construction is expensive and stateful, so the controller builds the
//! handle once on first use and keeps it for the session lifetime.

use std::sync::Arc;

use async_trait::async_trait;

/// Errors from the voice capture capability.
#[derive(Debug, thiserror::Error)]
pub enum VoiceError {
    #[error("speech recognition is not supported on this platform")]
    Unavailable,
    #[error("recognition failed: {0}")]
    Recognition(String),
}

/// A single-shot speech recognition session.
///
/// One invocation captures one utterance (continuous capture and interim
/// results are suppressed) and resolves to the final transcript.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    async fn recognize(&self) -> Result<String, VoiceError>;
}

/// Builds the session-lifetime recognizer handle.
pub trait RecognizerProvider: Send + Sync {
    /// Whether the platform offers a recognition capability at all.
    fn is_available(&self) -> bool;

    /// Construct the recognizer. Called at most once per session; the
    /// controller caches and reuses the returned handle.
    fn create(&self) -> Result<Arc<dyn SpeechRecognizer>, VoiceError>;
}

/// Provider for platforms without speech recognition.
///
/// `start_listening` against this provider fails fast with a
/// capability-unavailable notice instead of crashing.
#[derive(Debug, Default)]
pub struct UnsupportedProvider;

impl RecognizerProvider for UnsupportedProvider {
    fn is_available(&self) -> bool {
        false
    }

    fn create(&self) -> Result<Arc<dyn SpeechRecognizer>, VoiceError> {
        Err(VoiceError::Unavailable)
    }
}

/// Result of one `start_listening` invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListenOutcome {
    /// A final transcript replaced the draft input.
    TranscriptApplied,
    /// A capture was already running; this call did nothing.
    AlreadyListening,
    /// Recognition produced no usable transcript; the draft is unchanged.
    NoTranscript,
}
