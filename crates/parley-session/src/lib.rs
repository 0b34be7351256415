//! Conversation session core for Parley.
//!
//! Owns the message transcript, reconciles the input modalities (typed
//! text, speech transcripts, staged files), and drives the single-flight
//! request/response lifecycle against the remote answering service.
//! Presentation layers render what this crate produces and call back into
//! the handful of entry points on [`SessionController`].

pub mod controller;
pub mod error;
pub mod transcript;
pub mod voice;

pub use controller::SessionController;
pub use error::SessionError;
pub use transcript::Transcript;
pub use voice::{ListenOutcome, RecognizerProvider, SpeechRecognizer, UnsupportedProvider, VoiceError};
