//! Session controller: the conversation state machine.
//!
//! Consumes capture-adapter output (typed text, speech transcripts, staged
//! files) and user intent, mutates the transcript, and drives the remote
//! exchange client. One send may be in flight at a time; voice capture and
//! feedback reporting run independently of the send window.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use parley_client::{ExchangeService, FeedbackReport};
use parley_core::config::ChatConfig;
use parley_core::{Message, Sentiment, StagedFile};
use uuid::Uuid;

use crate::error::SessionError;
use crate::transcript::Transcript;
use crate::voice::{ListenOutcome, RecognizerProvider, SpeechRecognizer, VoiceError};

/// Session state mutated under one lock so a send's precondition check,
/// user-message append, and pending-window open are a single atomic step.
struct SessionState {
    transcript: Transcript,
    draft: String,
    pending_attachment: Option<StagedFile>,
    awaiting_reply: bool,
}

/// Orchestrator for one widget-lifetime conversation session.
///
/// All entry points take `&self`; interior mutability lets voice capture
/// overlap an in-flight send without either blocking the other. The state
/// lock is never held across an `await`.
pub struct SessionController {
    service: Arc<dyn ExchangeService>,
    provider: Box<dyn RecognizerProvider>,
    chat: ChatConfig,
    state: Mutex<SessionState>,
    listening: AtomicBool,
    recognizer: Mutex<Option<Arc<dyn SpeechRecognizer>>>,
}

impl SessionController {
    /// Create a session seeded with the greeting bot message.
    pub fn new(
        service: Arc<dyn ExchangeService>,
        provider: Box<dyn RecognizerProvider>,
        chat: ChatConfig,
    ) -> Self {
        let mut transcript = Transcript::new();
        transcript.append(Message::bot(chat.greeting.clone(), None));
        Self {
            service,
            provider,
            chat,
            state: Mutex::new(SessionState {
                transcript,
                draft: String::new(),
                pending_attachment: None,
                awaiting_reply: false,
            }),
            listening: AtomicBool::new(false),
            recognizer: Mutex::new(None),
        }
    }

    // -- Capture adapters --

    /// Replace the uncommitted draft text (one call per keystroke).
    pub fn set_draft(&self, text: impl Into<String>) {
        let mut state = self.state.lock().expect("session state mutex poisoned");
        state.draft = text.into();
    }

    /// Current uncommitted draft text.
    pub fn draft(&self) -> String {
        let state = self.state.lock().expect("session state mutex poisoned");
        state.draft.clone()
    }

    /// Stage a file for the next send, replacing any previously staged file,
    /// and record the upload intent in the transcript.
    pub fn stage_file(&self, file: StagedFile) {
        let mut state = self.state.lock().expect("session state mutex poisoned");
        if let Some(ref previous) = state.pending_attachment {
            tracing::debug!(replaced = %previous.name, "Replacing previously staged file");
        }
        state
            .transcript
            .append(Message::user(format!("Attached file: {}", file.name)));
        state.pending_attachment = Some(file);
    }

    /// Capture one utterance and replace the draft with its transcript.
    ///
    /// Fails fast when the platform has no recognition capability. A second
    /// call while already listening is a no-op, and a recognition failure
    /// leaves the draft unchanged; neither is fatal. The recognizer handle
    /// is built on first use and reused for the rest of the session.
    pub async fn start_listening(&self) -> Result<ListenOutcome, SessionError> {
        if !self.provider.is_available() {
            return Err(SessionError::VoiceUnavailable);
        }
        if self
            .listening
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::debug!("Voice capture already running; ignoring start request");
            return Ok(ListenOutcome::AlreadyListening);
        }

        let outcome = self.listen_once().await;
        self.listening.store(false, Ordering::SeqCst);
        outcome
    }

    async fn listen_once(&self) -> Result<ListenOutcome, SessionError> {
        let recognizer = {
            let mut slot = self.recognizer.lock().expect("recognizer mutex poisoned");
            match slot.as_ref() {
                Some(handle) => Arc::clone(handle),
                None => match self.provider.create() {
                    Ok(handle) => {
                        *slot = Some(Arc::clone(&handle));
                        handle
                    }
                    Err(VoiceError::Unavailable) => return Err(SessionError::VoiceUnavailable),
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to construct speech recognizer");
                        return Ok(ListenOutcome::NoTranscript);
                    }
                },
            }
        };

        match recognizer.recognize().await {
            Ok(transcript) if !transcript.trim().is_empty() => {
                let mut state = self.state.lock().expect("session state mutex poisoned");
                // One utterance becomes the whole input: replace, not append.
                state.draft = transcript;
                Ok(ListenOutcome::TranscriptApplied)
            }
            Ok(_) => {
                tracing::debug!("Recognition returned an empty transcript");
                Ok(ListenOutcome::NoTranscript)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Speech recognition failed; draft unchanged");
                Ok(ListenOutcome::NoTranscript)
            }
        }
    }

    // -- Send state machine --

    /// Commit the draft as a user message and exchange it for a reply.
    ///
    /// Rejected (transcript untouched) when the trimmed draft is empty or a
    /// send is already in flight. Otherwise the transcript always gains
    /// exactly two messages: the user turn, then either the service reply
    /// (canned fallback if the reply is empty) or the fixed connectivity
    /// placeholder. `awaiting_reply` is reset on every path out.
    pub async fn send(&self) -> Result<(), SessionError> {
        let (query, attachment) = {
            let mut state = self.state.lock().expect("session state mutex poisoned");
            let query = state.draft.trim().to_string();
            if query.is_empty() {
                return Err(SessionError::EmptyDraft);
            }
            if state.awaiting_reply {
                return Err(SessionError::SendInFlight);
            }

            // The staged file is consumed here, exactly once, whether or not
            // the request succeeds.
            let attachment = state.pending_attachment.take();
            let message = match attachment.clone() {
                Some(file) => Message::user_with_attachment(query.clone(), file),
                None => Message::user(query.clone()),
            };
            state.transcript.append(message);
            state.draft.clear();
            state.awaiting_reply = true;
            (query, attachment)
        };

        let reply = self.service.ask(&query, attachment.as_ref()).await;

        let mut state = self.state.lock().expect("session state mutex poisoned");
        match reply {
            Ok(text) => {
                let text = if text.trim().is_empty() {
                    self.chat.fallback_reply.clone()
                } else {
                    text
                };
                state.transcript.append(Message::bot(text, Some(query)));
            }
            Err(e) => {
                tracing::warn!(error = %e, "Ask failed; appending connectivity placeholder");
                state
                    .transcript
                    .append(Message::bot(self.chat.connectivity_error.clone(), None));
            }
        }
        state.awaiting_reply = false;
        Ok(())
    }

    // -- Feedback --

    /// Rate a bot reply: optimistic local commit, then a detached
    /// best-effort report to the service.
    ///
    /// Returns whether the transition applied. A repeat rating (or an
    /// unknown id) is a no-op and sends nothing; a failed report is logged
    /// and never reverts the local rating.
    pub fn give_feedback(&self, id: Uuid, sentiment: Sentiment) -> bool {
        let report = {
            let mut state = self.state.lock().expect("session state mutex poisoned");
            if !state.transcript.update_feedback(id, sentiment) {
                return false;
            }
            match state.transcript.get(id) {
                Some(message) => FeedbackReport {
                    query: message.originating_query.clone().unwrap_or_default(),
                    message_id: id,
                    sentiment,
                    response_text: message.text.clone(),
                },
                // update_feedback returned true, so the message exists.
                None => return true,
            }
        };

        let service = Arc::clone(&self.service);
        tokio::spawn(async move {
            if let Err(e) = service.report_feedback(&report).await {
                tracing::warn!(error = %e, "Feedback delivery failed; local rating kept");
            }
        });
        true
    }

    // -- Read surface for the presentation layer --

    /// Snapshot of the full ordered transcript.
    pub fn messages(&self) -> Vec<Message> {
        let state = self.state.lock().expect("session state mutex poisoned");
        state.transcript.messages()
    }

    /// True exactly while a send is in flight (pending indicator).
    pub fn awaiting_reply(&self) -> bool {
        let state = self.state.lock().expect("session state mutex poisoned");
        state.awaiting_reply
    }

    pub fn has_pending_attachment(&self) -> bool {
        let state = self.state.lock().expect("session state mutex poisoned");
        state.pending_attachment.is_some()
    }

    pub fn is_listening(&self) -> bool {
        self.listening.load(Ordering::SeqCst)
    }
}

// =============================================================================
// Tests
// =============================================================================
