use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default greeting seeded into every new transcript.
pub const DEFAULT_GREETING: &str = "Hello! How can I assist you today?";

/// Canned reply used when the answering service returns an empty response.
pub const DEFAULT_FALLBACK_REPLY: &str = "I'm still learning, but I'm here to help!";

/// Fixed text of the placeholder bot message appended after a failed send.
pub const DEFAULT_CONNECTIVITY_ERROR: &str =
    "Sorry, I'm having trouble connecting right now. Please try again in a moment.";

// =============================================================================
// Enums
// =============================================================================

/// Who produced a transcript message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    /// The person typing (or speaking) into the widget.
    User,
    /// The remote answering service.
    Bot,
}

/// Rating a user applied to a bot reply.
///
/// A message starts unrated (`Message::feedback` is `None`) and can be rated
/// at most once; the transition is enforced by the transcript store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Negative,
}

impl Sentiment {
    /// The value the feedback endpoint expects on the wire.
    pub fn wire_value(&self) -> &'static str {
        match self {
            Sentiment::Positive => "good",
            Sentiment::Negative => "bad",
        }
    }
}

// =============================================================================
// Structs
// =============================================================================

/// A file staged for the next outgoing message.
///
/// At most one staged file exists per session at any time; staging a new
/// file replaces the previous one, and a send consumes the slot exactly once.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagedFile {
    /// Original filename, shown in the upload-intent message.
    pub name: String,
    /// Raw file content, forwarded as the multipart `file` field.
    pub bytes: Vec<u8>,
}

impl StagedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// A single transcript entry.
///
/// `id` is a v4 UUID so two messages created in the same millisecond can
/// never collide. `timestamp` is fixed at construction and never updated.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub sender: Sender,
    /// Rendered message body. Never empty for stored messages.
    pub text: String,
    pub timestamp: DateTime<Utc>,
    /// Present only on user messages created while a file was staged.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment: Option<StagedFile>,
    /// `None` until the user rates this reply. Meaningful on bot messages only.
    pub feedback: Option<Sentiment>,
    /// For bot replies, the user text that produced them. `None` for user
    /// messages and for placeholder replies with no associated query.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub originating_query: Option<String>,
}

impl Message {
    /// Create a user message with no attachment.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender: Sender::User,
            text: text.into(),
            timestamp: Utc::now(),
            attachment: None,
            feedback: None,
            originating_query: None,
        }
    }

    /// Create a user message carrying a staged file.
    pub fn user_with_attachment(text: impl Into<String>, attachment: StagedFile) -> Self {
        Self {
            attachment: Some(attachment),
            ..Self::user(text)
        }
    }

    /// Create a bot message, optionally linked to the query that produced it.
    pub fn bot(text: impl Into<String>, originating_query: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender: Sender::Bot,
            text: text.into(),
            timestamp: Utc::now(),
            attachment: None,
            feedback: None,
            originating_query,
        }
    }

    /// Returns whether this message came from the answering service.
    pub fn is_bot(&self) -> bool {
        self.sender == Sender::Bot
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_fields() {
        let msg = Message::user("hello");
        assert_eq!(msg.sender, Sender::User);
        assert_eq!(msg.text, "hello");
        assert!(msg.attachment.is_none());
        assert!(msg.feedback.is_none());
        assert!(msg.originating_query.is_none());
    }

    #[test]
    fn test_bot_message_fields() {
        let msg = Message::bot("hi there", Some("hello".to_string()));
        assert_eq!(msg.sender, Sender::Bot);
        assert!(msg.is_bot());
        assert_eq!(msg.originating_query.as_deref(), Some("hello"));
        assert!(msg.feedback.is_none());
    }

    #[test]
    fn test_bot_message_without_query() {
        let msg = Message::bot(DEFAULT_CONNECTIVITY_ERROR, None);
        assert!(msg.originating_query.is_none());
    }

    #[test]
    fn test_message_ids_are_unique() {
        // Messages created back-to-back (same millisecond) must not collide.
        let ids: Vec<_> = (0..100).map(|_| Message::user("x").id).collect();
        let mut deduped = ids.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), ids.len());
    }

    #[test]
    fn test_user_with_attachment() {
        let file = StagedFile::new("menu.pdf", vec![1, 2, 3]);
        let msg = Message::user_with_attachment("see attached", file.clone());
        assert_eq!(msg.attachment, Some(file));
        assert_eq!(msg.sender, Sender::User);
    }

    #[test]
    fn test_sentiment_wire_values() {
        assert_eq!(Sentiment::Positive.wire_value(), "good");
        assert_eq!(Sentiment::Negative.wire_value(), "bad");
    }

    #[test]
    fn test_sender_serde_snake_case() {
        assert_eq!(serde_json::to_string(&Sender::User).unwrap(), "\"user\"");
        assert_eq!(serde_json::to_string(&Sender::Bot).unwrap(), "\"bot\"");
    }

    #[test]
    fn test_sentiment_serde_round_trip() {
        let json = serde_json::to_string(&Sentiment::Negative).unwrap();
        let back: Sentiment = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Sentiment::Negative);
    }

    #[test]
    fn test_message_serializes_without_empty_options() {
        let msg = Message::user("hello");
        let json = serde_json::to_string(&msg).unwrap();
        assert!(!json.contains("attachment"));
        assert!(!json.contains("originating_query"));
    }

    #[test]
    fn test_staged_file_holds_bytes() {
        let file = StagedFile::new("report.txt", b"contents".to_vec());
        assert_eq!(file.name, "report.txt");
        assert_eq!(file.bytes, b"contents");
    }

    #[test]
    fn test_timestamp_is_set_at_creation() {
        let before = Utc::now();
        let msg = Message::user("timed");
        let after = Utc::now();
        assert!(msg.timestamp >= before && msg.timestamp <= after);
    }
}
