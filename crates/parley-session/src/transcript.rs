//! Append-only ordered store of transcript messages.
//!
//! The store enforces two invariants on behalf of the controller: no
//! empty-text message is ever stored, and a message's feedback transitions
//! from unset to set at most once. There is no deletion operation.

use parley_core::{Message, Sentiment};
use uuid::Uuid;

/// Ordered list of conversation messages.
#[derive(Debug, Default)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert at the end, preserving arrival order.
    ///
    /// Empty-text messages are dropped with a warning so the "transcript
    /// never contains an empty message" invariant holds at this boundary
    /// regardless of the caller.
    pub fn append(&mut self, message: Message) {
        if message.text.trim().is_empty() {
            tracing::warn!(sender = ?message.sender, "Dropping empty-text message");
            return;
        }
        self.messages.push(message);
    }

    /// Apply the unset -> set feedback transition for the given message.
    ///
    /// Returns `false` (a no-op, not an error) when the message already has
    /// feedback or the id is unknown.
    pub fn update_feedback(&mut self, id: Uuid, sentiment: Sentiment) -> bool {
        match self.messages.iter_mut().find(|m| m.id == id) {
            Some(message) if message.feedback.is_none() => {
                message.feedback = Some(sentiment);
                true
            }
            Some(_) => {
                tracing::debug!(%id, "Feedback already recorded; ignoring");
                false
            }
            None => {
                tracing::debug!(%id, "Feedback for unknown message id; ignoring");
                false
            }
        }
    }

    /// Find a message by id.
    pub fn get(&self, id: Uuid) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    /// Snapshot of the full ordered sequence for rendering.
    pub fn messages(&self) -> Vec<Message> {
        self.messages.clone()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use parley_core::Sender;

    #[test]
    fn test_append_preserves_order() {
        let mut transcript = Transcript::new();
        transcript.append(Message::user("first"));
        transcript.append(Message::bot("second", Some("first".to_string())));
        transcript.append(Message::user("third"));

        let messages = transcript.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].text, "first");
        assert_eq!(messages[1].text, "second");
        assert_eq!(messages[2].text, "third");
    }

    #[test]
    fn test_append_drops_empty_text() {
        let mut transcript = Transcript::new();
        transcript.append(Message::user(""));
        transcript.append(Message::bot("   ", None));
        assert!(transcript.is_empty());
    }

    #[test]
    fn test_update_feedback_applies_once() {
        let mut transcript = Transcript::new();
        let msg = Message::bot("reply", Some("query".to_string()));
        let id = msg.id;
        transcript.append(msg);

        assert!(transcript.update_feedback(id, Sentiment::Positive));
        assert_eq!(
            transcript.get(id).unwrap().feedback,
            Some(Sentiment::Positive)
        );
    }

    #[test]
    fn test_update_feedback_second_call_is_noop() {
        let mut transcript = Transcript::new();
        let msg = Message::bot("reply", None);
        let id = msg.id;
        transcript.append(msg);

        assert!(transcript.update_feedback(id, Sentiment::Negative));
        // Second submission with a different sentiment is rejected; the
        // first rating is retained.
        assert!(!transcript.update_feedback(id, Sentiment::Positive));
        assert_eq!(
            transcript.get(id).unwrap().feedback,
            Some(Sentiment::Negative)
        );
    }

    #[test]
    fn test_update_feedback_unknown_id_is_noop() {
        let mut transcript = Transcript::new();
        transcript.append(Message::bot("reply", None));
        assert!(!transcript.update_feedback(Uuid::new_v4(), Sentiment::Positive));
    }

    #[test]
    fn test_messages_returns_snapshot() {
        let mut transcript = Transcript::new();
        transcript.append(Message::user("hello"));

        let mut snapshot = transcript.messages();
        snapshot[0].text = "mutated".to_string();
        snapshot.clear();

        // Store entries are untouched by snapshot mutation.
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.last().unwrap().text, "hello");
    }

    #[test]
    fn test_get_finds_by_id() {
        let mut transcript = Transcript::new();
        let msg = Message::user("findable");
        let id = msg.id;
        transcript.append(msg);
        transcript.append(Message::user("other"));

        let found = transcript.get(id).unwrap();
        assert_eq!(found.text, "findable");
        assert_eq!(found.sender, Sender::User);
        assert!(transcript.get(Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_len_and_last() {
        let mut transcript = Transcript::new();
        assert_eq!(transcript.len(), 0);
        assert!(transcript.last().is_none());

        transcript.append(Message::user("one"));
        transcript.append(Message::user("two"));
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.last().unwrap().text, "two");
    }
}
