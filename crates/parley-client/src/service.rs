//! Service seam between the session controller and the answering backend.

use async_trait::async_trait;
use parley_core::{Sentiment, StagedFile};
use uuid::Uuid;

use crate::error::ExchangeError;

/// A feedback submission for one rated bot reply.
///
/// Carries enough context for the backend to evaluate the rating without a
/// transcript lookup: the originating query and the rated reply text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedbackReport {
    /// The user text that produced the rated reply. Empty for replies with
    /// no originating query (connectivity placeholders).
    pub query: String,
    /// Transcript id of the rated bot message.
    pub message_id: Uuid,
    pub sentiment: Sentiment,
    /// The reply text as shown to the user.
    pub response_text: String,
}

/// Asynchronous request/response exchange with the answering service.
///
/// Implementations must be single-attempt: a failure surfaces immediately
/// and the caller decides what to do with it. The controller is generic
/// over this trait so tests can script replies without a network.
#[async_trait]
pub trait ExchangeService: Send + Sync {
    /// Send a query (and optional staged file) and return the reply text.
    ///
    /// An empty reply string is a valid success; the controller owns the
    /// canned fallback wording.
    async fn ask(
        &self,
        query: &str,
        attachment: Option<&StagedFile>,
    ) -> Result<String, ExchangeError>;

    /// Report feedback for one bot reply. Best-effort; the caller never
    /// rolls back local state on failure.
    async fn report_feedback(&self, report: &FeedbackReport) -> Result<(), ExchangeError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feedback_report_holds_context() {
        let id = Uuid::new_v4();
        let report = FeedbackReport {
            query: "what is the lunch menu".to_string(),
            message_id: id,
            sentiment: Sentiment::Positive,
            response_text: "Pizza".to_string(),
        };
        assert_eq!(report.message_id, id);
        assert_eq!(report.sentiment.wire_value(), "good");
    }
}
