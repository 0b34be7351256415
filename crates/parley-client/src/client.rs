//! HTTP implementation of the exchange service.

use std::time::Duration;

use async_trait::async_trait;
use parley_core::config::ServiceConfig;
use parley_core::StagedFile;
use reqwest::multipart;
use serde::{Deserialize, Serialize};

use crate::error::ExchangeError;
use crate::service::{ExchangeService, FeedbackReport};

/// `reqwest`-backed client for the answering service.
///
/// Wire contract:
/// - `POST /ask` — `{"query": ...}` → `{"response": ...}`
/// - `POST /upload_and_query` — multipart `file` + `query` → `{"response": ...}`
/// - `POST /feedback` — `{"query", "message_id", "feedback", "response_text"}`
#[derive(Clone)]
pub struct ExchangeClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Serialize)]
struct AskRequest<'a> {
    query: &'a str,
}

#[derive(Deserialize)]
struct AskResponse {
    #[serde(default)]
    response: Option<String>,
}

#[derive(Serialize)]
struct FeedbackBody<'a> {
    query: &'a str,
    message_id: String,
    feedback: &'static str,
    response_text: &'a str,
}

impl ExchangeClient {
    /// Build a client from the service section of the configuration.
    pub fn new(config: &ServiceConfig) -> Result<Self, ExchangeError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ExchangeError::Network(e.to_string()))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Normalize a response into the reply text or an `ExchangeError`.
    async fn read_reply(response: reqwest::Response) -> Result<String, ExchangeError> {
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = %status, "Answering service returned non-success status");
            return Err(ExchangeError::Server {
                status: status.as_u16(),
            });
        }
        let body: AskResponse = response
            .json()
            .await
            .map_err(|e| ExchangeError::InvalidResponse(e.to_string()))?;
        Ok(body.response.unwrap_or_default())
    }
}

#[async_trait]
impl ExchangeService for ExchangeClient {
    async fn ask(
        &self,
        query: &str,
        attachment: Option<&StagedFile>,
    ) -> Result<String, ExchangeError> {
        let send_result = match attachment {
            Some(file) => {
                let form = multipart::Form::new()
                    .part(
                        "file",
                        multipart::Part::bytes(file.bytes.clone()).file_name(file.name.clone()),
                    )
                    .text("query", query.to_string());
                self.client
                    .post(self.endpoint("/upload_and_query"))
                    .multipart(form)
                    .send()
                    .await
            }
            None => {
                self.client
                    .post(self.endpoint("/ask"))
                    .json(&AskRequest { query })
                    .send()
                    .await
            }
        };

        let response = send_result.map_err(|e| {
            tracing::warn!(error = %e, "Request to answering service failed");
            ExchangeError::Network(e.to_string())
        })?;

        Self::read_reply(response).await
    }

    async fn report_feedback(&self, report: &FeedbackReport) -> Result<(), ExchangeError> {
        let body = FeedbackBody {
            query: &report.query,
            message_id: report.message_id.to_string(),
            feedback: report.sentiment.wire_value(),
            response_text: &report.response_text,
        };

        let response = self
            .client
            .post(self.endpoint("/feedback"))
            .json(&body)
            .send()
            .await
            .map_err(|e| ExchangeError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExchangeError::Server {
                status: status.as_u16(),
            });
        }
        // Acknowledgement body shape is opaque; a success status is enough.
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
