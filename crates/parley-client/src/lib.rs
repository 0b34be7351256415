//! Remote exchange client for Parley.
//!
//! Talks to the answering service over HTTP: plain JSON for text-only
//! queries, multipart when a staged file rides along, and a best-effort
//! feedback report. Every operation is a single attempt; the widget's
//! retry mechanism is the user sending again.

pub mod client;
pub mod error;
pub mod service;

pub use client::ExchangeClient;
pub use error::ExchangeError;
pub use service::{ExchangeService, FeedbackReport};
