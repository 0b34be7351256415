//! Shared data model, configuration, and error types for Parley.
//!
//! Parley is an embeddable conversational widget core: a session controller
//! that owns the message transcript, drives the request/response lifecycle
//! against a remote answering service, and tracks per-message feedback.
//! This crate holds the types every other crate agrees on.

pub mod config;
pub mod error;
pub mod types;

pub use config::ParleyConfig;
pub use error::{ParleyError, Result};
pub use types::{Message, Sender, Sentiment, StagedFile};
