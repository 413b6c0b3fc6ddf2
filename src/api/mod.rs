//! Access to the remote expense service.
//!
//! Every operation is a single HTTP round trip: no retries, no caching. Failures
//! are reported through [`ApiError`] regardless of which endpoint produced them.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::models::{Expense, ExpenseDraft, ExpenseId};

pub mod client;

pub use client::ApiClient;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connection refused, timeout, ...).
    #[error("Could not reach the expense service: {0}")]
    Transport(#[source] reqwest::Error),
    /// Non-2xx response. `message` is the service's own text when it sent one.
    #[error("{message}")]
    Status { status: u16, message: String },
    /// 2xx response whose body did not have the expected shape.
    #[error("Unexpected response from the expense service: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(err) => err.status().map(|status| status.as_u16()),
            ApiError::Decode(_) => None,
        }
    }
}

/// Body of a delete (or of a create/update on services that don't echo the record).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Acknowledgement {
    #[serde(default)]
    pub message: Option<String>,
}

/// Result of a create or update call.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Saved {
    /// The canonical record as stored by the service.
    Record(Expense),
    /// The service only confirmed the write.
    Acknowledged(Acknowledgement),
}

impl Saved {
    pub fn record(&self) -> Option<&Expense> {
        match self {
            Saved::Record(expense) => Some(expense),
            Saved::Acknowledged(_) => None,
        }
    }
}

/// The operations the view needs from the expense service.
#[async_trait]
pub trait ExpenseService: Send + Sync {
    async fn list_all(&self) -> Result<Vec<Expense>, ApiError>;

    async fn get_one(&self, id: ExpenseId) -> Result<Expense, ApiError>;

    async fn create(&self, draft: &ExpenseDraft) -> Result<Saved, ApiError>;

    /// Sends the full draft as the replacement for record `id`.
    async fn update(&self, id: ExpenseId, draft: &ExpenseDraft) -> Result<Saved, ApiError>;

    async fn delete(&self, id: ExpenseId) -> Result<Acknowledgement, ApiError>;

    /// Records whose name or category matches `query`.
    async fn search(&self, query: &str) -> Result<Vec<Expense>, ApiError>;
}
