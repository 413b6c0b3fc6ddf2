use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{Acknowledgement, ApiError, ExpenseService, Saved};
use crate::config::Config;
use crate::models::{Expense, ExpenseDraft, ExpenseId};

/// HTTP implementation of [`ExpenseService`].
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(ApiError::Transport)?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Sends the request and returns the raw body of a 2xx response.
    async fn send(
        &self,
        request: RequestBuilder,
        method: &str,
        path: &str,
        failure: &str,
    ) -> Result<Vec<u8>, ApiError> {
        debug!("{method} {path}");

        let response = request.send().await.map_err(|e| {
            warn!("{method} {path} failed before a response: {e}");
            ApiError::Transport(e)
        })?;
        let status = response.status();
        let body = response.bytes().await.map_err(ApiError::Transport)?;

        if !status.is_success() {
            let message = error_message(&body).unwrap_or_else(|| failure.to_string());
            warn!("{method} {path} returned {status}: {message}");
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        info!("{method} {path} succeeded with {status}");
        Ok(body.to_vec())
    }
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Extracts the human readable part of an error body.
///
/// Understands `{"message": ..}`, `{"error": ..}`, `{"detail": ..}` and field
/// validation maps such as `{"expense_name": ["This field is required."]}`.
fn error_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    let object = value.as_object()?;

    const MESSAGE_KEYS: [&str; 3] = ["message", "error", "detail"];

    for key in MESSAGE_KEYS {
        if let Some(text) = object.get(key).and_then(Value::as_str) {
            if !text.trim().is_empty() {
                return Some(text.to_string());
            }
        }
    }

    let field_errors: Vec<String> = object
        .iter()
        .filter(|(field, _)| !MESSAGE_KEYS.contains(&field.as_str()))
        .filter_map(|(field, problems)| {
            let first = match problems {
                Value::Array(items) => items.iter().find_map(Value::as_str)?,
                Value::String(text) => text.as_str(),
                _ => return None,
            };
            Some(format!("{field}: {first}"))
        })
        .collect();
    (!field_errors.is_empty()).then(|| field_errors.join("; "))
}

#[async_trait]
impl ExpenseService for ApiClient {
    async fn list_all(&self) -> Result<Vec<Expense>, ApiError> {
        let request = self.client.get(self.url("/view"));
        let body = self
            .send(request, "GET", "/view", "Failed to fetch expenses")
            .await?;
        decode(&body)
    }

    async fn get_one(&self, id: ExpenseId) -> Result<Expense, ApiError> {
        let path = format!("/one/{id}");
        let request = self.client.get(self.url(&path));
        let body = self
            .send(request, "GET", &path, "Failed to fetch expense")
            .await?;
        decode(&body)
    }

    async fn create(&self, draft: &ExpenseDraft) -> Result<Saved, ApiError> {
        let request = self.client.post(self.url("/add")).json(draft);
        let body = self
            .send(request, "POST", "/add", "Failed to add expense")
            .await?;
        decode(&body)
    }

    async fn update(&self, id: ExpenseId, draft: &ExpenseDraft) -> Result<Saved, ApiError> {
        let path = format!("/update/{id}");
        let request = self.client.patch(self.url(&path)).json(draft);
        let body = self
            .send(request, "PATCH", &path, "Failed to update expense")
            .await?;
        decode(&body)
    }

    async fn delete(&self, id: ExpenseId) -> Result<Acknowledgement, ApiError> {
        let path = format!("/delete/{id}");
        let request = self.client.delete(self.url(&path));
        let body = self
            .send(request, "DELETE", &path, "Failed to delete expense")
            .await?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Acknowledgement::default());
        }
        decode(&body)
    }

    async fn search(&self, query: &str) -> Result<Vec<Expense>, ApiError> {
        let request = self.client.get(self.url("/search")).query(&[("q", query)]);
        let body = self
            .send(request, "GET", "/search", "Failed to search expenses")
            .await?;
        decode(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_loses_trailing_slash() {
        let config = Config {
            api_url: "http://localhost:8000/api/".to_string(),
            ..Config::default()
        };
        let client = ApiClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000/api");
        assert_eq!(client.url("/view"), "http://localhost:8000/api/view");
    }

    #[test]
    fn message_field_wins() {
        let body = br#"{"message": "Name too long", "error": "ignored"}"#;
        assert_eq!(error_message(body).as_deref(), Some("Name too long"));
    }

    #[test]
    fn error_field_is_used() {
        let body = br#"{"error": "Expense not found"}"#;
        assert_eq!(error_message(body).as_deref(), Some("Expense not found"));
    }

    #[test]
    fn validation_errors_are_flattened() {
        let body = br#"{"expense_amount": ["A valid integer is required."]}"#;
        assert_eq!(
            error_message(body).as_deref(),
            Some("expense_amount: A valid integer is required.")
        );
    }

    #[test]
    fn no_message_without_json() {
        assert_eq!(error_message(b""), None);
        assert_eq!(error_message(b"<html>502</html>"), None);
        assert_eq!(error_message(br#"{"message": "  "}"#), None);
        assert_eq!(error_message(b"[1, 2]"), None);
    }

    #[test]
    fn decode_reports_shape_problems() {
        let err = decode::<Vec<Expense>>(br#"{"oops": true}"#).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }
}
