//! Remote Seed Source
//!
//! A read-only HTTP JSON endpoint consulted exactly once, on first launch,
//! to seed the local store. No auth, no pagination, no retry.

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::DomainResult;

/// Endpoint the stock client seeds from
pub const DEFAULT_SEED_URL: &str = "https://dummyjson.com/todos";

/// Top-level seed payload: `{"todos": [...]}`
#[derive(Debug, Deserialize)]
pub struct TodoResponse {
    pub todos: Vec<RemoteTodo>,
}

/// One remote seed item; missing fields take their defaults
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteTodo {
    pub id: i32,
    #[serde(default)]
    pub todo: String,
    #[serde(default)]
    pub completed: bool,
}

/// Abstract seed source, so the sync logic can be exercised without a
/// live endpoint
#[async_trait]
pub trait SeedSource: Send + Sync {
    async fn fetch_todos(&self) -> DomainResult<Vec<RemoteTodo>>;
}

/// reqwest-backed seed source
pub struct HttpSeedSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSeedSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

impl Default for HttpSeedSource {
    fn default() -> Self {
        Self::new(DEFAULT_SEED_URL)
    }
}

#[async_trait]
impl SeedSource for HttpSeedSource {
    async fn fetch_todos(&self) -> DomainResult<Vec<RemoteTodo>> {
        // Fetch the body first so transport errors and malformed payloads
        // surface as distinct variants.
        let body = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let response: TodoResponse = serde_json::from_str(&body)?;
        Ok(response.todos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_seed_payload() {
        let body = r#"{"todos":[{"id":1,"todo":"Buy milk","completed":false},{"id":2,"todo":"Walk dog","completed":true}]}"#;
        let response: TodoResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.todos.len(), 2);
        assert_eq!(response.todos[0].todo, "Buy milk");
        assert!(response.todos[1].completed);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let body = r#"{"todos":[{"id":5}]}"#;
        let response: TodoResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.todos[0].todo, "");
        assert!(!response.todos[0].completed);
    }

    #[test]
    fn test_malformed_payload_is_an_error() {
        let body = r#"{"items":[]}"#;
        assert!(serde_json::from_str::<TodoResponse>(body).is_err());
    }
}
