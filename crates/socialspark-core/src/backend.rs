//! Contracts for the two remote collaborators and an HTTP client for a
//! backend that serves them.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{GenerationError, ProcessingError};

/// Result of ingesting a social account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub message: String,
}

/// Reply text for one chat turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub response: String,
}

/// Processes a social handle into analyzable data.
#[async_trait]
pub trait AccountIngestor: Send + Sync {
    async fn connect_account(&self, handle: &str) -> Result<Summary, ProcessingError>;
}

/// Produces the assistant reply for a user message.
#[async_trait]
pub trait ResponseGenerator: Send + Sync {
    async fn send_message(&self, text: &str) -> Result<Reply, GenerationError>;
}

#[derive(Serialize)]
struct ConnectRequest<'a> {
    handle: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

/// Client for the analytics backend's JSON endpoints.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, String>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| format!("request to {} failed: {}", url, e))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(format!("{} returned {}: {}", url, status, text));
        }

        response
            .json::<R>()
            .await
            .map_err(|e| format!("invalid response from {}: {}", url, e))
    }
}

#[async_trait]
impl AccountIngestor for HttpBackend {
    async fn connect_account(&self, handle: &str) -> Result<Summary, ProcessingError> {
        self.post_json("/api/connect", &ConnectRequest { handle })
            .await
            .map_err(ProcessingError::new)
    }
}

#[async_trait]
impl ResponseGenerator for HttpBackend {
    async fn send_message(&self, text: &str) -> Result<Reply, GenerationError> {
        self.post_json("/api/chat", &ChatRequest { message: text })
            .await
            .map_err(GenerationError::new)
    }
}
