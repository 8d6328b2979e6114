// src/client/transport.rs
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::message::{ChatRequest, ChatResponse};

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unreadable response: {0}")]
    Decode(String),
}

/// How the client reaches the backend. Behind a trait so the widget logic
/// is testable without a server.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, TransportError>;
}

/// Posts the full envelope to a configured chat endpoint.
///
/// Handled API failures come back as `success=false` bodies on error
/// statuses, so the body is decoded regardless of status; only a failure to
/// reach or read the backend is a transport error.
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, TransportError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await?;

        response
            .json::<ChatResponse>()
            .await
            .map_err(|e| TransportError::Decode(e.to_string()))
    }
}
