// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! HTTP backend over `reqwest`.
//!
//! Paths and query strings come pre-rendered from the request types; this
//! module only joins them onto the base URL, attaches the bearer token and
//! maps transport and status failures onto [`BackendError`]. Domain-level
//! rejections in 2xx bodies are left to the store modules.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::domain::backend::{Backend, BackendError, ReadRequest, WriteRequest};
use crate::domain::config::BackendConfig;

#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: String,
    client: Client,
    api_token: Option<String>,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Result<Self, BackendError> {
        let client = Client::builder()
            .build()
            .map_err(|e| BackendError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
            api_token: None,
        })
    }

    pub fn from_config(config: &BackendConfig) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| BackendError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
            api_token: config.api_token.clone(),
        })
    }

    pub fn with_api_token(mut self, api_token: impl Into<String>) -> Self {
        self.api_token = Some(api_token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.api_token {
            Some(token) => req.header("Authorization", format!("Bearer {}", token)),
            None => req,
        }
    }

    async fn decode(response: Response) -> Result<Value, BackendError> {
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        if !status.is_success() {
            let body = serde_json::from_str(&text).unwrap_or(Value::String(text));
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&text).map_err(|e| BackendError::Decode(e.to_string()))
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn get(&self, request: ReadRequest) -> Result<Value, BackendError> {
        let url = format!("{}{}", self.base_url, request.path_and_query());
        debug!("GET {}", url);

        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        Self::decode(response).await
    }

    async fn post(&self, request: WriteRequest) -> Result<Value, BackendError> {
        let url = format!("{}{}", self.base_url, request.path());
        debug!("POST {} ({} payloads)", url, request.batch_len());

        let response = self
            .authorize(self.client.post(&url).json(request.body()))
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        Self::decode(response).await
    }
}
