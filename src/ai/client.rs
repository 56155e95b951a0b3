//! HTTP client for the remote chat-completion API.
//!
//! This module provides a small client for the `/chat/completions` endpoint:
//! one outbound HTTPS POST per call carrying a system+user prompt pair and a
//! bearer credential, returning the reply text or a classified failure.

use crate::errors::{AIError, AppResult};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// A message in a chat conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// The role of the message sender (system, user)
    pub role: String,
    /// The content of the message
    pub content: String,
}

impl Message {
    /// Creates a new system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Creates a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Request body for chat completion.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f32,
    max_tokens: u32,
}

/// Response from chat completion.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Client for the chat-completion API.
///
/// The credential is resolved once at construction and treated as immutable
/// thereafter; calls share nothing else, so any number may run concurrently.
pub struct ChatClient {
    base_url: String,
    credential: Option<String>,
    model: String,
    client: Client,
}

impl ChatClient {
    /// Creates a new chat-completion client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the API (e.g., "https://api.openai.com/v1")
    /// * `credential` - Bearer credential, or `None` when not yet provisioned
    /// * `model` - Model name sent with every request
    /// * `timeout_seconds` - Bound on each request; a call that would
    ///   otherwise never return fails instead of leaving its slot pending
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        credential: Option<String>,
        model: impl Into<String>,
        timeout_seconds: u64,
    ) -> AppResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds.max(1)))
            .default_headers(headers)
            .build()
            .map_err(|e| AIError::InvalidResponse(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into(),
            credential,
            model: model.into(),
            client,
        })
    }

    /// Sends one chat-completion request and returns the trimmed reply text.
    ///
    /// Each call is independent and terminal: there is no retry, and the
    /// caller receives exactly one result.
    ///
    /// # Arguments
    ///
    /// * `messages` - The system+user prompt pair
    /// * `max_tokens` - Expected reply length budget
    /// * `temperature` - Sampling temperature in [0, 2]
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The credential has not been provisioned (`CredentialNotReady`)
    /// - The request fails, times out, returns a non-2xx status, or the
    ///   payload does not contain `choices[0].message.content`
    ///   (`InvalidResponse`)
    pub async fn complete(
        &self,
        messages: &[Message],
        max_tokens: u32,
        temperature: f32,
    ) -> AppResult<String> {
        let credential = self
            .credential
            .as_deref()
            .ok_or(AIError::CredentialNotReady)?;

        debug!("Sending chat request with model: {}", self.model);

        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let request = ChatRequest {
            model: &self.model,
            messages,
            temperature,
            max_tokens,
        };

        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, format!("Bearer {}", credential))
            .json(&request)
            .send()
            .await
            .map_err(|e| AIError::InvalidResponse(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(
                AIError::InvalidResponse(format!("HTTP {}: {}", status, error_text)).into(),
            );
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            AIError::InvalidResponse(format!("Failed to parse chat response: {}", e))
        })?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                AIError::InvalidResponse("Response did not include message content".to_string())
            })?;

        debug!("Received chat response ({} chars)", content.len());
        Ok(content.trim().to_string())
    }

    /// Reports whether a credential was provisioned at construction.
    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }
}
