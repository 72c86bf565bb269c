// Author: Jacques Murray

//! Typed HTTP client for the question-answering backend.
//!
//! Every call runs inside the retry engine with the client's
//! [`RetryConfig`]. [`ChatClient::send_message`] hands back the raw
//! [`ChatError`]; [`ChatClient::ask`] classifies it for display.

mod error;
mod model;

pub use error::ChatError;
pub use model::{
    ChatMessage, ChatRequest, ChatResponse, HealthResponse, RetrievedChunk, Role,
    MAX_CONVERSATION_HISTORY,
};

use crate::config::RetryConfig;
use crate::error::{classify, ClassifiedError};
use crate::Retry;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

/// Backend location used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/v1";

/// Environment variable read by [`ChatClientBuilder::from_env`].
pub const API_URL_ENV: &str = "CHAT_API_URL";

/// Overall per-request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Retry settings for chat calls.
pub type ChatRetryConfig = RetryConfig<fn(&ChatError) -> bool>;

/// Client for the chat backend. Cheap to clone; clones share the
/// connection pool.
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    chat_url: Url,
    health_url: Url,
    retry: ChatRetryConfig,
}

impl ChatClient {
    pub fn builder() -> ChatClientBuilder {
        ChatClientBuilder::default()
    }

    pub fn retry_config(&self) -> &ChatRetryConfig {
        &self.retry
    }

    /// Sends `message` with the recent part of `history` to `POST /chat/`.
    ///
    /// Transient failures are retried; the last raw failure is returned
    /// unchanged once the policy gives up.
    pub async fn send_message(
        &self,
        message: &str,
        history: &[ChatMessage],
    ) -> Result<ChatResponse, ChatError> {
        let request = ChatRequest::new(message, history);
        let request = &request;
        Retry::new(self.retry, move || self.post_chat(request))
            .run()
            .await
    }

    /// Like [`send_message`](Self::send_message), with the failure
    /// classified for display.
    pub async fn ask(
        &self,
        message: &str,
        history: &[ChatMessage],
    ) -> Result<ChatResponse, ClassifiedError> {
        self.send_message(message, history).await.map_err(classify)
    }

    /// Queries `GET /health`.
    pub async fn check_health(&self) -> Result<HealthResponse, ChatError> {
        Retry::new(self.retry, move || {
            self.attempt("health", self.http.get(self.health_url.clone()))
        })
        .run()
        .await
    }

    async fn post_chat(&self, request: &ChatRequest) -> Result<ChatResponse, ChatError> {
        self.attempt("chat", self.http.post(self.chat_url.clone()).json(request))
            .await
    }

    /// One attempt: send, check the status, decode the JSON body.
    async fn attempt<T: DeserializeOwned>(
        &self,
        _endpoint: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ChatError> {
        let result = fetch_json(request).await;

        #[cfg(feature = "logging")]
        match &result {
            Ok(_) => log::trace!("{} request succeeded", _endpoint),
            Err(e) => log::warn!("{} request failed: {}", _endpoint, e),
        }

        result
    }
}

async fn fetch_json<T: DeserializeOwned>(request: reqwest::RequestBuilder) -> Result<T, ChatError> {
    let resp = request.send().await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(ChatError::Status {
            status: status.as_u16(),
            url: resp.url().to_string(),
        });
    }
    let body = resp.text().await?;
    Ok(serde_json::from_str(&body)?)
}

/* ----------------------- Builder ----------------------- */

#[derive(Debug, Default)]
pub struct ChatClientBuilder {
    base_url: Option<Url>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    retry: Option<ChatRetryConfig>,
}

impl ChatClientBuilder {
    /// Starts from `CHAT_API_URL` when it is set.
    pub fn from_env() -> Result<Self, ChatError> {
        let mut builder = Self::default();
        if let Ok(raw) = std::env::var(API_URL_ENV) {
            builder.base_url = Some(Url::parse(raw.trim())?);
        }
        Ok(builder)
    }

    /// Override the API base (e.g., `http://localhost:8000/api/v1`).
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Set the overall per-request timeout. Default: 30s.
    pub fn timeout(mut self, dur: Duration) -> Self {
        self.timeout = Some(dur);
        self
    }

    /// Set a connect timeout. Default: none.
    pub fn connect_timeout(mut self, dur: Duration) -> Self {
        self.connect_timeout = Some(dur);
        self
    }

    /// Override the retry policy. Default: [`RetryConfig::default()`].
    pub fn retry(mut self, config: ChatRetryConfig) -> Self {
        self.retry = Some(config);
        self
    }

    pub fn build(self) -> Result<ChatClient, ChatError> {
        let base = match self.base_url {
            Some(url) => url,
            None => Url::parse(DEFAULT_BASE_URL)?,
        };
        let base = with_trailing_slash(base);

        let mut httpb = reqwest::Client::builder().timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT));
        if let Some(ct) = self.connect_timeout {
            httpb = httpb.connect_timeout(ct);
        }

        Ok(ChatClient {
            http: httpb.build()?,
            chat_url: base.join("chat/")?,
            health_url: base.join("health")?,
            retry: self.retry.unwrap_or_default(),
        })
    }
}

// `Url::join` replaces the last segment unless the base ends in '/'.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
