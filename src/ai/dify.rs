//! Dify chat-messages client
//!
//! Sends blocking-mode queries and carries the conversation id between them.
//! The API key is read from the environment variable named in the config.

use async_trait::async_trait;
use reqwest::{header, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

use super::{Answer, QuestionService, RemoteError};
use crate::config::Config;

/// Request body for the chat-messages endpoint
#[derive(Debug, Serialize)]
struct ChatMessageRequest<'a> {
    inputs: serde_json::Map<String, serde_json::Value>,
    query: &'a str,
    response_mode: &'static str,
    conversation_id: &'a str,
    user: &'a str,
    files: Vec<serde_json::Value>,
}

/// Blocking-mode response
#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    #[serde(default)]
    message_id: Option<String>,
    #[serde(default)]
    conversation_id: Option<String>,
    #[serde(default)]
    answer: String,
}

/// Error body returned on non-success statuses
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

pub struct DifyClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    user: String,
}

impl DifyClient {
    pub fn new(api_url: &str, api_key: String, user_prefix: &str, timeout: Duration) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(format!("codeask/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key,
            user: format!("{}-{}", user_prefix, Uuid::new_v4()),
        })
    }

    /// Create client from config, reading the key from the environment
    pub fn from_config(config: &Config) -> Result<Self, RemoteError> {
        let env_name = &config.remote.api_key_env;
        let api_key = std::env::var(env_name)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| RemoteError::MissingApiKey(env_name.clone()))?;

        Self::new(
            &config.remote.api_url,
            api_key,
            &config.general.user_prefix,
            Duration::from_secs(config.remote.timeout_secs),
        )
    }
}

#[async_trait]
impl QuestionService for DifyClient {
    async fn ask(&self, query: &str, conversation_id: Option<&str>) -> Result<Answer, RemoteError> {
        let request = ChatMessageRequest {
            inputs: serde_json::Map::new(),
            query,
            response_mode: "blocking",
            conversation_id: conversation_id.unwrap_or(""),
            user: &self.user,
            files: Vec::new(),
        };

        debug!("POST {} as {} ({} chars)", self.api_url, self.user, query.len());

        let response = self
            .client
            .post(&self.api_url)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(error_for_status(status, &body));
        }

        parse_answer(&body)
    }
}

fn error_for_status(status: StatusCode, body: &str) -> RemoteError {
    if status == StatusCode::UNAUTHORIZED {
        return RemoteError::InvalidCredentials;
    }

    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_else(|| body.trim().to_string());

    RemoteError::Api {
        status: status.as_u16(),
        message,
    }
}

fn parse_answer(body: &str) -> Result<Answer, RemoteError> {
    let response: ChatMessageResponse = serde_json::from_str(body)?;
    Ok(Answer {
        text: response.answer,
        conversation_id: response.conversation_id.filter(|id| !id.is_empty()),
        message_id: response.message_id,
    })
}
