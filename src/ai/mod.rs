//! Question-answering service integration

pub mod context;
pub mod dify;

use async_trait::async_trait;
use thiserror::Error;

pub use context::ContextBuilder;
pub use dify::DifyClient;

/// Answer to one query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub text: String,
    /// Continuation token for the next query, when the service returned one
    pub conversation_id: Option<String>,
    pub message_id: Option<String>,
}

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("API key not available: set the {0} environment variable")]
    MissingApiKey(String),

    #[error("Invalid API key configuration")]
    InvalidCredentials,

    #[error("Dify API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Anything that can answer a query, optionally continuing a conversation
#[async_trait]
pub trait QuestionService: Send + Sync {
    async fn ask(&self, query: &str, conversation_id: Option<&str>) -> Result<Answer, RemoteError>;
}
