use async_trait::async_trait;
use chatrelay_core::chat::{ChatReply, ChatRequest};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("could not reach the chat server: {0}")]
    Connection(#[source] reqwest::Error),
    #[error("chat server answered with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("chat server response is not a reply: {0}")]
    Malformed(String),
}

/// One round trip to the local chat server.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send(&self, message: &str) -> Result<String, TransportError>;
}

pub struct HttpTransport {
    http: reqwest::Client,
    api_url: String,
}

impl HttpTransport {
    pub fn new(api_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn send(&self, message: &str) -> Result<String, TransportError> {
        let resp = self
            .http
            .post(format!("{}/chat", self.api_url))
            .json(&ChatRequest {
                message: message.to_string(),
            })
            .send()
            .await
            .map_err(TransportError::Connection)?;

        let status = resp.status();
        let body = resp.text().await.map_err(TransportError::Connection)?;
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        parse_reply(&body)
    }
}

fn parse_reply(body: &str) -> Result<String, TransportError> {
    serde_json::from_str::<ChatReply>(body)
        .map(|reply| reply.reply)
        .map_err(|e| TransportError::Malformed(e.to_string()))
}
