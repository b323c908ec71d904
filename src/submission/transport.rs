//! Transport to the classification service.
//!
//! The controller only sees [`ClassifierTransport`]; [`HttpTransport`] is the
//! reqwest-backed implementation. Status handling lives in
//! [`interpret_reply`] so it can be tested without a network.

use async_trait::async_trait;
use serde::Deserialize;

use super::request::OutboundRequest;
use super::types::{GENERIC_ERROR_MESSAGE, ProcessingResult};
use crate::config::ClientConfig;
use crate::error::RequestError;

/// Raw HTTP answer: status plus body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one outbound request and returns whatever the service answered.
///
/// Implementations return `Err` only for transport faults; any HTTP status,
/// success or not, comes back as `Ok(HttpReply)`.
#[async_trait]
pub trait ClassifierTransport: Send + Sync {
    async fn post_email(&self, request: OutboundRequest) -> Result<HttpReply, RequestError>;
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

/// Map a reply to a result.
///
/// Non-2xx: the body's `detail` string becomes the message, falling back to
/// [`GENERIC_ERROR_MESSAGE`] when it is missing, empty, not a string, or the
/// body is not JSON at all. 2xx with an unparseable body is a transport fault.
pub fn interpret_reply(reply: HttpReply) -> Result<ProcessingResult, RequestError> {
    if reply.is_success() {
        return serde_json::from_str(&reply.body).map_err(|e| {
            RequestError::Transport(format!("Resposta inválida do servidor: {e}"))
        });
    }

    let detail = serde_json::from_str::<ErrorBody>(&reply.body)
        .ok()
        .and_then(|b| b.detail)
        .and_then(|d| d.as_str().map(str::to_string))
        .filter(|d| !d.trim().is_empty());

    if detail.is_none() {
        tracing::debug!(status = reply.status, "Error response carried no detail");
    }

    Err(RequestError::HttpStatus {
        status: reply.status,
        message: detail.unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string()),
    })
}

#[derive(Debug, Deserialize)]
struct HealthBody {
    message: String,
}

/// reqwest-backed transport.
pub struct HttpTransport {
    client: reqwest::Client,
    process_url: String,
    health_url: String,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, RequestError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            client,
            process_url: config.process_email_url(),
            health_url: config.health_url(),
        })
    }

    /// `GET /healthcheck`. Returns the service's welcome message.
    pub async fn health_check(&self) -> Result<String, RequestError> {
        let resp = self.client.get(&self.health_url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(RequestError::HttpStatus {
                status: status.as_u16(),
                message: GENERIC_ERROR_MESSAGE.to_string(),
            });
        }
        let body: HealthBody = resp.json().await?;
        Ok(body.message)
    }
}

#[async_trait]
impl ClassifierTransport for HttpTransport {
    async fn post_email(&self, request: OutboundRequest) -> Result<HttpReply, RequestError> {
        let part = request.part_name();
        let form = request.into_form()?;

        let resp = self
            .client
            .post(&self.process_url)
            .multipart(form)
            .send()
            .await?;

        let status = resp.status().as_u16();
        let body = resp.text().await?;
        tracing::debug!(status, part, "Classification service replied");
        Ok(HttpReply { status, body })
    }
}
