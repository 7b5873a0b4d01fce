//! Content-addressed pinning through the IPFS HTTP RPC API.
//!
//! The daemon is reached at `{api_url}/api/v0/add?pin=true`; the CID comes
//! back as the `Hash` field of the JSON reply. Every attempt is bounded by the
//! configured timeout.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

const RETRY_BACKOFF: Duration = Duration::from_millis(500);

#[derive(Debug, Error)]
pub enum PinError {
    #[error("failed to read file for pinning: {0}")]
    Io(#[from] std::io::Error),
    #[error("pinning request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("pinning service returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("pinning service returned a malformed response: {0}")]
    MalformedResponse(String),
    #[error("pinning timed out after {0:?}")]
    Timeout(Duration),
}

/// Stores a file in a content-addressed store and returns its CID.
#[async_trait]
pub trait ContentPinner: Send + Sync {
    async fn pin(&self, path: &Path) -> Result<String, PinError>;
}

#[derive(Debug, Clone, Copy)]
pub struct PinPolicy {
    pub timeout: Duration,
    /// Total attempts, including the first. 1 means no retry.
    pub max_attempts: u32,
}

impl Default for PinPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_attempts: 1,
        }
    }
}

#[derive(Debug, Deserialize)]
struct AddResponse {
    #[serde(rename = "Hash")]
    hash: String,
}

/// Extracts the CID from an `/api/v0/add` body. The daemon may stream one
/// JSON object per line; the last one describes the root.
pub fn parse_add_response(body: &str) -> Result<String, PinError> {
    let line = body
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .last()
        .ok_or_else(|| PinError::MalformedResponse("empty body".to_string()))?;

    let parsed: AddResponse = serde_json::from_str(line)
        .map_err(|e| PinError::MalformedResponse(format!("{}: {}", e, line)))?;

    if parsed.hash.trim().is_empty() {
        return Err(PinError::MalformedResponse("empty Hash field".to_string()));
    }
    Ok(parsed.hash)
}

#[derive(Clone)]
pub struct IpfsClient {
    api_url: String,
    policy: PinPolicy,
    http: reqwest::Client,
}

impl IpfsClient {
    pub fn new(api_url: impl Into<String>, policy: PinPolicy) -> Result<Self, PinError> {
        let http = reqwest::Client::builder().timeout(policy.timeout).build()?;
        Ok(Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            policy,
            http,
        })
    }

    async fn add_once(&self, file_name: &str, content: Vec<u8>) -> Result<String, PinError> {
        let part = reqwest::multipart::Part::bytes(content).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);
        let url = format!("{}/api/v0/add?pin=true", self.api_url);

        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.classify(e))?;
        if !status.is_success() {
            return Err(PinError::Status {
                status: status.as_u16(),
                body,
            });
        }

        parse_add_response(&body)
    }

    fn classify(&self, err: reqwest::Error) -> PinError {
        if err.is_timeout() {
            PinError::Timeout(self.policy.timeout)
        } else {
            PinError::Http(err)
        }
    }
}

#[async_trait]
impl ContentPinner for IpfsClient {
    async fn pin(&self, path: &Path) -> Result<String, PinError> {
        let content = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();

        let attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.add_once(&file_name, content.clone()).await {
                Ok(cid) => {
                    debug!(cid = %cid, attempt, "File pinned to IPFS");
                    return Ok(cid);
                }
                Err(e) if attempt < attempts => {
                    warn!(attempt, error = %e, "IPFS pin attempt failed, retrying");
                    attempt += 1;
                    tokio::time::sleep(RETRY_BACKOFF).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
