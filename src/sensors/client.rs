use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::db::models::level_from_json;

/// Why a poll tick produced no reading.
#[derive(Debug, Error)]
pub enum PollError {
    #[error("sensor request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("sensor endpoint returned {0}")]
    Status(StatusCode),

    #[error("sensor response is not JSON: {0}")]
    Body(#[from] serde_json::Error),

    #[error("sensor response has no numeric level: {0}")]
    InvalidLevel(String),

    #[error("failed to store reading: {0:#}")]
    Store(anyhow::Error),
}

/// Where the poller gets the current level from.
#[async_trait]
pub trait LevelSource: Send + Sync {
    async fn fetch_level(&self) -> Result<f64, PollError>;

    /// Human-readable location of the source, for logs.
    fn endpoint(&self) -> &str;
}

/// HTTP client for the upstream sensor backend.
#[derive(Debug, Clone)]
pub struct SensorClient {
    http: Client,
    url: String,
}

impl SensorClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, PollError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }
}

#[async_trait]
impl LevelSource for SensorClient {
    /// Anything other than a 2xx JSON object with a numeric `level` is an error.
    async fn fetch_level(&self) -> Result<f64, PollError> {
        debug!(url = %self.url, "Fetching sensor level");

        let resp = self.http.get(&self.url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(PollError::Status(status));
        }

        let bytes = resp.bytes().await?;
        let body: Value = serde_json::from_slice(&bytes)?;

        level_from_json(&body).ok_or_else(|| PollError::InvalidLevel(truncate(&body.to_string())))
    }

    fn endpoint(&self) -> &str {
        &self.url
    }
}

/// Keep logged upstream payloads to a readable size.
fn truncate(s: &str) -> String {
    const MAX: usize = 200;
    match s.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_owned(),
    }
}
