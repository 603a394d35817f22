use farmsense_common::types::EnrichedAnimal;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Builds the error for a non-success response, preferring the server's
/// `{ "error": ... }` message over the raw body.
pub fn status_error(status: u16, body: &[u8]) -> WatchError {
    let message = serde_json::from_slice::<ErrorBody>(body)
        .map(|b| b.error)
        .unwrap_or_else(|_| String::from_utf8_lossy(body).trim().to_string());
    WatchError::Status { status, message }
}

pub struct WatchClient {
    http: reqwest::Client,
    base_url: String,
}

impl WatchClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, WatchError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, WatchError> {
        let resp = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await?;
        let status = resp.status();
        let body = resp.bytes().await?;
        if !status.is_success() {
            return Err(status_error(status.as_u16(), &body));
        }
        Ok(serde_json::from_slice(&body)?)
    }

    pub async fn fetch_animals(&self) -> Result<Vec<EnrichedAnimal>, WatchError> {
        self.get_json("/api/animals").await
    }

    pub async fn fetch_animal(&self, id: &str) -> Result<EnrichedAnimal, WatchError> {
        self.get_json(&format!("/api/animals/{id}")).await
    }
}
