//! reqwest-backed implementation of the race service API

use super::RaceApi;
use crate::models::{CreateRaceRequest, CreatedRace, RaceState, Racer, Track};
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Server the original client was built against
pub const DEFAULT_SERVER: &str = "http://localhost:8000";

/// Client errors
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Unexpected status {status} from {url}")]
    Status { status: StatusCode, url: String },
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL every path is appended to
    pub base_url: String,
    /// Request timeout in seconds, transport default when unset
    pub timeout_secs: Option<u64>,
    /// Extra attempts for a failed race poll
    pub poll_retries: u32,
    /// Delay between poll attempts in milliseconds
    pub retry_delay_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SERVER.to_string(),
            timeout_secs: None,
            poll_retries: 0,
            retry_delay_ms: 100,
        }
    }
}

/// HTTP client for the race service
pub struct RaceClient {
    client: reqwest::Client,
    config: ClientConfig,
}

impl RaceClient {
    /// Create a new client with the given configuration
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            config,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build URL for an API path
    fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn race_url(&self, race_id: u32, action: Option<&str>) -> String {
        match action {
            Some(action) => self.build_url(&format!("/api/races/{}/{}", race_id, action)),
            None => self.build_url(&format!("/api/races/{}", race_id)),
        }
    }

    /// Send a request and return the body of a successful response
    async fn send(&self, request: reqwest::RequestBuilder, url: &str) -> Result<String, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                status,
                url: url.to_string(),
            });
        }
        Ok(response.text().await?)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ClientError> {
        let body = self.send(self.client.get(url), url).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn post<B: Serialize>(&self, url: &str, body: Option<&B>) -> Result<String, ClientError> {
        let mut request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }
        self.send(request, url).await
    }
}

impl RaceApi for RaceClient {
    async fn fetch_tracks(&self) -> Result<Vec<Track>, ClientError> {
        let url = self.build_url("/api/tracks");
        tracing::debug!("Fetching tracks: {}", url);
        self.get_json(&url).await
    }

    async fn fetch_racers(&self) -> Result<Vec<Racer>, ClientError> {
        let url = self.build_url("/api/cars");
        tracing::debug!("Fetching racers: {}", url);
        self.get_json(&url).await
    }

    async fn create_race(&self, player_id: u32, track_id: u32) -> Result<CreatedRace, ClientError> {
        let url = self.build_url("/api/races");
        let body = CreateRaceRequest {
            player_id,
            track_id,
        };
        tracing::info!("Creating race: player {} on track {}", player_id, track_id);

        let response = self.post(&url, Some(&body)).await?;
        Ok(serde_json::from_str(&response)?)
    }

    async fn start_race(&self, race_id: u32) -> Result<(), ClientError> {
        let url = self.race_url(race_id, Some("start"));
        tracing::info!("Starting race: {}", url);
        self.post::<()>(&url, None).await.map(|_| ())
    }

    /// Poll race state, retrying up to `poll_retries` extra times
    async fn poll_race(&self, race_id: u32) -> Result<RaceState, ClientError> {
        let url = self.race_url(race_id, None);
        let attempts = self.config.poll_retries.saturating_add(1);

        let mut attempt = 0;
        loop {
            match self.get_json(&url).await {
                Ok(state) => return Ok(state),
                Err(e) if attempt + 1 < attempts => {
                    tracing::warn!(
                        "Race poll failed (attempt {}/{}): {}",
                        attempt + 1,
                        attempts,
                        e
                    );
                    let backoff = Duration::from_millis(
                        self.config.retry_delay_ms.saturating_mul(attempt as u64 + 1),
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn accelerate(&self, race_id: u32) -> Result<(), ClientError> {
        let url = self.race_url(race_id, Some("accelerate"));
        self.post::<()>(&url, None).await.map(|_| ())
    }
}
