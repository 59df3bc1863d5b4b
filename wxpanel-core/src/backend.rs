use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use std::{fmt::Debug, time::Duration};

use crate::{
    Config,
    error::BackendError,
    model::{RefreshAck, WeatherReading},
};

pub const WEATHER_ENDPOINT: &str = "/api/weather";
pub const REFRESH_ENDPOINT: &str = "/api/refresh";

/// Source of readings and refreshes for the display controller.
#[async_trait]
pub trait WeatherBackend: Send + Sync + Debug {
    /// `GET /api/weather`.
    async fn fetch_weather(&self) -> Result<WeatherReading, BackendError>;

    /// `GET /api/refresh`: ask the backend to re-acquire its data.
    async fn request_refresh(&self) -> Result<RefreshAck, BackendError>;
}

/// [`WeatherBackend`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: Url,
    http: Client,
}

impl HttpBackend {
    /// No timeout: a hung request waits forever, like the browser page did.
    pub fn new(base_url: Url) -> Result<Self, BackendError> {
        Self::with_timeout(base_url, None)
    }

    pub fn with_timeout(mut base_url: Url, timeout: Option<Duration>) -> Result<Self, BackendError> {
        if base_url.cannot_be_a_base() {
            return Err(BackendError::InvalidUrl(base_url.to_string()));
        }
        // Endpoints are joined relative to the base, so keep its path as a directory.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(BackendError::Client)?;

        Ok(Self { base_url, http })
    }

    pub fn from_config(config: &Config) -> Result<Self, BackendError> {
        Self::with_timeout(config.backend_url()?, config.timeout())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint_url(&self, endpoint: &str) -> Result<Url, BackendError> {
        self.base_url
            .join(endpoint.trim_start_matches('/'))
            .map_err(|_| BackendError::InvalidUrl(format!("{}{}", self.base_url, endpoint)))
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, BackendError> {
        let url = self.endpoint_url(endpoint)?;
        tracing::debug!(%url, "requesting");

        let res = self.http.get(url).send().await.map_err(|source| BackendError::Transport {
            endpoint: endpoint.to_string(),
            source,
        })?;

        // The backend reports its own failures inside the JSON body, so the
        // HTTP status only matters when the body does not decode.
        let status = res.status();
        let body = res.text().await.map_err(|source| BackendError::Transport {
            endpoint: endpoint.to_string(),
            source,
        })?;

        serde_json::from_str(&body).map_err(|source| BackendError::Decode {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            body: truncate_body(&body),
            source,
        })
    }
}

#[async_trait]
impl WeatherBackend for HttpBackend {
    async fn fetch_weather(&self) -> Result<WeatherReading, BackendError> {
        self.get_json(WEATHER_ENDPOINT).await
    }

    async fn request_refresh(&self) -> Result<RefreshAck, BackendError> {
        self.get_json(REFRESH_ENDPOINT).await
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
