use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use shared::{
    domain::{ExplanationResult, PredictionResult},
    error::ClientError,
    protocol::{ExplainResponse, PredictResponse, TextRequest, EXPLAIN_PATH, PREDICT_PATH},
};
use tracing::{debug, info, warn};

pub mod config;
pub mod controller;
pub mod render;
pub mod session;

pub use config::{load_settings, Settings, SettingsError};
pub use controller::{
    ApiCall, CallOutcome, ClearMode, Controller, Notice, NoticeLevel, Outcome, Step, SubmitAction,
    UserAction,
};
pub use session::{SessionPhase, SessionState, SessionStore};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// The two operations offered by the classification service.
#[async_trait]
pub trait SentimentApi: Send + Sync {
    async fn predict(&self, text: &str) -> Result<PredictionResult, ClientError>;
    async fn explain(&self, text: &str) -> Result<ExplanationResult, ClientError>;
}

#[async_trait]
impl<T> SentimentApi for Arc<T>
where
    T: SentimentApi + ?Sized,
{
    async fn predict(&self, text: &str) -> Result<PredictionResult, ClientError> {
        (**self).predict(text).await
    }

    async fn explain(&self, text: &str) -> Result<ExplanationResult, ClientError> {
        (**self).explain(text).await
    }
}

/// reqwest-backed client. One attempt per call, bounded by the configured timeout.
#[derive(Debug, Clone)]
pub struct HttpSentimentClient {
    http: Client,
    base_url: String,
}

impl HttpSentimentClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, reqwest::Error> {
        Self::new(settings.base_url.clone(), settings.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post_text<T: DeserializeOwned>(&self, path: &str, text: &str) -> Result<T, ClientError> {
        let url = format!("{}{path}", self.base_url);
        let started = Instant::now();
        debug!(%url, chars = text.chars().count(), "issuing classification request");

        let res = self
            .http
            .post(&url)
            .json(&TextRequest {
                text: text.to_string(),
            })
            .send()
            .await
            .map_err(|err| transport_error(&url, err))?;

        let status = res.status();
        if status != StatusCode::OK {
            warn!(%url, status = status.as_u16(), "classification request rejected");
            return Err(ClientError::Api {
                status: status.as_u16(),
            });
        }

        let body = res.bytes().await.map_err(|err| transport_error(&url, err))?;
        let decoded = serde_json::from_slice::<T>(&body).map_err(|err| {
            warn!(%url, "undecodable response body: {err}");
            ClientError::MalformedResponse {
                status: status.as_u16(),
                reason: err.to_string(),
            }
        })?;

        info!(
            %url,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "classification request completed"
        );
        Ok(decoded)
    }
}

fn transport_error(url: &str, err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        warn!(%url, "classification request timed out");
        ClientError::Timeout
    } else {
        warn!(%url, "classification service unreachable: {err}");
        ClientError::Unreachable {
            reason: err.to_string(),
        }
    }
}

#[async_trait]
impl SentimentApi for HttpSentimentClient {
    async fn predict(&self, text: &str) -> Result<PredictionResult, ClientError> {
        let response: PredictResponse = self.post_text(PREDICT_PATH, text).await?;
        let result = PredictionResult::from(response);
        if !result.is_consistent() {
            warn!(
                confidence = result.confidence,
                probability_negative = result.probability_negative,
                probability_positive = result.probability_positive,
                "prediction probabilities are inconsistent"
            );
        }
        Ok(result)
    }

    async fn explain(&self, text: &str) -> Result<ExplanationResult, ClientError> {
        let response: ExplainResponse = self.post_text(EXPLAIN_PATH, text).await?;
        Ok(response.into())
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
