//! Prediction client seam
//!
//! The resolution engine never talks to the network itself. It is handed a
//! `PredictionDocument` by whatever implements `PredictionClient`. The HTTP
//! adapter below issues one GET per query; retries and caching are left to the
//! caller.

use crate::core::config::PredictionSettings;
use crate::core::error::{IntentError, Result};
use crate::prediction::document::PredictionDocument;
use async_trait::async_trait;
use reqwest::Client;

/// Anything that can turn prepared query text into a prediction
#[async_trait]
pub trait PredictionClient: Send + Sync {
    async fn predict(&self, query: &str) -> Result<PredictionDocument>;
}

/// Calls the prediction REST endpoint over HTTP
pub struct HttpPredictionClient {
    client: Client,
    predict_url: String,
    subscription_key: String,
}

impl HttpPredictionClient {
    /// Create a client from explicit settings
    pub fn new(settings: &PredictionSettings) -> Result<Self> {
        settings.validate()?;
        let subscription_key = settings
            .subscription_key
            .clone()
            .ok_or_else(|| IntentError::ConfigError("subscription_key not set".into()))?;

        Ok(Self {
            client: Client::new(),
            predict_url: settings.predict_url(),
            subscription_key,
        })
    }

    /// Create a client from environment variables
    ///
    /// See [`PredictionSettings::from_env`].
    pub fn from_env() -> Result<Self> {
        Self::new(&PredictionSettings::from_env()?)
    }

    /// Query parameters sent with every request
    fn params<'a>(&'a self, query: &'a str) -> [(&'static str, &'a str); 5] {
        [
            ("subscription-key", self.subscription_key.as_str()),
            ("verbose", "true"),
            ("show-all-intents", "true"),
            ("log", "true"),
            ("query", query),
        ]
    }
}

#[async_trait]
impl PredictionClient for HttpPredictionClient {
    async fn predict(&self, query: &str) -> Result<PredictionDocument> {
        tracing::debug!(query, "requesting prediction");

        let response = self
            .client
            .get(&self.predict_url)
            .query(&self.params(query))
            .send()
            .await
            .map_err(|e| IntentError::PredictionError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(IntentError::PredictionError(format!(
                "API error {}: {}",
                status, error_text
            )));
        }

        response
            .json::<PredictionDocument>()
            .await
            .map_err(|e| IntentError::PredictionError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(key: Option<&str>) -> PredictionSettings {
        PredictionSettings {
            endpoint: "https://nlu.example.test".into(),
            app_id: "app-1".into(),
            slot: "staging".into(),
            subscription_key: key.map(str::to_string),
        }
    }

    #[test]
    fn test_client_creation() {
        let client = HttpPredictionClient::new(&settings(Some("test-key"))).unwrap();
        assert_eq!(client.subscription_key, "test-key");
        assert_eq!(
            client.predict_url,
            "https://nlu.example.test/luis/prediction/v3.0/apps/app-1/slots/staging/predict"
        );
    }

    #[test]
    fn test_missing_key_rejected() {
        let result = HttpPredictionClient::new(&settings(None));
        assert!(matches!(result, Err(IntentError::ConfigError(_))));
    }

    #[test]
    fn test_flags_always_requested() {
        let client = HttpPredictionClient::new(&settings(Some("k"))).unwrap();
        let params = client.params("next page");
        assert!(params.contains(&("verbose", "true")));
        assert!(params.contains(&("show-all-intents", "true")));
        assert!(params.contains(&("query", "next page")));
    }

    #[test]
    fn test_from_env_missing_key() {
        let result = HttpPredictionClient::from_env();
        if std::env::var("NLU_SUBSCRIPTION_KEY").is_err() {
            assert!(result.is_err());
        }
    }
}
