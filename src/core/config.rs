//! Engine configuration
//!
//! Everything here is read-only once a pipeline is built. Values can come from
//! a TOML file, from the environment (prediction endpoint only), or from
//! `Default`.

use crate::core::error::{IntentError, Result};
use serde::Deserialize;
use std::path::Path;

/// Default prediction endpoint host
pub const DEFAULT_ENDPOINT: &str = "https://luis-final.cognitiveservices.azure.com";
/// Default application identifier of the published NLU app
pub const DEFAULT_APP_ID: &str = "07c0c9aa-7815-4e09-92da-787ab7310d20";
/// Default publishing slot
pub const DEFAULT_SLOT: &str = "production";

/// Configuration for the resolution pipeline
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Include per-entity confidence scores and the top intent score
    ///
    /// Off by default. When off, no `score` field appears anywhere in the
    /// resolved intent.
    pub debug: bool,

    /// Where predictions are requested from
    pub prediction: PredictionSettings,
}

/// Connection settings for the NLU prediction endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PredictionSettings {
    /// Scheme and host of the prediction service
    pub endpoint: String,
    /// Published application identifier
    pub app_id: String,
    /// Publishing slot (`production` or `staging`)
    pub slot: String,
    /// Subscription key sent with every request
    pub subscription_key: Option<String>,
}

impl Default for PredictionSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.into(),
            app_id: DEFAULT_APP_ID.into(),
            slot: DEFAULT_SLOT.into(),
            subscription_key: None,
        }
    }
}

impl EngineConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML text, then validate it
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        self.prediction.validate()
    }
}

impl PredictionSettings {
    /// Build settings from environment variables
    ///
    /// Required: NLU_SUBSCRIPTION_KEY
    /// Optional: NLU_ENDPOINT, NLU_APP_ID, NLU_SLOT
    pub fn from_env() -> Result<Self> {
        let subscription_key = std::env::var("NLU_SUBSCRIPTION_KEY")
            .map_err(|_| IntentError::ConfigError("NLU_SUBSCRIPTION_KEY not set".into()))?;
        let defaults = Self::default();

        let settings = Self {
            endpoint: std::env::var("NLU_ENDPOINT").unwrap_or(defaults.endpoint),
            app_id: std::env::var("NLU_APP_ID").unwrap_or(defaults.app_id),
            slot: std::env::var("NLU_SLOT").unwrap_or(defaults.slot),
            subscription_key: Some(subscription_key),
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("endpoint", &self.endpoint),
            ("app_id", &self.app_id),
            ("slot", &self.slot),
        ] {
            if value.trim().is_empty() {
                return Err(IntentError::ConfigError(format!(
                    "prediction.{} must not be empty",
                    name
                )));
            }
        }
        Ok(())
    }

    /// Full predict URL without query parameters
    pub fn predict_url(&self) -> String {
        format!(
            "{}/luis/prediction/v3.0/apps/{}/slots/{}/predict",
            self.endpoint.trim_end_matches('/'),
            self.app_id,
            self.slot
        )
    }
}
