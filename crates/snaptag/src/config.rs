//! Run configuration: provider selection and metadata constraints.

use secrecy::SecretString;
use serde::Deserialize;

use crate::error::ConfigError;

const TITLE_LIMIT_RANGE: (u32, u32) = (5, 200);
const DESCRIPTION_LIMIT_RANGE: (u32, u32) = (5, 200);
const KEYWORD_LIMIT_RANGE: (u32, u32) = (5, 49);

/// Character and count limits forwarded to the analysis provider.
///
/// The engine passes these through untouched; enforcement happens on the
/// provider side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MetadataLimits {
    /// Maximum title length in characters.
    pub title_limit: u32,
    /// Maximum description length in characters.
    pub description_limit: u32,
    /// Maximum number of keywords.
    pub keyword_limit: u32,
}

impl Default for MetadataLimits {
    fn default() -> Self {
        Self {
            title_limit: 150,
            description_limit: 150,
            keyword_limit: 25,
        }
    }
}

impl MetadataLimits {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("titleLimit", self.title_limit, TITLE_LIMIT_RANGE)?;
        check_range(
            "descriptionLimit",
            self.description_limit,
            DESCRIPTION_LIMIT_RANGE,
        )?;
        check_range("keywordLimit", self.keyword_limit, KEYWORD_LIMIT_RANGE)?;
        Ok(())
    }
}

fn check_range(field: &'static str, value: u32, (min, max): (u32, u32)) -> Result<(), ConfigError> {
    if value < min || value > max {
        return Err(ConfigError::LimitOutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

/// Provider credentials and model selection. Opaque to the engine; consumed
/// only by the analyzer. The API key is resolved by the caller (settings
/// store, env var) and handed in already wrapped.
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    /// API key, never logged.
    pub api_key: SecretString,
    /// Provider model identifier.
    pub model: String,
    /// Analysis endpoint URL.
    pub endpoint: String,
}

impl ProviderSettings {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            api_key: SecretString::from(api_key.into()),
            model: model.into(),
            endpoint: endpoint.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::MissingModel);
        }
        if self.endpoint.trim().is_empty() {
            return Err(ConfigError::MissingEndpoint);
        }
        Ok(())
    }
}

/// Fixed configuration for one batch run.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub provider: ProviderSettings,
    pub limits: MetadataLimits,
}

impl BatchConfig {
    pub fn new(provider: ProviderSettings) -> Self {
        Self {
            provider,
            limits: MetadataLimits::default(),
        }
    }

    pub fn with_limits(provider: ProviderSettings, limits: MetadataLimits) -> Self {
        Self { provider, limits }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.provider.validate()?;
        self.limits.validate()
    }
}
