use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::inference::classifier::DEFAULT_CATEGORY_LABELS;

use super::{defaults, envconfig::EnvConfig, validate};

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub logging: LoggingConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub inference: InferenceConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        <Self as EnvConfig>::from_env()
    }
}

impl EnvConfig for AppConfig {
    fn list_keys() -> &'static [&'static str] {
        &["general.cors_origins", "inference.category_labels"]
    }

    fn validate(&self) -> Result<()> {
        validate::validate(self)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneralConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            host: defaults::DEFAULT_HOST.to_string(),
            port: defaults::DEFAULT_PORT,
            cors_origins: defaults::DEFAULT_CORS_ORIGINS
                .iter()
                .map(|origin| origin.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub rust_log: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            rust_log: defaults::DEFAULT_RUST_LOG.to_string(),
            format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_idle: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: defaults::DEFAULT_DATABASE_URL.to_string(),
            max_connections: defaults::DEFAULT_DB_MAX_CONNECTIONS,
            min_idle: defaults::DEFAULT_DB_MIN_IDLE,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        // Release builds must supply APP_AUTH__JWT_SECRET; validation rejects the empty default.
        let jwt_secret = if cfg!(debug_assertions) {
            defaults::DEBUG_JWT_SECRET.to_string()
        } else {
            String::new()
        };
        Self {
            jwt_secret,
            token_ttl_secs: defaults::DEFAULT_TOKEN_TTL_SECS,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct InferenceConfig {
    pub classifier_url: String,
    pub vocabulary_path: String,
    pub max_tokens: usize,
    pub sequence_length: usize,
    pub category_labels: Vec<String>,
    pub summarizer_url: String,
    pub summarizer_api_token: String,
    pub ner_enabled: bool,
    pub ner_url: String,
    pub request_timeout_secs: u64,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            classifier_url: defaults::DEFAULT_CLASSIFIER_URL.to_string(),
            vocabulary_path: defaults::DEFAULT_VOCABULARY_PATH.to_string(),
            max_tokens: defaults::DEFAULT_MAX_TOKENS,
            sequence_length: defaults::DEFAULT_SEQUENCE_LENGTH,
            category_labels: DEFAULT_CATEGORY_LABELS
                .iter()
                .map(|label| label.to_string())
                .collect(),
            summarizer_url: defaults::DEFAULT_SUMMARIZER_URL.to_string(),
            summarizer_api_token: String::new(),
            ner_enabled: false,
            ner_url: defaults::DEFAULT_NER_URL.to_string(),
            request_timeout_secs: defaults::DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}
