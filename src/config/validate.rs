use anyhow::{Result, bail};

use super::AppConfig;

pub fn validate(cfg: &AppConfig) -> Result<()> {
    let mut errors: Vec<String> = Vec::new();

    if cfg.general.host.trim().is_empty() {
        errors.push("general.host must not be empty".to_string());
    }

    if cfg.general.port == 0 {
        errors.push("general.port must be > 0".to_string());
    }

    if cfg.database.url.trim().is_empty() {
        errors.push("database.url must not be empty".to_string());
    }

    if cfg.database.min_idle > cfg.database.max_connections {
        errors.push(format!(
            "database.min_idle ({}) must be <= database.max_connections ({})",
            cfg.database.min_idle, cfg.database.max_connections
        ));
    }

    if cfg.auth.jwt_secret.trim().is_empty() {
        errors.push("auth.jwt_secret must not be empty".to_string());
    }

    if cfg.auth.token_ttl_secs == 0 {
        errors.push("auth.token_ttl_secs must be > 0".to_string());
    }

    let inference = &cfg.inference;
    if url::Url::parse(&inference.classifier_url).is_err() {
        errors.push("inference.classifier_url must be a valid URL".to_string());
    }

    if url::Url::parse(&inference.summarizer_url).is_err() {
        errors.push("inference.summarizer_url must be a valid URL".to_string());
    }

    if inference.ner_enabled && url::Url::parse(&inference.ner_url).is_err() {
        errors.push("inference.ner_url must be a valid URL when NER is enabled".to_string());
    }

    if inference.max_tokens < 3 {
        errors.push("inference.max_tokens must be >= 3".to_string());
    }

    if inference.sequence_length == 0 {
        errors.push("inference.sequence_length must be > 0".to_string());
    }

    if inference.category_labels.is_empty() {
        errors.push("inference.category_labels must not be empty".to_string());
    }

    if inference.request_timeout_secs == 0 {
        errors.push("inference.request_timeout_secs must be > 0".to_string());
    }

    if errors.is_empty() {
        return Ok(());
    }

    bail!("invalid app config:\n- {}", errors.join("\n- "))
}
