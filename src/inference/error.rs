use reqwest::StatusCode;

use crate::error::AppError;

pub type InferenceResult<T> = Result<T, InferenceError>;

#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("{service} request failed: {source}")]
    Http {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{service} returned an invalid response: {message}")]
    Upstream {
        service: &'static str,
        message: String,
    },
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{0}")]
    InvalidInput(String),
}

impl InferenceError {
    pub fn http(service: &'static str) -> impl FnOnce(reqwest::Error) -> Self {
        move |source| Self::Http { service, source }
    }

    pub fn upstream(service: &'static str, message: impl Into<String>) -> Self {
        Self::Upstream {
            service,
            message: message.into(),
        }
    }

    /// Builds an upstream error from a non-2xx reply, preferring an `{"error": ...}` body.
    pub fn from_status(service: &'static str, status: StatusCode, body: &str) -> Self {
        #[derive(serde::Deserialize)]
        struct ErrorPayload {
            error: String,
        }

        let detail = serde_json::from_str::<ErrorPayload>(body)
            .map(|payload| payload.error)
            .unwrap_or_else(|_| body.trim().chars().take(200).collect());
        if detail.is_empty() {
            Self::upstream(service, format!("status {status}"))
        } else {
            Self::upstream(service, format!("status {status}: {detail}"))
        }
    }
}

impl From<InferenceError> for AppError {
    fn from(err: InferenceError) -> Self {
        match err {
            InferenceError::InvalidInput(message) => AppError::bad_request(message),
            InferenceError::Io { .. } => AppError::internal(err.to_string()),
            InferenceError::Http { .. } | InferenceError::Upstream { .. } => {
                AppError::bad_gateway(err.to_string())
            }
        }
    }
}
