use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{InferenceError, InferenceResult};

const SERVICE: &str = "summarizer";

#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, text: &str) -> InferenceResult<String>;
}

/// First two whitespace-separated words of a summary.
pub fn title_from_summary(summary: &str) -> String {
    summary.split_whitespace().take(2).collect::<Vec<_>>().join(" ")
}

#[derive(Serialize)]
struct SummaryRequest<'a> {
    inputs: &'a str,
}

#[derive(Deserialize)]
struct SummaryItem {
    summary_text: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SummaryPayload {
    Summaries(Vec<SummaryItem>),
    Failure { error: String },
}

pub(crate) fn parse_summary(body: &str) -> InferenceResult<String> {
    let payload: SummaryPayload = serde_json::from_str(body)
        .map_err(|err| InferenceError::upstream(SERVICE, err.to_string()))?;
    match payload {
        SummaryPayload::Summaries(items) => items
            .into_iter()
            .next()
            .map(|item| item.summary_text.trim().to_string())
            .ok_or_else(|| InferenceError::upstream(SERVICE, "no summary returned")),
        SummaryPayload::Failure { error } => Err(InferenceError::upstream(SERVICE, error)),
    }
}

/// Hosted summarization model reached through the Hugging Face inference API.
#[derive(Clone)]
pub struct HuggingFaceSummarizer {
    client: Client,
    endpoint: String,
    api_token: Option<String>,
}

impl HuggingFaceSummarizer {
    pub fn new(client: Client, endpoint: impl Into<String>, api_token: Option<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_token: api_token.filter(|token| !token.trim().is_empty()),
        }
    }
}

#[async_trait]
impl Summarizer for HuggingFaceSummarizer {
    async fn summarize(&self, text: &str) -> InferenceResult<String> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&SummaryRequest { inputs: text });
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(InferenceError::http(SERVICE))?;
        let status = response.status();
        let body = response.text().await.map_err(InferenceError::http(SERVICE))?;
        if !status.is_success() {
            return Err(InferenceError::from_status(SERVICE, status, &body));
        }

        parse_summary(&body)
    }
}
