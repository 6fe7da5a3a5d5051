use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{InferenceError, InferenceResult};

const SERVICE: &str = "ner";

/// One aggregated entity span as returned by a token-classification pipeline.
/// `start`/`end` are character offsets into the input text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawEntity {
    #[serde(alias = "entity")]
    pub entity_group: String,
    #[serde(default)]
    pub score: f32,
    #[serde(default)]
    pub word: String,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityKind {
    Person,
    Organization,
    Location,
    Misc,
    None,
    Other(String),
}

impl EntityKind {
    pub fn from_label(label: &str) -> Self {
        match label {
            "LABEL_0" | "O" => Self::None,
            "LABEL_1" | "PER" => Self::Person,
            "LABEL_2" | "LABEL_6" | "ORG" => Self::Organization,
            "LABEL_3" | "LABEL_5" | "LOC" => Self::Location,
            "LABEL_4" | "MISC" => Self::Misc,
            other => Self::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NamedEntities {
    pub people: Vec<String>,
    pub organizations: Vec<String>,
    pub locations: Vec<String>,
}

impl NamedEntities {
    pub fn extract(text: &str, entities: &[RawEntity]) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let mut found = Self::default();

        for entity in entities {
            let bucket = match EntityKind::from_label(&entity.entity_group) {
                EntityKind::Person => &mut found.people,
                EntityKind::Organization => &mut found.organizations,
                EntityKind::Location => &mut found.locations,
                _ => continue,
            };
            let end = entity.end.min(chars.len());
            let start = entity.start.min(end);
            let span: String = chars[start..end].iter().collect();
            if !span.trim().is_empty() {
                bucket.push(span);
            }
        }

        found
    }

    pub fn people_joined(&self) -> String {
        self.people.join(", ")
    }

    pub fn organizations_joined(&self) -> String {
        self.organizations.join(", ")
    }

    pub fn locations_joined(&self) -> String {
        self.locations.join(", ")
    }
}

#[async_trait]
pub trait EntityRecognizer: Send + Sync {
    async fn recognize(&self, text: &str) -> InferenceResult<Vec<RawEntity>>;
}

#[derive(Serialize)]
struct NerRequest<'a> {
    inputs: &'a str,
    parameters: NerParameters,
}

#[derive(Serialize)]
struct NerParameters {
    aggregation_strategy: &'static str,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NerPayload {
    Entities(Vec<RawEntity>),
    Failure { error: String },
}

pub(crate) fn parse_entities(body: &str) -> InferenceResult<Vec<RawEntity>> {
    match serde_json::from_str::<NerPayload>(body) {
        Ok(NerPayload::Entities(entities)) => Ok(entities),
        Ok(NerPayload::Failure { error }) => Err(InferenceError::upstream(SERVICE, error)),
        Err(err) => Err(InferenceError::upstream(SERVICE, err.to_string())),
    }
}

#[derive(Clone)]
pub struct HuggingFaceRecognizer {
    client: Client,
    endpoint: String,
    api_token: Option<String>,
}

impl HuggingFaceRecognizer {
    pub fn new(client: Client, endpoint: impl Into<String>, api_token: Option<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_token: api_token.filter(|token| !token.trim().is_empty()),
        }
    }
}

#[async_trait]
impl EntityRecognizer for HuggingFaceRecognizer {
    async fn recognize(&self, text: &str) -> InferenceResult<Vec<RawEntity>> {
        let payload = NerRequest {
            inputs: text,
            parameters: NerParameters {
                aggregation_strategy: "simple",
            },
        };
        let mut request = self.client.post(&self.endpoint).json(&payload);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(InferenceError::http(SERVICE))?;
        let status = response.status();
        let body = response.text().await.map_err(InferenceError::http(SERVICE))?;
        if !status.is_success() {
            return Err(InferenceError::from_status(SERVICE, status, &body));
        }

        let entities = parse_entities(&body)?;
        tracing::debug!(count = entities.len(), "recognized entities");
        Ok(entities)
    }
}
