use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{InferenceError, InferenceResult, text::Vectorizer};

const SERVICE: &str = "classifier";

pub const DEFAULT_CATEGORY_LABELS: [&str; 13] = [
    "দুর্ঘটনা",
    "বাংলাদেশ",
    "বাণিজ্য",
    "অপরাধ",
    "অর্থনীতি",
    "শিক্ষা",
    "বিনোদন",
    "দুর্যোগ",
    "আন্তর্জাতিক",
    "মতামত",
    "রাজনৈতিক",
    "খেলাধুলা",
    "Technology",
];

#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub index: usize,
    pub label: String,
    pub score: f32,
}

#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, text: &str) -> InferenceResult<Classification>;
}

/// Index to label table for the classifier's output layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryLabels(Vec<String>);

impl CategoryLabels {
    pub fn new(labels: Vec<String>) -> Self {
        Self(labels)
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn resolve(&self, scores: &[f32]) -> InferenceResult<Classification> {
        let (index, score) = argmax(scores)
            .ok_or_else(|| InferenceError::upstream(SERVICE, "empty prediction vector"))?;
        let label = self.get(index).ok_or_else(|| {
            InferenceError::upstream(
                SERVICE,
                format!(
                    "predicted class {index} has no label ({} labels configured)",
                    self.len()
                ),
            )
        })?;
        Ok(Classification {
            index,
            label: label.to_string(),
            score,
        })
    }
}

impl Default for CategoryLabels {
    fn default() -> Self {
        Self(
            DEFAULT_CATEGORY_LABELS
                .iter()
                .map(|label| label.to_string())
                .collect(),
        )
    }
}

/// First index holding the largest finite score.
pub fn argmax(scores: &[f32]) -> Option<(usize, f32)> {
    scores
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, score)| score.is_finite())
        .fold(None, |best, (idx, score)| match best {
            Some((_, top)) if top >= score => best,
            _ => Some((idx, score)),
        })
}

#[derive(Serialize)]
struct PredictRequest<'a> {
    instances: [&'a [i64]; 1],
}

#[derive(Deserialize)]
struct PredictResponse {
    predictions: Vec<Vec<f32>>,
}

pub(crate) fn parse_scores(body: &str) -> InferenceResult<Vec<f32>> {
    let payload: PredictResponse = serde_json::from_str(body)
        .map_err(|err| InferenceError::upstream(SERVICE, err.to_string()))?;
    payload
        .predictions
        .into_iter()
        .next()
        .ok_or_else(|| InferenceError::upstream(SERVICE, "no predictions returned"))
}

/// Classifier served behind a TensorFlow Serving style REST endpoint.
#[derive(Clone)]
pub struct RemoteClassifier {
    client: Client,
    endpoint: String,
    vectorizer: Vectorizer,
    labels: CategoryLabels,
}

impl RemoteClassifier {
    pub fn new(
        client: Client,
        endpoint: impl Into<String>,
        vectorizer: Vectorizer,
        labels: CategoryLabels,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            vectorizer,
            labels,
        }
    }
}

#[async_trait]
impl Classifier for RemoteClassifier {
    async fn classify(&self, text: &str) -> InferenceResult<Classification> {
        let ids = self.vectorizer.vectorize(text);
        let response = self
            .client
            .post(&self.endpoint)
            .json(&PredictRequest { instances: [ids.as_slice()] })
            .send()
            .await
            .map_err(InferenceError::http(SERVICE))?;

        let status = response.status();
        let body = response.text().await.map_err(InferenceError::http(SERVICE))?;
        if !status.is_success() {
            return Err(InferenceError::from_status(SERVICE, status, &body));
        }

        let scores = parse_scores(&body)?;
        let classification = self.labels.resolve(&scores)?;
        tracing::debug!(
            index = classification.index,
            label = %classification.label,
            score = classification.score,
            "classified text"
        );
        Ok(classification)
    }
}
