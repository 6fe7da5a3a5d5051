pub mod article;
pub mod classifier;
mod error;
pub mod ner;
pub mod summarizer;
pub mod text;

use std::{sync::Arc, time::Duration};

use anyhow::Context;
use reqwest::Client;

pub use article::{Article, ArticleFetcher, HttpArticleFetcher, extract_article, is_url};
pub use classifier::{CategoryLabels, Classification, Classifier, RemoteClassifier};
pub use error::{InferenceError, InferenceResult};
pub use ner::{EntityKind, EntityRecognizer, HuggingFaceRecognizer, NamedEntities, RawEntity};
pub use summarizer::{HuggingFaceSummarizer, Summarizer, title_from_summary};
pub use text::{Vectorizer, Vocabulary};

use crate::config::InferenceConfig;

/// The external model capabilities a prediction needs. Built once at start-up.
#[derive(Clone)]
pub struct Inference {
    pub classifier: Arc<dyn Classifier>,
    pub summarizer: Arc<dyn Summarizer>,
    pub recognizer: Option<Arc<dyn EntityRecognizer>>,
    pub fetcher: Arc<dyn ArticleFetcher>,
}

impl Inference {
    pub fn new(
        classifier: Arc<dyn Classifier>,
        summarizer: Arc<dyn Summarizer>,
        recognizer: Option<Arc<dyn EntityRecognizer>>,
        fetcher: Arc<dyn ArticleFetcher>,
    ) -> Self {
        Self {
            classifier,
            summarizer,
            recognizer,
            fetcher,
        }
    }

    pub fn from_config(cfg: &InferenceConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.request_timeout_secs))
            .build()
            .context("failed to build inference HTTP client")?;

        let vocabulary = Vocabulary::load(&cfg.vocabulary_path, cfg.max_tokens)
            .context("failed to load classifier vocabulary")?;
        tracing::info!(
            path = %cfg.vocabulary_path,
            tokens = vocabulary.len(),
            "loaded classifier vocabulary"
        );
        let vectorizer = Vectorizer::new(vocabulary, cfg.sequence_length);
        let labels = CategoryLabels::new(cfg.category_labels.clone());

        let api_token = Some(cfg.summarizer_api_token.clone());
        let classifier = RemoteClassifier::new(
            client.clone(),
            cfg.classifier_url.clone(),
            vectorizer,
            labels,
        );
        let summarizer =
            HuggingFaceSummarizer::new(client.clone(), cfg.summarizer_url.clone(), api_token.clone());
        let recognizer: Option<Arc<dyn EntityRecognizer>> = if cfg.ner_enabled {
            Some(Arc::new(HuggingFaceRecognizer::new(
                client.clone(),
                cfg.ner_url.clone(),
                api_token,
            )))
        } else {
            None
        };
        let fetcher = HttpArticleFetcher::new(client);

        Ok(Self::new(
            Arc::new(classifier),
            Arc::new(summarizer),
            recognizer,
            Arc::new(fetcher),
        ))
    }
}
