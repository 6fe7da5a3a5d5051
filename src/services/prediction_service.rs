use uuid::Uuid;

use crate::{
    db::dao::NewEventLog,
    error::AppError,
    inference::{Inference, NamedEntities, is_url, title_from_summary},
    services::event_log_service::EventLogService,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub category: String,
    pub summary: String,
    pub title: String,
    /// `None` when entity recognition is disabled.
    pub entities: Option<NamedEntities>,
}

pub struct PredictionService<'a> {
    inference: &'a Inference,
    event_logs: EventLogService,
}

impl<'a> PredictionService<'a> {
    pub fn new(inference: &'a Inference, event_logs: EventLogService) -> Self {
        Self {
            inference,
            event_logs,
        }
    }

    /// Turns the submitted input into the text that gets classified: a URL is
    /// fetched and reduced to its article body, anything else is used as is.
    pub async fn resolve_corpus(&self, input: &str) -> Result<String, AppError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(AppError::bad_request("No text provided"));
        }
        if !is_url(input) {
            return Ok(input.to_string());
        }

        let article = self.inference.fetcher.fetch(input).await?;
        if article.text.trim().is_empty() {
            return Err(AppError::unprocessable("Could not extract article text"));
        }
        Ok(article.text)
    }

    pub async fn predict(&self, user_id: &Uuid, input: &str) -> Result<Prediction, AppError> {
        let corpus = self.resolve_corpus(input).await?;

        let entities = async {
            match &self.inference.recognizer {
                Some(recognizer) => recognizer
                    .recognize(&corpus)
                    .await
                    .map(|raw| Some(NamedEntities::extract(&corpus, &raw))),
                None => Ok(None),
            }
        };
        let (classification, summary, entities) = tokio::try_join!(
            self.inference.classifier.classify(&corpus),
            self.inference.summarizer.summarize(&corpus),
            entities,
        )?;

        let title = title_from_summary(&summary);
        let prediction = Prediction {
            category: classification.label,
            summary,
            title,
            entities,
        };

        self.event_logs
            .record(NewEventLog {
                user_id: *user_id,
                corpus,
                event: prediction.category.clone(),
                title: prediction.title.clone(),
                summary: prediction.summary.clone(),
                people: prediction.entities.as_ref().map(NamedEntities::people_joined),
                orgs: prediction
                    .entities
                    .as_ref()
                    .map(NamedEntities::organizations_joined),
                locations: prediction
                    .entities
                    .as_ref()
                    .map(NamedEntities::locations_joined),
            })
            .await?;

        Ok(prediction)
    }
}
