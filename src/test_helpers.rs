use std::{
    io,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use axum::Router;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};

use crate::{
    config::AppConfig,
    inference::{
        Article, ArticleFetcher, Classification, Classifier, EntityRecognizer, Inference,
        InferenceError, InferenceResult, RawEntity, Summarizer,
    },
    routes::router,
    state::AppState,
};

pub const TEST_SECRET: &str = "test-secret";

/// In-memory log sink for asserting on formatted tracing output.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    pub fn contents(&self) -> String {
        let bytes = self.0.lock().map(|buf| buf.clone()).unwrap_or_default();
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Ok(mut sink) = self.0.lock() {
            sink.extend_from_slice(buf);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub struct FakeClassifier(pub String);

#[async_trait]
impl Classifier for FakeClassifier {
    async fn classify(&self, _text: &str) -> InferenceResult<Classification> {
        Ok(Classification {
            index: 0,
            label: self.0.clone(),
            score: 1.0,
        })
    }
}

pub struct FakeSummarizer(pub String);

#[async_trait]
impl Summarizer for FakeSummarizer {
    async fn summarize(&self, _text: &str) -> InferenceResult<String> {
        Ok(self.0.clone())
    }
}

pub struct FailingSummarizer;

#[async_trait]
impl Summarizer for FailingSummarizer {
    async fn summarize(&self, _text: &str) -> InferenceResult<String> {
        Err(InferenceError::upstream("summarizer", "Model is currently loading"))
    }
}

pub struct FakeRecognizer(pub Vec<RawEntity>);

#[async_trait]
impl EntityRecognizer for FakeRecognizer {
    async fn recognize(&self, _text: &str) -> InferenceResult<Vec<RawEntity>> {
        Ok(self.0.clone())
    }
}

/// Serves a canned article; `None` behaves like an unreachable host.
pub struct FakeFetcher(pub Option<Article>);

#[async_trait]
impl ArticleFetcher for FakeFetcher {
    async fn fetch(&self, url: &str) -> InferenceResult<Article> {
        self.0
            .clone()
            .ok_or_else(|| InferenceError::upstream("article fetcher", format!("{url} unreachable")))
    }
}

pub fn fake_inference() -> Inference {
    Inference::new(
        Arc::new(FakeClassifier("খেলাধুলা".to_string())),
        Arc::new(FakeSummarizer("বাংলাদেশ দল সিরিজ জিতেছে".to_string())),
        None,
        Arc::new(FakeFetcher(None)),
    )
}

pub fn test_config() -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.auth.jwt_secret = TEST_SECRET.to_string();
    cfg
}

pub fn test_state(db: DatabaseConnection, inference: Inference) -> Arc<AppState> {
    AppState::new(test_config(), db, inference)
}

pub fn test_router() -> Router {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    router(test_state(db, fake_inference()))
}

/// Serves `app` on an ephemeral loopback port and returns its base URL.
pub async fn spawn_stub(app: Router) -> io::Result<String> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        if let Err(err) = axum::serve(listener, app).await {
            tracing::warn!(error = %err, "stub server stopped");
        }
    });
    Ok(format!("http://{addr}"))
}

/// HTTP client that talks to stub servers directly, ignoring proxy settings.
pub fn loopback_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder().no_proxy().build()
}
