use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;
use reqwest::{Client, header};
use url::Url;

use super::{InferenceError, InferenceResult};

const SERVICE: &str = "article fetcher";
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Article {
    pub title: Option<String>,
    pub text: String,
}

#[async_trait]
pub trait ArticleFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> InferenceResult<Article>;
}

pub fn is_url(input: &str) -> bool {
    Url::parse(input.trim())
        .map(|url| !url.scheme().is_empty() && url.host_str().is_some_and(|host| !host.is_empty()))
        .unwrap_or(false)
}

#[derive(Clone)]
pub struct HttpArticleFetcher {
    client: Client,
}

impl HttpArticleFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ArticleFetcher for HttpArticleFetcher {
    async fn fetch(&self, url: &str) -> InferenceResult<Article> {
        let response = self
            .client
            .get(url.trim())
            .header(header::USER_AGENT, USER_AGENT)
            .send()
            .await
            .map_err(InferenceError::http(SERVICE))?;

        let status = response.status();
        let body = response.text().await.map_err(InferenceError::http(SERVICE))?;
        if !status.is_success() {
            return Err(InferenceError::from_status(SERVICE, status, &body));
        }

        let article = extract_article(&body);
        tracing::debug!(
            url,
            title = article.title.as_deref().unwrap_or_default(),
            chars = article.text.chars().count(),
            "fetched article"
        );
        Ok(article)
    }
}

struct ArticleRegex {
    og_title: Regex,
    og_title_reversed: Regex,
    title: Regex,
    noise: Regex,
    article: Regex,
    body: Regex,
    paragraph: Regex,
    tag: Regex,
    whitespace: Regex,
}

impl ArticleRegex {
    fn get() -> Option<&'static Self> {
        static INSTANCE: OnceLock<Option<ArticleRegex>> = OnceLock::new();
        INSTANCE
            .get_or_init(|| {
                Some(Self {
                    og_title: Regex::new(
                        r#"(?is)<meta[^>]*property\s*=\s*["']og:title["'][^>]*content\s*=\s*["']([^"']*)["']"#,
                    )
                    .ok()?,
                    og_title_reversed: Regex::new(
                        r#"(?is)<meta[^>]*content\s*=\s*["']([^"']*)["'][^>]*property\s*=\s*["']og:title["']"#,
                    )
                    .ok()?,
                    title: Regex::new(r"(?is)<title[^>]*>(.*?)</title>").ok()?,
                    noise: Regex::new(
                        r"(?is)<script\b[^>]*>.*?</script>|<style\b[^>]*>.*?</style>|<noscript\b[^>]*>.*?</noscript>|<!--.*?-->",
                    )
                    .ok()?,
                    article: Regex::new(r"(?is)<article\b[^>]*>(.*?)</article>").ok()?,
                    body: Regex::new(r"(?is)<body\b[^>]*>(.*)</body>").ok()?,
                    paragraph: Regex::new(r"(?is)<p\b[^>]*>(.*?)</p>").ok()?,
                    tag: Regex::new(r"(?s)<[^>]+>").ok()?,
                    whitespace: Regex::new(r"\s+").ok()?,
                })
            })
            .as_ref()
    }
}

fn capture<'h>(haystack: &'h str, re: &Regex) -> Option<&'h str> {
    re.captures(haystack)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

fn clean_text(re: &ArticleRegex, fragment: &str) -> String {
    let stripped = re.tag.replace_all(fragment, " ");
    let decoded = html_escape::decode_html_entities(&stripped);
    re.whitespace.replace_all(&decoded, " ").trim().to_string()
}

/// Pulls the headline and paragraph text out of a news page.
pub fn extract_article(html: &str) -> Article {
    let Some(re) = ArticleRegex::get() else {
        return Article::default();
    };

    let title = capture(html, &re.og_title)
        .or_else(|| capture(html, &re.og_title_reversed))
        .or_else(|| capture(html, &re.title))
        .map(|raw| clean_text(re, raw))
        .filter(|title| !title.is_empty());

    let cleaned = re.noise.replace_all(html, " ");
    let region = capture(&cleaned, &re.article)
        .or_else(|| capture(&cleaned, &re.body))
        .unwrap_or(&cleaned);

    let paragraphs: Vec<String> = re
        .paragraph
        .captures_iter(region)
        .filter_map(|c| c.get(1))
        .map(|m| clean_text(re, m.as_str()))
        .filter(|paragraph| !paragraph.is_empty())
        .collect();

    let text = if paragraphs.is_empty() {
        clean_text(re, region)
    } else {
        paragraphs.join("\n\n")
    };

    Article { title, text }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Router, http::HeaderMap, response::Html, routing::get};

    use super::*;
    use crate::test_helpers::{loopback_client, spawn_stub};

    #[test]
    fn detects_urls() {
        assert!(is_url("https://www.prothomalo.com/bangladesh/abc"));
        assert!(is_url("  http://example.com  "));
        assert!(!is_url("ঢাকায় আজ বৃষ্টি হয়েছে"));
        assert!(!is_url("note: this is text"));
        assert!(!is_url("mailto:someone@example.com"));
        assert!(!is_url(""));
    }

    #[test]
    fn extracts_paragraphs_from_article_element() {
        let html = r#"
            <html><head>
              <title>Site | Ignored</title>
              <meta property="og:title" content="Flood warning issued">
              <script>var p = "<p>not text</p>";</script>
            </head>
            <body>
              <nav><p>Menu</p></nav>
              <article>
                <p>Heavy rain <b>continued</b> in Sylhet.</p>
                <p>Rivers are &amp; remain   above danger level.</p>
                <p>   </p>
              </article>
            </body></html>"#;

        let article = extract_article(html);
        assert_eq!(article.title.as_deref(), Some("Flood warning issued"));
        assert_eq!(
            article.text,
            "Heavy rain continued in Sylhet.\n\nRivers are & remain above danger level."
        );
    }

    #[test]
    fn falls_back_to_body_and_title_tag() {
        let html = "<html><head><title> Local &quot;news&quot; </title></head>\
                    <body><p>First.</p><div><p>Second.</p></div></body></html>";

        let article = extract_article(html);
        assert_eq!(article.title.as_deref(), Some("Local \"news\""));
        assert_eq!(article.text, "First.\n\nSecond.");
    }

    #[test]
    fn uses_plain_text_when_no_paragraphs() {
        let article = extract_article("<body><div>Only <i>inline</i> text</div></body>");
        assert_eq!(article.title, None);
        assert_eq!(article.text, "Only inline text");
    }

    #[test]
    fn empty_page_has_no_text() {
        let article = extract_article("<html><body><script>x()</script></body></html>");
        assert!(article.text.is_empty());
    }

    #[tokio::test]
    async fn fetcher_downloads_and_extracts_page() {
        let agent: Arc<Mutex<Option<String>>> = Arc::default();
        let recorder = agent.clone();
        let app = Router::new().route(
            "/story",
            get(move |headers: HeaderMap| {
                let recorder = recorder.clone();
                async move {
                    *recorder.lock().unwrap() = headers
                        .get(header::USER_AGENT)
                        .and_then(|value| value.to_str().ok())
                        .map(str::to_string);
                    Html(
                        "<html><head><title>River rises</title></head><body>\
                         <article><p>Water levels rose overnight.</p></article></body></html>",
                    )
                }
            }),
        );
        let base = spawn_stub(app).await.unwrap();

        let article = HttpArticleFetcher::new(loopback_client().unwrap())
            .fetch(&format!("{base}/story"))
            .await
            .expect("fetch should succeed");

        assert_eq!(article.title.as_deref(), Some("River rises"));
        assert_eq!(article.text, "Water levels rose overnight.");
        assert_eq!(agent.lock().unwrap().as_deref(), Some(USER_AGENT));
    }

    #[tokio::test]
    async fn missing_page_is_upstream_error() {
        let base = spawn_stub(Router::new()).await.unwrap();

        let err = HttpArticleFetcher::new(loopback_client().unwrap())
            .fetch(&format!("{base}/gone"))
            .await
            .expect_err("404 should fail");
        assert!(matches!(
            err,
            InferenceError::Upstream { service: "article fetcher", ref message }
                if message.contains("404")
        ));
    }
}
