//! Anchor harvesting from published API reference pages
//!
//! The fetch is an injected capability ([`MarkupSource`]) so registries can
//! be built from canned markup in tests.

use crate::error::HarvestError;
use reqwest::header::CONTENT_TYPE;
use scraper::{Html, Selector};
use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

/// Something that can return the raw markup of a document
pub trait MarkupSource {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, HarvestError>> + Send;
}

/// Fetches pages over HTTP(S)
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(timeout_ms: u64) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("apilinks/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_millis(timeout_ms))
            .build()?;
        Ok(Self { client })
    }
}

impl MarkupSource for HttpSource {
    async fn fetch(&self, url: &str) -> Result<String, HarvestError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| HarvestError::Request {
                url: url.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(HarvestError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !is_markup(&content_type) {
            return Err(HarvestError::Markup {
                url: url.to_string(),
                content_type,
            });
        }

        // Decodes with the charset named in Content-Type, UTF-8 otherwise
        response.text().await.map_err(|source| HarvestError::Request {
            url: url.to_string(),
            source,
        })
    }
}

/// A missing Content-Type is given the benefit of the doubt
fn is_markup(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence.is_empty()
        || essence.starts_with("text/")
        || essence.contains("html")
        || essence.contains("xml")
}

/// Fixed url -> markup table
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    pages: HashMap<String, String>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: impl Into<String>, markup: impl Into<String>) -> Self {
        self.pages.insert(url.into(), markup.into());
        self
    }
}

impl MarkupSource for StaticSource {
    async fn fetch(&self, url: &str) -> Result<String, HarvestError> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| HarvestError::Status {
                url: url.to_string(),
                status: 404,
            })
    }
}

/// Map every `h2` carrying an `id` to its heading text
pub fn extract_h2_anchors(markup: &str) -> HashMap<String, String> {
    let doc = Html::parse_document(markup);
    let mut anchors = HashMap::new();

    let Ok(selector) = Selector::parse("h2[id]") else {
        return anchors;
    };

    for el in doc.select(&selector) {
        let Some(id) = el.value().attr("id") else {
            continue;
        };
        if id.is_empty() {
            continue;
        }
        let text = el.text().collect::<String>().trim().to_string();
        anchors.insert(id.to_string(), text);
    }

    anchors
}

/// Fetch a document and harvest its anchors
pub async fn harvest<S: MarkupSource>(
    source: &S,
    url: &str,
) -> Result<HashMap<String, String>, HarvestError> {
    let markup = source.fetch(url).await?;
    Ok(extract_h2_anchors(&markup))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_h2_anchors() {
        let html = r#"
            <html><body>
                <h1 id="top">API</h1>
                <h2 id="get-users">GET /users</h2>
                <h2 id="post-users">POST <code>/users</code></h2>
                <h2>No anchor</h2>
                <h2 id="">Empty</h2>
                <h3 id="get-users-params">Params</h3>
            </body></html>
        "#;
        let anchors = extract_h2_anchors(html);
        assert_eq!(anchors.len(), 2);
        assert_eq!(anchors["get-users"], "GET /users");
        assert_eq!(anchors["post-users"], "POST /users");
        assert!(!anchors.contains_key("top"));
        assert!(!anchors.contains_key("get-users-params"));
    }

    #[test]
    fn test_is_markup() {
        assert!(is_markup("text/html; charset=iso-8859-1"));
        assert!(is_markup("application/xhtml+xml"));
        assert!(is_markup("TEXT/PLAIN"));
        assert!(is_markup(""));
        assert!(!is_markup("application/json"));
        assert!(!is_markup("image/png"));
    }

    #[test]
    fn test_extract_from_garbage() {
        assert!(extract_h2_anchors("not html at all <<<").is_empty());
    }

    #[tokio::test]
    async fn test_static_source() {
        let source = StaticSource::new().with_page(
            "https://api.example.com",
            r#"<h2 id="get-users">GET /users</h2>"#,
        );
        let anchors = harvest(&source, "https://api.example.com").await.unwrap();
        assert!(anchors.contains_key("get-users"));

        let err = harvest(&source, "https://missing.example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, HarvestError::Status { status: 404, .. }));
    }
}
