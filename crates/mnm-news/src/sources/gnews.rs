//! GNews.io search API.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use super::{fetch_text, parse_url, per_company, HttpSettings, NewsSource};
use crate::dates::{parse_timestamp, GNEWS_DATE_FORMATS};
use crate::error::NewsError;
use crate::types::{NewsRecord, RawItem, SourceKind};

pub const DEFAULT_ENDPOINT: &str = "https://gnews.io/api/v4/search";

const MAX_RESULTS: &str = "5";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Article {
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    published_at: Option<String>,
    source: Option<ArticleSource>,
}

#[derive(Debug, Deserialize)]
struct ArticleSource {
    name: Option<String>,
}

impl From<Article> for RawItem {
    fn from(a: Article) -> Self {
        RawItem {
            title: a.title,
            description: a.description,
            url: a.url,
            source_name: a.source.and_then(|s| s.name),
            published_at: a
                .published_at
                .as_deref()
                .and_then(|raw| parse_timestamp(raw, GNEWS_DATE_FORMATS)),
        }
    }
}

/// Keyed search against GNews. Only registered when `GNEWS_API_KEY` is set.
#[derive(Clone)]
pub struct GNewsSource {
    http: HttpSettings,
    endpoint: String,
    api_key: String,
    language: String,
}

impl std::fmt::Debug for GNewsSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GNewsSource")
            .field("endpoint", &self.endpoint)
            .field("language", &self.language)
            .finish_non_exhaustive()
    }
}

impl GNewsSource {
    /// `language` is a two-letter code such as `pt`.
    #[must_use]
    pub fn new(http: HttpSettings, api_key: String, language: &str) -> Self {
        Self {
            http,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key,
            language: language.to_string(),
        }
    }

    #[must_use]
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    async fn fetch_company(
        &self,
        client: &reqwest::Client,
        company: &str,
    ) -> Result<Vec<NewsRecord>, NewsError> {
        let mut url = parse_url(&self.endpoint)?;
        url.query_pairs_mut()
            .append_pair("q", company)
            .append_pair("lang", &self.language)
            .append_pair("max", MAX_RESULTS)
            .append_pair("token", &self.api_key);

        let body = fetch_text(client, url).await.inspect_err(|e| {
            if matches!(e, NewsError::UnexpectedStatus { status: 401 | 403, .. }) {
                tracing::error!(source = "generic_news_api", "GNews rejected the key; check GNEWS_API_KEY");
            }
        })?;
        parse_articles(&body, company)
    }
}

/// Parse a search response, skipping articles that do not fit the schema.
fn parse_articles(body: &str, company: &str) -> Result<Vec<NewsRecord>, NewsError> {
    let value: Value = serde_json::from_str(body).map_err(|source| NewsError::Deserialize {
        context: "GNews search response".to_string(),
        source,
    })?;

    let Some(articles) = value.get("articles").and_then(Value::as_array) else {
        return Ok(Vec::new());
    };

    Ok(articles
        .iter()
        .filter_map(|raw| match serde_json::from_value::<Article>(raw.clone()) {
            Ok(article) => Some(article),
            Err(e) => {
                tracing::debug!(company, error = %e, "skipping malformed GNews article");
                None
            }
        })
        .filter_map(|article| RawItem::from(article).into_record(company, SourceKind::GenericNewsApi))
        .collect())
}

#[async_trait]
impl NewsSource for GNewsSource {
    fn kind(&self) -> SourceKind {
        SourceKind::GenericNewsApi
    }

    async fn fetch(&self, companies: &[String]) -> Result<Vec<NewsRecord>, NewsError> {
        let client = self.http.client()?;
        let client = &client;
        per_company(self.kind(), companies, move |company| {
            self.fetch_company(client, company)
        })
        .await
    }
}
