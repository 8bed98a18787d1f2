//! SerpApi searches: Bing News, and Google restricted to LinkedIn posts.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use super::{fetch_text, parse_url, per_company, HttpSettings, NewsSource};
use crate::dates::{parse_timestamp, SERPAPI_DATE_FORMATS};
use crate::error::NewsError;
use crate::types::{NewsRecord, RawItem, SourceKind};

pub const DEFAULT_ENDPOINT: &str = "https://serpapi.com/search.json";

const MAX_RESULTS: &str = "5";

#[derive(Debug, Deserialize)]
struct SearchResult {
    title: Option<String>,
    snippet: Option<String>,
    link: Option<String>,
    url: Option<String>,
    date: Option<String>,
    source: Option<ResultSource>,
}

/// `source` is a plain string on some engines and an object on others.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ResultSource {
    Name(String),
    Object { name: Option<String> },
}

impl From<SearchResult> for RawItem {
    fn from(r: SearchResult) -> Self {
        RawItem {
            title: r.title,
            description: r.snippet,
            url: r.link.or(r.url),
            source_name: r.source.and_then(|s| match s {
                ResultSource::Name(name) => Some(name),
                ResultSource::Object { name } => name,
            }),
            published_at: r
                .date
                .as_deref()
                .and_then(|raw| parse_timestamp(raw, SERPAPI_DATE_FORMATS)),
        }
    }
}

/// One SerpApi engine configuration. Both variants share `SERP_API_KEY`.
#[derive(Clone)]
pub struct SerpApiSource {
    kind: SourceKind,
    http: HttpSettings,
    endpoint: String,
    api_key: String,
    country: String,
    language: String,
}

impl std::fmt::Debug for SerpApiSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerpApiSource")
            .field("kind", &self.kind)
            .field("endpoint", &self.endpoint)
            .field("country", &self.country)
            .field("language", &self.language)
            .finish_non_exhaustive()
    }
}

impl SerpApiSource {
    /// Bing News engine (`news_search_api`).
    #[must_use]
    pub fn news(http: HttpSettings, api_key: String, country: &str, language: &str) -> Self {
        Self::with_kind(SourceKind::NewsSearchApi, http, api_key, country, language)
    }

    /// Google search over `linkedin.com/posts` (`social_search`).
    #[must_use]
    pub fn social(http: HttpSettings, api_key: String, country: &str, language: &str) -> Self {
        Self::with_kind(SourceKind::SocialSearch, http, api_key, country, language)
    }

    fn with_kind(
        kind: SourceKind,
        http: HttpSettings,
        api_key: String,
        country: &str,
        language: &str,
    ) -> Self {
        Self {
            kind,
            http,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key,
            country: country.to_string(),
            language: language.to_string(),
        }
    }

    #[must_use]
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    fn query_pairs(&self, company: &str) -> Vec<(&'static str, String)> {
        match self.kind {
            SourceKind::SocialSearch => vec![
                ("engine", "google".to_string()),
                ("q", format!("site:linkedin.com/posts \"{company}\"")),
                ("num", MAX_RESULTS.to_string()),
                ("gl", self.country.to_lowercase()),
                ("hl", self.language.clone()),
            ],
            _ => vec![
                ("engine", "bing_news".to_string()),
                ("q", company.to_string()),
                ("num", MAX_RESULTS.to_string()),
                ("cc", self.country.clone()),
                ("hl", self.language.clone()),
            ],
        }
    }

    async fn fetch_company(
        &self,
        client: &reqwest::Client,
        company: &str,
    ) -> Result<Vec<NewsRecord>, NewsError> {
        let mut url = parse_url(&self.endpoint)?;
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in self.query_pairs(company) {
                pairs.append_pair(key, &value);
            }
            pairs.append_pair("api_key", &self.api_key);
        }

        let body = fetch_text(client, url).await.inspect_err(|e| {
            if matches!(e, NewsError::UnexpectedStatus { status: 401, .. }) {
                tracing::error!(source = %self.kind, "SerpApi returned 401; check SERP_API_KEY");
            }
        })?;
        parse_results(&body, company, self.kind)
    }
}

/// Read `news_results`, falling back to `organic_results`.
fn parse_results(body: &str, company: &str, kind: SourceKind) -> Result<Vec<NewsRecord>, NewsError> {
    let value: Value = serde_json::from_str(body).map_err(|source| NewsError::Deserialize {
        context: "SerpApi search response".to_string(),
        source,
    })?;

    let results = ["news_results", "organic_results"]
        .iter()
        .filter_map(|key| value.get(*key).and_then(Value::as_array))
        .find(|list| !list.is_empty());
    let Some(results) = results else {
        return Ok(Vec::new());
    };

    Ok(results
        .iter()
        .filter_map(|raw| match serde_json::from_value::<SearchResult>(raw.clone()) {
            Ok(result) => Some(result),
            Err(e) => {
                tracing::debug!(company, source = %kind, error = %e, "skipping malformed SerpApi result");
                None
            }
        })
        .filter_map(|result| RawItem::from(result).into_record(company, kind))
        .collect())
}

#[async_trait]
impl NewsSource for SerpApiSource {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    async fn fetch(&self, companies: &[String]) -> Result<Vec<NewsRecord>, NewsError> {
        let client = self.http.client()?;
        let client = &client;
        per_company(self.kind, companies, move |company| {
            self.fetch_company(client, company)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    #[test]
    fn news_results_with_object_and_string_sources() {
        let body = serde_json::json!({
            "news_results": [
                {
                    "title": "Totvs lança plataforma",
                    "snippet": "Nova plataforma de IA",
                    "link": "https://valor.test/totvs",
                    "date": "Jan 2, 2024",
                    "source": { "name": "Valor" }
                },
                {
                    "title": "Totvs em alta",
                    "url": "https://exame.test/totvs",
                    "date": "3 hours ago",
                    "source": "Exame"
                }
            ]
        })
        .to_string();

        let records = parse_results(&body, "Totvs", SourceKind::NewsSearchApi).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].source_name(), "Valor");
        assert_eq!(
            records[0].published_at(),
            Some(Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap())
        );
        assert_eq!(records[1].url(), "https://exame.test/totvs");
        assert_eq!(records[1].source_name(), "Exame");
        assert!(records[1].published_at().is_none());
    }

    #[test]
    fn falls_back_to_organic_results() {
        let body = serde_json::json!({
            "news_results": [],
            "organic_results": [
                { "title": "Post da Stone", "link": "https://www.linkedin.com/posts/stone-1" }
            ]
        })
        .to_string();
        let records = parse_results(&body, "Stone", SourceKind::SocialSearch).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].source_name(), "LinkedIn");
    }

    #[test]
    fn social_query_targets_linkedin_posts() {
        let source = SerpApiSource::social(HttpSettings::default(), "k".to_string(), "BR", "pt");
        let pairs = source.query_pairs("Stone");
        assert!(pairs.contains(&("engine", "google".to_string())));
        assert!(pairs.contains(&("q", "site:linkedin.com/posts \"Stone\"".to_string())));
        assert!(pairs.contains(&("gl", "br".to_string())));
    }

    #[test]
    fn news_query_uses_bing_engine() {
        let source = SerpApiSource::news(HttpSettings::default(), "k".to_string(), "BR", "pt");
        let pairs = source.query_pairs("Stone");
        assert!(pairs.contains(&("engine", "bing_news".to_string())));
        assert!(pairs.contains(&("cc", "BR".to_string())));
        assert_eq!(source.kind(), SourceKind::NewsSearchApi);
    }
}
