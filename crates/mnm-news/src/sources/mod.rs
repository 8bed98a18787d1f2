//! News source abstractions.

pub mod company_site;
pub mod gnews;
pub mod google_news;
pub(crate) mod html;
pub mod publisher_feeds;
pub(crate) mod rss_helpers;
pub mod serpapi;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use reqwest::Url;

use crate::config::NewsConfig;
use crate::error::NewsError;
use crate::types::{NewsRecord, SourceKind};

pub use company_site::CompanySiteSource;
pub use gnews::GNewsSource;
pub use google_news::GoogleNewsSource;
pub use publisher_feeds::PublisherFeedsSource;
pub use serpapi::SerpApiSource;

/// One upstream that turns company names into [`NewsRecord`]s.
#[async_trait]
pub trait NewsSource: Send + Sync {
    fn kind(&self) -> SourceKind;

    /// Merge precedence; lower is more trusted.
    fn priority(&self) -> u8 {
        self.kind().default_priority()
    }

    /// Fetch records for every company.
    ///
    /// Per-company and per-item problems are logged and skipped; an `Err`
    /// means the source as a whole produced nothing usable.
    async fn fetch(&self, companies: &[String]) -> Result<Vec<NewsRecord>, NewsError>;
}

/// Transport settings shared by all sources.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub timeout: Duration,
    pub user_agent: String,
}

impl HttpSettings {
    #[must_use]
    pub fn from_config(config: &NewsConfig) -> Self {
        Self {
            timeout: config.request_timeout,
            user_agent: config.user_agent.clone(),
        }
    }

    /// Build a client for one fetch.
    ///
    /// # Errors
    ///
    /// Returns [`NewsError::Http`] if the TLS backend cannot be initialised.
    pub fn client(&self) -> Result<reqwest::Client, NewsError> {
        Ok(reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.clone())
            .build()?)
    }
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self::from_config(&NewsConfig::default())
    }
}

/// `scheme://host/path` with no query string, safe to log.
pub(crate) fn endpoint_label(url: &Url) -> String {
    format!(
        "{}://{}{}",
        url.scheme(),
        url.host_str().unwrap_or_default(),
        url.path()
    )
}

pub(crate) fn parse_url(raw: &str) -> Result<Url, NewsError> {
    Url::parse(raw).map_err(|e| NewsError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })
}

/// GET `url` and return the body of a 2xx response.
///
/// Errors never carry the full URL, since some carry API keys.
pub(crate) async fn fetch_text(client: &reqwest::Client, url: Url) -> Result<String, NewsError> {
    let endpoint = endpoint_label(&url);
    let response = client
        .get(url)
        .send()
        .await
        .map_err(reqwest::Error::without_url)?;

    let status = response.status();
    if !status.is_success() {
        return Err(NewsError::UnexpectedStatus {
            status: status.as_u16(),
            endpoint,
        });
    }

    Ok(response.text().await.map_err(reqwest::Error::without_url)?)
}

/// Run `fetch_one` for every company concurrently, skipping failures.
///
/// Returns the last error only when every company failed, so one bad or slow
/// query does not hide results for the others.
pub(crate) async fn per_company<'a, F, Fut>(
    kind: SourceKind,
    companies: &'a [String],
    fetch_one: F,
) -> Result<Vec<NewsRecord>, NewsError>
where
    F: FnMut(&'a str) -> Fut,
    Fut: Future<Output = Result<Vec<NewsRecord>, NewsError>>,
{
    let outcomes = join_all(companies.iter().map(String::as_str).map(fetch_one)).await;

    let mut records = Vec::new();
    let mut last_error = None;
    let mut failures = 0_usize;

    for (company, outcome) in companies.iter().zip(outcomes) {
        match outcome {
            Ok(found) => {
                tracing::debug!(
                    company = company.as_str(),
                    source = %kind,
                    count = found.len(),
                    "collected records"
                );
                records.extend(found);
            }
            Err(e) => {
                tracing::warn!(
                    company = company.as_str(),
                    source = %kind,
                    error = %e,
                    "company fetch failed"
                );
                failures += 1;
                last_error = Some(e);
            }
        }
    }

    match last_error {
        Some(e) if failures == companies.len() => Err(e),
        _ => Ok(records),
    }
}

/// Every source the configuration enables, in priority order.
#[must_use]
pub fn build_sources(config: &NewsConfig) -> Vec<Arc<dyn NewsSource>> {
    let http = HttpSettings::from_config(config);
    let mut sources: Vec<Arc<dyn NewsSource>> = Vec::new();

    for kind in SourceKind::ALL {
        if let Some(reason) = config.inactive_reason(kind) {
            tracing::info!(source = %kind, reason = %reason, "news source inactive");
            continue;
        }
        let source: Arc<dyn NewsSource> = match kind {
            SourceKind::CompanySite => Arc::new(CompanySiteSource::new(
                http.clone(),
                config.company_sites.clone(),
            )),
            SourceKind::SearchRss => Arc::new(GoogleNewsSource::new(
                http.clone(),
                &config.language,
                &config.country,
            )),
            SourceKind::PublisherFeed => Arc::new(PublisherFeedsSource::new(
                http.clone(),
                config.publisher_feeds.clone(),
            )),
            SourceKind::GenericNewsApi => match &config.gnews_api_key {
                Some(key) => Arc::new(GNewsSource::new(
                    http.clone(),
                    key.clone(),
                    config.language_code(),
                )),
                None => continue,
            },
            SourceKind::NewsSearchApi => match &config.serp_api_key {
                Some(key) => Arc::new(SerpApiSource::news(
                    http.clone(),
                    key.clone(),
                    &config.country,
                    config.language_code(),
                )),
                None => continue,
            },
            SourceKind::SocialSearch => match &config.serp_api_key {
                Some(key) => Arc::new(SerpApiSource::social(
                    http.clone(),
                    key.clone(),
                    &config.country,
                    config.language_code(),
                )),
                None => continue,
            },
        };
        sources.push(source);
    }

    sources
}
