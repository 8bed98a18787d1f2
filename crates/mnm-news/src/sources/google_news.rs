//! Google News RSS search.

use async_trait::async_trait;

use super::html::{first_link, first_text, to_text};
use super::rss_helpers::{parse_feed, FeedItem};
use super::{fetch_text, parse_url, per_company, HttpSettings, NewsSource};
use crate::error::NewsError;
use crate::types::{NewsRecord, RawItem, SourceKind};

pub const DEFAULT_ENDPOINT: &str = "https://news.google.com/rss/search";

/// Items kept per company query.
const MAX_ITEMS_PER_COMPANY: usize = 10;

/// Searches Google News RSS for each company name.
///
/// The publisher link and name are recovered from the item's HTML
/// description when the feed carries them there.
#[derive(Debug, Clone)]
pub struct GoogleNewsSource {
    http: HttpSettings,
    endpoint: String,
    language: String,
    country: String,
}

impl GoogleNewsSource {
    #[must_use]
    pub fn new(http: HttpSettings, language: &str, country: &str) -> Self {
        Self {
            http,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            language: language.to_string(),
            country: country.to_string(),
        }
    }

    /// Point at a different search endpoint (a mock server in tests).
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
        let lang_code = self.language.split(['-', '_']).next().unwrap_or("pt");
        let mut url = parse_url(&self.endpoint)?;
        url.query_pairs_mut()
            .append_pair("q", company)
            .append_pair("hl", &self.language)
            .append_pair("gl", &self.country)
            .append_pair("ceid", &format!("{}:{lang_code}", self.country));

        let body = fetch_text(client, url).await?;
        let feed = parse_feed(&body)?;

        Ok(feed
            .items
            .into_iter()
            .take(MAX_ITEMS_PER_COMPANY)
            .filter_map(|item| to_raw_item(item).into_record(company, SourceKind::SearchRss))
            .collect())
    }
}

fn to_raw_item(item: FeedItem) -> RawItem {
    let published_at = item.published_at();
    let description_html = item.description.clone().unwrap_or_default();

    let url = first_link(&description_html).or_else(|| item.permalink());
    let publisher = item
        .source
        .clone()
        .or_else(|| first_text(&description_html, "font"));
    let title = item
        .title
        .map(|t| strip_publisher_suffix(&t, publisher.as_deref()));

    RawItem {
        title,
        description: Some(to_text(&description_html)),
        url,
        source_name: publisher,
        published_at,
    }
}

/// Google appends ` - Publisher` to every headline.
fn strip_publisher_suffix(title: &str, publisher: Option<&str>) -> String {
    let title = title.trim();
    publisher
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .and_then(|p| title.strip_suffix(p))
        .and_then(|rest| rest.trim_end().strip_suffix('-'))
        .map(str::trim_end)
        .filter(|rest| !rest.is_empty())
        .unwrap_or(title)
        .to_string()
}

#[async_trait]
impl NewsSource for GoogleNewsSource {
    fn kind(&self) -> SourceKind {
        SourceKind::SearchRss
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
