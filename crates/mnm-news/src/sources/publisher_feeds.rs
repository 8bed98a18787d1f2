//! General publisher RSS feeds, filtered to the requested companies.

use async_trait::async_trait;
use futures::future::join_all;

use super::html::to_text;
use super::rss_helpers::{parse_feed, Feed};
use super::{fetch_text, parse_url, HttpSettings, NewsSource};
use crate::error::NewsError;
use crate::relevance::mentions_company;
use crate::types::{NewsRecord, RawItem, SourceKind};

/// Brazilian business and tech publishers.
pub const DEFAULT_PUBLISHER_FEEDS: &[&str] = &[
    "https://www.band.com.br/bandnews-fm/feed/",
    "https://valor.globo.com/rss/ultimas",
    "https://www.estadao.com.br/rss/ultimas/",
    "https://admin.cnnbrasil.com.br/feed/",
    "https://itforum.com.br/feed/",
    "https://exame.com/feed/",
    "https://www.infomoney.com.br/feed/",
    "https://startups.com.br/feed/",
    "https://g1.globo.com/rss/g1/economia/",
    "https://oglobo.globo.com/rss.xml?completo=true",
    "https://forbes.com.br/feed/",
];

/// Only the newest items of each feed are considered.
const MAX_ITEMS_PER_FEED: usize = 8;

/// Reads every configured feed once per request and keeps the items that
/// mention a requested company.
#[derive(Debug, Clone)]
pub struct PublisherFeedsSource {
    http: HttpSettings,
    feeds: Vec<String>,
}

impl PublisherFeedsSource {
    #[must_use]
    pub fn new(http: HttpSettings, feeds: Vec<String>) -> Self {
        Self { http, feeds }
    }

    async fn fetch_feed(client: &reqwest::Client, feed_url: &str) -> Result<Feed, NewsError> {
        let url = parse_url(feed_url)?;
        let body = fetch_text(client, url).await?;
        parse_feed(&body)
    }
}

/// Records for every company mentioned by the first items of `feed`.
fn match_companies(feed: &Feed, companies: &[String]) -> Vec<NewsRecord> {
    let mut records = Vec::new();
    for item in feed.items.iter().take(MAX_ITEMS_PER_FEED) {
        let Some(title) = item.title.as_deref() else {
            continue;
        };
        let description = item.description.as_deref().map(to_text).unwrap_or_default();

        for company in companies {
            if !mentions_company(company, title, &description) {
                continue;
            }
            let raw = RawItem {
                title: Some(title.to_string()),
                description: Some(description.clone()),
                url: item.permalink(),
                source_name: feed.title.clone(),
                published_at: item.published_at(),
            };
            records.extend(raw.into_record(company, SourceKind::PublisherFeed));
        }
    }
    records
}

#[async_trait]
impl NewsSource for PublisherFeedsSource {
    fn kind(&self) -> SourceKind {
        SourceKind::PublisherFeed
    }

    async fn fetch(&self, companies: &[String]) -> Result<Vec<NewsRecord>, NewsError> {
        if self.feeds.is_empty() {
            return Ok(Vec::new());
        }
        let client = self.http.client()?;

        let results = join_all(
            self.feeds
                .iter()
                .map(|feed_url| Self::fetch_feed(&client, feed_url)),
        )
        .await;

        let mut records = Vec::new();
        let mut last_error = None;
        let mut failures = 0_usize;
        for (feed_url, result) in self.feeds.iter().zip(results) {
            match result {
                Ok(feed) => {
                    let matched = match_companies(&feed, companies);
                    tracing::debug!(
                        source = "publisher_feed",
                        feed = feed_url.as_str(),
                        items = feed.items.len(),
                        matched = matched.len(),
                        "read publisher feed"
                    );
                    records.extend(matched);
                }
                Err(e) => {
                    tracing::warn!(
                        source = "publisher_feed",
                        feed = feed_url.as_str(),
                        error = %e,
                        "publisher feed fetch failed"
                    );
                    failures += 1;
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) if failures == self.feeds.len() => Err(e),
            _ => Ok(records),
        }
    }
}
