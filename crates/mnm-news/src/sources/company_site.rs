//! Official company blogs: feed first, page scrape as fallback.

use async_trait::async_trait;
use mnm_core::CompanySite;

use super::html::{scrape_headlines, to_text};
use super::rss_helpers::parse_feed;
use super::{fetch_text, parse_url, per_company, HttpSettings, NewsSource};
use crate::error::NewsError;
use crate::types::{NewsRecord, RawItem, SourceKind};

const MAX_FEED_ITEMS: usize = 5;
const MAX_SCRAPED_HEADLINES: usize = 10;

const FEED_LABEL: &str = "Site Oficial (RSS)";
const PAGE_LABEL: &str = "Site Oficial";

/// Reads each company's own blog from the site catalogue.
///
/// Companies without a catalogue entry yield nothing. Records here are not
/// relevance-filtered: everything on a company's own blog is about it.
#[derive(Debug, Clone)]
pub struct CompanySiteSource {
    http: HttpSettings,
    sites: Vec<CompanySite>,
}

impl CompanySiteSource {
    #[must_use]
    pub fn new(http: HttpSettings, sites: Vec<CompanySite>) -> Self {
        Self { http, sites }
    }

    async fn fetch_company(
        &self,
        client: &reqwest::Client,
        company: &str,
    ) -> Result<Vec<NewsRecord>, NewsError> {
        let Some(site) = self.sites.iter().find(|s| s.matches(company)) else {
            tracing::debug!(company, source = "company_site", "no site configured");
            return Ok(Vec::new());
        };

        let mut feed_error = None;
        if let Some(feed_url) = site.feed_url.as_deref() {
            match read_feed(client, feed_url, company).await {
                Ok(records) if !records.is_empty() => return Ok(records),
                Ok(_) => {
                    tracing::debug!(company, feed = feed_url, "company feed empty, trying page");
                }
                Err(e) => {
                    tracing::warn!(
                        company,
                        source = "company_site",
                        feed = feed_url,
                        error = %e,
                        "company feed failed, trying page"
                    );
                    feed_error = Some(e);
                }
            }
        }

        match site.page_url.as_deref() {
            Some(page_url) => scrape_page(client, page_url, company).await,
            None => feed_error.map_or(Ok(Vec::new()), Err),
        }
    }
}

async fn read_feed(
    client: &reqwest::Client,
    feed_url: &str,
    company: &str,
) -> Result<Vec<NewsRecord>, NewsError> {
    let body = fetch_text(client, parse_url(feed_url)?).await?;
    let feed = parse_feed(&body)?;
    Ok(feed
        .items
        .into_iter()
        .take(MAX_FEED_ITEMS)
        .filter_map(|item| {
            RawItem {
                published_at: item.published_at(),
                url: item.permalink(),
                description: item.description.as_deref().map(to_text),
                title: item.title,
                source_name: Some(FEED_LABEL.to_string()),
            }
            .into_record(company, SourceKind::CompanySite)
        })
        .collect())
}

async fn scrape_page(
    client: &reqwest::Client,
    page_url: &str,
    company: &str,
) -> Result<Vec<NewsRecord>, NewsError> {
    let url = parse_url(page_url)?;
    let body = fetch_text(client, url.clone()).await?;
    Ok(scrape_headlines(&body, &url, MAX_SCRAPED_HEADLINES)
        .into_iter()
        .filter_map(|mut raw| {
            raw.source_name = Some(PAGE_LABEL.to_string());
            let record = raw.into_record(company, SourceKind::CompanySite)?;
            Some(if record.url() == url.as_str() {
                record.with_listing_url()
            } else {
                record
            })
        })
        .collect())
}

#[async_trait]
impl NewsSource for CompanySiteSource {
    fn kind(&self) -> SourceKind {
        SourceKind::CompanySite
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
