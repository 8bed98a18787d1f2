use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::NewsError;

/// The fixed roster of news sources. Every [`NewsRecord`] names the one that
/// produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Official company blog feed, with an HTML scrape fallback.
    CompanySite,
    /// Google News RSS search templated with the company name.
    SearchRss,
    /// General-purpose publisher RSS feeds, filtered client-side.
    PublisherFeed,
    /// GNews.io search API.
    GenericNewsApi,
    /// SerpApi `bing_news` engine.
    NewsSearchApi,
    /// SerpApi Google search restricted to LinkedIn posts.
    SocialSearch,
}

impl SourceKind {
    pub const ALL: [SourceKind; 6] = [
        SourceKind::CompanySite,
        SourceKind::SearchRss,
        SourceKind::PublisherFeed,
        SourceKind::GenericNewsApi,
        SourceKind::NewsSearchApi,
        SourceKind::SocialSearch,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SourceKind::CompanySite => "company_site",
            SourceKind::SearchRss => "search_rss",
            SourceKind::PublisherFeed => "publisher_feed",
            SourceKind::GenericNewsApi => "generic_news_api",
            SourceKind::NewsSearchApi => "news_search_api",
            SourceKind::SocialSearch => "social_search",
        }
    }

    /// Merge precedence: lower values are more trusted and are concatenated
    /// first, so they win timestamp ties after the stable sort.
    #[must_use]
    pub fn default_priority(self) -> u8 {
        match self {
            SourceKind::CompanySite => 0,
            SourceKind::SearchRss => 10,
            SourceKind::PublisherFeed => 20,
            SourceKind::GenericNewsApi => 30,
            SourceKind::NewsSearchApi => 40,
            SourceKind::SocialSearch => 50,
        }
    }

    /// Label used when the payload does not name its publisher.
    #[must_use]
    pub fn fallback_label(self) -> &'static str {
        match self {
            SourceKind::CompanySite => "Site Oficial",
            SourceKind::SearchRss => "Google News",
            SourceKind::PublisherFeed => "RSS",
            SourceKind::GenericNewsApi => "GNews",
            SourceKind::NewsSearchApi => "SerpApi (Bing News)",
            SourceKind::SocialSearch => "LinkedIn",
        }
    }

    /// Environment variable holding the credential this source needs, if any.
    #[must_use]
    pub fn credential_var(self) -> Option<&'static str> {
        match self {
            SourceKind::GenericNewsApi => Some("GNEWS_API_KEY"),
            SourceKind::NewsSearchApi | SourceKind::SocialSearch => Some("SERP_API_KEY"),
            _ => None,
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = NewsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        SourceKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| NewsError::UnknownSource(s.to_string()))
    }
}

/// One news mention, normalized from whatever shape the source returned.
///
/// Only constructible through [`RawItem::into_record`], which guarantees a
/// non-empty title and URL.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewsRecord {
    company: String,
    title: String,
    description: String,
    url: String,
    source_name: String,
    source_kind: SourceKind,
    published_at: Option<DateTime<Utc>>,
    /// `url` points at a listing page rather than the article itself.
    #[serde(skip)]
    listing_url: bool,
}

impl NewsRecord {
    #[must_use]
    pub fn company(&self) -> &str {
        &self.company
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[must_use]
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    #[must_use]
    pub fn source_kind(&self) -> SourceKind {
        self.source_kind
    }

    #[must_use]
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        self.published_at
    }

    /// Mark `url` as the page the headline was scraped from.
    pub(crate) fn with_listing_url(mut self) -> Self {
        self.listing_url = true;
        self
    }

    /// Key identifying the same article found twice for the same company.
    ///
    /// Records sharing a listing-page URL are told apart by title.
    pub(crate) fn dedup_key(&self) -> (String, String, Option<String>) {
        (
            self.company.to_lowercase(),
            self.url.trim_end_matches('/').to_string(),
            self.listing_url.then(|| self.title.to_lowercase()),
        )
    }

    /// Copy of `self` with blanks filled in from a duplicate of the same article.
    pub(crate) fn with_fallbacks(&self, other: &NewsRecord) -> NewsRecord {
        let mut merged = self.clone();
        if merged.published_at.is_none() {
            merged.published_at = other.published_at;
        }
        if merged.description.is_empty() {
            merged.description.clone_from(&other.description);
        }
        merged
    }
}

/// Fields as extracted from one payload item, before validation.
#[derive(Debug, Clone, Default)]
pub struct RawItem {
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub source_name: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

impl RawItem {
    /// Validate and freeze into a [`NewsRecord`].
    ///
    /// Returns `None` when the title or URL is missing or blank.
    #[must_use]
    pub fn into_record(self, company: &str, kind: SourceKind) -> Option<NewsRecord> {
        let title = self.title.as_deref().map(collapse).unwrap_or_default();
        let url = self.url.as_deref().map(str::trim).unwrap_or_default().to_string();
        if title.is_empty() || url.is_empty() {
            tracing::debug!(
                company,
                source = %kind,
                has_title = !title.is_empty(),
                has_url = !url.is_empty(),
                "dropping item without title or url"
            );
            return None;
        }

        let source_name = self
            .source_name
            .as_deref()
            .map(collapse)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| kind.fallback_label().to_string());

        Some(NewsRecord {
            company: company.trim().to_string(),
            title,
            description: self.description.as_deref().map(collapse).unwrap_or_default(),
            url,
            source_name,
            source_kind: kind,
            published_at: self.published_at,
            listing_url: false,
        })
    }
}

fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
