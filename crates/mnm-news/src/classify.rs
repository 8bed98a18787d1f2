//! Keyword-based business event classification and summaries.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::NewsError;
use crate::types::{NewsRecord, SourceKind};

/// Longest summary handed back to clients, in characters.
pub const SUMMARY_LIMIT: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    Acquisition,
    Certification,
    ProductLaunch,
    Other,
}

impl EventCategory {
    /// Display label shown to end users.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            EventCategory::Acquisition => "Aquisição",
            EventCategory::Certification => "Certificação",
            EventCategory::ProductLaunch => "Lançamento de Produto",
            EventCategory::Other => "Outro",
        }
    }
}

/// Classification and summary for one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventAnalysis {
    pub company: String,
    pub event_category: EventCategory,
    pub summary: String,
    pub source_url: String,
}

/// Anything that can turn a record into an [`EventAnalysis`].
pub trait EventClassifier: Send + Sync {
    /// # Errors
    ///
    /// Implementations may fail; callers use [`analyze_or_fallback`] to
    /// degrade to [`EventCategory::Other`].
    fn classify(&self, record: &NewsRecord) -> Result<EventAnalysis, NewsError>;
}

/// Checked in order; the first category with a hit wins. The first list
/// matches anywhere in the text, the second only as whole words.
const KEYWORDS: [(EventCategory, &[&str], &[&str]); 3] = [
    (
        EventCategory::Acquisition,
        &[
            "adquire",
            "adquiriu",
            "compra",
            "comprou",
            "aquisição",
            "merger",
            "acquisition",
            "acquires",
        ],
        &[],
    ),
    (
        EventCategory::Certification,
        &[
            "certificação",
            "certificado",
            "compliance",
            "conformidade",
        ],
        &["pci", "iso"],
    ),
    (
        EventCategory::ProductLaunch,
        &[
            "lança",
            "lançamento",
            "apresenta",
            "novo produto",
            "introduz",
            "launch",
        ],
        &[],
    ),
];

/// Stateless keyword classifier over title and description.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordClassifier;

impl KeywordClassifier {
    #[must_use]
    pub fn classify_and_summarize(
        title: &str,
        description: &str,
        company: &str,
        url: &str,
    ) -> EventAnalysis {
        EventAnalysis {
            company: company.to_string(),
            event_category: heuristic_event(title, description),
            summary: summarize(title, description),
            source_url: url.to_string(),
        }
    }
}

impl EventClassifier for KeywordClassifier {
    fn classify(&self, record: &NewsRecord) -> Result<EventAnalysis, NewsError> {
        Ok(Self::classify_and_summarize(
            record.title(),
            record.description(),
            record.company(),
            record.url(),
        ))
    }
}

/// Classify a record, degrading to `Other` with the plain summary on failure.
pub fn analyze_or_fallback(classifier: &dyn EventClassifier, record: &NewsRecord) -> EventAnalysis {
    match classifier.classify(record) {
        Ok(analysis) => analysis,
        Err(e) => {
            tracing::warn!(
                company = record.company(),
                url = record.url(),
                error = %e,
                "classification failed, falling back to Other"
            );
            EventAnalysis {
                company: record.company().to_string(),
                event_category: EventCategory::Other,
                summary: summarize(record.title(), record.description()),
                source_url: record.url().to_string(),
            }
        }
    }
}

/// A record together with its classification, as handed to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewsItem {
    pub company: String,
    pub event: EventCategory,
    pub event_label: &'static str,
    pub summary: String,
    pub title: String,
    pub source_url: String,
    pub source_name: String,
    pub source_kind: SourceKind,
    pub published_at: Option<DateTime<Utc>>,
}

impl NewsItem {
    #[must_use]
    pub fn new(record: &NewsRecord, analysis: EventAnalysis) -> Self {
        Self {
            company: analysis.company,
            event: analysis.event_category,
            event_label: analysis.event_category.label(),
            summary: analysis.summary,
            title: record.title().to_string(),
            source_url: analysis.source_url,
            source_name: record.source_name().to_string(),
            source_kind: record.source_kind(),
            published_at: record.published_at(),
        }
    }
}

/// Classify every record, keeping input order.
#[must_use]
pub fn classify_all(classifier: &dyn EventClassifier, records: &[NewsRecord]) -> Vec<NewsItem> {
    records
        .iter()
        .map(|record| NewsItem::new(record, analyze_or_fallback(classifier, record)))
        .collect()
}

fn heuristic_event(title: &str, description: &str) -> EventCategory {
    let text = format!("{title} {description}").to_lowercase();
    let words: Vec<&str> = text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    KEYWORDS
        .iter()
        .find(|(_, fragments, whole)| {
            fragments.iter().any(|kw| text.contains(kw))
                || whole.iter().any(|kw| words.contains(kw))
        })
        .map_or(EventCategory::Other, |(category, _, _)| *category)
}

fn summarize(title: &str, description: &str) -> String {
    truncate(&format!("{title}. {description}"), SUMMARY_LIMIT)
}

/// Collapse whitespace and cut to `limit` characters, ending in `…` when cut.
fn truncate(text: &str, limit: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= limit {
        return collapsed;
    }
    let head: String = collapsed.chars().take(limit.saturating_sub(1)).collect();
    format!("{}…", head.trim_end())
}
