//! Market news aggregation for the MNM monitor.
//!
//! Fans out to official company blogs, Google News RSS, publisher feeds and
//! keyed search APIs, normalizes every payload into [`NewsRecord`]s, merges
//! duplicates in trust order and sorts the result newest first. Records can
//! then be tagged with a business event by an [`EventClassifier`].

pub mod aggregate;
pub mod classify;
pub mod config;
pub mod dates;
pub mod error;
pub mod relevance;
pub mod sort;
pub mod sources;
pub mod types;

pub use aggregate::{merge_duplicates, Aggregator};
pub use classify::{
    analyze_or_fallback, classify_all, EventAnalysis, EventCategory, EventClassifier,
    KeywordClassifier, NewsItem, SUMMARY_LIMIT,
};
pub use config::NewsConfig;
pub use dates::{parse_timestamp, DateFormat};
pub use error::NewsError;
pub use relevance::mentions_company;
pub use sort::sort_by_recency;
pub use sources::{build_sources, HttpSettings, NewsSource};
pub use types::{NewsRecord, RawItem, SourceKind};
