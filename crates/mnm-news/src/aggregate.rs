//! Concurrent fan-out over every registered source.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;

use crate::config::NewsConfig;
use crate::error::NewsError;
use crate::sort::sort_by_recency;
use crate::sources::{build_sources, NewsSource};
use crate::types::NewsRecord;

/// Runs every source once per request and merges what comes back.
#[derive(Clone)]
pub struct Aggregator {
    sources: Vec<Arc<dyn NewsSource>>,
    source_deadline: Duration,
}

impl std::fmt::Debug for Aggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Aggregator")
            .field(
                "sources",
                &self.sources.iter().map(|s| s.kind()).collect::<Vec<_>>(),
            )
            .field("source_deadline", &self.source_deadline)
            .finish()
    }
}

impl Aggregator {
    /// Register `sources`, ordered by priority (registration order breaks ties).
    ///
    /// # Errors
    ///
    /// Returns [`NewsError::NoSources`] if `sources` is empty.
    pub fn new(
        mut sources: Vec<Arc<dyn NewsSource>>,
        source_deadline: Duration,
    ) -> Result<Self, NewsError> {
        if sources.is_empty() {
            return Err(NewsError::NoSources);
        }
        sources.sort_by_key(|s| s.priority());
        Ok(Self {
            sources,
            source_deadline,
        })
    }

    /// Build every source `config` enables.
    ///
    /// # Errors
    ///
    /// Returns [`NewsError::NoSources`] if the configuration disables all of them.
    pub fn from_config(config: &NewsConfig) -> Result<Self, NewsError> {
        Self::new(build_sources(config), config.source_deadline)
    }

    #[must_use]
    pub fn sources(&self) -> &[Arc<dyn NewsSource>] {
        &self.sources
    }

    /// Fetch, merge, deduplicate and sort news for `companies`.
    ///
    /// Never fails: a source that errors, panics, or overruns its deadline
    /// contributes nothing and is logged.
    pub async fn aggregate(&self, companies: &[String]) -> Vec<NewsRecord> {
        let companies = normalize_companies(companies);
        if companies.is_empty() {
            return Vec::new();
        }
        let companies: Arc<[String]> = companies.into();

        let handles = self.sources.iter().map(|source| {
            let source = Arc::clone(source);
            let companies = Arc::clone(&companies);
            let deadline = self.source_deadline;
            tokio::spawn(async move { tokio::time::timeout(deadline, source.fetch(&companies)).await })
        });
        let outcomes = join_all(handles).await;

        let mut merged = Vec::new();
        for (source, outcome) in self.sources.iter().zip(outcomes) {
            let kind = source.kind();
            match outcome {
                Ok(Ok(Ok(records))) => {
                    tracing::info!(source = %kind, count = records.len(), "source finished");
                    merged.extend(records);
                }
                Ok(Ok(Err(e))) => {
                    tracing::warn!(source = %kind, error = %e, "source failed");
                }
                Ok(Err(_elapsed)) => {
                    tracing::warn!(
                        source = %kind,
                        deadline_secs = self.source_deadline.as_secs_f64(),
                        "source timed out"
                    );
                }
                Err(e) => {
                    tracing::error!(source = %kind, error = %e, "source task panicked");
                }
            }
        }

        sort_by_recency(merge_duplicates(merged))
    }
}

/// Trim, drop blanks, and keep the first spelling of case-insensitive repeats.
fn normalize_companies(companies: &[String]) -> Vec<String> {
    let mut seen = Vec::<String>::new();
    let mut out = Vec::new();
    for company in companies {
        let trimmed = company.trim();
        if trimmed.is_empty() {
            continue;
        }
        let key = trimmed.to_lowercase();
        if seen.contains(&key) {
            continue;
        }
        seen.push(key);
        out.push(trimmed.to_string());
    }
    out
}

/// Collapse repeats of the same article for the same company.
///
/// The first occurrence keeps its position and fields; later duplicates only
/// fill a missing date or description.
#[must_use]
pub fn merge_duplicates(records: Vec<NewsRecord>) -> Vec<NewsRecord> {
    let mut index: HashMap<(String, String, Option<String>), usize> = HashMap::new();
    let mut out: Vec<NewsRecord> = Vec::with_capacity(records.len());

    for record in records {
        match index.get(&record.dedup_key()) {
            Some(&pos) => {
                out[pos] = out[pos].with_fallbacks(&record);
            }
            None => {
                index.insert(record.dedup_key(), out.len());
                out.push(record);
            }
        }
    }

    out
}
