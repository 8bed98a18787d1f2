//! Chronological ordering of merged records.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::types::NewsRecord;

/// Order records most recent first, undated records last.
///
/// The sort is stable: records with equal timestamps, and undated records,
/// keep their input order. That is what lets higher-trust sources win ties,
/// because the aggregator concatenates them first.
#[must_use]
pub fn sort_by_recency(mut records: Vec<NewsRecord>) -> Vec<NewsRecord> {
    records.sort_by(|a, b| compare_recency(a.published_at(), b.published_at()));
    records
}

fn compare_recency(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
