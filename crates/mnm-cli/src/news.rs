//! News command handlers for the CLI.

use futures::future::join_all;
use mnm_news::{
    build_sources, classify_all, Aggregator, KeywordClassifier, NewsConfig, NewsItem, NewsRecord,
};

/// One table row: `[date] source - title (event)`.
pub(crate) fn format_item_line(item: &NewsItem) -> String {
    let date = item.published_at.map_or_else(
        || "undated".to_string(),
        |at| at.format("%Y-%m-%d %H:%M").to_string(),
    );
    format!(
        "[{date}] {} - {} ({})",
        item.source_name, item.title, item.event_label
    )
}

/// Final line of the `sources` probe.
pub(crate) fn probe_summary(with_records: usize, total: usize) -> String {
    format!("{with_records}/{total} sources returned records")
}

/// Aggregate, classify and print news for `companies`.
///
/// # Errors
///
/// Returns an error if no source is enabled or JSON serialization fails.
pub(crate) async fn run_fetch(
    config: &NewsConfig,
    companies: &[String],
    json: bool,
) -> anyhow::Result<()> {
    let aggregator = Aggregator::from_config(config)?;
    let records = aggregator.aggregate(companies).await;
    let items = classify_all(&KeywordClassifier, &records);
    tracing::info!(
        companies = companies.len(),
        records = records.len(),
        "aggregation finished"
    );

    if json {
        for item in &items {
            println!("{}", serde_json::to_string(item)?);
        }
        return Ok(());
    }

    if items.is_empty() {
        println!("no news found for {}", companies.join(", "));
        return Ok(());
    }

    for item in &items {
        println!("{:<12} {}", item.company, format_item_line(item));
        println!("{:<12} {}", "", item.source_url);
    }
    println!();
    println!("{} items", items.len());
    Ok(())
}

/// Run each enabled source on its own and report per-source results.
///
/// # Errors
///
/// Returns an error if the configuration enables no source.
pub(crate) async fn run_sources_probe(
    config: &NewsConfig,
    companies: &[String],
) -> anyhow::Result<()> {
    let sources = build_sources(config);
    if sources.is_empty() {
        anyhow::bail!("no news sources are enabled; check MNM_DISABLED_SOURCES and API keys");
    }

    let deadline = config.source_deadline;
    let outcomes = join_all(sources.iter().map(|source| async move {
        tokio::time::timeout(deadline, source.fetch(companies)).await
    }))
    .await;

    let mut with_records = 0_usize;
    for (source, outcome) in sources.iter().zip(outcomes) {
        let kind = source.kind();
        match outcome {
            Ok(Ok(records)) => {
                println!("{kind:<18} {} records", records.len());
                if let Some(first) = records.first() {
                    println!("{:<18} first: {}", "", describe(first));
                    with_records += 1;
                }
            }
            Ok(Err(e)) => {
                tracing::debug!(source = %kind, error = %e, "probe failed");
                println!("{kind:<18} failed: {e}");
            }
            Err(_) => println!("{kind:<18} timed out after {}s", deadline.as_secs()),
        }
    }

    for kind in mnm_news::SourceKind::ALL {
        if let Some(reason) = config.inactive_reason(kind) {
            println!("{kind:<18} skipped: {reason}");
        }
    }

    println!();
    println!("{}", probe_summary(with_records, sources.len()));
    Ok(())
}

fn describe(record: &NewsRecord) -> String {
    format!(
        "{} | {} | {}",
        record.title(),
        record.source_name(),
        record.url()
    )
}
