//! Client-side relevance filter for feeds that are not search-scoped.

/// Whether `company` appears in the title or description.
///
/// Case-insensitive substring match, not word-boundary aware: `"Stone"`
/// matches `"Stonework"`. Mentions that only occur past the snippet are
/// missed.
#[must_use]
pub fn mentions_company(company: &str, title: &str, description: &str) -> bool {
    let needle = company.trim().to_lowercase();
    if needle.is_empty() {
        return false;
    }
    title.to_lowercase().contains(&needle) || description.to_lowercase().contains(&needle)
}
