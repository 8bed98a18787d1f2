use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Official news channels for one company: a blog feed, a blog page, or both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanySite {
    pub company: String,
    pub feed_url: Option<String>,
    pub page_url: Option<String>,
}

impl CompanySite {
    /// Case-insensitive match against a requested company name.
    #[must_use]
    pub fn matches(&self, company: &str) -> bool {
        self.company.trim().to_lowercase() == company.trim().to_lowercase()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompanySitesFile {
    pub sites: Vec<CompanySite>,
}

/// Built-in catalogue used when no sites file is configured.
#[must_use]
pub fn default_company_sites() -> Vec<CompanySite> {
    let site = |company: &str, feed: &str, page: &str| CompanySite {
        company: company.to_string(),
        feed_url: Some(feed.to_string()),
        page_url: Some(page.to_string()),
    };
    vec![
        site(
            "Nubank",
            "https://blog.nubank.com.br/feed/",
            "https://blog.nubank.com.br/",
        ),
        site(
            "Totvs",
            "https://www.totvs.com/blog/feed/",
            "https://www.totvs.com/blog/",
        ),
        site(
            "Stone",
            "https://blog.stone.com.br/feed/",
            "https://blog.stone.com.br/",
        ),
    ]
}

/// Load and validate the company-site catalogue from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_company_sites(path: &Path) -> Result<Vec<CompanySite>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SitesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_company_sites(&content)
}

fn parse_company_sites(content: &str) -> Result<Vec<CompanySite>, ConfigError> {
    let file: CompanySitesFile = serde_yaml::from_str(content)?;
    validate_sites(&file.sites)?;
    Ok(file.sites)
}

fn validate_sites(sites: &[CompanySite]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();

    for site in sites {
        let name = site.company.trim();
        if name.is_empty() {
            return Err(ConfigError::Validation(
                "company name must be non-empty".to_string(),
            ));
        }

        let has_url = |url: Option<&String>| url.is_some_and(|u| !u.trim().is_empty());
        if !has_url(site.feed_url.as_ref()) && !has_url(site.page_url.as_ref()) {
            return Err(ConfigError::Validation(format!(
                "company '{name}' needs a feed_url or a page_url"
            )));
        }

        for url in [&site.feed_url, &site.page_url].into_iter().flatten() {
            let url = url.trim();
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::Validation(format!(
                    "company '{name}' has a non-http url: '{url}'"
                )));
            }
        }

        if !seen.insert(name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate company: '{name}'"
            )));
        }
    }

    Ok(())
}
