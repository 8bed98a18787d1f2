//! Explicit source activation and HTTP settings for the aggregator.

use std::time::Duration;

use mnm_core::{AppConfig, CompanySite};

use crate::error::NewsError;
use crate::sources::publisher_feeds::DEFAULT_PUBLISHER_FEEDS;
use crate::types::SourceKind;

/// Everything the news sources need, resolved once from [`AppConfig`].
///
/// Tests build this directly instead of mutating the process environment.
#[derive(Clone)]
pub struct NewsConfig {
    pub request_timeout: Duration,
    pub source_deadline: Duration,
    pub user_agent: String,
    pub language: String,
    pub country: String,
    pub company_sites: Vec<CompanySite>,
    pub publisher_feeds: Vec<String>,
    pub gnews_api_key: Option<String>,
    pub serp_api_key: Option<String>,
    pub(crate) disabled: Vec<SourceKind>,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
            source_deadline: Duration::from_secs(30),
            user_agent: "mnm/0.1 (market-news-monitor)".to_string(),
            language: "pt-BR".to_string(),
            country: "BR".to_string(),
            company_sites: mnm_core::default_company_sites(),
            publisher_feeds: DEFAULT_PUBLISHER_FEEDS
                .iter()
                .map(ToString::to_string)
                .collect(),
            gnews_api_key: None,
            serp_api_key: None,
            disabled: Vec::new(),
        }
    }
}

impl NewsConfig {
    /// Resolve source settings from the application config.
    ///
    /// Loads the company-site catalogue when `MNM_COMPANY_SITES_PATH` is set.
    ///
    /// # Errors
    ///
    /// Returns [`NewsError::UnknownSource`] for an unrecognized entry in
    /// `MNM_DISABLED_SOURCES`, or [`NewsError::Config`] if the catalogue
    /// cannot be loaded.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, NewsError> {
        let company_sites = match &config.company_sites_path {
            Some(path) => mnm_core::load_company_sites(path)?,
            None => mnm_core::default_company_sites(),
        };

        let disabled = config
            .disabled_sources
            .iter()
            .map(|s| s.parse::<SourceKind>())
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            request_timeout: Duration::from_secs(config.request_timeout_secs),
            source_deadline: Duration::from_secs(config.source_deadline_secs),
            user_agent: config.user_agent.clone(),
            language: config.news_language.clone(),
            country: config.news_country.clone(),
            company_sites,
            gnews_api_key: config.gnews_api_key.clone(),
            serp_api_key: config.serp_api_key.clone(),
            disabled,
            ..Self::default()
        })
    }

    /// Switch a source off regardless of credentials.
    #[must_use]
    pub fn disable(mut self, kind: SourceKind) -> Self {
        if !self.disabled.contains(&kind) {
            self.disabled.push(kind);
        }
        self
    }

    /// Why `kind` will not run, or `None` if it is active.
    #[must_use]
    pub fn inactive_reason(&self, kind: SourceKind) -> Option<String> {
        if self.disabled.contains(&kind) {
            return Some("disabled by configuration".to_string());
        }
        let has_credential = match kind {
            SourceKind::GenericNewsApi => self.gnews_api_key.is_some(),
            SourceKind::NewsSearchApi | SourceKind::SocialSearch => self.serp_api_key.is_some(),
            SourceKind::CompanySite | SourceKind::SearchRss | SourceKind::PublisherFeed => true,
        };
        if has_credential {
            None
        } else {
            kind.credential_var().map(|var| format!("{var} not set"))
        }
    }

    #[must_use]
    pub fn is_enabled(&self, kind: SourceKind) -> bool {
        self.inactive_reason(kind).is_none()
    }

    /// Active sources in roster order.
    #[must_use]
    pub fn enabled_sources(&self) -> Vec<SourceKind> {
        SourceKind::ALL
            .into_iter()
            .filter(|kind| self.is_enabled(*kind))
            .collect()
    }

    /// Two-letter language code, e.g. `pt` for `pt-BR`.
    pub(crate) fn language_code(&self) -> &str {
        self.language.split(['-', '_']).next().unwrap_or("pt")
    }
}

impl std::fmt::Debug for NewsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewsConfig")
            .field("request_timeout", &self.request_timeout)
            .field("source_deadline", &self.source_deadline)
            .field("user_agent", &self.user_agent)
            .field("language", &self.language)
            .field("country", &self.country)
            .field("company_sites", &self.company_sites.len())
            .field("publisher_feeds", &self.publisher_feeds.len())
            .field(
                "gnews_api_key",
                &self.gnews_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "serp_api_key",
                &self.serp_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("disabled", &self.disabled)
            .finish()
    }
}
