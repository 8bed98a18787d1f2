use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Timeout applied to every outbound HTTP request.
    pub request_timeout_secs: u64,
    /// Upper bound for one news source's whole fetch within a request.
    pub source_deadline_secs: u64,
    pub user_agent: String,
    /// Google News `hl` parameter, e.g. `pt-BR`.
    pub news_language: String,
    /// Google News `gl` / SerpApi `cc` parameter, e.g. `BR`.
    pub news_country: String,
    pub company_sites_path: Option<PathBuf>,
    /// Lower-cased source kinds switched off via `MNM_DISABLED_SOURCES`.
    pub disabled_sources: Vec<String>,
    pub gnews_api_key: Option<String>,
    pub serp_api_key: Option<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("source_deadline_secs", &self.source_deadline_secs)
            .field("user_agent", &self.user_agent)
            .field("news_language", &self.news_language)
            .field("news_country", &self.news_country)
            .field("company_sites_path", &self.company_sites_path)
            .field("disabled_sources", &self.disabled_sources)
            .field(
                "gnews_api_key",
                &self.gnews_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "serp_api_key",
                &self.serp_api_key.as_ref().map(|_| "[redacted]"),
            )
            .finish()
    }
}
