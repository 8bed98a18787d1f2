use thiserror::Error;

#[derive(Debug, Error)]
pub enum NewsError {
    /// Transport failure. The request URL is stripped because some
    /// endpoints carry API keys in the query string.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {endpoint}")]
    UnexpectedStatus { status: u16, endpoint: String },

    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("unknown news source '{0}'")]
    UnknownSource(String),

    #[error("configuration error: {0}")]
    Config(#[from] mnm_core::ConfigError),

    #[error("classification failed: {0}")]
    Classify(String),

    #[error("no news sources are enabled")]
    NoSources,
}
