//! error.rs — the library's single error type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A mandatory configuration value was absent or blank.
    #[error("missing configuration value {0}; set it in the environment or in .env.local")]
    MissingConfig(&'static str),

    #[error("invalid service URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Transport-level failure (DNS, TLS, timeout, connection reset).
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: Box<ureq::Transport>,
    },

    /// The service answered with a non-success status.
    #[error("{url} answered HTTP {code}: {body}")]
    Status { url: String, code: u16, body: String },

    #[error("could not decode response from {url}: {source}")]
    Json {
        url: String,
        #[source]
        source: std::io::Error,
    },

    /// The page payload could not be serialized.
    #[error("could not encode page data: {0}")]
    Encode(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
