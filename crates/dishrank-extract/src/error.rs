use thiserror::Error;

/// Errors scoped to a single review's extraction call.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The capability endpoint broke its contract: non-2xx status, empty
    /// candidate list, or a response with no text content.
    #[error("extract API error: {0}")]
    Api(String),

    /// The returned text could not be reduced to a mention array.
    #[error("extract parse error for {context}: {source}")]
    Parse {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}
