use thiserror::Error;

/// Errors returned by the places provider client.
#[derive(Debug, Error)]
pub enum PlacesError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The provider returned a non-success status in its JSON envelope
    /// (e.g. `REQUEST_DENIED`, `OVER_QUERY_LIMIT`, `INVALID_REQUEST`).
    #[error("places API status {status}: {}", message.as_deref().unwrap_or("no message"))]
    Api {
        status: String,
        message: Option<String>,
    },

    /// The provider no longer knows the given place id.
    #[error("place not found: {place_id}")]
    NotFound { place_id: String },
}
