use thiserror::Error;

use dishrank_places::PlacesError;

/// Errors surfaced to the pipeline's caller.
///
/// Per-review extraction failures are deliberately absent: they are absorbed
/// inside the pipeline (the failing review contributes no mentions) and an
/// empty dish list is a valid result, not an error.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The query text was empty after trimming. Fail fast; no provider call
    /// is made and retrying the same input cannot succeed.
    #[error("query text is empty")]
    InvalidQuery,

    /// A provider call failed for transient/infrastructure reasons. Eligible
    /// for caller-driven retry with backoff; never retried internally.
    #[error("places provider unavailable: {source}")]
    ProviderUnavailable {
        #[source]
        source: PlacesError,
    },

    /// The provider no longer knows this venue id. Terminal for the id;
    /// retrying cannot succeed.
    #[error("venue not found: {place_id}")]
    VenueNotFound { place_id: String },
}

impl From<PlacesError> for PipelineError {
    fn from(err: PlacesError) -> Self {
        match err {
            PlacesError::NotFound { place_id } => PipelineError::VenueNotFound { place_id },
            other => PipelineError::ProviderUnavailable { source: other },
        }
    }
}
