//! Two-stage resolution of a free-text query to venue candidates.

use dishrank_core::{Candidate, Query};
use dishrank_places::{ExactLookup, PlacesClient};

use crate::error::PipelineError;

/// Resolves a query to zero or more venue candidates.
///
/// Stage one treats the query as a specific name/location pair and asks the
/// provider for an exact match; a single unambiguous hit returns immediately
/// (the low-latency path for well-formed queries). When the provider finds
/// nothing or comes back ambiguous, stage two falls back to fuzzy text
/// search and returns the provider's ranked order unmodified.
///
/// Zero candidates from both stages is `Ok(vec![])`, not an error; the
/// caller reports "no match".
///
/// # Errors
///
/// - [`PipelineError::InvalidQuery`] when the query text is empty after
///   trimming (checked before any provider call).
/// - [`PipelineError::ProviderUnavailable`] when either provider call fails.
pub async fn resolve_query(
    places: &PlacesClient,
    query: &Query,
) -> Result<Vec<Candidate>, PipelineError> {
    let text = query.provider_text();
    if text.is_empty() {
        return Err(PipelineError::InvalidQuery);
    }

    tracing::info!(query = %text, "resolving venue query");

    match places.find_place(&text).await? {
        ExactLookup::Match(candidate) => {
            tracing::info!(place_id = %candidate.place_id, "exact match found");
            Ok(vec![candidate])
        }
        ExactLookup::NotFound => {
            tracing::info!("no exact match, falling back to text search");
            Ok(places.text_search(&text).await?)
        }
        ExactLookup::Ambiguous => {
            tracing::info!("exact lookup ambiguous, falling back to text search");
            Ok(places.text_search(&text).await?)
        }
    }
}
