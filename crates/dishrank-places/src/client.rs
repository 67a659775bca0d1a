//! HTTP client for the places provider's legacy JSON endpoints.
//!
//! Wraps `reqwest` with provider-specific error handling, API key
//! management, and typed response deserialization. Every method checks the
//! `status` field of the JSON envelope; non-success statuses surface as
//! [`PlacesError::Api`] except `NOT_FOUND`, which maps to
//! [`PlacesError::NotFound`] so callers can treat stale ids as terminal.

use std::time::Duration;

use reqwest::{Client, Url};

use dishrank_core::{Candidate, VenueDetail};

use crate::error::PlacesError;
use crate::normalize::{candidate_from_result, detail_from_result};
use crate::types::{DetailsResponse, ExactLookup, FindPlaceResponse, TextSearchResponse};

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api";

/// Fields requested from the find-place and text-search endpoints.
const SEARCH_FIELDS: &str =
    "place_id,name,formatted_address,rating,user_ratings_total,price_level,types,photos,business_status";

/// Fields requested from the details endpoint. `reviews` asks the provider
/// for its maximum review set; the cap is the provider's, not ours.
const DETAIL_FIELDS: &str =
    "place_id,name,formatted_address,rating,user_ratings_total,price_level,types,photos,reviews";

/// Width passed to the photo endpoint when building photo URLs.
const PHOTO_MAX_WIDTH: u32 = 800;

/// Client for the places provider.
///
/// Use [`PlacesClient::new`] for production or
/// [`PlacesClient::with_base_url`] to point at a mock server in tests.
pub struct PlacesClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl PlacesClient {
    /// Creates a new client pointed at the production provider.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, PlacesError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`PlacesError::Api`] if `base_url` is not a
    /// valid URL.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, PlacesError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("dishrank/0.1 (venue-resolution)")
            .build()?;

        // Normalise: ensure the base URL ends with exactly one slash so that
        // join() appends path segments rather than replacing the last one.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| PlacesError::Api {
            status: "INVALID_BASE_URL".to_string(),
            message: Some(format!("invalid base URL '{base_url}': {e}")),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
        })
    }

    /// Exact lookup: treats `input` as a specific name/location pair.
    ///
    /// Returns [`ExactLookup::Match`] only when the provider comes back with
    /// exactly one candidate; more than one is [`ExactLookup::Ambiguous`],
    /// and `ZERO_RESULTS` (or an empty candidate list) is
    /// [`ExactLookup::NotFound`].
    ///
    /// # Errors
    ///
    /// - [`PlacesError::Http`] on network failure or non-2xx HTTP status.
    /// - [`PlacesError::Api`] on any other provider status.
    /// - [`PlacesError::Deserialize`] if the response does not match the
    ///   expected shape.
    pub async fn find_place(&self, input: &str) -> Result<ExactLookup, PlacesError> {
        let url = self.build_url(
            "place/findplacefromtext/json",
            &[
                ("input", input),
                ("inputtype", "textquery"),
                ("fields", SEARCH_FIELDS),
            ],
        );
        let body: FindPlaceResponse = self.request_json(&url).await?;

        match body.status.as_str() {
            "OK" => {
                let mut candidates = body.candidates;
                match candidates.len() {
                    0 => Ok(ExactLookup::NotFound),
                    1 => {
                        let candidate = candidate_from_result(candidates.remove(0));
                        tracing::debug!(place_id = %candidate.place_id, "exact lookup matched");
                        Ok(ExactLookup::Match(candidate))
                    }
                    n => {
                        tracing::debug!(candidates = n, "exact lookup ambiguous");
                        Ok(ExactLookup::Ambiguous)
                    }
                }
            }
            "ZERO_RESULTS" => Ok(ExactLookup::NotFound),
            status => Err(PlacesError::Api {
                status: status.to_string(),
                message: body.error_message,
            }),
        }
    }

    /// Fuzzy text search returning the provider's ranked candidate list.
    ///
    /// Result order is the provider's; it is not re-ranked locally.
    /// `ZERO_RESULTS` yields an empty vector, not an error.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::Http`] on network failure or non-2xx HTTP status.
    /// - [`PlacesError::Api`] on any other provider status.
    /// - [`PlacesError::Deserialize`] if the response does not match the
    ///   expected shape.
    pub async fn text_search(&self, query: &str) -> Result<Vec<Candidate>, PlacesError> {
        let url = self.build_url("place/textsearch/json", &[("query", query)]);
        let body: TextSearchResponse = self.request_json(&url).await?;

        match body.status.as_str() {
            "OK" => {
                let candidates: Vec<Candidate> = body
                    .results
                    .into_iter()
                    .map(candidate_from_result)
                    .collect();
                tracing::info!(count = candidates.len(), "text search returned candidates");
                Ok(candidates)
            }
            "ZERO_RESULTS" => Ok(Vec::new()),
            status => Err(PlacesError::Api {
                status: status.to_string(),
                message: body.error_message,
            }),
        }
    }

    /// Fetches venue details plus the provider's maximum review set.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::NotFound`] if the provider no longer knows the id.
    /// - [`PlacesError::Http`] on network failure or non-2xx HTTP status.
    /// - [`PlacesError::Api`] on any other provider status or a success
    ///   envelope with a missing `result`.
    /// - [`PlacesError::Deserialize`] if the response does not match the
    ///   expected shape.
    pub async fn place_details(&self, place_id: &str) -> Result<VenueDetail, PlacesError> {
        let url = self.build_url(
            "place/details/json",
            &[("place_id", place_id), ("fields", DETAIL_FIELDS)],
        );
        let body: DetailsResponse = self.request_json(&url).await?;

        match body.status.as_str() {
            "OK" => {
                let result = body.result.ok_or_else(|| PlacesError::Api {
                    status: "OK".to_string(),
                    message: Some("details response missing result".to_string()),
                })?;
                let detail = detail_from_result(result, |photo_reference| {
                    self.photo_url(photo_reference, PHOTO_MAX_WIDTH)
                });
                tracing::info!(
                    place_id = %detail.place_id,
                    reviews = detail.reviews.len(),
                    "fetched venue details"
                );
                Ok(detail)
            }
            "NOT_FOUND" => Err(PlacesError::NotFound {
                place_id: place_id.to_string(),
            }),
            status => Err(PlacesError::Api {
                status: status.to_string(),
                message: body.error_message,
            }),
        }
    }

    /// Builds the URL serving a photo for the given reference.
    #[must_use]
    pub fn photo_url(&self, photo_reference: &str, max_width: u32) -> String {
        let url = self.build_url(
            "place/photo",
            &[
                ("maxwidth", &max_width.to_string()),
                ("photoreference", photo_reference),
            ],
        );
        url.to_string()
    }

    /// Builds the full request URL with properly percent-encoded query
    /// parameters, always including the API key.
    fn build_url(&self, path: &str, extra: &[(&str, &str)]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(path.split('/'));
        }
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in extra {
                pairs.append_pair(k, v);
            }
            pairs.append_pair("key", &self.api_key);
        }
        url
    }

    /// Sends a GET request, asserts a 2xx HTTP status, and parses the
    /// response body into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] on network failure or a non-2xx status.
    /// Returns [`PlacesError::Deserialize`] if the body does not parse.
    async fn request_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &Url,
    ) -> Result<T, PlacesError> {
        let response = self.client.get(url.clone()).send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| PlacesError::Deserialize {
            context: url.path().to_string(),
            source: e,
        })
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
