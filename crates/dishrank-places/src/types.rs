//! Places provider response types.
//!
//! All types model the JSON envelopes returned by the provider's legacy
//! endpoints. Every response carries a top-level `status` string (`"OK"`,
//! `"ZERO_RESULTS"`, `"NOT_FOUND"`, ...) and an optional `error_message`.

use dishrank_core::Candidate;
use serde::Deserialize;

/// Outcome of an exact (find-place-from-text) lookup.
///
/// The provider has no explicit "ambiguous" status; an exact lookup that
/// returns more than one candidate is treated as ambiguity and callers are
/// expected to fall back to fuzzy text search.
#[derive(Debug)]
pub enum ExactLookup {
    /// Exactly one unambiguous match.
    Match(Candidate),
    /// The provider found nothing for the input.
    NotFound,
    /// More than one candidate came back for a supposedly exact input.
    Ambiguous,
}

/// Envelope for the find-place-from-text endpoint: `{ status, candidates }`.
#[derive(Debug, Deserialize)]
pub struct FindPlaceResponse {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub candidates: Vec<PlaceResult>,
}

/// Envelope for the text-search endpoint: `{ status, results }`.
#[derive(Debug, Deserialize)]
pub struct TextSearchResponse {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub results: Vec<PlaceResult>,
}

/// Envelope for the place-details endpoint: `{ status, result }`.
#[derive(Debug, Deserialize)]
pub struct DetailsResponse {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub result: Option<PlaceResult>,
}

/// One place record as the provider returns it, from any of the three
/// endpoints. Search responses omit `reviews`; details include them.
#[derive(Debug, Deserialize)]
pub struct PlaceResult {
    pub place_id: String,
    pub name: String,
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub user_ratings_total: Option<u32>,
    /// Price tier 0–4.
    #[serde(default)]
    pub price_level: Option<u8>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub business_status: Option<String>,
    #[serde(default)]
    pub photos: Vec<PhotoRef>,
    #[serde(default)]
    pub reviews: Vec<RawReview>,
}

/// Photo reference from search or details.
#[derive(Debug, Deserialize)]
pub struct PhotoRef {
    pub photo_reference: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

/// One review as embedded in a details response.
#[derive(Debug, Deserialize)]
pub struct RawReview {
    pub author_name: String,
    pub rating: u8,
    #[serde(default)]
    pub text: String,
    /// Unix timestamp (seconds).
    pub time: i64,
    #[serde(default)]
    pub language: Option<String>,
}
