//! Domain types shared across the resolution and aggregation crates.
//!
//! Everything here is an immutable snapshot once constructed: provider
//! responses are normalized into these shapes and never mutated afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A free-text venue query, optionally biased by a locality hint.
#[derive(Debug, Clone)]
pub struct Query {
    pub text: String,
    /// Locality hint (city, neighborhood, zip). Appended to the query text
    /// before the provider call when present.
    pub near: Option<String>,
}

impl Query {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            near: None,
        }
    }

    #[must_use]
    pub fn with_near(mut self, near: impl Into<String>) -> Self {
        self.near = Some(near.into());
        self
    }

    /// The text actually sent to the provider: `"{text} {near}"` when a
    /// locality hint is set.
    #[must_use]
    pub fn provider_text(&self) -> String {
        match &self.near {
            Some(near) if !near.trim().is_empty() => format!("{} {}", self.text.trim(), near.trim()),
            _ => self.text.trim().to_string(),
        }
    }
}

/// One venue candidate produced by query resolution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Candidate {
    pub place_id: String,
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub user_ratings_total: Option<u32>,
    /// Provider price tier, 0 (free) through 4 (very expensive).
    #[serde(default)]
    pub price_level: Option<u8>,
    /// Provider category hints, e.g. `["restaurant", "food"]`.
    #[serde(default)]
    pub categories: Vec<String>,
}

/// One user-submitted review, normalized from the provider shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Review {
    /// Provider review id, or a derived hash where the provider has none.
    pub id: String,
    pub text: String,
    /// Star rating, 0–5.
    pub rating: u8,
    pub author_name: String,
    pub time: DateTime<Utc>,
}

/// Venue metadata plus its available review corpus at fetch time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenueDetail {
    pub place_id: String,
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub user_ratings_total: Option<u32>,
    #[serde(default)]
    pub price_level: Option<u8>,
    /// Up to five resolved photo URLs.
    #[serde(default)]
    pub photo_urls: Vec<String>,
    #[serde(default)]
    pub reviews: Vec<Review>,
}

/// One dish reference extracted from one review.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Mention {
    /// Raw dish name as the extractor produced it (not canonicalized).
    pub dish: String,
    /// Sentiment toward the dish in `[0.0, 1.0]`.
    pub sentiment: f64,
    /// Id of the review this mention came from.
    pub review_id: String,
    /// Minimal span of review text supporting the mention.
    pub quote: String,
}

/// A dish after merging all of its mentions across the review corpus.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PopularDish {
    /// Display name: the first raw spelling seen for this dish.
    pub name: String,
    pub mention_count: usize,
    /// Arithmetic mean of the merged mentions' sentiment scores.
    pub avg_sentiment: f64,
    /// First three distinct supporting quotes, in arrival order.
    pub sample_quotes: Vec<String>,
}

/// The ranked popular-dish list for one venue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregationResult {
    pub place_id: String,
    pub dishes: Vec<PopularDish>,
    pub computed_at: DateTime<Utc>,
}
