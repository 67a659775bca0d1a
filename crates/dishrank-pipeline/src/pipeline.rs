//! The fetch → extract → aggregate → cache sequence behind
//! `get_popular_items`.

use std::time::Duration;

use chrono::Utc;
use futures::stream::{self, StreamExt};

use dishrank_core::{AggregationResult, Candidate, Mention, Query};
use dishrank_extract::ExtractClient;
use dishrank_places::PlacesClient;

use crate::aggregate::aggregate;
use crate::cache::ResultCache;
use crate::error::PipelineError;
use crate::resolver;

/// The resolution-through-aggregation pipeline with its injected
/// collaborators: places client, extraction client, and result cache.
pub struct PopularDishes {
    places: PlacesClient,
    extract: ExtractClient,
    cache: ResultCache,
    cache_ttl: Duration,
    max_concurrent: usize,
    top_dishes: usize,
}

impl PopularDishes {
    /// Assembles the pipeline.
    ///
    /// `max_concurrent` bounds how many extraction calls run at once (a
    /// value of 0 is treated as 1); `top_dishes` caps the ranked list
    /// stored and returned per venue.
    #[must_use]
    pub fn new(
        places: PlacesClient,
        extract: ExtractClient,
        cache_ttl: Duration,
        max_concurrent: usize,
        top_dishes: usize,
    ) -> Self {
        Self {
            places,
            extract,
            cache: ResultCache::new(),
            cache_ttl,
            max_concurrent,
            top_dishes,
        }
    }

    /// Resolves a free-text query to venue candidates. See
    /// [`resolver::resolve_query`].
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidQuery`] for an empty query and
    /// [`PipelineError::ProviderUnavailable`] on provider faults.
    pub async fn resolve_query(&self, query: &Query) -> Result<Vec<Candidate>, PipelineError> {
        resolver::resolve_query(&self.places, query).await
    }

    /// Returns the ranked popular-dish list for a venue, computing and
    /// caching it on a miss.
    ///
    /// On a miss the venue's reviews are fetched and extraction fans out
    /// over them, bounded by the configured concurrency limit. Collection
    /// is in review order so display spellings and sample quotes are stable
    /// for a given extraction outcome. A review whose extraction fails is
    /// logged and contributes no mentions; siblings proceed. All
    /// extractions failing yields an empty dish list, which is a valid
    /// result and is cached like any other.
    ///
    /// The cache write happens only after a complete aggregation pass, so
    /// an abandoned call never leaves a partial entry behind.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::VenueNotFound`] when the id is unknown to the
    ///   provider.
    /// - [`PipelineError::ProviderUnavailable`] on transient provider
    ///   faults during the detail fetch.
    pub async fn get_popular_items(
        &self,
        place_id: &str,
    ) -> Result<AggregationResult, PipelineError> {
        if let Some(hit) = self.cache.get(place_id).await {
            tracing::debug!(place_id, "serving popular dishes from cache");
            return Ok(hit);
        }

        let detail = self.places.place_details(place_id).await?;
        let reviews = detail.reviews;
        let total = reviews.len();

        let outcomes: Vec<_> = stream::iter(&reviews)
            .map(|review| {
                let extract = &self.extract;
                async move { (review, extract.extract(review).await) }
            })
            .buffered(self.max_concurrent.max(1))
            .collect()
            .await;

        let mut mentions: Vec<Mention> = Vec::new();
        let mut failed = 0usize;
        for (review, outcome) in outcomes {
            match outcome {
                Ok(extracted) => mentions.extend(extracted),
                Err(e) => {
                    failed += 1;
                    tracing::warn!(
                        review_id = %review.id,
                        error = %e,
                        "extraction failed for review, skipping it"
                    );
                }
            }
        }
        if failed > 0 {
            tracing::info!(
                place_id,
                failed,
                total,
                "proceeding with partial extraction results"
            );
        }

        let mut dishes = aggregate(mentions);
        dishes.truncate(self.top_dishes);

        let result = AggregationResult {
            place_id: place_id.to_string(),
            dishes,
            computed_at: Utc::now(),
        };
        tracing::info!(
            place_id,
            dishes = result.dishes.len(),
            reviews = total,
            "computed popular dishes"
        );

        self.cache.put(result.clone(), self.cache_ttl).await;
        Ok(result)
    }

    /// Drops expired cache entries. See [`ResultCache::sweep`].
    pub async fn sweep_cache(&self) -> usize {
        self.cache.sweep().await
    }
}
