//! Query resolution and popular-dish aggregation pipeline.
//!
//! Ties the places and extraction clients together: resolve a free-text
//! query to venue candidates, fetch a venue's review corpus, fan extraction
//! out over the reviews with a bounded concurrency limit, merge the mentions
//! into a deterministic ranked list, and cache the result per venue with a
//! TTL. Per-review extraction failures are absorbed here; they never
//! surface past the aggregation boundary.

pub mod aggregate;
pub mod cache;
pub mod error;
pub mod pipeline;
pub mod resolver;

pub use aggregate::{aggregate, canonical_key};
pub use cache::ResultCache;
pub use error::PipelineError;
pub use pipeline::PopularDishes;
pub use resolver::resolve_query;
