//! HTTP client for the places provider.
//!
//! Wraps the provider's legacy JSON endpoints (find-place-from-text, text
//! search, place details) with typed response envelopes and normalization
//! into the [`dishrank_core`] domain model. Exact lookup outcomes surface as
//! the [`ExactLookup`] sum type so callers can tell a clean single match from
//! provider-side ambiguity.

pub mod client;
pub mod error;
pub mod normalize;
pub mod types;

pub use client::PlacesClient;
pub use error::PlacesError;
pub use types::ExactLookup;
