//! Normalization from raw provider types to the [`dishrank_core`] model.
//!
//! Reviews with empty bodies are dropped here so downstream extraction never
//! sees them. Provider reviews carry no native id; one is derived from the
//! author name and timestamp.

use chrono::DateTime;
use sha2::{Digest, Sha256};

use dishrank_core::{Candidate, Review, VenueDetail};

use crate::types::{PlaceResult, RawReview};

/// At most this many photo URLs are resolved per venue.
const MAX_PHOTOS: usize = 5;

/// Hex length of derived review ids.
const REVIEW_ID_LEN: usize = 16;

/// Converts a raw search or find-place result into a [`Candidate`].
pub(crate) fn candidate_from_result(result: PlaceResult) -> Candidate {
    Candidate {
        place_id: result.place_id,
        name: result.name,
        address: result.formatted_address.unwrap_or_default(),
        rating: result.rating,
        user_ratings_total: result.user_ratings_total,
        price_level: result.price_level,
        categories: result.types,
    }
}

/// Converts a raw details result into a [`VenueDetail`].
///
/// `photo_url` maps a photo reference to a full URL; only the first
/// [`MAX_PHOTOS`] references are resolved. Empty-bodied reviews are dropped.
pub(crate) fn detail_from_result<F>(result: PlaceResult, photo_url: F) -> VenueDetail
where
    F: Fn(&str) -> String,
{
    let photo_urls = result
        .photos
        .iter()
        .take(MAX_PHOTOS)
        .map(|p| photo_url(&p.photo_reference))
        .collect();

    let reviews = result
        .reviews
        .into_iter()
        .filter(|r| !r.text.trim().is_empty())
        .map(review_from_raw)
        .collect();

    VenueDetail {
        place_id: result.place_id,
        name: result.name,
        address: result.formatted_address.unwrap_or_default(),
        rating: result.rating,
        user_ratings_total: result.user_ratings_total,
        price_level: result.price_level,
        photo_urls,
        reviews,
    }
}

fn review_from_raw(raw: RawReview) -> Review {
    let id = derive_review_id(&raw.author_name, raw.time);
    // Out-of-range timestamps map to the epoch rather than failing the fetch.
    let time = DateTime::from_timestamp(raw.time, 0).unwrap_or_default();
    Review {
        id,
        text: raw.text,
        rating: raw.rating.min(5),
        author_name: raw.author_name,
        time,
    }
}

/// Derives a stable review id from the author name and unix timestamp.
///
/// The same review refetched later hashes to the same id.
fn derive_review_id(author_name: &str, time: i64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(author_name.as_bytes());
    hasher.update(b"|");
    hasher.update(time.to_be_bytes());
    let digest = hasher.finalize();
    let mut id = String::with_capacity(REVIEW_ID_LEN);
    for byte in digest.iter().take(REVIEW_ID_LEN / 2) {
        id.push_str(&format!("{byte:02x}"));
    }
    id
}
