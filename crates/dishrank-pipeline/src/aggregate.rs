//! Merge of per-review dish mentions into a ranked popular-dish list.
//!
//! The merge is commutative and associative in its effect on the ranking:
//! any permutation of the same mention multiset yields the same counts,
//! means, and rank order. That property is what lets extraction results be
//! collected from concurrent calls in any completion order.

use std::cmp::Ordering;
use std::collections::HashMap;

use dishrank_core::{Mention, PopularDish};

/// At most this many supporting quotes are kept per dish.
const MAX_SAMPLE_QUOTES: usize = 3;

/// Folds a raw dish name to its canonical key: lowercase, leading/trailing
/// whitespace trimmed, internal whitespace collapsed to single spaces.
///
/// Two raw spellings with the same canonical key are the same dish.
#[must_use]
pub fn canonical_key(raw: &str) -> String {
    raw.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

struct DishGroup {
    key: String,
    /// First raw spelling seen for this key; used as the display name.
    display: String,
    count: usize,
    sentiment_sum: f64,
    quotes: Vec<String>,
}

impl DishGroup {
    fn avg_sentiment(&self) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let denom = self.count as f64;
        self.sentiment_sum / denom
    }
}

/// Merges mentions into a deduplicated, ranked popular-dish list.
///
/// Grouping is by canonical key. Per group: `mention_count` is the group
/// size, `avg_sentiment` the arithmetic mean of its sentiment scores, and
/// `sample_quotes` the first [`MAX_SAMPLE_QUOTES`] distinct non-empty quotes
/// in arrival order. Ranking is `mention_count` descending, then
/// `avg_sentiment` descending, then canonical key ascending, which makes
/// the output a total order independent of input arrival order.
///
/// Empty input yields empty output. Mentions whose dish name canonicalizes
/// to the empty string are skipped.
#[must_use]
pub fn aggregate(mentions: Vec<Mention>) -> Vec<PopularDish> {
    let mut groups: Vec<DishGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for mention in mentions {
        let key = canonical_key(&mention.dish);
        if key.is_empty() {
            continue;
        }
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            groups.push(DishGroup {
                key,
                display: mention.dish.clone(),
                count: 0,
                sentiment_sum: 0.0,
                quotes: Vec::new(),
            });
            groups.len() - 1
        });
        let group = &mut groups[slot];
        group.count += 1;
        group.sentiment_sum += mention.sentiment;
        if group.quotes.len() < MAX_SAMPLE_QUOTES
            && !mention.quote.is_empty()
            && !group.quotes.contains(&mention.quote)
        {
            group.quotes.push(mention.quote);
        }
    }

    groups.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| {
                b.avg_sentiment()
                    .partial_cmp(&a.avg_sentiment())
                    .unwrap_or(Ordering::Equal)
            })
            .then_with(|| a.key.cmp(&b.key))
    });

    groups
        .into_iter()
        .map(|g| PopularDish {
            avg_sentiment: g.avg_sentiment(),
            name: g.display,
            mention_count: g.count,
            sample_quotes: g.quotes,
        })
        .collect()
}
