//! Free-text store matcher used for live search suggestions.
//!
//! Matches are split into two buckets, shopping centers and individual
//! stores. Centers always come first; each bucket keeps dataset order.

use storefinder_core::StoreFeature;

use crate::normalize::{build_search_haystack, fold_diacritics, normalize_text};

/// Result cap when the caller does not supply one.
pub const DEFAULT_LIMIT: usize = 8;

/// Queries shorter than this (in characters, after trimming) match nothing.
pub const MIN_QUERY_CHARS: usize = 2;

/// A normalized query, ready to test against haystacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    normalized: String,
    folded: Option<String>,
}

impl SearchQuery {
    /// Normalize `raw`. Returns `None` when it is below [`MIN_QUERY_CHARS`].
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = normalize_text(raw);
        if normalized.chars().count() < MIN_QUERY_CHARS {
            return None;
        }
        let folded = fold_diacritics(&normalized);
        let folded = (folded != normalized).then(|| folded.into_owned());
        Some(Self { normalized, folded })
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.normalized
    }

    /// Whole-query substring hit, falling back to every word being present
    /// somewhere in the haystack in any order.
    #[must_use]
    pub fn matches(&self, haystack: &str) -> bool {
        self.forms()
            .any(|form| haystack.contains(form) || all_words_present(form, haystack))
    }

    fn forms(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.normalized.as_str()).chain(self.folded.as_deref())
    }
}

fn all_words_present(query: &str, haystack: &str) -> bool {
    let mut words = query.split_whitespace().peekable();
    words.peek().is_some() && words.all(|word| haystack.contains(word))
}

/// Rank and filter `records` against `query`.
///
/// Returns at most `limit` features: every matching shopping center in
/// dataset order, then every matching store in dataset order. Features
/// without properties are skipped. Scanning stops once both buckets hold
/// `limit` matches, which never changes the truncated output.
#[must_use]
pub fn search_stores<'a>(
    records: &'a [StoreFeature],
    query: &str,
    limit: usize,
) -> Vec<&'a StoreFeature> {
    let Some(query) = SearchQuery::parse(query) else {
        return Vec::new();
    };
    if limit == 0 {
        return Vec::new();
    }

    let mut centers: Vec<&StoreFeature> = Vec::new();
    let mut stores: Vec<&StoreFeature> = Vec::new();

    for feature in records {
        let Some(properties) = feature.properties.as_ref() else {
            continue;
        };

        let haystack = build_search_haystack(properties);
        if !query.matches(&haystack) {
            continue;
        }

        if properties.is_shopping_center {
            centers.push(feature);
        } else {
            stores.push(feature);
        }

        if centers.len() >= limit && stores.len() >= limit {
            break;
        }
    }

    let mut results = centers;
    results.append(&mut stores);
    results.truncate(limit);

    tracing::debug!(
        query = query.as_str(),
        limit,
        results = results.len(),
        "store search"
    );
    results
}

#[cfg(test)]
#[path = "matcher_test.rs"]
mod tests;
