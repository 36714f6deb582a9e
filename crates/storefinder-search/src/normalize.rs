//! Text normalization and haystack construction for store search.
//!
//! Every searchable token is emitted lower-cased and trimmed and, when
//! diacritic folding changes it, a second time in folded form. A query with
//! or without accents therefore hits the same record.

use std::borrow::Cow;

use storefinder_core::StoreRecord;
use unicode_normalization::UnicodeNormalization;

/// Appended after a parent center's name on store records.
const CENTER_SUFFIXES: [&str; 2] = ["kjøpesenter", "storsenter"];

/// Appended to records that are themselves shopping centers.
const CENTER_SYNONYMS: [&str; 6] = [
    "kjøpesenter",
    "kjopesenter",
    "storsenter",
    "senter",
    "shopping center",
    "shoppingcenter",
];

/// Lower-case and trim.
#[must_use]
pub fn normalize_text(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Strip diacritical marks.
///
/// Canonical decomposition removes combining marks (U+0300..=U+036F). Letters
/// with no decomposition (`ø`, `æ`, ...) are mapped to their base spelling.
#[must_use]
pub fn fold_diacritics(value: &str) -> Cow<'_, str> {
    if value.is_ascii() {
        return Cow::Borrowed(value);
    }

    let mut folded = String::with_capacity(value.len());
    for c in value.nfd() {
        if ('\u{0300}'..='\u{036f}').contains(&c) {
            continue;
        }
        match c {
            'ø' => folded.push('o'),
            'Ø' => folded.push('O'),
            'æ' => folded.push_str("ae"),
            'Æ' => folded.push_str("AE"),
            'ð' | 'đ' => folded.push('d'),
            'Ð' | 'Đ' => folded.push('D'),
            'þ' => folded.push_str("th"),
            'Þ' => folded.push_str("TH"),
            'ß' => folded.push_str("ss"),
            'ł' => folded.push('l'),
            'Ł' => folded.push('L'),
            other => folded.push(other),
        }
    }
    Cow::Owned(folded)
}

/// Build the searchable text for a record.
///
/// Fields are taken in a fixed order (`name`, `butikk`, `shopping_center`,
/// `address`, `address_line`, `city`, `zip_code`, `id`), followed by the
/// center suffixes and, for center records, the center synonyms.
#[must_use]
pub fn build_search_haystack(record: &StoreRecord) -> String {
    let id = record.id.as_ref().map(ToString::to_string);

    let mut tokens: Vec<Cow<'_, str>> = [
        record.name.as_deref(),
        record.butikk.as_deref(),
        record.shopping_center.as_deref(),
        record.address.as_deref(),
        record.address_line.as_deref(),
        record.city.as_deref(),
        record.zip_code.as_deref(),
        id.as_deref(),
    ]
    .into_iter()
    .flatten()
    .map(Cow::Borrowed)
    .collect();

    if let Some(center) = record.shopping_center.as_deref().filter(|s| !s.is_empty()) {
        tokens.extend(
            CENTER_SUFFIXES
                .iter()
                .map(|suffix| Cow::Owned(format!("{center} {suffix}"))),
        );
    }

    if record.is_shopping_center {
        tokens.extend(CENTER_SYNONYMS.iter().map(|s| Cow::Borrowed(*s)));
    }

    let mut haystack = String::new();
    for token in tokens {
        let normalized = normalize_text(&token);
        if normalized.is_empty() {
            continue;
        }
        let folded = fold_diacritics(&normalized);
        let folded = (folded != normalized).then(|| folded.into_owned());

        push_token(&mut haystack, &normalized);
        if let Some(folded) = folded {
            push_token(&mut haystack, &folded);
        }
    }
    haystack
}

fn push_token(haystack: &mut String, token: &str) {
    if !haystack.is_empty() {
        haystack.push(' ');
    }
    haystack.push_str(token);
}
