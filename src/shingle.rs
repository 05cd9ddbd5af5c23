//! Word n-gram shingling.
//!
//! A document's shingle set is every run of `n` consecutive tokens of its
//! lowercased text, joined with single spaces. Order and duplicates are
//! discarded. The text is tokenized directly, without the classifier
//! normalizer's cleaning, stopword removal, or lemmatization, so
//! punctuation tokens take part in shingles.

use std::collections::HashSet;

use crate::tokenize::word_tokenize;

/// Default shingle width.
pub const DEFAULT_SHINGLE_SIZE: usize = 3;

pub type ShingleSet = HashSet<String>;

/// Build the n-gram shingle set of `text`.
///
/// Returns an empty set when the text has fewer than `n` tokens (or `n` is 0).
pub fn shingles(text: &str, n: usize) -> ShingleSet {
    let tokens = word_tokenize(&text.to_lowercase());
    if n == 0 || tokens.len() < n {
        return ShingleSet::new();
    }
    tokens.windows(n).map(|w| w.join(" ")).collect()
}
