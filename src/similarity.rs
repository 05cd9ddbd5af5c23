//! All-pairs Jaccard similarity over shingle sets.
//!
//! Cost is O(N² · set size). Batches are expected to be tens of documents;
//! larger batches would need a sketching index (e.g. MinHash banding)
//! instead of dense comparison.

use crate::models::SimilarityMatrix;
use crate::shingle::{shingles, ShingleSet};

/// Jaccard index `|A ∩ B| / |A ∪ B|`; 0.0 when both sets are empty.
pub fn jaccard(a: &ShingleSet, b: &ShingleSet) -> f64 {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let intersection = small.iter().filter(|s| large.contains(*s)).count();
    let union = a.len() + b.len() - intersection;
    if union == 0 {
        return 0.0;
    }
    intersection as f64 / union as f64
}

/// Jaccard similarity as a percentage rounded to two decimals.
pub fn similarity_percent(a: &ShingleSet, b: &ShingleSet) -> f64 {
    round2(jaccard(a, b) * 100.0)
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Build the symmetric similarity matrix. The diagonal is fixed at 100.0.
pub fn similarity_matrix(sets: &[ShingleSet]) -> SimilarityMatrix {
    let n = sets.len();
    let mut rows = vec![vec![0.0; n]; n];
    for i in 0..n {
        rows[i][i] = 100.0;
        for j in (i + 1)..n {
            let sim = similarity_percent(&sets[i], &sets[j]);
            rows[i][j] = sim;
            rows[j][i] = sim;
        }
    }
    SimilarityMatrix(rows)
}

/// Shingle each text with width `n` and compare all pairs.
pub fn similarity_matrix_for_texts<S: AsRef<str>>(texts: &[S], n: usize) -> SimilarityMatrix {
    let sets: Vec<ShingleSet> = texts.iter().map(|t| shingles(t.as_ref(), n)).collect();
    similarity_matrix(&sets)
}
