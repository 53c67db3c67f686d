//! Trimming of the worst correlations.

use super::correspondence::{Correlation, CorrelationSet};

/// Keeps the best `trim_fraction` of a correlation set by metric distance.
#[derive(Clone, Copy, Debug)]
pub struct CorrelationFilter {
    trim_fraction: f64,
}

impl CorrelationFilter {
    /// Create a filter keeping `trim_fraction` (in `(0, 1]`) of the candidates.
    pub fn new(trim_fraction: f64) -> Self {
        Self { trim_fraction }
    }

    /// Number of correlations kept out of `candidates`.
    pub fn keep_count(&self, candidates: usize) -> usize {
        // Small bias so that e.g. 0.95 * 100 keeps 95, not 94
        let keep = (candidates as f64 * self.trim_fraction + 1e-9).floor();
        if keep <= 0.0 { 0 } else { keep as usize }
    }

    /// Sort ascending by distance and truncate to the kept count.
    ///
    /// The count is taken from the set's untrimmed size, so applying the filter
    /// again to its own output changes nothing.
    pub fn apply(&self, set: CorrelationSet) -> CorrelationSet {
        let candidates = set.candidates();
        let keep = self.keep_count(candidates);

        let mut correlations: Vec<Correlation> = set.into_vec();
        correlations.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        correlations.truncate(keep);

        CorrelationSet::from_parts(correlations, candidates)
    }
}
