//! Summary statistics for a built lexical index.

use serde::{Deserialize, Serialize};

/// Figures describing a [`LexicalIndex`](crate::lexical::index::LexicalIndex).
///
/// # Examples
///
/// ```
/// use tandem::lexical::stats::LexicalIndexStats;
///
/// let stats = LexicalIndexStats::default();
/// assert_eq!(stats.doc_count, 0);
/// assert_eq!(stats.avg_doc_length, 0.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LexicalIndexStats {
    /// Number of indexed documents.
    pub doc_count: usize,
    /// Number of distinct terms.
    pub vocabulary_size: usize,
    /// Sum of all document lengths, in terms.
    pub total_terms: u64,
    /// Average document length, in terms.
    pub avg_doc_length: f32,
}
