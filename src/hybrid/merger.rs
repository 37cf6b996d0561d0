//! Weighted fusion of normalized source lists.

use std::cmp::Ordering;

use ahash::{AHashMap, AHashSet};

use crate::document::corpus::Corpus;
use crate::document::document::DocumentId;
use crate::hybrid::config::ScoreNormalization;
use crate::hybrid::scorer::ScoreNormalizer;
use crate::hybrid::types::{FusedResult, SourceContribution};
use crate::retrieval::RankedCandidate;

/// The ranked list one source answered with.
#[derive(Debug, Clone)]
pub struct SourceList {
    /// Registration index of the source; lower wins ties.
    pub position: usize,
    /// Name of the source.
    pub source: String,
    /// Weight of the source.
    pub weight: f32,
    /// Candidates in rank order.
    pub candidates: Vec<RankedCandidate>,
}

/// Accumulated state for one document during fusion.
struct Accumulator {
    doc_id: DocumentId,
    score: f32,
    /// Position of the first weighted source that returned the document.
    first_position: usize,
    has_weight: bool,
    contributions: Vec<SourceContribution>,
}

/// Result merger combining per-source lists into one fused ranking.
#[derive(Debug, Clone, Copy)]
pub struct ResultMerger {
    /// Normalizer applied to every list before weighting.
    normalizer: ScoreNormalizer,
}

impl ResultMerger {
    /// Create a new result merger.
    pub fn new(normalization: ScoreNormalization) -> Self {
        Self {
            normalizer: ScoreNormalizer::new(normalization),
        }
    }

    /// Fuse source lists into at most `k` results.
    ///
    /// Each list is normalized on its own and every document's fused score is
    /// the sum of `weight * normalized` over the lists containing it. A list
    /// missing a document contributes nothing. Documents returned only by
    /// zero-weight sources are dropped.
    ///
    /// Ordering is by fused score, then by the position of the first weighted
    /// source that returned the document, then by corpus order. Documents the corpus
    /// does not know sort after known ones, by identifier.
    pub fn fuse(&self, lists: &[SourceList], corpus: &Corpus, k: usize) -> Vec<FusedResult> {
        let mut accumulators: Vec<Accumulator> = Vec::new();
        let mut slots: AHashMap<DocumentId, usize> = AHashMap::new();

        let mut ordered: Vec<&SourceList> = lists.iter().collect();
        ordered.sort_by_key(|list| list.position);

        for list in ordered {
            let normalized = self.normalizer.normalize(&list.candidates);
            let mut seen_in_list: AHashSet<&DocumentId> = AHashSet::new();

            for (candidate, normalized_score) in list.candidates.iter().zip(normalized) {
                // Only the best occurrence of a document within one list counts.
                if !seen_in_list.insert(&candidate.doc_id) {
                    continue;
                }

                let slot = *slots.entry(candidate.doc_id.clone()).or_insert_with(|| {
                    accumulators.push(Accumulator {
                        doc_id: candidate.doc_id.clone(),
                        score: 0.0,
                        first_position: usize::MAX,
                        has_weight: false,
                        contributions: Vec::new(),
                    });
                    accumulators.len() - 1
                });

                let contribution = SourceContribution {
                    source: list.source.clone(),
                    raw_score: candidate.score,
                    normalized_score,
                    weight: list.weight,
                };
                let acc = &mut accumulators[slot];
                acc.score += contribution.weighted_score();
                if list.weight > 0.0 && !acc.has_weight {
                    acc.first_position = list.position;
                    acc.has_weight = true;
                }
                acc.contributions.push(contribution);
            }
        }

        let mut fused: Vec<(Option<usize>, Accumulator)> = accumulators
            .into_iter()
            .filter(|acc| acc.has_weight)
            .map(|acc| (corpus.ordinal(&acc.doc_id), acc))
            .collect();

        fused.sort_by(|(ord_a, a), (ord_b, b)| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.first_position.cmp(&b.first_position))
                .then_with(|| compare_ordinals(*ord_a, *ord_b))
                .then_with(|| a.doc_id.cmp(&b.doc_id))
        });
        fused.truncate(k);

        fused
            .into_iter()
            .map(|(_, acc)| FusedResult {
                doc_id: acc.doc_id,
                score: acc.score,
                contributions: acc.contributions,
            })
            .collect()
    }
}

/// Known documents first, in corpus order.
fn compare_ordinals(a: Option<usize>, b: Option<usize>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
