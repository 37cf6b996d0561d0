//! Retrieval followed by answer synthesis.

use std::sync::Arc;

use log::info;
use serde::{Deserialize, Serialize};

use crate::document::corpus::Corpus;
use crate::error::{Result, TandemError};
use crate::generation::synthesizer::{Answer, AnswerSynthesizer};
use crate::hybrid::engine::EnsembleRetriever;
use crate::hybrid::types::FusedResults;

/// Outcome of [`HybridPipeline::ask`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AskResponse {
    /// Fused retrieval results. `None` when every source failed.
    pub results: Option<FusedResults>,
    /// The answer shown to the user.
    pub answer: Answer,
}

/// Answers questions from a corpus: ensemble retrieval, then generation.
///
/// # Examples
///
/// ```no_run
/// # use std::sync::Arc;
/// # use tandem::generation::synthesizer::AnswerSynthesizer;
/// # use tandem::hybrid::engine::EnsembleRetriever;
/// # use tandem::pipeline::HybridPipeline;
/// # async fn example(retriever: EnsembleRetriever, synthesizer: AnswerSynthesizer) -> tandem::error::Result<()> {
/// let pipeline = HybridPipeline::new(Arc::new(retriever), synthesizer, 3);
/// let response = pipeline.ask("where did the cat sit?").await?;
/// println!("{}", response.answer.text);
/// # Ok(())
/// # }
/// ```
pub struct HybridPipeline {
    retriever: Arc<EnsembleRetriever>,
    synthesizer: AnswerSynthesizer,
    k: usize,
}

impl HybridPipeline {
    /// Create a pipeline keeping `k` fused documents as context.
    pub fn new(retriever: Arc<EnsembleRetriever>, synthesizer: AnswerSynthesizer, k: usize) -> Self {
        HybridPipeline {
            retriever,
            synthesizer,
            k,
        }
    }

    /// Retrieve context for `query` and synthesize an answer.
    ///
    /// A query on which every source failed yields a fixed answer instead of
    /// an error.
    pub async fn ask(&self, query: &str) -> Result<AskResponse> {
        let results = match self.retriever.search(query, self.k).await {
            Ok(results) => results,
            Err(TandemError::AllSourcesFailed { failures }) => {
                info!(
                    "Answering without context, {} sources failed",
                    failures.len()
                );
                return Ok(AskResponse {
                    results: None,
                    answer: Answer::retrieval_failed(),
                });
            }
            Err(err) => return Err(err),
        };

        let answer = self
            .synthesizer
            .answer(query, &results, self.corpus())
            .await;

        Ok(AskResponse {
            results: Some(results),
            answer,
        })
    }

    /// The retriever behind this pipeline.
    pub fn retriever(&self) -> &EnsembleRetriever {
        &self.retriever
    }

    /// Corpus shared by the retriever and the synthesizer.
    pub fn corpus(&self) -> &Corpus {
        self.retriever.corpus()
    }
}
