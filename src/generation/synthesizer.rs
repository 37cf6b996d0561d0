//! Grounded answer synthesis over fused retrieval results.

use std::sync::Arc;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::document::corpus::Corpus;
use crate::document::document::DocumentId;
use crate::generation::generator::Generator;
use crate::hybrid::types::FusedResults;

/// System prompt restricting the model to the supplied context.
pub const SYSTEM_PROMPT: &str =
    "You are a helpful assistant. Answer the question based ONLY on the following context:";

/// Reply when retrieval found nothing.
pub const NO_RELEVANT_DOCUMENTS: &str =
    "I could not find any relevant documents to answer that question.";

/// Reply when every retrieval source failed.
pub const RETRIEVAL_FAILED: &str =
    "I could not search the documents right now, so I cannot answer that question.";

/// How an [`Answer`] was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerKind {
    /// The generator answered from retrieved context.
    Generated,
    /// Retrieval returned nothing; the generator was not called.
    NoRelevantDocuments,
    /// The generator failed; the text describes the failure.
    GenerationFailed,
    /// Every retrieval source failed; the generator was not called.
    RetrievalFailed,
}

/// A user-visible answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    /// Text shown to the user.
    pub text: String,
    /// Outcome category.
    pub kind: AnswerKind,
    /// Documents used as context, in prompt order.
    pub context: Vec<DocumentId>,
}

impl Answer {
    /// The fixed answer for an empty result list.
    pub fn no_relevant_documents() -> Self {
        Answer {
            text: NO_RELEVANT_DOCUMENTS.to_string(),
            kind: AnswerKind::NoRelevantDocuments,
            context: Vec::new(),
        }
    }

    /// The fixed answer for a query every source failed on.
    pub fn retrieval_failed() -> Self {
        Answer {
            text: RETRIEVAL_FAILED.to_string(),
            kind: AnswerKind::RetrievalFailed,
            context: Vec::new(),
        }
    }
}

/// Builds prompts from fused results and calls a [`Generator`].
///
/// Never returns an error: generator failures become an answer whose text
/// starts with `"Failed to generate an answer: "`.
#[derive(Clone)]
pub struct AnswerSynthesizer {
    generator: Arc<dyn Generator>,
}

impl AnswerSynthesizer {
    /// Create a synthesizer around `generator`.
    pub fn new(generator: Arc<dyn Generator>) -> Self {
        AnswerSynthesizer { generator }
    }

    /// Answer `query` from the documents in `results`.
    pub async fn answer(&self, query: &str, results: &FusedResults, corpus: &Corpus) -> Answer {
        let mut context_ids = Vec::with_capacity(results.len());
        let mut texts = Vec::with_capacity(results.len());
        for result in &results.results {
            match corpus.get(&result.doc_id) {
                Some(doc) => {
                    context_ids.push(result.doc_id.clone());
                    texts.push(doc.text());
                }
                None => warn!("Fused document '{}' is not in the corpus", result.doc_id),
            }
        }

        if texts.is_empty() {
            return Answer::no_relevant_documents();
        }

        let user_prompt = user_prompt(&texts.join("\n\n"), query);
        debug!(
            "Generating with {} over {} context documents",
            self.generator.name(),
            texts.len()
        );

        match self.generator.generate(SYSTEM_PROMPT, &user_prompt).await {
            Ok(text) => Answer {
                text,
                kind: AnswerKind::Generated,
                context: context_ids,
            },
            Err(err) => {
                warn!("Generator '{}' failed: {}", self.generator.name(), err);
                Answer {
                    text: format!("Failed to generate an answer: {err}"),
                    kind: AnswerKind::GenerationFailed,
                    context: context_ids,
                }
            }
        }
    }
}

/// The user prompt for `query` over `context`.
pub fn user_prompt(context: &str, query: &str) -> String {
    format!("Context:\n{context}\n\nQuestion: {query}\n\nAnswer:")
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::error::{Result, TandemError};
    use crate::hybrid::types::FusedResult;

    #[derive(Default)]
    struct RecordingGenerator {
        calls: Mutex<Vec<(String, String)>>,
        fail: bool,
    }

    #[async_trait]
    impl Generator for RecordingGenerator {
        async fn generate(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
            self.calls
                .lock()
                .unwrap()
                .push((system_prompt.to_string(), user_prompt.to_string()));
            if self.fail {
                Err(TandemError::generation("model not loaded"))
            } else {
                Ok("The cat sat on the mat.".to_string())
            }
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    fn fused(ids: &[&str]) -> FusedResults {
        let mut results = FusedResults::empty("where did the cat sit?");
        results.results = ids
            .iter()
            .map(|id| FusedResult {
                doc_id: (*id).into(),
                score: 1.0,
                contributions: Vec::new(),
            })
            .collect();
        results
    }

    fn corpus() -> Corpus {
        Corpus::from_texts(["the cat sat on the mat", "dogs chase cats", "the mat is red"])
    }

    #[test]
    fn test_user_prompt_format() {
        assert_eq!(
            user_prompt("a\n\nb", "why?"),
            "Context:\na\n\nb\n\nQuestion: why?\n\nAnswer:"
        );
    }

    #[tokio::test]
    async fn test_prompt_built_from_fused_documents() {
        let generator = Arc::new(RecordingGenerator::default());
        let synthesizer = AnswerSynthesizer::new(generator.clone());

        let answer = synthesizer
            .answer("where did the cat sit?", &fused(&["0", "2"]), &corpus())
            .await;

        assert_eq!(answer.kind, AnswerKind::Generated);
        assert_eq!(answer.text, "The cat sat on the mat.");
        assert_eq!(answer.context.len(), 2);

        let calls = generator.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, SYSTEM_PROMPT);
        assert_eq!(
            calls[0].1,
            "Context:\nthe cat sat on the mat\n\nthe mat is red\n\nQuestion: where did the cat sit?\n\nAnswer:"
        );
    }

    #[tokio::test]
    async fn test_empty_results_skip_generator() {
        let generator = Arc::new(RecordingGenerator::default());
        let synthesizer = AnswerSynthesizer::new(generator.clone());

        let answer = synthesizer.answer("anything", &fused(&[]), &corpus()).await;

        assert_eq!(answer.kind, AnswerKind::NoRelevantDocuments);
        assert_eq!(answer.text, NO_RELEVANT_DOCUMENTS);
        assert!(generator.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_generator_failure_becomes_answer() {
        let generator = Arc::new(RecordingGenerator {
            fail: true,
            ..RecordingGenerator::default()
        });
        let synthesizer = AnswerSynthesizer::new(generator);

        let answer = synthesizer.answer("q", &fused(&["1"]), &corpus()).await;

        assert_eq!(answer.kind, AnswerKind::GenerationFailed);
        assert!(answer.text.starts_with("Failed to generate an answer: "));
        assert!(answer.text.contains("model not loaded"));
    }

    #[test]
    fn test_unknown_documents_only_skip_generator() {
        let generator = Arc::new(RecordingGenerator::default());
        let synthesizer = AnswerSynthesizer::new(generator.clone());

        let answer =
            tokio_test::block_on(synthesizer.answer("q", &fused(&["missing"]), &corpus()));

        assert_eq!(answer.kind, AnswerKind::NoRelevantDocuments);
        assert!(generator.calls.lock().unwrap().is_empty());
    }
}
