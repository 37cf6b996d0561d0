use std::io::Write;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::Builder;

use tandem::analysis::analyzer::standard::StandardNormalizer;
use tandem::cli::args::SearchMode;
use tandem::cli::commands::build_retriever;
use tandem::config::TandemConfig;
use tandem::document::corpus::Corpus;
use tandem::error::{Result, TandemError};
use tandem::generation::generator::Generator;
use tandem::generation::synthesizer::{
    AnswerKind, AnswerSynthesizer, NO_RELEVANT_DOCUMENTS, RETRIEVAL_FAILED, SYSTEM_PROMPT,
};
use tandem::hybrid::config::FusionConfig;
use tandem::hybrid::engine::{EnsembleRetriever, RetrieverSource};
use tandem::lexical::bm25::Bm25Params;
use tandem::lexical::index::LexicalIndex;
use tandem::pipeline::HybridPipeline;
use tandem::retrieval::{RankedCandidate, Retriever};

/// Records every prompt it receives.
#[derive(Default)]
struct RecordingGenerator {
    prompts: Mutex<Vec<(String, String)>>,
    failure: Option<&'static str>,
}

impl RecordingGenerator {
    fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl Generator for RecordingGenerator {
    async fn generate(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        self.prompts
            .lock()
            .unwrap()
            .push((system_prompt.to_string(), user_prompt.to_string()));
        match self.failure {
            Some(reason) => Err(TandemError::generation(reason)),
            None => Ok("On the mat.".to_string()),
        }
    }

    fn name(&self) -> &str {
        "recording"
    }
}

struct BrokenRetriever;

#[async_trait]
impl Retriever for BrokenRetriever {
    fn name(&self) -> &str {
        "broken"
    }

    async fn retrieve(&self, _query: &str, _k: usize) -> Result<Vec<RankedCandidate>> {
        Err(TandemError::source_unavailable("broken", "disk on fire"))
    }
}

fn load_corpus() -> std::result::Result<Arc<Corpus>, Box<dyn std::error::Error>> {
    let mut file = Builder::new().suffix(".jsonl").tempfile()?;
    writeln!(file, r#"{{"id": "cat", "text": "the cat sat on the mat"}}"#)?;
    writeln!(file, r#"{{"id": "dogs", "text": "dogs chase cats"}}"#)?;
    writeln!(file, r#""the mat is red""#)?;
    Ok(Arc::new(Corpus::from_path(file.path())?))
}

fn lexical_pipeline(
    corpus: Arc<Corpus>,
    generator: Arc<RecordingGenerator>,
) -> std::result::Result<HybridPipeline, Box<dyn std::error::Error>> {
    let bm25 = LexicalIndex::build(
        corpus.clone(),
        Arc::new(StandardNormalizer::new()?),
        Bm25Params::default(),
    )?;
    let retriever = EnsembleRetriever::new(
        vec![RetrieverSource::new(Arc::new(bm25), 1.0)],
        corpus,
        FusionConfig::default(),
    )?;
    Ok(HybridPipeline::new(
        Arc::new(retriever),
        AnswerSynthesizer::new(generator),
        3,
    ))
}

#[tokio::test]
async fn test_ask_generates_from_fused_context() -> std::result::Result<(), Box<dyn std::error::Error>>
{
    let generator = Arc::new(RecordingGenerator::default());
    let pipeline = lexical_pipeline(load_corpus()?, generator.clone())?;

    let response = pipeline.ask("the cat mat").await?;

    assert_eq!(response.answer.kind, AnswerKind::Generated);
    assert_eq!(response.answer.text, "On the mat.");
    let context: Vec<&str> = response.answer.context.iter().map(|id| id.as_str()).collect();
    assert_eq!(context, vec!["cat", "2"]);

    let prompts = generator.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert_eq!(prompts[0].0, SYSTEM_PROMPT);
    assert_eq!(
        prompts[0].1,
        "Context:\nthe cat sat on the mat\n\nthe mat is red\n\nQuestion: the cat mat\n\nAnswer:"
    );

    Ok(())
}

#[tokio::test]
async fn test_ask_without_matches_skips_generator() -> std::result::Result<(), Box<dyn std::error::Error>>
{
    let generator = Arc::new(RecordingGenerator::default());
    let pipeline = lexical_pipeline(load_corpus()?, generator.clone())?;

    let response = pipeline.ask("quantum chromodynamics").await?;

    assert_eq!(response.answer.kind, AnswerKind::NoRelevantDocuments);
    assert_eq!(response.answer.text, NO_RELEVANT_DOCUMENTS);
    assert!(response.results.unwrap().is_empty());
    assert_eq!(generator.calls(), 0);

    Ok(())
}

#[tokio::test]
async fn test_ask_reports_generator_failure() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let generator = Arc::new(RecordingGenerator {
        failure: Some("model not found"),
        ..RecordingGenerator::default()
    });
    let pipeline = lexical_pipeline(load_corpus()?, generator.clone())?;

    let response = pipeline.ask("red mat").await?;

    assert_eq!(response.answer.kind, AnswerKind::GenerationFailed);
    assert_eq!(
        response.answer.text,
        "Failed to generate an answer: Generation error: model not found"
    );
    assert_eq!(generator.calls(), 1);

    Ok(())
}

#[tokio::test]
async fn test_ask_when_every_source_fails() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let corpus = load_corpus()?;
    let generator = Arc::new(RecordingGenerator::default());
    let retriever = EnsembleRetriever::new(
        vec![RetrieverSource::new(Arc::new(BrokenRetriever), 1.0)],
        corpus,
        FusionConfig::default(),
    )?;
    let pipeline = HybridPipeline::new(
        Arc::new(retriever),
        AnswerSynthesizer::new(generator.clone()),
        3,
    );

    let response = pipeline.ask("cat").await?;

    assert_eq!(response.answer.kind, AnswerKind::RetrievalFailed);
    assert_eq!(response.answer.text, RETRIEVAL_FAILED);
    assert!(response.results.is_none());
    assert_eq!(generator.calls(), 0);

    Ok(())
}

#[tokio::test]
async fn test_lexical_mode_retriever_from_config() -> std::result::Result<(), Box<dyn std::error::Error>>
{
    let corpus = load_corpus()?;
    let config = TandemConfig {
        source_k: 2,
        final_k: 1,
        ..TandemConfig::default()
    };

    let retriever = build_retriever(corpus, SearchMode::Lexical, &config).await?;
    assert_eq!(retriever.sources().len(), 1);
    assert_eq!(retriever.sources()[0].name(), "bm25");
    assert_eq!(retriever.sources()[0].weight, 1.0);
    assert_eq!(retriever.sources()[0].k, Some(2));
    assert_eq!(retriever.config().normalization.name(), "min_max");

    let results = retriever.search("mat", config.final_k).await?;
    assert_eq!(results.len(), 1);
    assert_eq!(results.results[0].doc_id.as_str(), "2");

    Ok(())
}
