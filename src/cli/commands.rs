//! Command implementations for the tandem CLI.

use std::sync::Arc;

use log::info;

use crate::analysis::analyzer::standard::StandardNormalizer;
use crate::cli::args::{Command, QueryArgs, SearchMode, TandemArgs};
use crate::cli::output::{output_ask, output_search};
use crate::config::TandemConfig;
use crate::document::corpus::Corpus;
use crate::embedding::ollama_text_embedder::OllamaTextEmbedder;
use crate::error::{Result, TandemError};
use crate::generation::ollama_generator::OllamaGenerator;
use crate::generation::synthesizer::AnswerSynthesizer;
use crate::hybrid::engine::{EnsembleRetriever, RetrieverSource};
use crate::lexical::index::LexicalIndex;
use crate::pipeline::HybridPipeline;
use crate::vector::flat::FlatVectorIndex;

/// Execute a CLI command.
pub async fn execute_command(args: TandemArgs) -> Result<()> {
    let config = args.resolve_config()?;
    let query_args = args.command.query_args();

    let corpus = Arc::new(Corpus::from_path(&query_args.corpus)?);
    let retriever = build_retriever(corpus.clone(), query_args.mode, &config).await?;

    match &args.command {
        Command::Search(search_args) => search(&retriever, search_args, &config, &args).await,
        Command::Ask(ask_args) => ask(retriever, ask_args, &config, &args).await,
    }
}

/// Assemble the sources for `mode` over `corpus`.
///
/// A single-source mode gives its source weight 1.0; hybrid mode uses the
/// configured weights.
pub async fn build_retriever(
    corpus: Arc<Corpus>,
    mode: SearchMode,
    config: &TandemConfig,
) -> Result<EnsembleRetriever> {
    let mut sources = Vec::new();

    if matches!(mode, SearchMode::Lexical | SearchMode::Hybrid) {
        let index = LexicalIndex::build(
            corpus.clone(),
            Arc::new(StandardNormalizer::new()?),
            config.bm25,
        )?;
        let params = index.params();
        info!(
            "BM25 index over {} documents (k1={}, b={})",
            index.len(),
            params.k1,
            params.b
        );
        let weight = if mode == SearchMode::Hybrid {
            config.lexical_weight
        } else {
            1.0
        };
        sources.push(RetrieverSource::new(Arc::new(index), weight).with_k(config.source_k));
    }

    if matches!(mode, SearchMode::Semantic | SearchMode::Hybrid) {
        info!(
            "Embedding {} documents with {} (this may take a moment)",
            corpus.len(),
            config.ollama.embedding_model()
        );
        let embedder = Arc::new(OllamaTextEmbedder::new(&config.ollama)?);
        let index = FlatVectorIndex::build(corpus.clone(), embedder, config.metric).await?;
        info!(
            "Vector index over {} documents ({} dimensions, {} similarity)",
            index.len(),
            index.dimension(),
            index.metric()
        );
        let weight = if mode == SearchMode::Hybrid {
            config.vector_weight
        } else {
            1.0
        };
        sources.push(RetrieverSource::new(Arc::new(index), weight).with_k(config.source_k));
    }

    info!(
        "Fusing {} sources with {} normalization",
        sources.len(),
        config.fusion.normalization.name()
    );
    EnsembleRetriever::new(sources, corpus, config.fusion.clone())
}

async fn search(
    retriever: &EnsembleRetriever,
    search_args: &QueryArgs,
    config: &TandemConfig,
    cli_args: &TandemArgs,
) -> Result<()> {
    let query = search_args.query_text();
    let results = retriever.search(&query, config.final_k).await?;
    output_search(&results, retriever.corpus(), cli_args)
}

async fn ask(
    retriever: EnsembleRetriever,
    ask_args: &QueryArgs,
    config: &TandemConfig,
    cli_args: &TandemArgs,
) -> Result<()> {
    let query = ask_args.query_text();
    if query.trim().is_empty() {
        return Err(TandemError::other("Query must not be empty"));
    }

    let generator = Arc::new(OllamaGenerator::new(&config.ollama)?);
    let pipeline = HybridPipeline::new(
        Arc::new(retriever),
        AnswerSynthesizer::new(generator),
        config.final_k,
    );

    let response = pipeline.ask(&query).await?;
    output_ask(
        &query,
        response.results.as_ref(),
        &response.answer,
        pipeline.corpus(),
        cli_args,
    )
}
