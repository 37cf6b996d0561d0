//! Output formatting for CLI commands.

use serde::Serialize;

use crate::cli::args::{OutputFormat, TandemArgs};
use crate::document::corpus::Corpus;
use crate::error::Result;
use crate::generation::synthesizer::{Answer, AnswerKind};
use crate::hybrid::types::{FusedResults, SourceContribution, SourceReport, SourceStatus};

/// One fused hit with its document text.
#[derive(Debug, Serialize)]
pub struct HitView<'a> {
    pub rank: usize,
    pub doc_id: &'a str,
    pub score: f32,
    pub text: Option<&'a str>,
    pub contributions: &'a [SourceContribution],
}

/// Result structure for search operations.
#[derive(Debug, Serialize)]
pub struct SearchOutput<'a> {
    pub query: &'a str,
    pub hits: Vec<HitView<'a>>,
    pub sources: &'a [SourceReport],
    pub elapsed_ms: u64,
}

impl<'a> SearchOutput<'a> {
    /// Join fused results with the corpus texts.
    pub fn new(results: &'a FusedResults, corpus: &'a Corpus) -> Self {
        let hits = results
            .results
            .iter()
            .enumerate()
            .map(|(i, result)| HitView {
                rank: i + 1,
                doc_id: result.doc_id.as_str(),
                score: result.score,
                text: corpus.get(&result.doc_id).map(|doc| doc.text()),
                contributions: &result.contributions,
            })
            .collect();

        SearchOutput {
            query: &results.query,
            hits,
            sources: &results.sources,
            elapsed_ms: results.elapsed_ms,
        }
    }
}

/// Result structure for ask operations.
#[derive(Debug, Serialize)]
pub struct AskOutput<'a> {
    pub query: &'a str,
    pub retrieval: Option<SearchOutput<'a>>,
    pub answer: &'a Answer,
}

/// Print fused search results.
pub fn output_search(results: &FusedResults, corpus: &Corpus, args: &TandemArgs) -> Result<()> {
    let output = SearchOutput::new(results, corpus);
    match args.output_format {
        OutputFormat::Human => {
            print_hits_human(&output, args);
            Ok(())
        }
        OutputFormat::Json => output_json(&output, args),
    }
}

/// Print an answer with the retrieval it was built from.
pub fn output_ask(
    query: &str,
    results: Option<&FusedResults>,
    answer: &Answer,
    corpus: &Corpus,
    args: &TandemArgs,
) -> Result<()> {
    let output = AskOutput {
        query,
        retrieval: results.map(|r| SearchOutput::new(r, corpus)),
        answer,
    };

    match args.output_format {
        OutputFormat::Human => {
            if let Some(retrieval) = &output.retrieval {
                print_hits_human(retrieval, args);
                println!();
            }
            if args.verbosity() > 1 && answer.kind != AnswerKind::Generated {
                println!("({})", answer_kind_label(answer.kind));
            }
            println!("Answer: {}", answer.text);
            Ok(())
        }
        OutputFormat::Json => output_json(&output, args),
    }
}

fn print_hits_human(output: &SearchOutput<'_>, args: &TandemArgs) {
    if args.verbosity() > 0 {
        println!("Searching for: {}", output.query);
        println!();
    }

    if output.hits.is_empty() {
        println!("No documents found.");
    } else {
        println!("Retrieved Documents:");
        for hit in &output.hits {
            println!(
                "{}. [{:.4}] {}",
                hit.rank,
                hit.score,
                hit.text.unwrap_or("<missing from corpus>")
            );
            if args.verbosity() > 1 {
                for c in hit.contributions {
                    println!(
                        "     {}: raw {:.4}, normalized {:.4}, weight {:.2}",
                        c.source, c.raw_score, c.normalized_score, c.weight
                    );
                }
            }
        }
    }

    if args.verbosity() > 0 {
        let sources: Vec<String> = output.sources.iter().map(describe_source).collect();
        println!();
        println!("Sources: {} ({} ms)", sources.join(", "), output.elapsed_ms);
    }
}

fn describe_source(report: &SourceReport) -> String {
    match &report.status {
        SourceStatus::Succeeded { candidates } => {
            format!("{} x{:.2}: {} candidates", report.source, report.weight, candidates)
        }
        SourceStatus::Failed { reason } => format!("{}: failed ({})", report.source, reason),
        SourceStatus::TimedOut => format!("{}: timed out", report.source),
    }
}

fn answer_kind_label(kind: AnswerKind) -> &'static str {
    match kind {
        AnswerKind::Generated => "generated",
        AnswerKind::NoRelevantDocuments => "no relevant documents",
        AnswerKind::GenerationFailed => "generation failed",
        AnswerKind::RetrievalFailed => "retrieval failed",
    }
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &TandemArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    println!("{json}");
    Ok(())
}
