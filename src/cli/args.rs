//! Command line argument parsing for the tandem CLI using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::config::TandemConfig;
use crate::error::Result;

/// Tandem - hybrid lexical and semantic retrieval
#[derive(Parser, Debug, Clone)]
#[command(name = "tandem")]
#[command(about = "Hybrid BM25 + embedding retrieval with weighted rank fusion")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct TandemArgs {
    /// Verbosity level (repeat for more: -v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Configuration file (JSON)
    #[arg(long, value_name = "FILE", env = "TANDEM_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl TandemArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose + 1
        }
    }

    /// Load the configuration file, if any, and apply command line overrides.
    pub fn resolve_config(&self) -> Result<TandemConfig> {
        let mut config = match &self.config {
            Some(path) => TandemConfig::from_file(path)?,
            None => TandemConfig::default(),
        };
        self.command.query_args().apply(&mut config);
        config.validate()?;
        Ok(config)
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Retrieve and print the fused ranking for a query
    Search(QueryArgs),

    /// Retrieve context and generate an answer with the chat model
    Ask(QueryArgs),
}

impl Command {
    /// Arguments shared by every subcommand.
    pub fn query_args(&self) -> &QueryArgs {
        match self {
            Command::Search(args) | Command::Ask(args) => args,
        }
    }
}

/// Which sources take part in retrieval.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchMode {
    /// BM25 only
    Lexical,
    /// Embedding similarity only
    Semantic,
    /// BM25 and embedding similarity, fused
    Hybrid,
}

/// Arguments for `search` and `ask`
#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    /// Corpus file (.json array or .jsonl)
    #[arg(long, value_name = "FILE", env = "TANDEM_CORPUS")]
    pub corpus: PathBuf,

    /// Retrieval mode
    #[arg(short, long, default_value = "hybrid")]
    pub mode: SearchMode,

    /// Number of fused results to keep
    #[arg(short, long)]
    pub k: Option<usize>,

    /// Number of candidates requested from each source
    #[arg(long)]
    pub source_k: Option<usize>,

    /// Weight of the BM25 source in hybrid mode
    #[arg(long)]
    pub lexical_weight: Option<f32>,

    /// Weight of the vector source in hybrid mode
    #[arg(long)]
    pub vector_weight: Option<f32>,

    /// Base URL of the Ollama server
    #[arg(long, value_name = "URL", env = "TANDEM_OLLAMA_URL")]
    pub ollama_url: Option<String>,

    /// Model used for chat (and embeddings unless configured otherwise)
    #[arg(long, value_name = "NAME", env = "TANDEM_MODEL")]
    pub model: Option<String>,

    /// Query text
    #[arg(value_name = "QUERY", required = true, num_args = 1..)]
    pub query: Vec<String>,
}

impl QueryArgs {
    /// The query words joined by single spaces.
    pub fn query_text(&self) -> String {
        self.query.join(" ")
    }

    /// Overwrite configuration values given on the command line.
    pub fn apply(&self, config: &mut TandemConfig) {
        if let Some(k) = self.k {
            config.final_k = k;
        }
        if let Some(source_k) = self.source_k {
            config.source_k = source_k;
        }
        if let Some(weight) = self.lexical_weight {
            config.lexical_weight = weight;
        }
        if let Some(weight) = self.vector_weight {
            config.vector_weight = weight;
        }
        if let Some(url) = &self.ollama_url {
            config.ollama.base_url = url.clone();
        }
        if let Some(model) = &self.model {
            config.ollama.model = model.clone();
        }
    }
}

/// Output format options
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable text
    Human,
    /// JSON
    Json,
}
