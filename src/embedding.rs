//! Text embedding providers.
//!
//! - [`embedder::Embedder`] - the async text-to-vector contract
//! - [`ollama_text_embedder::OllamaTextEmbedder`] - embeddings from a local
//!   Ollama server

pub mod embedder;
pub mod ollama_text_embedder;
