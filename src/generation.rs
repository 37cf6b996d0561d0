//! Answer generation from retrieved context.
//!
//! - [`generator::Generator`] - the async chat-model contract
//! - [`ollama_generator::OllamaGenerator`] - chat completions from a local
//!   Ollama server
//! - [`synthesizer::AnswerSynthesizer`] - builds the prompt from fused
//!   results and turns every outcome into a user-visible answer

pub mod generator;
pub mod ollama_generator;
pub mod synthesizer;
