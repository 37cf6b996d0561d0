//! Chat model trait used by the answer synthesizer.

use async_trait::async_trait;

use crate::error::Result;

/// Produces a completion from a system prompt and a user prompt.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate a reply.
    async fn generate(&self, system_prompt: &str, user_prompt: &str) -> Result<String>;

    /// Name of the generator (model or implementation).
    fn name(&self) -> &str;
}
