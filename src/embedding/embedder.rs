//! Text embedding trait used by the semantic retriever.

use async_trait::async_trait;

use crate::error::Result;
use crate::vector::vector::Vector;

/// Trait for converting text to vector embeddings.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use tandem::embedding::embedder::Embedder;
/// use tandem::error::Result;
/// use tandem::vector::vector::Vector;
///
/// struct LengthEmbedder;
///
/// #[async_trait]
/// impl Embedder for LengthEmbedder {
///     async fn embed(&self, text: &str) -> Result<Vector> {
///         Ok(Vector::new(vec![text.len() as f32, 1.0]))
///     }
///
///     fn dimension(&self) -> Option<usize> {
///         Some(2)
///     }
///
///     fn name(&self) -> &str {
///         "length"
///     }
/// }
/// ```
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate an embedding vector for the given text.
    async fn embed(&self, text: &str) -> Result<Vector>;

    /// Generate embeddings for multiple texts, in input order.
    ///
    /// The default implementation calls `embed` sequentially.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vector>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }

    /// Output dimension, if known before the first call.
    fn dimension(&self) -> Option<usize>;

    /// Name of the embedder (model or implementation).
    fn name(&self) -> &str;
}
