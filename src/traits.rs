//! Core VisionModel trait

use async_trait::async_trait;

use crate::Result;

/// The model-invocation boundary.
///
/// The analysis engine treats the generative model as an opaque remote
/// collaborator: one call in, free-form text out. Implementations own their
/// transport, authentication, and any retry/backoff policy — the engine
/// never retries a model call itself.
#[async_trait]
pub trait VisionModel: Send + Sync {
    /// Generate recipe text for an image and prompt.
    async fn generate_content(&self, image: &[u8], prompt: &str) -> Result<String>;

    /// Name reported in logs (e.g. "ollama").
    fn name(&self) -> &str;
}
