//! Text generation backends.

mod gemini;

pub use gemini::GeminiGenerator;

use crate::error::Result;
use async_trait::async_trait;

/// A stateless text generator: one prompt in, one completion out.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate a completion for `prompt`. Implementations make a single request.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Model identifier, for logging.
    fn model(&self) -> &str;
}
