//! Language-understanding service access.

mod openai;
mod prompt;

pub use openai::OpenAiClient;
pub use prompt::{Prompt, PromptBuilder, SYSTEM_INSTRUCTION, TASK_INSTRUCTION};

use async_trait::async_trait;

use crate::error::UpstreamError;

/// A service that answers a prompt with free text.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Send the prompt and return the answer text.
    async fn complete(&self, prompt: &Prompt) -> Result<String, UpstreamError>;
}
