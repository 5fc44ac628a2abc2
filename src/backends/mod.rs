use async_trait::async_trait;

pub mod backend_factory;
pub mod llm_error;
pub mod mock;
#[cfg(feature = "openai-compatible")]
pub mod openai_compatible;

pub use backend_factory::create_backend;
pub use llm_error::LlmError;
pub use mock::{MockBackend, MockReply};
#[cfg(feature = "openai-compatible")]
pub use openai_compatible::{OpenAICompatibleBackend, OpenAICompatibleConfig};

/// A text-generation capability: turns a system instruction plus a user task
/// into natural-language output.
#[async_trait]
pub trait LlmBackend: Send + Sync {
    async fn generate(&self, instructions: &str, task: &str) -> Result<String, LlmError>;

    fn backend_name(&self) -> &str;

    fn model_name(&self) -> &str;
}
