use crate::{Error, LLMRequest, Response};

/// A trait for LLM providers that can generate text responses.
/// All responses are internally streamed; `response.text().await` buffers them.
#[async_trait::async_trait]
pub trait LLMProvider: Send + Sync + 'static {
    /// Short provider name used in logs and error messages.
    fn name(&self) -> &'static str;

    /// Generate a chat completion (internally always streams).
    async fn generate(&self, request: &LLMRequest) -> Result<Response, Error>;
}
