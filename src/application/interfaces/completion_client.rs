use async_trait::async_trait;

use crate::domain::{CompletionError, CompletionRequest, CompletionResponse};

/// Sends a chat completion request to a hosted model and returns its choices.
///
/// Implementors own transport, authentication and the vendor wire format,
/// including which field name carries the output-length limit.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, CompletionError>;
}
