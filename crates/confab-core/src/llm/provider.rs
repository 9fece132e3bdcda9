//! CompletionProvider trait definition.

use confab_types::llm::{CompletionRequest, LlmError};

/// A chat-completion backend.
///
/// Implementations live in confab-infra (e.g., `OpenRouterProvider`). The
/// provider owns reply extraction and whitespace normalization: a successful
/// call always yields non-empty trimmed text, and an unextractable reply
/// surfaces as `LlmError::EmptyReply`.
pub trait CompletionProvider: Send + Sync {
    /// Send one completion request and return the extracted reply text.
    ///
    /// An empty `request.model` means "use the provider's configured default".
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<String, LlmError>> + Send;
}
