use async_trait::async_trait;

use crate::error::CompletionResult;

/// A hosted text-completion service reached with a system turn and a user turn.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> CompletionResult<String>;

    /// Model identifier sent upstream, for logging and diagnostics.
    fn model(&self) -> &str;
}
