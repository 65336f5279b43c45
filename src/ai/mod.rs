pub mod backend;
pub mod openai_client;
pub mod prompt;
pub mod response;

pub use backend::CompletionBackend;
pub use openai_client::OpenAiClient;
pub use prompt::{compose, PromptBuilder, SystemInstruction, SYSTEM_TEMPLATE};
pub use response::{format_upstream_failure, WARNING_MARKER};
