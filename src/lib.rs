pub mod ai;
pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod server;

pub use cli::{Cli, CommandHandler, Commands};
pub use config::Settings;
pub use context::{ReferenceContext, ReferenceStore};
pub use error::CompletionError;
pub use server::{AskResponse, Gateway};
