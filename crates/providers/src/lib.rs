//! Providers - outbound clients for remote model endpoints.

pub mod chat_completions;

pub use chat_completions::{CompletionClient, DEFAULT_TIMEOUT};
