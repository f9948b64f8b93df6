//! Error types surfaced by the core before any network attempt.

use std::path::PathBuf;

/// Why a request could not be built.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ComposeError {
    #[error("Unknown agent: {agent_id}")]
    UnknownAgent { agent_id: String },

    #[error("Unknown model tier: {tier}")]
    UnknownTier { tier: String },

    #[error("Please enter some text or upload a file")]
    EmptyInput,

    #[error("Agent {agent_id} needs a language selection")]
    MissingSubOption { agent_id: String },

    #[error("'{selection}' is not a valid option for agent {agent_id}")]
    InvalidSubOption { agent_id: String, selection: String },

    #[error("At most {max} documents can be attached, got {count}")]
    TooManyDocuments { count: usize, max: usize },

    #[error("You can upload at most {max} files. Remove one first.")]
    AttachmentLimit { max: usize },
}

/// Document extraction failure.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("Error reading file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File {path:?} is not valid UTF-8 text")]
    Encoding { path: PathBuf },

    #[error("Could not parse {format} file {path:?}: {message}")]
    Malformed {
        path: PathBuf,
        format: &'static str,
        message: String,
    },
}

/// Task runner refusal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RunnerError {
    #[error("A request is already in progress")]
    Busy,
}
