//! The finished request payload and the terminal outcome of submitting it.

use std::fmt;

/// Sampling temperature sent with every request.
pub const TEMPERATURE: f32 = 0.7;

/// Upper bound on generated tokens per request.
pub const MAX_OUTPUT_TOKENS: u32 = 1500;

/// A fully composed chat-completion request. Built fresh per submission.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    model: String,
    system_message: String,
    user_message: String,
}

impl CompletionRequest {
    pub fn new(
        model: impl Into<String>,
        system_message: impl Into<String>,
        user_message: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            system_message: system_message.into(),
            user_message: user_message.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn system_message(&self) -> &str {
        &self.system_message
    }

    pub fn user_message(&self) -> &str {
        &self.user_message
    }

    pub fn temperature(&self) -> f32 {
        TEMPERATURE
    }

    pub fn max_tokens(&self) -> u32 {
        MAX_OUTPUT_TOKENS
    }
}

/// Classification of a failed submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// 200 response without any choices
    NoChoices,
    /// Non-200 status
    HttpError,
    Timeout,
    ConnectionError,
    UnexpectedError,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureKind::NoChoices => "NoChoices",
            FailureKind::HttpError => "HttpError",
            FailureKind::Timeout => "Timeout",
            FailureKind::ConnectionError => "ConnectionError",
            FailureKind::UnexpectedError => "UnexpectedError",
        };
        f.write_str(name)
    }
}

/// Result of one submission. Every outcome is terminal; nothing is retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    Success(String),
    Failure { kind: FailureKind, detail: String },
}

impl CompletionOutcome {
    pub fn failure(kind: FailureKind, detail: impl Into<String>) -> Self {
        CompletionOutcome::Failure {
            kind,
            detail: detail.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, CompletionOutcome::Success(_))
    }

    /// Text for the result panel: the completion, or an explanation of the failure.
    pub fn display_text(&self) -> String {
        match self {
            CompletionOutcome::Success(text) => text.clone(),
            CompletionOutcome::Failure { kind, detail } => match kind {
                FailureKind::NoChoices => "No response received from the AI".to_string(),
                FailureKind::HttpError => format!("API error: {}", detail),
                FailureKind::Timeout => "Timed out - please try again".to_string(),
                FailureKind::ConnectionError => {
                    "Connection error - check your internet connection".to_string()
                }
                FailureKind::UnexpectedError => format!("Unexpected error: {}", detail),
            },
        }
    }
}
