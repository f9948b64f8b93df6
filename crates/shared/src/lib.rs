pub mod agent;
pub mod completion;
pub mod credential;
pub mod document;
pub mod error;

pub use agent::{AgentDefinition, ModelCatalog, ModelTier, PromptTemplate, SubOptionKind};
pub use completion::{CompletionOutcome, CompletionRequest, FailureKind};
pub use credential::Credential;
pub use document::{Attachments, UploadedDocument, MAX_ATTACHMENTS};
pub use error::{ComposeError, ExtractionError, RunnerError};

pub mod settings {
    use serde::{Deserialize, Serialize};

    use crate::agent::ModelCatalog;

    /// Default OpenWebUI deployment the app talks to.
    pub const DEFAULT_BASE_URL: &str = "https://ki-chat.uni-mainz.de";

    /// Environment override for `base_url`.
    pub const BASE_URL_ENV: &str = "AGENT_DESK_BASE_URL";

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct AppSettings {
        /// Root of the chat-completions server (no trailing path).
        pub base_url: String,
        /// Concrete model name per tier
        #[serde(default)]
        pub models: ModelCatalog,
    }

    impl Default for AppSettings {
        fn default() -> Self {
            Self {
                base_url: DEFAULT_BASE_URL.into(),
                models: ModelCatalog::default(),
            }
        }
    }

    impl AppSettings {
        /// Apply environment overrides on top of loaded values.
        pub fn with_env_overrides(mut self) -> Self {
            if let Ok(url) = std::env::var(BASE_URL_ENV) {
                let url = url.trim();
                if !url.is_empty() {
                    self.base_url = url.to_string();
                }
            }
            self
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_settings_missing_models_use_defaults() {
            let json = r#"{"base_url": "http://localhost:3000"}"#;
            let settings: AppSettings = serde_json::from_str(json).unwrap();
            assert_eq!(settings.base_url, "http://localhost:3000");
            assert_eq!(settings.models, ModelCatalog::default());
        }

        #[test]
        fn test_settings_roundtrip_keeps_custom_model() {
            let mut settings = AppSettings::default();
            settings.models.code = "qwen3-coder".into();
            let json = serde_json::to_string(&settings).unwrap();
            let back: AppSettings = serde_json::from_str(&json).unwrap();
            assert_eq!(back.models.code, "qwen3-coder");
        }
    }
}
