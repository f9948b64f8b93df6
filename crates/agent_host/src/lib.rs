//! Agent Host - turns an agent choice plus user input into a completion call
//!
//! This crate provides:
//! - The built-in agent registry (prompts, model tiers, sub-options)
//! - Request composition from free text and uploaded documents
//! - A single-flight background runner the UI polls each frame

pub mod composer;
pub mod registry;
pub mod task_runner;

pub use composer::RequestComposer;
pub use registry::{AgentRegistry, PROGRAMMING_LANGUAGES, TRANSLATION_LANGUAGES};
pub use task_runner::TaskRunner;

use anyhow::Result;
use providers::CompletionClient;
use shared::agent::ModelCatalog;
use shared::completion::{CompletionOutcome, CompletionRequest};
use shared::credential::Credential;
use shared::document::UploadedDocument;
use shared::error::{ComposeError, RunnerError};
use shared::settings::AppSettings;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("A request is already running")]
    Busy,
    #[error("No API key configured")]
    MissingCredential,
    #[error(transparent)]
    Compose(#[from] ComposeError),
}

impl From<RunnerError> for SubmitError {
    fn from(e: RunnerError) -> Self {
        match e {
            RunnerError::Busy => SubmitError::Busy,
        }
    }
}

/// Everything the UI needs to run an agent: registry, model catalog,
/// the API key and the background runner.
pub struct AgentHost {
    registry: AgentRegistry,
    catalog: ModelCatalog,
    credential: Option<Credential>,
    runner: TaskRunner,
}

impl AgentHost {
    pub fn new(settings: &AppSettings) -> Result<Self> {
        let client = CompletionClient::new(&settings.base_url)?;
        Ok(Self::with_client(client, settings.models.clone()))
    }

    pub fn with_client(client: CompletionClient, catalog: ModelCatalog) -> Self {
        Self {
            registry: AgentRegistry::builtin(),
            catalog,
            credential: None,
            runner: TaskRunner::new(client),
        }
    }

    pub fn registry(&self) -> &AgentRegistry {
        &self.registry
    }

    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    pub fn set_credential(&mut self, credential: Credential) {
        self.credential = Some(credential);
    }

    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }

    pub fn is_busy(&self) -> bool {
        self.runner.is_busy()
    }

    /// Compose without sending. Used for previews and tests.
    pub fn compose(
        &self,
        agent_id: &str,
        sub_option: Option<&str>,
        free_text: &str,
        documents: &[UploadedDocument],
    ) -> Result<CompletionRequest, ComposeError> {
        RequestComposer::new(&self.registry, &self.catalog).compose(
            agent_id, sub_option, free_text, documents,
        )
    }

    /// Compose and start a request in the background. Nothing is composed
    /// or sent while another request is still running.
    pub fn submit(
        &mut self,
        agent_id: &str,
        sub_option: Option<&str>,
        free_text: &str,
        documents: &[UploadedDocument],
    ) -> Result<(), SubmitError> {
        if self.runner.is_busy() {
            return Err(SubmitError::Busy);
        }
        let credential = self
            .credential
            .clone()
            .ok_or(SubmitError::MissingCredential)?;
        let request = self.compose(agent_id, sub_option, free_text, documents)?;

        tracing::info!(agent = agent_id, model = request.model(), "submitting request");
        self.runner.submit(request, credential)?;
        Ok(())
    }

    pub fn poll(&mut self) -> Option<CompletionOutcome> {
        self.runner.poll()
    }

    pub fn wait(&mut self, timeout: std::time::Duration) -> Option<CompletionOutcome> {
        self.runner.wait(timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn host(url: &str) -> AgentHost {
        let mut host =
            AgentHost::with_client(CompletionClient::new(url).unwrap(), ModelCatalog::default());
        host.set_credential(Credential::new("sk-test").unwrap());
        host
    }

    #[test]
    fn test_missing_credential() {
        let mut host =
            AgentHost::with_client(CompletionClient::new("http://127.0.0.1:9").unwrap(), ModelCatalog::default());
        assert!(!host.has_credential());
        let err = host.submit("email", None, "hi", &[]).unwrap_err();
        assert_eq!(err, SubmitError::MissingCredential);
        assert!(!host.is_busy());
    }

    #[test]
    fn test_compose_error_sends_nothing() {
        let mut host = host("http://127.0.0.1:9");
        let err = host.submit("email", None, "  ", &[]).unwrap_err();
        assert_eq!(err, SubmitError::Compose(ComposeError::EmptyInput));
        assert!(!host.is_busy());
    }

    #[test]
    fn test_double_submit_makes_one_request() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/api/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"content":"Subject: Meeting"}}]}"#)
            .expect(1)
            .create();

        let mut host = host(&server.url());
        host.submit("email", None, "meeting next week", &[]).unwrap();
        let second = host.submit("email", None, "meeting next week", &[]);
        assert_eq!(second, Err(SubmitError::Busy));

        let outcome = host.wait(Duration::from_secs(30)).unwrap();
        assert_eq!(outcome, CompletionOutcome::Success("Subject: Meeting".into()));
        assert!(!host.is_busy());
        mock.assert();
    }

    #[test]
    fn test_new_from_settings_uses_catalog() {
        let mut settings = AppSettings::default();
        settings.models.code = "local-coder".into();
        let host = AgentHost::new(&settings).unwrap();
        let req = host.compose("code", Some("Go"), "hello world", &[]).unwrap();
        assert_eq!(req.model(), "local-coder");
    }
}
