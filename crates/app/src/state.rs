//! State management for the Agent Desk app
//!
//! `AppState` owns the agent host, the attachment set and the files under the
//! app directories. The UI in `main.rs` only reads fields and calls methods
//! here; nothing in this module touches egui.

use agent_host::{AgentHost, SubmitError};
use anyhow::Result;
use services::{AppDirs, CredentialStore, HistoryEntry, InteractionHistory};
use shared::agent::AgentDefinition;
use shared::completion::CompletionOutcome;
use shared::credential::Credential;
use shared::document::{Attachments, UploadedDocument};
use shared::settings::AppSettings;
use std::path::Path;

/// One line in the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub message: String,
    pub is_error: bool,
}

impl Status {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: false,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: true,
        }
    }
}

/// What was sent, kept until the outcome arrives so it can go to history.
struct InFlight {
    agent_label: &'static str,
    input: String,
}

pub struct AppState {
    pub dirs: AppDirs,
    pub settings: AppSettings,
    pub host: AgentHost,
    credentials: CredentialStore,
    history: InteractionHistory,

    pub agent_id: &'static str,
    pub sub_option: Option<&'static str>,
    pub input_text: String,
    pub attachments: Attachments,

    pub result_text: String,
    pub result_is_error: bool,
    pub status: Option<Status>,
    in_flight: Option<InFlight>,

    pub show_settings: bool,
    pub show_key_prompt: bool,
}

impl AppState {
    /// State backed by the platform directories.
    pub fn from_disk() -> Result<Self> {
        let dirs = AppDirs::discover()?;
        Self::with_dirs(dirs)
    }

    pub fn with_dirs(dirs: AppDirs) -> Result<Self> {
        let settings = dirs.load_settings();
        let host = AgentHost::new(&settings)?;
        Ok(Self::with_host(dirs, settings, host))
    }

    pub fn with_host(dirs: AppDirs, settings: AppSettings, mut host: AgentHost) -> Self {
        let credentials = CredentialStore::in_dir(&dirs.config);
        let history = InteractionHistory::in_dir(&dirs.data);

        let mut status = None;
        match credentials.load() {
            Ok(Some(credential)) => host.set_credential(credential),
            Ok(None) => {}
            Err(e) => {
                tracing::warn!("Failed to read API key: {:#}", e);
                status = Some(Status::error(format!("Could not read API key: {}", e)));
            }
        }
        let show_key_prompt = !host.has_credential();

        let first = host.registry().agents().first();
        let agent_id = first.map(|a| a.id).unwrap_or("summarize");
        let sub_option = first.and_then(|a| a.default_sub_option);

        Self {
            dirs,
            settings,
            host,
            credentials,
            history,
            agent_id,
            sub_option,
            input_text: String::new(),
            attachments: Attachments::new(),
            result_text: String::new(),
            result_is_error: false,
            status,
            in_flight: None,
            show_settings: false,
            show_key_prompt,
        }
    }

    pub fn current_agent(&self) -> Option<&AgentDefinition> {
        self.host.registry().lookup(self.agent_id).ok()
    }

    /// Switch agent and reset the sub-option to that agent's default.
    pub fn select_agent(&mut self, agent_id: &'static str) {
        if self.agent_id == agent_id {
            return;
        }
        self.agent_id = agent_id;
        self.sub_option = self.current_agent().and_then(|a| a.default_sub_option);
    }

    pub fn is_busy(&self) -> bool {
        self.host.is_busy()
    }

    pub fn attach_file(&mut self, path: &Path) {
        if self.attachments.is_full() {
            self.status = Some(Status::error(format!(
                "At most {} files can be attached",
                shared::MAX_ATTACHMENTS
            )));
            return;
        }

        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        match services::extract(path) {
            Ok(text) if text.trim().is_empty() => {
                tracing::warn!(file = %filename, "no extractable text, not attached");
                self.status = Some(Status::error(format!(
                    "{} contains no extractable text (scanned PDF?)",
                    filename
                )));
            }
            Ok(text) => {
                let chars = text.chars().count();
                match self.attachments.add(UploadedDocument::new(filename.clone(), text)) {
                    Ok(()) => {
                        tracing::info!(file = %filename, chars, "attached document");
                        self.status = Some(Status::info(format!("Attached {}", filename)));
                    }
                    Err(e) => self.status = Some(Status::error(e.to_string())),
                }
            }
            Err(e) => {
                tracing::warn!("Extraction failed: {}", e);
                self.status = Some(Status::error(e.to_string()));
            }
        }
    }

    pub fn remove_attachment(&mut self, index: usize) {
        if let Some(doc) = self.attachments.remove(index) {
            self.status = Some(Status::info(format!("Removed {}", doc.filename)));
        }
    }

    pub fn run(&mut self) {
        let label = self.current_agent().map(|a| a.label).unwrap_or("");
        let result = self.host.submit(
            self.agent_id,
            self.sub_option,
            &self.input_text,
            self.attachments.as_slice(),
        );
        match result {
            Ok(()) => {
                self.in_flight = Some(InFlight {
                    agent_label: label,
                    input: self.input_text.trim().to_string(),
                });
                self.result_text.clear();
                self.result_is_error = false;
                self.status = Some(Status::info("Working..."));
            }
            Err(SubmitError::MissingCredential) => {
                self.show_key_prompt = true;
                self.status = Some(Status::error(SubmitError::MissingCredential.to_string()));
            }
            Err(e) => self.status = Some(Status::error(e.to_string())),
        }
    }

    /// Drain the runner; called once per frame.
    pub fn poll(&mut self) {
        if let Some(outcome) = self.host.poll() {
            self.apply_outcome(outcome);
        }
    }

    fn apply_outcome(&mut self, outcome: CompletionOutcome) {
        let in_flight = self.in_flight.take();
        self.result_text = outcome.display_text();
        self.result_is_error = !outcome.is_success();

        if let CompletionOutcome::Success(text) = &outcome {
            self.status = Some(Status::info("Done"));
            if let Some(sent) = in_flight {
                let entry = HistoryEntry::new(chrono::Local::now(), sent.agent_label, &sent.input, text);
                if let Err(e) = self.history.record(entry) {
                    tracing::warn!("Failed to write history: {:#}", e);
                }
            }
        } else {
            self.status = Some(Status::error("Request failed"));
        }
    }

    /// Store a new API key. Returns false when the input was blank.
    pub fn set_api_key(&mut self, raw: String) -> bool {
        let Some(credential) = Credential::new(raw) else {
            self.status = Some(Status::error("API key cannot be empty"));
            return false;
        };
        if let Err(e) = self.credentials.save(&credential) {
            tracing::warn!("Failed to save API key: {:#}", e);
            self.status = Some(Status::error(format!("API key not saved: {}", e)));
        } else {
            self.status = Some(Status::info("API key saved"));
        }
        self.host.set_credential(credential);
        self.show_key_prompt = false;
        true
    }

    pub fn save_result_to(&mut self, path: &Path) {
        let label = self.current_agent().map(|a| a.label).unwrap_or("");
        match services::export::save_result(path, label, &self.result_text) {
            Ok(()) => self.status = Some(Status::info(format!("Saved to {}", path.display()))),
            Err(e) => self.status = Some(Status::error(format!("{:#}", e))),
        }
    }

    pub fn copy_result(&mut self) {
        let copied = arboard::Clipboard::new()
            .and_then(|mut clipboard| clipboard.set_text(self.result_text.clone()));
        match copied {
            Ok(()) => self.status = Some(Status::info("Copied to clipboard")),
            Err(e) => {
                tracing::warn!("Clipboard unavailable: {}", e);
                self.status = Some(Status::error(format!("Could not copy: {}", e)));
            }
        }
    }

    pub fn has_result(&self) -> bool {
        !self.result_text.trim().is_empty() && !self.result_is_error
    }

    pub fn clear_all(&mut self) {
        self.input_text.clear();
        self.attachments.clear();
        self.result_text.clear();
        self.result_is_error = false;
        self.status = None;
    }

    pub fn history_entries(&self) -> Vec<HistoryEntry> {
        match self.history.entries() {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("Failed to read history: {:#}", e);
                Vec::new()
            }
        }
    }
}
