//! Persisted API key: a single trimmed line in a local file.

use anyhow::{Context, Result};
use shared::credential::Credential;
use std::fs;
use std::path::{Path, PathBuf};

pub const CREDENTIAL_FILE: &str = "api_key.txt";

pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    /// Store the key as `api_key.txt` inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            path: dir.join(CREDENTIAL_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `Ok(None)` when no key has been saved yet (or the file is blank).
    pub fn load(&self) -> Result<Option<Credential>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read API key from {:?}", self.path))?;
        Ok(Credential::new(raw))
    }

    pub fn save(&self, credential: &Credential) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }
        fs::write(&self.path, credential.expose())
            .with_context(|| format!("Failed to write API key to {:?}", self.path))?;
        tracing::info!(path = ?self.path, "saved API key");
        Ok(())
    }
}
