//! Platform directories and `settings.json` persistence.

use anyhow::{anyhow, Context, Result};
use shared::settings::AppSettings;
use std::fs;
use std::path::{Path, PathBuf};

pub const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone)]
pub struct AppDirs {
    /// settings.json and api_key.txt
    pub config: PathBuf,
    /// history.json
    pub data: PathBuf,
}

impl AppDirs {
    pub fn discover() -> Result<Self> {
        let proj = directories::ProjectDirs::from("com.local", "Agent Desk", "AgentDesk")
            .ok_or_else(|| anyhow!("Could not determine a home directory"))?;
        let dirs = Self {
            config: proj.config_dir().to_path_buf(),
            data: proj.data_dir().to_path_buf(),
        };
        dirs.ensure()?;
        Ok(dirs)
    }

    /// Both directories rooted at `root` (portable installs, tests).
    pub fn rooted_at(root: &Path) -> Result<Self> {
        let dirs = Self {
            config: root.join("config"),
            data: root.join("data"),
        };
        dirs.ensure()?;
        Ok(dirs)
    }

    fn ensure(&self) -> Result<()> {
        for dir in [&self.config, &self.data] {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory {:?}", dir))?;
        }
        Ok(())
    }

    pub fn settings_path(&self) -> PathBuf {
        self.config.join(SETTINGS_FILE)
    }

    /// Saved settings, or defaults when absent or unreadable. Environment
    /// overrides are applied either way.
    pub fn load_settings(&self) -> AppSettings {
        let path = self.settings_path();
        let loaded = fs::read(&path)
            .ok()
            .and_then(|bytes| match serde_json::from_slice::<AppSettings>(&bytes) {
                Ok(settings) => Some(settings),
                Err(e) => {
                    tracing::warn!(?path, error = %e, "ignoring unreadable settings");
                    None
                }
            });
        loaded.unwrap_or_default().with_env_overrides()
    }

    pub fn save_settings(&self, settings: &AppSettings) -> Result<()> {
        let path = self.settings_path();
        let json = serde_json::to_vec_pretty(settings).context("Failed to serialize settings")?;
        fs::write(&path, json).with_context(|| format!("Failed to write settings {:?}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_when_missing() {
        let tmp = TempDir::new().unwrap();
        let dirs = AppDirs::rooted_at(tmp.path()).unwrap();
        assert!(dirs.config.is_dir());
        assert!(dirs.data.is_dir());

        let settings = dirs.load_settings();
        assert_eq!(settings.models, shared::ModelCatalog::default());
    }

    #[test]
    fn test_save_and_reload() {
        let tmp = TempDir::new().unwrap();
        let dirs = AppDirs::rooted_at(tmp.path()).unwrap();
        let mut settings = AppSettings::default();
        settings.models.reasoning = "deepseek-r1".into();
        dirs.save_settings(&settings).unwrap();

        assert_eq!(dirs.load_settings().models.reasoning, "deepseek-r1");
    }

    #[test]
    fn test_corrupt_settings_fall_back() {
        let tmp = TempDir::new().unwrap();
        let dirs = AppDirs::rooted_at(tmp.path()).unwrap();
        fs::write(dirs.settings_path(), "{ nope").unwrap();

        assert_eq!(dirs.load_settings().models, shared::ModelCatalog::default());
    }
}
