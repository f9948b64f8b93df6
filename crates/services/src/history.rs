//! Interaction history: a JSON array of past completions, newest first.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const HISTORY_FILE: &str = "history.json";

/// Entries kept on disk
pub const MAX_HISTORY_ENTRIES: usize = 50;

/// Characters of input kept per entry before the ellipsis.
pub const INPUT_PREVIEW_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Local time, `YYYY-MM-DD HH:MM:SS`
    pub timestamp: String,
    pub agent: String,
    pub input: String,
    pub output: String,
}

impl HistoryEntry {
    pub fn new(at: DateTime<Local>, agent: &str, input: &str, output: &str) -> Self {
        Self {
            timestamp: at.format("%Y-%m-%d %H:%M:%S").to_string(),
            agent: agent.to_string(),
            input: truncate_input(input),
            output: output.to_string(),
        }
    }
}

fn truncate_input(input: &str) -> String {
    if input.chars().count() > INPUT_PREVIEW_CHARS {
        let head: String = input.chars().take(INPUT_PREVIEW_CHARS).collect();
        format!("{}...", head)
    } else {
        input.to_string()
    }
}

pub struct InteractionHistory {
    path: PathBuf,
}

impl InteractionHistory {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            path: dir.join(HISTORY_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All stored entries, newest first. Missing file means no history.
    pub fn entries(&self) -> Result<Vec<HistoryEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let bytes = fs::read(&self.path)
            .with_context(|| format!("Failed to read history {:?}", self.path))?;
        serde_json::from_slice(&bytes)
            .with_context(|| format!("History file {:?} is corrupt", self.path))
    }

    /// Prepend `entry` and drop anything past [`MAX_HISTORY_ENTRIES`].
    pub fn record(&self, entry: HistoryEntry) -> Result<()> {
        let mut entries = match self.entries() {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(error = %e, "starting a fresh history file");
                Vec::new()
            }
        };
        entries.insert(0, entry);
        entries.truncate(MAX_HISTORY_ENTRIES);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data directory {:?}", parent))?;
        }
        let json = serde_json::to_string_pretty(&entries)
            .context("Failed to serialize history")?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write history {:?}", self.path))?;
        Ok(())
    }
}
