//! Saving the latest result to a user-chosen text file.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Local};
use std::fs;
use std::path::Path;

/// Header + separator + result body.
pub fn render_result(at: DateTime<Local>, agent_label: &str, result: &str) -> String {
    format!(
        "Agent Desk result\nTime: {}\nTask: {}\n{}\n\n{}",
        at.format("%Y-%m-%d %H:%M:%S"),
        agent_label,
        "=".repeat(50),
        result
    )
}

pub fn save_result(path: &Path, agent_label: &str, result: &str) -> Result<()> {
    if result.trim().is_empty() {
        bail!("There is no result to save");
    }
    let contents = render_result(Local::now(), agent_label, result);
    fs::write(path, contents).with_context(|| format!("Failed to save result to {:?}", path))?;
    tracing::info!(?path, "saved result");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    #[test]
    fn test_render_layout() {
        let at = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap();
        let text = render_result(at, "Draft email", "Dear team,");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Agent Desk result");
        assert_eq!(lines[1], "Time: 2024-03-09 14:05:00");
        assert_eq!(lines[2], "Task: Draft email");
        assert_eq!(lines[3], "=".repeat(50));
        assert_eq!(lines[4], "");
        assert_eq!(lines[5], "Dear team,");
    }

    #[test]
    fn test_empty_result_refused() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.txt");
        assert!(save_result(&path, "Summarize", "   ").is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_save_writes_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.txt");
        save_result(&path, "Summarize", "- point one").unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.ends_with("- point one"));
        assert!(written.contains("Task: Summarize"));
    }
}
