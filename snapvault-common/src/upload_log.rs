//! Append-only log of cloud upload attempts
//!
//! Every upload attempt, successful or not, appends one JSON line.
//! Entries are never rewritten; the dashboard shows them most recent
//! first.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::fs::OpenOptions;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Outcome of one cloud upload attempt
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UploadLogEntry {
    pub timestamp_utc: DateTime<Utc>,
    pub success: bool,
    pub message: String,

    /// Backup folder that was uploaded, when known
    #[serde(default)]
    pub backup_folder: Option<String>,
}

impl UploadLogEntry {
    /// Entry stamped with the current time
    pub fn now(success: bool, message: impl Into<String>, backup_folder: Option<String>) -> Self {
        Self {
            timestamp_utc: Utc::now(),
            success,
            message: message.into(),
            backup_folder,
        }
    }

    /// Dashboard line: status mark, local timestamp and message
    pub fn display_line(&self) -> String {
        let status = if self.success { "✓ Success" } else { "✗ Failed" };
        format!(
            "{} — {} — {}",
            status,
            self.timestamp_utc
                .with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M"),
            self.message
        )
    }
}

/// File-backed upload log, one JSON object per line
pub struct UploadLog {
    log_file: PathBuf,
}

impl UploadLog {
    pub fn new(log_file: PathBuf) -> Self {
        Self { log_file }
    }

    /// Log at the default location,
    /// `~/.local/share/snapvault/upload-log.jsonl`
    pub fn open_default() -> Self {
        Self::new(Self::default_path())
    }

    pub fn default_path() -> PathBuf {
        if let Some(data_dir) = dirs::data_dir() {
            data_dir.join("snapvault").join("upload-log.jsonl")
        } else {
            // Fallback if XDG data dir isn't available
            PathBuf::from("/tmp/snapvault-upload-log.jsonl")
        }
    }

    pub fn path(&self) -> &Path {
        &self.log_file
    }

    /// Append one entry to the end of the log
    pub fn append(&self, entry: &UploadLogEntry) -> Result<()> {
        if let Some(parent) = self.log_file.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let line = serde_json::to_string(entry).context("Failed to serialize log entry")?;

        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.log_file)
            .with_context(|| format!("Failed to open {}", self.log_file.display()))?;
        fs2::FileExt::lock_exclusive(&file).context("Failed to lock upload log for writing")?;

        writeln!(file, "{line}").context("Failed to append to upload log")?;
        file.flush().context("Failed to flush upload log")?;

        Ok(())
    }

    /// All entries in the order they were appended
    ///
    /// Lines that fail to parse are skipped with a warning so one
    /// damaged line never hides the rest of the history.
    pub fn read_entries(&self) -> Result<Vec<UploadLogEntry>> {
        if !self.log_file.exists() {
            return Ok(Vec::new());
        }

        let mut file = OpenOptions::new()
            .read(true)
            .open(&self.log_file)
            .with_context(|| format!("Failed to open {}", self.log_file.display()))?;
        fs2::FileExt::lock_shared(&file).context("Failed to lock upload log for reading")?;

        let mut content = String::new();
        file.read_to_string(&mut content)
            .context("Failed to read upload log")?;
        fs2::FileExt::unlock(&file).ok();

        let mut entries = Vec::new();
        for line in content.lines() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<UploadLogEntry>(line) {
                Ok(entry) => entries.push(entry),
                Err(err) => log::warn!("Skipping unreadable upload log line: {err}"),
            }
        }

        Ok(entries)
    }

    /// Entries ordered most recent first, as the dashboard shows them
    pub fn read_recent_first(&self) -> Result<Vec<UploadLogEntry>> {
        let mut entries = self.read_entries()?;
        entries.reverse();
        Ok(entries)
    }
}
