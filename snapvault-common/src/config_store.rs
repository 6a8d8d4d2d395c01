//! Persisted wizard configuration
//!
//! One TOML record per user; saving overwrites the previous record in
//! place. The dashboard and the home screen read this record back and
//! merge it into live wizard state.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::fs::OpenOptions;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::cloud::CloudStorageConfig;
use crate::drive::DriveInfo;
use crate::state::{
    DEFAULT_FULL_INTERVAL_DAYS, DEFAULT_INCREMENTAL_INTERVAL_HOURS, WizardState,
};

/// The single persisted configuration record
///
/// Scalar fields first so the TOML serializer emits them before the
/// drive and cloud tables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SavedConfig {
    #[serde(default = "default_true")]
    pub keep_on_source_disk: bool,

    #[serde(default)]
    pub upload_to_cloud_after_backup: bool,

    #[serde(default = "default_full_interval")]
    pub full_backup_interval_days: u32,

    #[serde(default = "default_incremental_interval")]
    pub incremental_interval_hours: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_drive: Option<DriveInfo>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_drive: Option<DriveInfo>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_config: Option<CloudStorageConfig>,
}

fn default_true() -> bool {
    true
}

fn default_full_interval() -> u32 {
    DEFAULT_FULL_INTERVAL_DAYS
}

fn default_incremental_interval() -> u32 {
    DEFAULT_INCREMENTAL_INTERVAL_HOURS
}

impl SavedConfig {
    /// Snapshot the persistable part of the wizard state
    pub fn from_state(state: &WizardState) -> Self {
        Self {
            keep_on_source_disk: state.keep_on_source_disk,
            upload_to_cloud_after_backup: state.upload_to_cloud_after_backup,
            full_backup_interval_days: state.full_backup_interval_days,
            incremental_interval_hours: state.incremental_interval_hours,
            source_drive: state.source_drive.clone(),
            destination_drive: state.destination_drive.clone(),
            cloud_config: state.cloud_config.clone(),
        }
    }

    /// Merge this record into live wizard state
    ///
    /// Restore-only fields (selected set, download target, recovery
    /// volume) are left untouched.
    pub fn apply_to(&self, state: &mut WizardState) {
        state.keep_on_source_disk = self.keep_on_source_disk;
        state.upload_to_cloud_after_backup = self.upload_to_cloud_after_backup;
        state.full_backup_interval_days = self.full_backup_interval_days;
        state.incremental_interval_hours = self.incremental_interval_hours;
        state.source_drive = self.source_drive.clone();
        state.destination_drive = self.destination_drive.clone();
        state.cloud_config = self.cloud_config.clone();
    }
}

/// File-backed store for the one [`SavedConfig`] record
pub struct ConfigStore {
    config_file: PathBuf,
}

impl ConfigStore {
    pub fn new(config_file: PathBuf) -> Self {
        Self { config_file }
    }

    /// Store at the default location,
    /// `~/.config/snapvault/backup-config.toml`
    pub fn open_default() -> Self {
        Self::new(Self::default_path())
    }

    pub fn default_path() -> PathBuf {
        if let Some(config_dir) = dirs::config_dir() {
            config_dir.join("snapvault").join("backup-config.toml")
        } else {
            // Fallback if XDG config dir isn't available
            PathBuf::from("/tmp/snapvault-backup-config.toml")
        }
    }

    pub fn path(&self) -> &Path {
        &self.config_file
    }

    /// Load the saved record
    ///
    /// Returns `None` when no record has been saved yet. An unreadable
    /// record is treated the same, with a warning, so a damaged file
    /// never blocks the wizard from starting over.
    pub fn load(&self) -> Result<Option<SavedConfig>> {
        if !self.config_file.exists() {
            return Ok(None);
        }

        let mut file = self.locked_file(false)?;
        let mut content = String::new();
        file.read_to_string(&mut content)
            .context("Failed to read saved configuration")?;
        fs2::FileExt::unlock(&file).ok();

        match toml::from_str::<SavedConfig>(&content) {
            Ok(config) => Ok(Some(config)),
            Err(err) => {
                log::warn!(
                    "Ignoring unreadable configuration at {}: {err}",
                    self.config_file.display()
                );
                Ok(None)
            }
        }
    }

    /// Overwrite the saved record with the current wizard state
    pub fn save(&self, state: &WizardState) -> Result<()> {
        let record = SavedConfig::from_state(state);
        let content =
            toml::to_string_pretty(&record).context("Failed to serialize configuration")?;

        if let Some(parent) = self.config_file.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let _lock = self.locked_file(true)?;
        let tmp_path = self.config_file.with_extension("tmp");

        {
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&tmp_path)
                .with_context(|| {
                    format!("Failed to open temporary config file {}", tmp_path.display())
                })?;
            file.write_all(content.as_bytes())
                .context("Failed to write configuration")?;
            file.sync_all().context("Failed to sync configuration")?;
        }

        fs::rename(&tmp_path, &self.config_file)
            .with_context(|| format!("Failed to replace {}", self.config_file.display()))?;

        log::info!("Saved configuration to {}", self.config_file.display());
        Ok(())
    }

    fn locked_file(&self, write: bool) -> Result<fs::File> {
        let file = OpenOptions::new()
            .read(true)
            .write(write)
            .create(write)
            .open(&self.config_file)
            .with_context(|| format!("Failed to open {}", self.config_file.display()))?;

        if write {
            fs2::FileExt::lock_exclusive(&file)
                .context("Failed to lock configuration for writing")?;
        } else {
            fs2::FileExt::lock_shared(&file)
                .context("Failed to lock configuration for reading")?;
        }

        Ok(file)
    }
}
