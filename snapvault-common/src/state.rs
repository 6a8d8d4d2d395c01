//! The single mutable record a wizard session edits
//!
//! Every step writes into this record through the setters below; step
//! validity and both finish pipelines read from it. Restore-only
//! fields live alongside the backup plan so that a mode switch keeps
//! already-entered cloud credentials.

use crate::cloud::{CloudBackupSetInfo, CloudStorageConfig};
use crate::drive::DriveInfo;
use crate::format::format_bytes;
use crate::schedule::schedule_summary;

pub const DEFAULT_FULL_INTERVAL_DAYS: u32 = 7;
pub const DEFAULT_INCREMENTAL_INTERVAL_HOURS: u32 = 24;

/// Everything the wizard collects across both tracks
#[derive(Debug, Clone)]
pub struct WizardState {
    /// Drive being backed up
    pub source_drive: Option<DriveInfo>,

    /// Drive the backup is written to
    pub destination_drive: Option<DriveInfo>,

    /// Estimate of the next full backup, recomputed when the
    /// destination step is entered
    pub estimated_backup_size_bytes: u64,

    /// Keep backups on the destination disk only (no cloud)
    pub keep_on_source_disk: bool,

    /// Present and complete when the cloud option is chosen
    pub cloud_config: Option<CloudStorageConfig>,

    /// Upload the finished set after each backup run
    pub upload_to_cloud_after_backup: bool,

    pub full_backup_interval_days: u32,
    pub incremental_interval_hours: u32,

    /// Restore track: the cloud set picked for download
    pub restore_selected_backup_set: Option<CloudBackupSetInfo>,

    /// Restore track: drive the set is downloaded to
    pub restore_download_target_drive: Option<DriveInfo>,

    /// Restore track: volume to recover onto; blank means the platform
    /// root volume
    pub restore_recovery_volume: String,
}

impl Default for WizardState {
    fn default() -> Self {
        Self {
            source_drive: None,
            destination_drive: None,
            estimated_backup_size_bytes: 0,
            keep_on_source_disk: true,
            cloud_config: None,
            upload_to_cloud_after_backup: false,
            full_backup_interval_days: DEFAULT_FULL_INTERVAL_DAYS,
            incremental_interval_hours: DEFAULT_INCREMENTAL_INTERVAL_HOURS,
            restore_selected_backup_set: None,
            restore_download_target_drive: None,
            restore_recovery_volume: String::new(),
        }
    }
}

impl WizardState {
    /// Pick the backup source. A destination with the same name is
    /// dropped so the two can never alias.
    pub fn set_source(&mut self, drive: DriveInfo) {
        if self
            .destination_drive
            .as_ref()
            .is_some_and(|dest| dest.same_drive(&drive))
        {
            self.destination_drive = None;
        }
        self.source_drive = Some(drive);
    }

    /// Pick the backup destination; rejects the current source drive
    pub fn set_destination(&mut self, drive: DriveInfo) -> Result<(), String> {
        if self
            .source_drive
            .as_ref()
            .is_some_and(|source| source.same_drive(&drive))
        {
            return Err("Destination must be a different drive than the source".to_string());
        }
        self.destination_drive = Some(drive);
        Ok(())
    }

    /// Keep backups on the destination disk only
    pub fn choose_local_storage(&mut self) {
        self.keep_on_source_disk = true;
        self.cloud_config = None;
    }

    /// Store backups in the cloud as well
    pub fn choose_cloud_storage(&mut self, config: CloudStorageConfig, upload_after_backup: bool) {
        self.keep_on_source_disk = false;
        self.cloud_config = Some(config);
        self.upload_to_cloud_after_backup = upload_after_backup;
    }

    /// Enter or replace cloud credentials without touching the
    /// storage choice. The restore track uses this; the backup track
    /// goes through [`WizardState::choose_cloud_storage`].
    pub fn set_cloud_credentials(&mut self, config: CloudStorageConfig) {
        self.cloud_config = Some(config);
    }

    pub fn set_schedule(&mut self, full_days: u32, incremental_hours: u32) {
        self.full_backup_interval_days = full_days;
        self.incremental_interval_hours = incremental_hours;
    }

    pub fn select_backup_set(&mut self, set: CloudBackupSetInfo) {
        self.restore_selected_backup_set = Some(set);
    }

    pub fn set_restore_target(&mut self, drive: DriveInfo) {
        self.restore_download_target_drive = Some(drive);
    }

    pub fn set_recovery_volume(&mut self, volume: impl Into<String>) {
        self.restore_recovery_volume = volume.into();
    }

    /// Recovery volume with the blank default resolved to the platform
    /// root ("C:" on Windows-like engines, "/" elsewhere)
    pub fn resolved_recovery_volume(&self, windows_like: bool) -> String {
        let volume = self.restore_recovery_volume.trim();
        if volume.is_empty() {
            if windows_like { "C:" } else { "/" }.to_string()
        } else {
            volume.to_string()
        }
    }

    /// Multi-line plan description for the backup confirmation step
    pub fn plan_summary(&self) -> String {
        let source = self
            .source_drive
            .as_ref()
            .map(|d| d.name.clone())
            .unwrap_or_else(|| "—".to_string());
        let destination = self
            .destination_drive
            .as_ref()
            .map(|d| d.name.clone())
            .unwrap_or_else(|| "—".to_string());
        let size = if self.source_drive.is_some() {
            format!(" — {}", format_bytes(self.estimated_backup_size_bytes))
        } else {
            String::new()
        };
        let storage = if self.keep_on_source_disk {
            "Destination only"
        } else {
            "Upload to cloud after each backup"
        };

        format!(
            "Source: {source}{size}\n\
             Destination: {destination}\n\
             Schedule: {}\n\
             Storage: {storage}.",
            schedule_summary(
                self.full_backup_interval_days,
                self.incremental_interval_hours
            )
        )
    }

    /// Multi-line plan description for the restore confirmation step
    pub fn restore_summary(&self, windows_like: bool) -> String {
        let backup = self
            .restore_selected_backup_set
            .as_ref()
            .map(|s| s.display_name.clone())
            .unwrap_or_else(|| "—".to_string());
        let drive = self
            .restore_download_target_drive
            .as_ref()
            .map(|d| d.name.clone())
            .unwrap_or_else(|| "—".to_string());

        format!(
            "Backup: {backup}\n\
             Download to: {drive}\n\
             Recover to: {}\n\n\
             Download will start, then recovery will run.",
            self.resolved_recovery_volume(windows_like)
        )
    }
}
