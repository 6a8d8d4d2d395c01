//! Restore finish pipeline
//!
//! Downloads the selected backup set onto the target drive, then
//! hands the freshest version on that drive to the engine for
//! recovery. Stage failures stop the pipeline but never the session;
//! the user keeps their selections and can retry.

use std::sync::Arc;

use anyhow::{Context, Result};
use snapvault_common::WizardState;

use crate::cloud_store::CloudStorage;
use crate::engine::BackupEngine;
use crate::report::{Notice, Reporter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// The cloud download failed; nothing was recovered
    DownloadFailed,
    /// The download landed but the drive showed no backup versions
    NoVersions,
    /// Recovery ran to its end, successfully or not
    Finished { recovered: bool },
}

pub struct RestorePipeline {
    engine: Arc<dyn BackupEngine>,
    cloud: Arc<dyn CloudStorage>,
    reporter: Arc<dyn Reporter>,
}

impl RestorePipeline {
    pub fn new(
        engine: Arc<dyn BackupEngine>,
        cloud: Arc<dyn CloudStorage>,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        Self {
            engine,
            cloud,
            reporter,
        }
    }

    /// Whether every restore step has been completed
    pub fn ready(state: &WizardState) -> bool {
        state.cloud_config.is_some()
            && state.restore_selected_backup_set.is_some()
            && state.restore_download_target_drive.is_some()
    }

    /// Run download then recovery
    ///
    /// Callers check [`RestorePipeline::ready`] first; an unready state
    /// here is a bug and reads as a failed download of nothing.
    pub async fn run(&self, state: &WizardState) -> Result<RestoreOutcome> {
        let (Some(config), Some(set), Some(target)) = (
            state.cloud_config.as_ref(),
            state.restore_selected_backup_set.as_ref(),
            state.restore_download_target_drive.as_ref(),
        ) else {
            return Ok(RestoreOutcome::DownloadFailed);
        };

        let drive = target.name.trim_end_matches(['\\', '/']).to_string();
        let volume = state.resolved_recovery_volume(self.engine.windows_like());

        let (ok, message) = self
            .cloud
            .download_backup_set(&set.id, &drive, config, None)
            .await;
        if !ok {
            log::warn!("Download of {} onto {drive} failed: {message}", set.id);
            self.reporter
                .notify(Notice::error("Restore", format!("Download failed: {message}")));
            return Ok(RestoreOutcome::DownloadFailed);
        }

        self.reporter.notify(Notice::info(
            "Restore",
            "Backup downloaded. Starting recovery...",
        ));

        let versions = {
            let engine = Arc::clone(&self.engine);
            let drive = drive.clone();
            tokio::task::spawn_blocking(move || engine.backup_versions(&drive))
                .await
                .context("Version discovery task failed")?
        };
        if !versions.ok || versions.versions.is_empty() {
            self.reporter.notify(Notice::warning(
                "Restore",
                format!(
                    "Could not get backup versions from {drive}. {}",
                    versions.output
                ),
            ));
            return Ok(RestoreOutcome::NoVersions);
        }

        // Most recent version first; recover onto the same volume the
        // backup was taken from.
        let version_id = versions.versions[0].identifier.clone();
        let recovery = {
            let engine = Arc::clone(&self.engine);
            let drive = drive.clone();
            let volume = volume.clone();
            tokio::task::spawn_blocking(move || {
                engine.start_recovery(&drive, &version_id, &volume, &volume)
            })
            .await
            .context("Recovery task failed")?
        };

        if recovery.ok {
            self.reporter.notify(Notice::info(
                "Restore",
                "Recovery completed. A restart may be required on Windows.",
            ));
        } else {
            log::warn!("Recovery onto {volume} failed: {}", recovery.stderr);
            self.reporter.notify(Notice::warning(
                "Restore",
                format!("{}\n{}", recovery.stderr, recovery.stdout),
            ));
        }

        Ok(RestoreOutcome::Finished {
            recovered: recovery.ok,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snapvault_common::{CloudBackupSetInfo, CloudStorageConfig, DriveInfo};

    #[test]
    fn test_ready_needs_all_three_selections() {
        let mut state = WizardState::default();
        assert!(!RestorePipeline::ready(&state));

        state.set_cloud_credentials(CloudStorageConfig::default());
        assert!(!RestorePipeline::ready(&state));

        state.select_backup_set(CloudBackupSetInfo {
            id: "set-1".to_string(),
            display_name: "set-1".to_string(),
            incremental: false,
            date: chrono::Utc::now(),
        });
        assert!(!RestorePipeline::ready(&state));

        state.set_restore_target(DriveInfo {
            name: "E:\\".to_string(),
            volume_label: String::new(),
            file_system: "NTFS".to_string(),
            total_bytes: 1000,
            free_bytes: 500,
        });
        assert!(RestorePipeline::ready(&state));
    }
}
