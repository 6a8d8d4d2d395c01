//! Backup finish pipeline
//!
//! Runs the ordered stages behind the last wizard step: persist the
//! configuration, run the full backup, register the schedule, then
//! upload the fresh backup set when cloud storage is configured for
//! it. Engine calls are blocking and run on the blocking pool; each
//! stage completes before the next starts.

use std::sync::Arc;

use anyhow::{Context, Result};
use snapvault_common::{ConfigStore, UploadLog, UploadLogEntry, WizardState};

use crate::cloud_store::CloudStorage;
use crate::engine::BackupEngine;
use crate::report::{Notice, Reporter};

/// What the finish stages concluded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupOutcome {
    /// The full backup run failed; scheduling and upload were skipped
    BackupFailed,
    /// The backup ran; later stages may still have warned
    Completed {
        schedule_ok: bool,
        /// `None` when no upload was attempted
        upload: Option<bool>,
    },
}

pub struct BackupPipeline {
    engine: Arc<dyn BackupEngine>,
    cloud: Arc<dyn CloudStorage>,
    reporter: Arc<dyn Reporter>,
    config_store: Arc<ConfigStore>,
    upload_log: Arc<UploadLog>,
}

impl BackupPipeline {
    pub fn new(
        engine: Arc<dyn BackupEngine>,
        cloud: Arc<dyn CloudStorage>,
        reporter: Arc<dyn Reporter>,
        config_store: Arc<ConfigStore>,
        upload_log: Arc<UploadLog>,
    ) -> Self {
        Self {
            engine,
            cloud,
            reporter,
            config_store,
            upload_log,
        }
    }

    /// Run the finish stages in order
    ///
    /// Expected stage failures are reported to the user and folded
    /// into the outcome; `Err` is reserved for persistence and runtime
    /// faults.
    pub async fn run(&self, state: &WizardState) -> Result<BackupOutcome> {
        let source = state
            .source_drive
            .as_ref()
            .map(|d| d.name.clone())
            .unwrap_or_default();
        let destination = state
            .destination_drive
            .as_ref()
            .map(|d| d.name.clone())
            .unwrap_or_default();

        // The plan is saved before anything runs, so the dashboard and
        // the next session see it even if a later stage fails.
        self.config_store.save(state)?;

        let run = {
            let engine = Arc::clone(&self.engine);
            let (source, destination) = (source.clone(), destination.clone());
            tokio::task::spawn_blocking(move || engine.run_full_backup(&source, &destination))
                .await
                .context("Backup task failed")?
        };
        if !run.ok {
            log::warn!("Full backup of {source} failed: {}", run.stderr);
            self.reporter.notify(Notice::warning(
                "Backup",
                format!(
                    "Backup did not complete.\n\nError: {}\n\nOutput: {}",
                    run.stderr, run.stdout
                ),
            ));
            return Ok(BackupOutcome::BackupFailed);
        }

        let (schedule_ok, schedule_msg) = {
            let engine = Arc::clone(&self.engine);
            let snapshot = state.clone();
            let destination = destination.clone();
            tokio::task::spawn_blocking(move || engine.schedule_backups(&snapshot, &destination))
                .await
                .context("Schedule task failed")?
        };
        if schedule_ok {
            self.reporter.notify(Notice::info(
                "Backup Wizard",
                format!("Backup completed.\n\n{schedule_msg}"),
            ));
        } else {
            log::warn!("Scheduling on {destination} failed: {schedule_msg}");
            self.reporter
                .notify(Notice::warning("Schedule", schedule_msg));
        }

        let upload = if self.should_upload(state) {
            self.upload_latest(state, &destination).await?
        } else {
            None
        };

        Ok(BackupOutcome::Completed {
            schedule_ok,
            upload,
        })
    }

    fn should_upload(&self, state: &WizardState) -> bool {
        !state.keep_on_source_disk
            && state.cloud_config.is_some()
            && state.upload_to_cloud_after_backup
    }

    /// Upload the most recent backup folder, recording the outcome in
    /// the upload log. Returns `None` when no folder exists yet.
    async fn upload_latest(&self, state: &WizardState, destination: &str) -> Result<Option<bool>> {
        let Some(config) = state.cloud_config.as_ref() else {
            return Ok(None);
        };

        let folder = {
            let engine = Arc::clone(&self.engine);
            let destination = destination.to_string();
            tokio::task::spawn_blocking(move || engine.latest_backup_folder(&destination))
                .await
                .context("Backup folder lookup failed")?
        };
        if folder.is_empty() {
            log::info!("No backup folder found on {destination}, skipping upload");
            return Ok(None);
        }

        let (ok, message) = self
            .cloud
            .upload_backup_set(destination, &folder, config, None)
            .await;
        if ok {
            self.reporter
                .notify(Notice::info("Cloud Upload", format!("Uploaded: {message}")));
        } else {
            log::warn!("Upload of {folder} failed: {message}");
            self.reporter
                .notify(Notice::warning("Cloud Upload", message.clone()));
        }

        let entry = UploadLogEntry::now(ok, message, Some(folder));
        if let Err(err) = self.upload_log.append(&entry) {
            log::warn!("Could not record upload outcome: {err:#}");
        }

        Ok(Some(ok))
    }
}
