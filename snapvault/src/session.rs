//! Wizard session
//!
//! One session per window: owns the wizard state and the flow, wires
//! the collaborator traits into the two finish pipelines, and holds
//! the single-flight guard that keeps a second finish from starting
//! while one is running. Frontends drive it with [`WizardCommand`]s
//! and read state back through the query methods; all mutation goes
//! through here.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use snapvault_common::{
    CloudBackupSetInfo, CloudStorageConfig, ConfigStore, DriveInfo, UploadLog, WizardState,
    validation,
};

use crate::backup_pipeline::{BackupOutcome, BackupPipeline};
use crate::cloud_store::CloudStorage;
use crate::dashboard::{Dashboard, HistoryEntry, UploadView};
use crate::drives::DriveProvider;
use crate::engine::BackupEngine;
use crate::report::{Notice, Reporter};
use crate::restore_pipeline::{RestoreOutcome, RestorePipeline};
use crate::wizard::{
    self, Advance, BackupStep, RestoreStep, Screen, Track, WizardCommand, WizardFlow,
};

/// Which entries the home screen offers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HomeView {
    /// A destination drive has been configured in a previous session
    pub dashboard_available: bool,
    /// Rescue script preparation is pointless on Windows, where the
    /// engine restores through its own boot environment
    pub rescue_available: bool,
}

/// Result of a remote backup set listing
#[derive(Debug, Clone)]
pub struct BackupSetListing {
    pub sets: Vec<CloudBackupSetInfo>,
    /// Status line shown under the list
    pub status: String,
}

/// RAII token for the finish-in-flight flag. Dropping it releases the
/// flag on every exit path, including errors.
struct FinishGuard {
    flag: Arc<AtomicBool>,
}

impl FinishGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| Self {
                flag: Arc::clone(flag),
            })
    }
}

impl Drop for FinishGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

pub struct WizardSession {
    state: WizardState,
    flow: WizardFlow,
    engine: Arc<dyn BackupEngine>,
    cloud: Arc<dyn CloudStorage>,
    drive_provider: Arc<dyn DriveProvider>,
    reporter: Arc<dyn Reporter>,
    config_store: Arc<ConfigStore>,
    dashboard: Dashboard,
    backup_pipeline: BackupPipeline,
    restore_pipeline: RestorePipeline,
    finish_in_flight: Arc<AtomicBool>,
}

impl WizardSession {
    /// Session with stores at their default locations
    pub fn new(
        engine: Arc<dyn BackupEngine>,
        cloud: Arc<dyn CloudStorage>,
        drive_provider: Arc<dyn DriveProvider>,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        Self::with_stores(
            engine,
            cloud,
            drive_provider,
            reporter,
            ConfigStore::open_default(),
            UploadLog::open_default(),
        )
    }

    pub fn with_stores(
        engine: Arc<dyn BackupEngine>,
        cloud: Arc<dyn CloudStorage>,
        drive_provider: Arc<dyn DriveProvider>,
        reporter: Arc<dyn Reporter>,
        config_store: ConfigStore,
        upload_log: UploadLog,
    ) -> Self {
        let config_store = Arc::new(config_store);
        let upload_log = Arc::new(upload_log);

        let dashboard = Dashboard::new(
            Arc::clone(&engine),
            Arc::clone(&config_store),
            Arc::clone(&upload_log),
        );
        let backup_pipeline = BackupPipeline::new(
            Arc::clone(&engine),
            Arc::clone(&cloud),
            Arc::clone(&reporter),
            Arc::clone(&config_store),
            upload_log,
        );
        let restore_pipeline = RestorePipeline::new(
            Arc::clone(&engine),
            Arc::clone(&cloud),
            Arc::clone(&reporter),
        );

        Self {
            state: WizardState::default(),
            flow: WizardFlow::new(),
            engine,
            cloud,
            drive_provider,
            reporter,
            config_store,
            dashboard,
            backup_pipeline,
            restore_pipeline,
            finish_in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn screen(&self) -> Screen {
        self.flow.screen()
    }

    pub fn finish_in_flight(&self) -> bool {
        self.finish_in_flight.load(Ordering::Acquire)
    }

    /// Whether the forward control should be enabled right now
    pub fn forward_enabled(&self) -> bool {
        wizard::can_advance(&self.state, self.flow.screen()) && !self.finish_in_flight()
    }

    /// Apply one navigation command and return the screen to show
    pub async fn handle(&mut self, command: WizardCommand) -> Screen {
        match command {
            WizardCommand::StartBackup => {
                if self.flow.start_backup() {
                    let screen = self.flow.screen();
                    self.entered(screen);
                }
            }
            WizardCommand::StartRestore => {
                if self.flow.start_restore() {
                    self.prefill_cloud_from_saved();
                    let screen = self.flow.screen();
                    self.entered(screen);
                }
            }
            WizardCommand::Advance => match self.flow.advance(&self.state) {
                Advance::Stayed => {}
                Advance::Moved(screen) => self.entered(screen),
                Advance::Finished(Track::Backup) => self.finish_backup().await,
                Advance::Finished(Track::Restore) => self.finish_restore().await,
            },
            WizardCommand::Back => {
                self.flow.back();
            }
            WizardCommand::SwitchMode => self.flow.switch_mode(),
            WizardCommand::ShowDashboard => {
                if self.flow.show_dashboard() {
                    self.dashboard.reconcile(&mut self.state);
                }
            }
            WizardCommand::ShowRescue => {
                self.flow.show_rescue();
            }
            WizardCommand::BackToHome => {
                self.flow.back_to_home();
            }
        }
        self.flow.screen()
    }

    /// Step entry side effects
    fn entered(&mut self, screen: Screen) {
        match screen {
            // The estimate follows the chosen source, so picking a new
            // source and coming forward again refreshes it
            Screen::Backup(BackupStep::SelectDestination) => {
                if let Some(source) = &self.state.source_drive {
                    self.state.estimated_backup_size_bytes =
                        self.drive_provider.estimate_backup_size(source);
                }
            }
            Screen::Restore(RestoreStep::Target) => {
                if validation::is_blank(&self.state.restore_recovery_volume) {
                    let volume = self.state.resolved_recovery_volume(self.engine.windows_like());
                    self.state.set_recovery_volume(volume);
                }
            }
            _ => {}
        }
    }

    /// Credentials saved by a backup session seed the restore track
    fn prefill_cloud_from_saved(&mut self) {
        match self.config_store.load() {
            Ok(Some(record)) => {
                if let Some(config) = record.cloud_config {
                    self.state.set_cloud_credentials(config);
                }
            }
            Ok(None) => {}
            Err(err) => log::warn!("Could not load saved configuration: {err:#}"),
        }
    }

    pub fn home_view(&self) -> HomeView {
        let dashboard_available = match self.config_store.load() {
            Ok(Some(record)) => record.destination_drive.is_some(),
            Ok(None) => false,
            Err(err) => {
                log::warn!("Could not load saved configuration: {err:#}");
                false
            }
        };
        HomeView {
            dashboard_available,
            rescue_available: !self.engine.windows_like(),
        }
    }

    pub fn source_candidates(&self) -> Vec<DriveInfo> {
        self.drive_provider.drives()
    }

    /// Drives offered as destination; the source itself is excluded
    pub fn destination_candidates(&self) -> Vec<DriveInfo> {
        self.drive_provider
            .drives()
            .into_iter()
            .filter(|drive| {
                self.state
                    .source_drive
                    .as_ref()
                    .is_none_or(|source| !source.same_drive(drive))
            })
            .collect()
    }

    pub fn select_source(&mut self, drive: DriveInfo) {
        self.state.set_source(drive);
    }

    pub fn select_destination(&mut self, drive: DriveInfo) -> Result<(), String> {
        self.state.set_destination(drive)
    }

    pub fn choose_local_storage(&mut self) {
        self.state.choose_local_storage();
    }

    pub fn choose_cloud_storage(&mut self, config: CloudStorageConfig, upload_after_backup: bool) {
        self.state.choose_cloud_storage(config, upload_after_backup);
    }

    /// Credentials for the restore track; leaves the backup storage
    /// choice alone
    pub fn set_cloud_credentials(&mut self, config: CloudStorageConfig) {
        self.state.set_cloud_credentials(config);
    }

    pub fn set_schedule(&mut self, full_days: u32, incremental_hours: u32) {
        self.state.set_schedule(full_days, incremental_hours);
    }

    pub fn select_backup_set(&mut self, set: CloudBackupSetInfo) {
        self.state.select_backup_set(set);
    }

    pub fn set_restore_target(&mut self, drive: DriveInfo) {
        self.state.set_restore_target(drive);
    }

    pub fn set_recovery_volume(&mut self, volume: impl Into<String>) {
        self.state.set_recovery_volume(volume);
    }

    /// List the backup sets reachable with the entered credentials
    pub async fn fetch_backup_sets(&self) -> BackupSetListing {
        let Some(config) = self
            .state
            .cloud_config
            .as_ref()
            .filter(|config| validation::validate_cloud_config(config).is_ok())
        else {
            return BackupSetListing {
                sets: Vec::new(),
                status: "Enter cloud credentials in step 1.".to_string(),
            };
        };

        let (ok, sets, message) = self.cloud.list_backup_sets(config).await;
        if !ok {
            return BackupSetListing {
                sets: Vec::new(),
                status: message,
            };
        }
        if sets.is_empty() {
            return BackupSetListing {
                sets,
                status: "No backup sets found.".to_string(),
            };
        }
        let status = format!("{} backup(s) found.", sets.len());
        BackupSetListing { sets, status }
    }

    /// Change the schedule from the dashboard: persist first, then
    /// re-register with the engine. Returns whether scheduling took.
    pub async fn apply_schedule_change(
        &mut self,
        full_days: u32,
        incremental_hours: u32,
    ) -> Result<bool> {
        self.state.set_schedule(full_days, incremental_hours);
        self.config_store.save(&self.state)?;

        let destination = self
            .state
            .destination_drive
            .as_ref()
            .map(|d| d.name.trim_end_matches(['\\', '/']).to_string())
            .unwrap_or_default();
        let (ok, message) = {
            let engine = Arc::clone(&self.engine);
            let snapshot = self.state.clone();
            tokio::task::spawn_blocking(move || engine.schedule_backups(&snapshot, &destination))
                .await
                .context("Schedule task failed")?
        };
        if ok {
            self.reporter.notify(Notice::info("Schedule", message));
        } else {
            self.reporter.notify(Notice::warning("Schedule", message));
        }
        Ok(ok)
    }

    pub fn schedule_summary(&self) -> String {
        self.dashboard.schedule_summary(&self.state)
    }

    pub async fn backup_history(&self) -> Vec<HistoryEntry> {
        self.dashboard.history(&self.state).await
    }

    pub fn upload_view(&self) -> UploadView {
        self.dashboard.upload_view(&self.state)
    }

    async fn finish_backup(&mut self) {
        let Some(_guard) = FinishGuard::acquire(&self.finish_in_flight) else {
            log::debug!("Finish already in flight, ignoring backup finish");
            return;
        };

        match self.backup_pipeline.run(&self.state).await {
            Ok(BackupOutcome::BackupFailed) => {}
            Ok(BackupOutcome::Completed { .. }) => {
                self.flow.complete_backup();
                self.dashboard.reconcile(&mut self.state);
            }
            Err(err) => {
                log::error!("Backup finish failed: {err:#}");
                self.reporter
                    .notify(Notice::error("Backup Wizard", format!("{err:#}")));
            }
        }
    }

    async fn finish_restore(&mut self) {
        if !RestorePipeline::ready(&self.state) {
            self.reporter.notify(Notice::warning(
                "Restore",
                "Please complete all restore steps.",
            ));
            return;
        }

        let Some(_guard) = FinishGuard::acquire(&self.finish_in_flight) else {
            log::debug!("Finish already in flight, ignoring restore finish");
            return;
        };

        match self.restore_pipeline.run(&self.state).await {
            Ok(RestoreOutcome::Finished { .. }) => self.flow.complete_restore(),
            Ok(RestoreOutcome::DownloadFailed) | Ok(RestoreOutcome::NoVersions) => {}
            Err(err) => {
                log::error!("Restore finish failed: {err:#}");
                self.reporter
                    .notify(Notice::error("Restore", format!("{err:#}")));
            }
        }
    }
}
