//! Schedule dashboard views
//!
//! Read-only summaries shown after the first completed backup: the
//! active schedule, the version history on the destination and the
//! recent cloud uploads. Every view is recomputed on demand and
//! tolerant of missing collaborator data; the dashboard never fails,
//! it shows less.

use std::sync::Arc;

use snapvault_common::{ConfigStore, UploadLog, UploadLogEntry, WizardState, schedule};

use crate::engine::BackupEngine;

/// One row in the backup history list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub identifier: String,
    pub incremental: bool,
}

impl HistoryEntry {
    pub fn type_label(&self) -> &'static str {
        if self.incremental { "Incremental" } else { "Full" }
    }

    pub fn display_line(&self) -> String {
        format!("{} — {}", self.type_label(), self.identifier)
    }
}

/// Upload log panel content
#[derive(Debug, Clone)]
pub struct UploadView {
    pub banner: String,
    /// Most recent upload first
    pub entries: Vec<UploadLogEntry>,
}

/// Engines name incremental versions after their kind; anything else
/// counts as a full backup.
fn is_incremental(identifier: &str) -> bool {
    identifier.to_lowercase().contains("incremental")
}

pub struct Dashboard {
    engine: Arc<dyn BackupEngine>,
    config_store: Arc<ConfigStore>,
    upload_log: Arc<UploadLog>,
}

impl Dashboard {
    pub fn new(
        engine: Arc<dyn BackupEngine>,
        config_store: Arc<ConfigStore>,
        upload_log: Arc<UploadLog>,
    ) -> Self {
        Self {
            engine,
            config_store,
            upload_log,
        }
    }

    /// Re-merge the persisted record into live state
    ///
    /// Keeps the dashboard truthful after a finish wrote a new record,
    /// and fills state on a fresh session. Missing or unreadable
    /// records leave the state as it is.
    pub fn reconcile(&self, state: &mut WizardState) {
        match self.config_store.load() {
            Ok(Some(record)) => record.apply_to(state),
            Ok(None) => {}
            Err(err) => log::warn!("Could not reload saved configuration: {err:#}"),
        }
    }

    pub fn schedule_summary(&self, state: &WizardState) -> String {
        schedule::schedule_summary(
            state.full_backup_interval_days,
            state.incremental_interval_hours,
        )
    }

    /// Version history on the destination drive, most recent first
    ///
    /// No destination or a failed engine query both read as an empty
    /// history.
    pub async fn history(&self, state: &WizardState) -> Vec<HistoryEntry> {
        let Some(drive) = state
            .destination_drive
            .as_ref()
            .map(|d| d.name.trim_end_matches(['\\', '/']).to_string())
            .filter(|name| !name.is_empty())
        else {
            return Vec::new();
        };

        let query = {
            let engine = Arc::clone(&self.engine);
            let drive = drive.clone();
            match tokio::task::spawn_blocking(move || engine.backup_versions(&drive)).await {
                Ok(query) => query,
                Err(err) => {
                    log::warn!("Version discovery task failed: {err}");
                    return Vec::new();
                }
            }
        };
        if !query.ok {
            log::warn!("Could not list backup versions on {drive}: {}", query.output);
            return Vec::new();
        }

        query
            .versions
            .into_iter()
            .map(|version| HistoryEntry {
                incremental: is_incremental(&version.identifier),
                identifier: version.identifier,
            })
            .collect()
    }

    pub fn upload_view(&self, state: &WizardState) -> UploadView {
        let banner = if !state.keep_on_source_disk && state.cloud_config.is_some() {
            "Recent cloud uploads (when backup + cloud upload are enabled):"
        } else {
            "Cloud upload is not configured. Backups are stored on the destination only."
        };

        let entries = match self.upload_log.read_recent_first() {
            Ok(entries) => entries,
            Err(err) => {
                log::warn!("Could not read upload log: {err:#}");
                Vec::new()
            }
        };

        UploadView {
            banner: banner.to_string(),
            entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snapvault_common::CloudStorageConfig;
    use std::path::PathBuf;

    use crate::engine::{EngineRun, VersionQuery};

    struct NoEngine;

    impl BackupEngine for NoEngine {
        fn run_full_backup(&self, _source: &str, _destination: &str) -> EngineRun {
            EngineRun::failure("not implemented", "")
        }

        fn schedule_backups(&self, _state: &WizardState, _destination: &str) -> (bool, String) {
            (false, "not implemented".to_string())
        }

        fn latest_backup_folder(&self, _destination: &str) -> String {
            String::new()
        }

        fn backup_versions(&self, _destination: &str) -> VersionQuery {
            VersionQuery::failed("not implemented")
        }

        fn start_recovery(
            &self,
            _destination: &str,
            _version_id: &str,
            _from_volume: &str,
            _to_volume: &str,
        ) -> EngineRun {
            EngineRun::failure("not implemented", "")
        }

        fn windows_like(&self) -> bool {
            false
        }
    }

    fn dashboard_at(dir: &std::path::Path) -> Dashboard {
        Dashboard::new(
            Arc::new(NoEngine),
            Arc::new(ConfigStore::new(dir.join("backup-config.toml"))),
            Arc::new(UploadLog::new(dir.join("upload-log.jsonl"))),
        )
    }

    fn cloud_state() -> WizardState {
        let mut state = WizardState::default();
        state.choose_cloud_storage(
            CloudStorageConfig {
                container_or_bucket: "vault".to_string(),
                account_name_or_key_id: "account".to_string(),
                secret_key: "secret".to_string(),
                ..CloudStorageConfig::default()
            },
            true,
        );
        state
    }

    #[test]
    fn test_incremental_classification_ignores_case() {
        assert!(is_incremental("2026-01-05 INCREMENTAL #3"));
        assert!(is_incremental("incremental-2026-01-05"));
        assert!(!is_incremental("2026-01-05 Full"));
        assert!(!is_incremental(""));
    }

    #[test]
    fn test_history_entry_labels() {
        let entry = HistoryEntry {
            identifier: "2026-01-05 Incremental".to_string(),
            incremental: true,
        };
        assert_eq!(entry.type_label(), "Incremental");
        assert_eq!(entry.display_line(), "Incremental — 2026-01-05 Incremental");
    }

    #[test]
    fn test_upload_banner_tracks_cloud_configuration() {
        let dir = tempfile::tempdir().unwrap();
        let dashboard = dashboard_at(dir.path());

        let local = WizardState::default();
        assert!(
            dashboard
                .upload_view(&local)
                .banner
                .starts_with("Cloud upload is not configured")
        );

        let cloud = cloud_state();
        assert!(
            dashboard
                .upload_view(&cloud)
                .banner
                .starts_with("Recent cloud uploads")
        );
        assert!(dashboard.upload_view(&cloud).entries.is_empty());
    }

    #[test]
    fn test_reconcile_without_record_keeps_state() {
        let dir = tempfile::tempdir().unwrap();
        let dashboard = dashboard_at(dir.path());

        let mut state = cloud_state();
        dashboard.reconcile(&mut state);
        assert!(state.cloud_config.is_some());
        assert!(!state.keep_on_source_disk);
    }

    #[tokio::test]
    async fn test_history_empty_without_destination() {
        let dir = tempfile::tempdir().unwrap();
        let dashboard = dashboard_at(dir.path());
        let history = dashboard.history(&WizardState::default()).await;
        assert!(history.is_empty());
    }

    #[test]
    fn test_missing_log_reads_as_no_uploads() {
        let dir = PathBuf::from("/nonexistent/snapvault-tests");
        let dashboard = Dashboard::new(
            Arc::new(NoEngine),
            Arc::new(ConfigStore::new(dir.join("backup-config.toml"))),
            Arc::new(UploadLog::new(dir.join("upload-log.jsonl"))),
        );
        assert!(
            dashboard
                .upload_view(&WizardState::default())
                .entries
                .is_empty()
        );
    }
}
