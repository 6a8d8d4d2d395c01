//! Contract to the platform backup engine
//!
//! The engine wraps whatever the platform actually runs (wbadmin on
//! Windows, rsync elsewhere). Every method is synchronous and may
//! block for a long time; the pipelines call them through
//! `tokio::task::spawn_blocking`. Expected failures come back as data,
//! never as panics.

use serde::{Deserialize, Serialize};

use snapvault_common::WizardState;

/// Captured outcome of one engine invocation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineRun {
    pub ok: bool,
    pub stdout: String,
    pub stderr: String,
}

impl EngineRun {
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            ok: true,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failure(stderr: impl Into<String>, stdout: impl Into<String>) -> Self {
        Self {
            ok: false,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }
}

/// One backup version present on a destination drive
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BackupVersion {
    /// Engine-specific identifier, also used for display
    pub identifier: String,
}

impl BackupVersion {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
        }
    }
}

/// Result of listing the backup versions on a destination
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VersionQuery {
    pub ok: bool,

    /// Versions ordered most recent first
    pub versions: Vec<BackupVersion>,

    /// Raw engine output, kept for diagnostics
    pub output: String,
}

impl VersionQuery {
    pub fn found(versions: Vec<BackupVersion>) -> Self {
        Self {
            ok: true,
            versions,
            output: String::new(),
        }
    }

    pub fn failed(output: impl Into<String>) -> Self {
        Self {
            ok: false,
            versions: Vec::new(),
            output: output.into(),
        }
    }
}

/// Platform backup engine used by both wizard tracks
pub trait BackupEngine: Send + Sync {
    /// Run a full backup of `source` onto `destination`
    fn run_full_backup(&self, source: &str, destination: &str) -> EngineRun;

    /// Register the recurring full and incremental runs described by
    /// the wizard state with the platform scheduler
    fn schedule_backups(&self, state: &WizardState, destination: &str) -> (bool, String);

    /// Most recent backup folder on `destination`, empty when none
    fn latest_backup_folder(&self, destination: &str) -> String;

    /// Backup versions available on `destination`, most recent first
    fn backup_versions(&self, destination: &str) -> VersionQuery;

    /// Recover `version_id` from `destination` onto `to_volume`
    fn start_recovery(
        &self,
        destination: &str,
        version_id: &str,
        from_volume: &str,
        to_volume: &str,
    ) -> EngineRun;

    /// Whether the engine targets a Windows-like platform ("C:" root
    /// volume, restart after recovery)
    fn windows_like(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_run_constructors() {
        let ok = EngineRun::success("done");
        assert!(ok.ok);
        assert_eq!(ok.stdout, "done");
        assert!(ok.stderr.is_empty());

        let failed = EngineRun::failure("exit 1", "partial output");
        assert!(!failed.ok);
        assert_eq!(failed.stderr, "exit 1");
        assert_eq!(failed.stdout, "partial output");
    }

    #[test]
    fn test_version_query_constructors() {
        let found = VersionQuery::found(vec![BackupVersion::new("v2"), BackupVersion::new("v1")]);
        assert!(found.ok);
        assert_eq!(found.versions[0].identifier, "v2");

        let failed = VersionQuery::failed("no catalog");
        assert!(!failed.ok);
        assert!(failed.versions.is_empty());
        assert_eq!(failed.output, "no catalog");
    }
}
