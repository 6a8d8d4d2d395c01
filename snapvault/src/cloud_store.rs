//! Contract to cloud storage (Azure Blob or S3)
//!
//! Transfers are async and long-running. Callers that want progress
//! pass a channel sender; the wizard core itself passes `None` and
//! waits for the final outcome only.

use async_channel::Sender;
use async_trait::async_trait;

use snapvault_common::{CloudBackupSetInfo, CloudStorageConfig};

/// A point-in-time progress report for one transfer
#[derive(Debug, Clone)]
pub struct TransferProgress {
    /// Short human-readable stage, e.g. "Uploading disk image"
    pub stage: String,
    pub bytes_done: u64,
    pub bytes_total: u64,
}

/// Cloud backend for backup set transfer and discovery
///
/// Expected failures are reported as `(false, message)`; the message
/// is shown to the user as-is.
#[async_trait]
pub trait CloudStorage: Send + Sync {
    /// Upload one finished backup folder from the destination drive
    async fn upload_backup_set(
        &self,
        destination_root: &str,
        backup_folder: &str,
        config: &CloudStorageConfig,
        progress: Option<Sender<TransferProgress>>,
    ) -> (bool, String);

    /// Download a backup set onto a local drive
    async fn download_backup_set(
        &self,
        set_id: &str,
        target_drive: &str,
        config: &CloudStorageConfig,
        progress: Option<Sender<TransferProgress>>,
    ) -> (bool, String);

    /// List the backup sets stored under the configured container or
    /// bucket
    async fn list_backup_sets(
        &self,
        config: &CloudStorageConfig,
    ) -> (bool, Vec<CloudBackupSetInfo>, String);
}
