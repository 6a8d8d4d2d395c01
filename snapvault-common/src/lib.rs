// Shared types and stores for SnapVault

pub mod cloud;
pub mod config_store;
pub mod drive;
pub mod format;
pub mod schedule;
pub mod state;
pub mod upload_log;
pub mod validation;

pub use cloud::{CloudBackupSetInfo, CloudProvider, CloudStorageConfig};
pub use config_store::{ConfigStore, SavedConfig};
pub use drive::DriveInfo;
pub use format::format_bytes;
pub use state::WizardState;
pub use upload_log::{UploadLog, UploadLogEntry};
