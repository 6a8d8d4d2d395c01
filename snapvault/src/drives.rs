// Contract to platform drive enumeration

use snapvault_common::DriveInfo;

/// Source of selectable drives and backup size estimates
pub trait DriveProvider: Send + Sync {
    /// Fixed drives currently available for selection
    fn drives(&self) -> Vec<DriveInfo>;

    /// Estimated size of a full backup of `drive`, in bytes
    fn estimate_backup_size(&self, drive: &DriveInfo) -> u64;
}
