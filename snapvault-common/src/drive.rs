// Drive descriptors shared between the wizard and its drive provider

use serde::{Deserialize, Serialize};

use crate::format::format_bytes;

/// A fixed drive as reported by the platform drive provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DriveInfo {
    /// Platform drive name (e.g., "C:\\" or "/dev/sda2")
    pub name: String,

    /// Volume label, empty when the filesystem has none
    #[serde(default)]
    pub volume_label: String,

    /// Filesystem type (NTFS, ext4, ...)
    #[serde(default)]
    pub file_system: String,

    /// Total capacity in bytes
    pub total_bytes: u64,

    /// Currently free bytes
    pub free_bytes: u64,
}

impl DriveInfo {
    pub fn used_bytes(&self) -> u64 {
        self.total_bytes.saturating_sub(self.free_bytes)
    }

    /// Name with the volume label when one exists
    pub fn display_name(&self) -> String {
        if self.volume_label.trim().is_empty() {
            self.name.clone()
        } else {
            format!("{} ({})", self.name, self.volume_label)
        }
    }

    /// One-line description for drive pickers
    pub fn display_line(&self) -> String {
        format!(
            "{} — {} free of {}",
            self.display_name(),
            format_bytes(self.free_bytes),
            format_bytes(self.total_bytes)
        )
    }

    /// Case-insensitive name comparison, used to keep source and
    /// destination distinct
    pub fn same_drive(&self, other: &DriveInfo) -> bool {
        self.name.eq_ignore_ascii_case(&other.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drive(name: &str, label: &str) -> DriveInfo {
        DriveInfo {
            name: name.to_string(),
            volume_label: label.to_string(),
            file_system: "NTFS".to_string(),
            total_bytes: 500 * 1024 * 1024 * 1024,
            free_bytes: 200 * 1024 * 1024 * 1024,
        }
    }

    #[test]
    fn test_display_name_with_label() {
        assert_eq!(drive("D:\\", "Vault").display_name(), "D:\\ (Vault)");
    }

    #[test]
    fn test_display_name_without_label() {
        assert_eq!(drive("D:\\", "  ").display_name(), "D:\\");
    }

    #[test]
    fn test_display_line() {
        let line = drive("D:\\", "Vault").display_line();
        assert_eq!(line, "D:\\ (Vault) — 200.00 GiB free of 500.00 GiB");
    }

    #[test]
    fn test_used_bytes_saturates() {
        let mut d = drive("D:\\", "");
        d.free_bytes = d.total_bytes + 1;
        assert_eq!(d.used_bytes(), 0);
    }

    #[test]
    fn test_same_drive_ignores_case() {
        assert!(drive("c:\\", "").same_drive(&drive("C:\\", "Sys")));
        assert!(!drive("C:\\", "").same_drive(&drive("D:\\", "")));
    }
}
