//! Rescue script preparation
//!
//! A full system restore runs outside the wizard, from live media.
//! This module prepares that: it normalizes the user's idea of where
//! the backup lives into the real backup root, lets them pick a
//! backup folder (or the latest), and writes a standalone restore
//! script plus a plain-text instruction sheet onto a USB drive.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

/// Directory name the backup engine creates on the destination
pub const BACKUP_DIR_NAME: &str = "SnapVault";

/// Folder choice meaning "restore the most recent backup"
pub const LATEST_CHOICE: &str = "(Latest)";

/// Resolve the backup root from whatever the user typed
///
/// Accepts a drive or any path above the backup directory and appends
/// the directory name unless it is already there. Blank input stays
/// blank.
pub fn backup_root_for(user_path: &str) -> String {
    let trimmed = user_path.trim().trim_end_matches(['/', '\\']);
    if trimmed.is_empty() {
        return String::new();
    }
    if trimmed.to_lowercase().ends_with(&BACKUP_DIR_NAME.to_lowercase()) {
        trimmed.to_string()
    } else {
        Path::new(trimmed)
            .join(BACKUP_DIR_NAME)
            .to_string_lossy()
            .into_owned()
    }
}

/// Produces the restore script and its companion instructions
pub trait RescueScripter: Send + Sync {
    /// Backup folder names under `backup_root` as `(ok, folders,
    /// output)`; `output` carries diagnostics on failure
    fn backup_folders(&self, backup_root: &str) -> (bool, Vec<String>, String);

    /// Standalone restore script for one backup folder, or the most
    /// recent one when `backup_folder` is `None`
    fn generate_script(
        &self,
        backup_root: &str,
        backup_folder: Option<&str>,
        target: &str,
    ) -> String;

    /// Instruction sheet naming the script file to run
    fn instructions(&self, script_file_name: &str) -> String;

    fn script_file_name(&self) -> &str;

    fn instructions_file_name(&self) -> &str;

    /// Suggested restore target mount point for the platform
    fn default_target(&self) -> &str;
}

/// A generated script with everything needed to save it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RescuePlan {
    pub script_name: String,
    pub script: String,
    pub instructions_name: String,
    pub instructions: String,
}

impl RescuePlan {
    /// Write script and instructions next to each other under `dir`
    /// and return the status line to show
    pub fn save_to_dir(&self, dir: &Path) -> Result<String> {
        let script_path = dir.join(&self.script_name);
        fs::write(&script_path, &self.script)
            .with_context(|| format!("Failed to write {}", script_path.display()))?;

        let instructions_path = dir.join(&self.instructions_name);
        fs::write(&instructions_path, &self.instructions)
            .with_context(|| format!("Failed to write {}", instructions_path.display()))?;

        log::info!("Saved rescue script to {}", script_path.display());
        Ok(format!(
            "Script and instructions saved to: {}\nInsert this USB when you boot from live media and run: sudo ./{}",
            dir.display(),
            self.script_name
        ))
    }
}

/// Drives the scripter from user input, with the status messages the
/// rescue screen shows
pub struct RescuePlanner {
    scripter: Arc<dyn RescueScripter>,
}

impl RescuePlanner {
    pub fn new(scripter: Arc<dyn RescueScripter>) -> Self {
        Self { scripter }
    }

    pub fn default_target(&self) -> String {
        self.scripter.default_target().to_string()
    }

    /// Choices for the folder selector, the latest sentinel first
    ///
    /// `Err` carries the placeholder to show instead of a list.
    pub fn folder_choices(&self, user_path: &str) -> Result<Vec<String>, String> {
        let root = backup_root_for(user_path);
        if root.is_empty() {
            return Err("Enter backup path above, then select (or use Latest)".to_string());
        }

        let (ok, folders, _) = self.scripter.backup_folders(&root);
        if ok && !folders.is_empty() {
            let mut choices = vec![LATEST_CHOICE.to_string()];
            choices.extend(folders);
            Ok(choices)
        } else {
            Err(
                "No backup folders found, or path invalid. Use Latest when running from live media."
                    .to_string(),
            )
        }
    }

    /// Build the script and instructions for the entered paths
    pub fn generate(
        &self,
        user_path: &str,
        folder_choice: Option<&str>,
        target: &str,
    ) -> Result<RescuePlan, String> {
        let root = backup_root_for(user_path);
        if root.is_empty() {
            return Err(
                "Enter the backup location (drive or path that contains your SnapVault backup)."
                    .to_string(),
            );
        }
        let target = target.trim();
        if target.is_empty() {
            return Err(
                "Enter the restore target path (e.g. /mnt/root or /Volumes/Macintosh HD)."
                    .to_string(),
            );
        }

        let backup_folder =
            folder_choice.filter(|choice| !choice.eq_ignore_ascii_case(LATEST_CHOICE));

        let script = self.scripter.generate_script(&root, backup_folder, target);
        let instructions = self
            .scripter
            .instructions(self.scripter.script_file_name());

        Ok(RescuePlan {
            script_name: self.scripter.script_file_name().to_string(),
            script,
            instructions_name: self.scripter.instructions_file_name().to_string(),
            instructions,
        })
    }

    /// Instructions shown before anything is generated
    pub fn instructions_preview(&self) -> String {
        self.scripter
            .instructions(self.scripter.script_file_name())
    }
}

/// Scripter for Linux and macOS live media
///
/// The script is plain POSIX sh with no dependency beyond rsync, so
/// it runs on installer images as-is.
pub struct PosixRescueScripter {
    macos: bool,
}

impl PosixRescueScripter {
    pub fn new(macos: bool) -> Self {
        Self { macos }
    }

    fn rsync_flags(&self) -> &'static str {
        // Linux keeps ACLs and xattrs; macOS rsync takes -E instead
        if self.macos { "-aHE" } else { "-aHAX" }
    }
}

impl RescueScripter for PosixRescueScripter {
    fn backup_folders(&self, backup_root: &str) -> (bool, Vec<String>, String) {
        let entries = match fs::read_dir(backup_root) {
            Ok(entries) => entries,
            Err(err) => return (false, Vec::new(), err.to_string()),
        };

        let mut folders: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_dir())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        folders.sort();
        (true, folders, String::new())
    }

    fn generate_script(
        &self,
        backup_root: &str,
        backup_folder: Option<&str>,
        target: &str,
    ) -> String {
        format!(
            r#"#!/bin/sh
# SnapVault full system restore
# Run from live media: sudo ./{script}
set -eu

BACKUP_ROOT="{root}"
BACKUP_FOLDER="{folder}"
TARGET="{target}"

if [ -z "$BACKUP_FOLDER" ]; then
    BACKUP_FOLDER=$(ls -1 "$BACKUP_ROOT" | sort | tail -n 1)
fi
if [ ! -d "$BACKUP_ROOT/$BACKUP_FOLDER" ]; then
    echo "Backup folder not found: $BACKUP_ROOT/$BACKUP_FOLDER" >&2
    exit 1
fi

echo "Restoring $BACKUP_ROOT/$BACKUP_FOLDER onto $TARGET"
rsync {flags} --numeric-ids --delete "$BACKUP_ROOT/$BACKUP_FOLDER/" "$TARGET/"
echo "Restore finished. Reinstall the bootloader if needed, then reboot."
"#,
            script = self.script_file_name(),
            root = backup_root,
            folder = backup_folder.unwrap_or(""),
            target = target,
            flags = self.rsync_flags(),
        )
    }

    fn instructions(&self, script_file_name: &str) -> String {
        let target = self.default_target();
        format!(
            "SnapVault full system restore\n\
             =============================\n\n\
             1. Boot the machine from live media (USB installer or live Linux).\n\
             2. Mount the drive that holds your SnapVault backup.\n\
             3. Mount the restore target (e.g. {target}).\n\
             4. Open a terminal in the folder containing {script_file_name} and run:\n\
             \x20\x20\x20\x20sudo ./{script_file_name}\n\
             5. Reboot into the restored system when the script finishes.\n\n\
             The script restores the selected backup folder, or the most\n\
             recent one when none was selected.\n"
        )
    }

    fn script_file_name(&self) -> &str {
        "snapvault-restore.sh"
    }

    fn instructions_file_name(&self) -> &str {
        "RESTORE-README.txt"
    }

    fn default_target(&self) -> &str {
        if self.macos {
            "/Volumes/Macintosh HD"
        } else {
            "/mnt/root"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn planner() -> RescuePlanner {
        RescuePlanner::new(Arc::new(PosixRescueScripter::new(false)))
    }

    #[test]
    fn test_backup_root_appends_directory_name() {
        assert_eq!(backup_root_for("/mnt/usb"), "/mnt/usb/SnapVault");
        assert_eq!(backup_root_for("/mnt/usb/"), "/mnt/usb/SnapVault");
        assert_eq!(backup_root_for("  /mnt/usb  "), "/mnt/usb/SnapVault");
    }

    #[test]
    fn test_backup_root_keeps_existing_suffix() {
        assert_eq!(backup_root_for("/mnt/usb/SnapVault"), "/mnt/usb/SnapVault");
        assert_eq!(backup_root_for("/mnt/usb/snapvault/"), "/mnt/usb/snapvault");
    }

    #[test]
    fn test_backup_root_blank_stays_blank() {
        assert_eq!(backup_root_for(""), "");
        assert_eq!(backup_root_for("   "), "");
        assert_eq!(backup_root_for("/"), "");
    }

    #[test]
    fn test_folder_choices_lists_latest_first() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("SnapVault");
        fs::create_dir_all(root.join("2026-01-03 Full")).unwrap();
        fs::create_dir_all(root.join("2026-01-05 Incremental")).unwrap();
        fs::write(root.join("manifest.json"), "{}").unwrap();

        let choices = planner()
            .folder_choices(&dir.path().to_string_lossy())
            .unwrap();
        assert_eq!(
            choices,
            vec![
                "(Latest)".to_string(),
                "2026-01-03 Full".to_string(),
                "2026-01-05 Incremental".to_string(),
            ]
        );
    }

    #[test]
    fn test_folder_choices_placeholders() {
        let err = planner().folder_choices("").unwrap_err();
        assert_eq!(err, "Enter backup path above, then select (or use Latest)");

        let err = planner().folder_choices("/nonexistent").unwrap_err();
        assert!(err.starts_with("No backup folders found"));
    }

    #[test]
    fn test_generate_validates_both_paths() {
        let err = planner().generate("", None, "/mnt/root").unwrap_err();
        assert!(err.starts_with("Enter the backup location"));

        let err = planner().generate("/mnt/usb", None, "   ").unwrap_err();
        assert!(err.starts_with("Enter the restore target path"));
    }

    #[test]
    fn test_preview_matches_generated_instructions() {
        let planner = planner();
        assert_eq!(planner.default_target(), "/mnt/root");

        let plan = planner.generate("/mnt/usb", None, "/mnt/root").unwrap();
        assert_eq!(planner.instructions_preview(), plan.instructions);
        assert!(plan.instructions.contains("sudo ./snapvault-restore.sh"));
    }

    #[test]
    fn test_latest_choice_resolves_to_newest_at_runtime() {
        let plan = planner()
            .generate("/mnt/usb", Some("(Latest)"), "/mnt/root")
            .unwrap();
        assert!(plan.script.contains("BACKUP_FOLDER=\"\""));
        assert!(plan.script.contains("BACKUP_ROOT=\"/mnt/usb/SnapVault\""));

        let plan = planner()
            .generate("/mnt/usb", Some("2026-01-05 Incremental"), "/mnt/root")
            .unwrap();
        assert!(plan.script.contains("BACKUP_FOLDER=\"2026-01-05 Incremental\""));
    }

    #[test]
    fn test_save_to_dir_writes_both_files() {
        let dir = tempdir().unwrap();
        let plan = planner().generate("/mnt/usb", None, "/mnt/root").unwrap();

        let status = plan.save_to_dir(dir.path()).unwrap();
        assert!(status.starts_with(&format!(
            "Script and instructions saved to: {}",
            dir.path().display()
        )));
        assert!(status.ends_with("run: sudo ./snapvault-restore.sh"));

        let script = fs::read_to_string(dir.path().join("snapvault-restore.sh")).unwrap();
        assert!(script.starts_with("#!/bin/sh"));
        let instructions = fs::read_to_string(dir.path().join("RESTORE-README.txt")).unwrap();
        assert!(instructions.contains("sudo ./snapvault-restore.sh"));
    }

    #[test]
    fn test_macos_scripter_differs_in_flags_and_target() {
        let scripter = PosixRescueScripter::new(true);
        assert_eq!(scripter.default_target(), "/Volumes/Macintosh HD");
        let script =
            scripter.generate_script("/Volumes/Backup/SnapVault", None, "/Volumes/Macintosh HD");
        assert!(script.contains("rsync -aHE"));
    }
}
