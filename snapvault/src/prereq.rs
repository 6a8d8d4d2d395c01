//! Startup prerequisite check
//!
//! The engine and the cloud tooling lean on platform software that may
//! not be installed. At startup the probe reports what is missing and
//! how each item can be installed; installs run one at a time with
//! progress lines streamed back to the frontend.

use std::sync::Arc;

use async_channel::Sender;
use serde::{Deserialize, Serialize};

/// A required piece of software that may be missing, with install
/// actions
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PrerequisiteItem {
    pub name: String,
    pub description: String,
    pub missing: bool,

    /// Command that triggers the install, e.g. `xcode-select`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install_command: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install_arguments: Option<String>,

    /// Page to open for a manual install
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,

    #[serde(default = "default_install_label")]
    pub install_button_label: String,
}

fn default_install_label() -> String {
    "Install".to_string()
}

impl PrerequisiteItem {
    pub fn installable(&self) -> bool {
        self.install_command.is_some()
    }
}

/// Platform probe behind the prerequisite screen
pub trait PrerequisiteProbe: Send + Sync {
    /// Every known prerequisite with its current missing flag
    fn check_all(&self) -> Vec<PrerequisiteItem>;

    /// Try to install one item, sending progress lines as it goes.
    /// Returns `(success, error)`.
    fn try_install(
        &self,
        item: &PrerequisiteItem,
        progress: Option<Sender<String>>,
    ) -> (bool, Option<String>);
}

/// Items the startup dialog needs to show, in probe order
pub fn missing_prerequisites(probe: &dyn PrerequisiteProbe) -> Vec<PrerequisiteItem> {
    probe
        .check_all()
        .into_iter()
        .filter(|item| item.missing)
        .collect()
}

/// Run one install off-thread and return the final status line
pub async fn run_install(
    probe: Arc<dyn PrerequisiteProbe>,
    item: PrerequisiteItem,
    progress: Option<Sender<String>>,
) -> String {
    if let Some(progress) = &progress {
        progress.send(String::from("Starting...")).await.ok();
    }

    let handle = tokio::task::spawn_blocking(move || probe.try_install(&item, progress));
    let (success, error) = match handle.await {
        Ok(result) => result,
        Err(err) => (false, Some(err.to_string())),
    };

    if success {
        "Done. You may need to restart the app for changes to take effect.".to_string()
    } else {
        format!("Failed: {}", error.unwrap_or_else(|| "Unknown error".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedProbe {
        items: Vec<PrerequisiteItem>,
        install_ok: bool,
        install_error: Option<String>,
    }

    impl PrerequisiteProbe for FixedProbe {
        fn check_all(&self) -> Vec<PrerequisiteItem> {
            self.items.clone()
        }

        fn try_install(
            &self,
            item: &PrerequisiteItem,
            progress: Option<Sender<String>>,
        ) -> (bool, Option<String>) {
            if let Some(progress) = progress {
                progress
                    .send_blocking(format!("Installing {}...", item.name))
                    .ok();
            }
            (self.install_ok, self.install_error.clone())
        }
    }

    fn item(name: &str, missing: bool) -> PrerequisiteItem {
        PrerequisiteItem {
            name: name.to_string(),
            description: format!("{name} support"),
            missing,
            install_command: Some("pkexec".to_string()),
            ..PrerequisiteItem::default()
        }
    }

    #[test]
    fn test_missing_filter_keeps_probe_order() {
        let probe = FixedProbe {
            items: vec![item("rsync", true), item("cron", false), item("curl", true)],
            install_ok: true,
            install_error: None,
        };
        let missing = missing_prerequisites(&probe);
        assert_eq!(missing.len(), 2);
        assert_eq!(missing[0].name, "rsync");
        assert_eq!(missing[1].name, "curl");
    }

    #[test]
    fn test_deserialized_item_gets_default_button_label() {
        let parsed: PrerequisiteItem =
            serde_json::from_str(r#"{"name":"rsync","description":"","missing":true}"#).unwrap();
        assert_eq!(parsed.install_button_label, "Install");
        assert!(!parsed.installable());
    }

    #[tokio::test]
    async fn test_install_reports_progress_then_final_status() {
        let probe: Arc<dyn PrerequisiteProbe> = Arc::new(FixedProbe {
            items: Vec::new(),
            install_ok: true,
            install_error: None,
        });
        let (sender, receiver) = async_channel::unbounded();

        let status = run_install(probe, item("rsync", true), Some(sender)).await;
        assert_eq!(
            status,
            "Done. You may need to restart the app for changes to take effect."
        );
        assert_eq!(receiver.recv().await.unwrap(), "Starting...");
        assert_eq!(receiver.recv().await.unwrap(), "Installing rsync...");
    }

    #[tokio::test]
    async fn test_failed_install_reports_error_or_unknown() {
        let probe: Arc<dyn PrerequisiteProbe> = Arc::new(FixedProbe {
            items: Vec::new(),
            install_ok: false,
            install_error: Some("permission denied".to_string()),
        });
        let status = run_install(probe, item("rsync", true), None).await;
        assert_eq!(status, "Failed: permission denied");

        let probe: Arc<dyn PrerequisiteProbe> = Arc::new(FixedProbe {
            items: Vec::new(),
            install_ok: false,
            install_error: None,
        });
        let status = run_install(probe, item("rsync", true), None).await;
        assert_eq!(status, "Failed: Unknown error");
    }
}
