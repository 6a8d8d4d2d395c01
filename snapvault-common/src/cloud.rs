// Cloud storage configuration and backup set metadata

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Supported cloud storage backends
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CloudProvider {
    Azure,
    S3,
}

impl CloudProvider {
    pub fn as_str(&self) -> &str {
        match self {
            CloudProvider::Azure => "Azure",
            CloudProvider::S3 => "S3",
        }
    }
}

impl Default for CloudProvider {
    fn default() -> Self {
        Self::Azure
    }
}

/// Credentials and addressing for one cloud container or bucket
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CloudStorageConfig {
    #[serde(default)]
    pub provider: CloudProvider,

    /// Endpoint host for Azure, region for S3; optional for both
    #[serde(default)]
    pub endpoint_or_region: String,

    /// Container (Azure) or bucket (S3) holding the backup sets
    #[serde(default)]
    pub container_or_bucket: String,

    /// Storage account name (Azure) or access key id (S3)
    #[serde(default)]
    pub account_name_or_key_id: String,

    /// Account key (Azure) or secret access key (S3)
    #[serde(default)]
    pub secret_key: String,

    #[serde(default = "default_true")]
    pub use_https: bool,
}

fn default_true() -> bool {
    true
}

impl Default for CloudStorageConfig {
    fn default() -> Self {
        Self {
            provider: CloudProvider::default(),
            endpoint_or_region: String::new(),
            container_or_bucket: String::new(),
            account_name_or_key_id: String::new(),
            secret_key: String::new(),
            use_https: true,
        }
    }
}

/// One backup set as listed from cloud storage
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CloudBackupSetInfo {
    /// Stable identifier used to download the set
    pub id: String,

    /// Human-readable name shown in the restore picker
    pub display_name: String,

    /// Whether the set is an incremental on top of an earlier full
    #[serde(default)]
    pub incremental: bool,

    /// When the set was created
    pub date: DateTime<Utc>,
}

impl CloudBackupSetInfo {
    pub fn type_label(&self) -> &str {
        if self.incremental { "Incremental" } else { "Full" }
    }

    /// Picker line: name, type and creation time
    pub fn display_line(&self) -> String {
        format!(
            "{} — {} — {}",
            self.display_name,
            self.type_label(),
            self.date.format("%Y-%m-%d %H:%M:%S")
        )
    }
}
