//! Wizard field validation
//!
//! Step validity is recomputed from these checks on every navigation
//! attempt; nothing here mutates state or touches the platform.

use crate::cloud::CloudStorageConfig;
use crate::drive::DriveInfo;

/// True when the string is empty or whitespace only
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Validate that a cloud configuration carries every required credential
///
/// Endpoint/region is optional for both providers; container, account
/// and secret are required.
pub fn validate_cloud_config(config: &CloudStorageConfig) -> Result<(), String> {
    if is_blank(&config.container_or_bucket) {
        return Err("Container or bucket name is required".to_string());
    }

    if is_blank(&config.account_name_or_key_id) {
        return Err("Account name or access key id is required".to_string());
    }

    if is_blank(&config.secret_key) {
        return Err("Secret key is required".to_string());
    }

    Ok(())
}

/// True when a usable cloud configuration is present
pub fn cloud_config_complete(config: Option<&CloudStorageConfig>) -> bool {
    config.is_some_and(|c| validate_cloud_config(c).is_ok())
}

/// True when the destination can hold the estimated backup
pub fn destination_has_space(destination: &DriveInfo, estimated_bytes: u64) -> bool {
    destination.free_bytes >= estimated_bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_config() -> CloudStorageConfig {
        CloudStorageConfig {
            container_or_bucket: "vault".to_string(),
            account_name_or_key_id: "snapaccount".to_string(),
            secret_key: "s3cret".to_string(),
            ..CloudStorageConfig::default()
        }
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(""));
        assert!(is_blank("   "));
        assert!(is_blank("\t\n"));
        assert!(!is_blank("x"));
        assert!(!is_blank("  x  "));
    }

    #[test]
    fn test_complete_config_passes() {
        assert!(validate_cloud_config(&complete_config()).is_ok());
        assert!(cloud_config_complete(Some(&complete_config())));
    }

    #[test]
    fn test_blank_container_fails() {
        let mut config = complete_config();
        config.container_or_bucket = "  ".to_string();
        assert!(validate_cloud_config(&config).is_err());
    }

    #[test]
    fn test_blank_account_fails() {
        let mut config = complete_config();
        config.account_name_or_key_id = String::new();
        assert!(validate_cloud_config(&config).is_err());
    }

    #[test]
    fn test_blank_secret_key_fails() {
        let mut config = complete_config();
        config.secret_key = "   ".to_string();
        let err = validate_cloud_config(&config).unwrap_err();
        assert!(err.contains("Secret key"));
        assert!(!cloud_config_complete(Some(&config)));
    }

    #[test]
    fn test_endpoint_is_optional() {
        let mut config = complete_config();
        config.endpoint_or_region = String::new();
        assert!(validate_cloud_config(&config).is_ok());
    }

    #[test]
    fn test_missing_config_is_incomplete() {
        assert!(!cloud_config_complete(None));
    }

    #[test]
    fn test_destination_space() {
        let gib = 1024 * 1024 * 1024;
        let destination = DriveInfo {
            name: "D:\\".to_string(),
            volume_label: String::new(),
            file_system: "NTFS".to_string(),
            total_bytes: 1000 * gib,
            free_bytes: 400 * gib,
        };

        // 500 GiB estimate does not fit in 400 GiB free
        assert!(!destination_has_space(&destination, 500 * gib));
        // Exact fit counts as valid
        assert!(destination_has_space(&destination, 400 * gib));
        assert!(destination_has_space(&destination, 100 * gib));
    }
}
