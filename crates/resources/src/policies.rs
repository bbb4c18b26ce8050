//! Cluster backup and compliance scan policies

use crate::error::ValidationError;
use crate::require;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

fn default_true() -> bool {
    true
}

/// Scheduled cluster backup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BackupPolicySpec {
    /// Prefix of the backup names
    pub prefix: String,

    /// Uid of the backup location
    pub backup_location_id: String,

    /// Cron schedule
    pub schedule: String,

    /// Retention in hours
    pub expiry_in_hour: i64,

    #[serde(default = "default_true")]
    pub include_disks: bool,

    #[serde(default = "default_true")]
    pub include_cluster_resources: bool,

    /// Namespaces to back up (empty means all)
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub namespaces: BTreeSet<String>,
}

/// Compliance scan schedules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ScanPolicySpec {
    pub configuration_scan_schedule: String,
    pub penetration_scan_schedule: String,
    pub conformance_scan_schedule: String,
}

impl BackupPolicySpec {
    pub fn validate_in(&self, resource: &str) -> Result<(), ValidationError> {
        require(resource, "backup_policy.prefix", &self.prefix)?;
        require(resource, "backup_policy.backup_location_id", &self.backup_location_id)?;
        require(resource, "backup_policy.schedule", &self.schedule)?;
        if self.expiry_in_hour <= 0 {
            return Err(ValidationError::invalid(
                resource,
                format!("backup_policy.expiry_in_hour must be positive, got {}", self.expiry_in_hour),
            ));
        }
        Ok(())
    }
}

impl ScanPolicySpec {
    pub fn validate_in(&self, resource: &str) -> Result<(), ValidationError> {
        require(resource, "scan_policy.configuration_scan_schedule", &self.configuration_scan_schedule)?;
        require(resource, "scan_policy.penetration_scan_schedule", &self.penetration_scan_schedule)?;
        require(resource, "scan_policy.conformance_scan_schedule", &self.conformance_scan_schedule)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backup_defaults() {
        let yaml = r#"
prefix: daily
backup_location_id: loc-1
schedule: "0 0 * * *"
expiry_in_hour: 24
"#;
        let policy: BackupPolicySpec = serde_yaml::from_str(yaml).expect("policy should parse");
        assert!(policy.include_disks);
        assert!(policy.include_cluster_resources);
        assert!(policy.namespaces.is_empty());
        assert!(policy.validate_in("cluster 'c'").is_ok());
    }

    #[test]
    fn test_backup_expiry_must_be_positive() {
        let policy = BackupPolicySpec {
            prefix: "daily".to_string(),
            backup_location_id: "loc-1".to_string(),
            schedule: "0 0 * * *".to_string(),
            expiry_in_hour: 0,
            include_disks: true,
            include_cluster_resources: true,
            namespaces: BTreeSet::new(),
        };
        assert!(policy.validate_in("cluster 'c'").is_err());
    }

    #[test]
    fn test_scan_schedules_required() {
        let policy = ScanPolicySpec {
            configuration_scan_schedule: "0 0 * * SUN".to_string(),
            penetration_scan_schedule: String::new(),
            conformance_scan_schedule: "0 0 1 * *".to_string(),
        };
        let err = policy.validate_in("cluster 'c'").expect_err("empty schedule should fail");
        assert!(matches!(err, ValidationError::EmptyField { .. }));
    }
}
