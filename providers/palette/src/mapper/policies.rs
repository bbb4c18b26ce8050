//! Backup and compliance scan policy mapping

use palette_client::{
    ClusterBackupConfig, ClusterComplianceScanConfig, ClusterFeatureSchedule, ComplianceScanDriver, ScanScheduleEntity,
    CONFIGURATION_SCAN_DRIVER, CONFORMANCE_SCAN_DRIVER, PENETRATION_SCAN_DRIVER,
};
use resources::{BackupPolicySpec, ScanPolicySpec};
use std::collections::BTreeMap;

fn schedule(cron: &str) -> ClusterFeatureSchedule {
    ClusterFeatureSchedule {
        scheduled_run_time: cron.to_string(),
    }
}

pub fn expand_backup_policy(policy: &BackupPolicySpec) -> ClusterBackupConfig {
    ClusterBackupConfig {
        backup_location_uid: policy.backup_location_id.clone(),
        backup_prefix: policy.prefix.clone(),
        duration_in_hours: policy.expiry_in_hour,
        include_all_disks: policy.include_disks,
        include_cluster_resources: policy.include_cluster_resources,
        namespaces: policy.namespaces.iter().cloned().collect(),
        schedule: schedule(&policy.schedule),
    }
}

pub fn flatten_backup_policy(config: &ClusterBackupConfig) -> BackupPolicySpec {
    BackupPolicySpec {
        prefix: config.backup_prefix.clone(),
        backup_location_id: config.backup_location_uid.clone(),
        schedule: config.schedule.scheduled_run_time.clone(),
        expiry_in_hour: config.duration_in_hours,
        include_disks: config.include_all_disks,
        include_cluster_resources: config.include_cluster_resources,
        namespaces: config.namespaces.iter().cloned().collect(),
    }
}

pub fn expand_scan_policy(policy: &ScanPolicySpec) -> ClusterComplianceScanConfig {
    ClusterComplianceScanConfig {
        configuration_scan: ScanScheduleEntity {
            schedule: schedule(&policy.configuration_scan_schedule),
        },
        penetration_scan: ScanScheduleEntity {
            schedule: schedule(&policy.penetration_scan_schedule),
        },
        conformance_scan: ScanScheduleEntity {
            schedule: schedule(&policy.conformance_scan_schedule),
        },
    }
}

/// Scan schedules from the per-driver view the API returns
pub fn flatten_scan_policy(drivers: &BTreeMap<String, ComplianceScanDriver>) -> ScanPolicySpec {
    let schedule_of = |driver: &str| {
        drivers
            .get(driver)
            .map(|d| d.config.schedule.scheduled_run_time.clone())
            .unwrap_or_default()
    };

    ScanPolicySpec {
        configuration_scan_schedule: schedule_of(CONFIGURATION_SCAN_DRIVER),
        penetration_scan_schedule: schedule_of(PENETRATION_SCAN_DRIVER),
        conformance_scan_schedule: schedule_of(CONFORMANCE_SCAN_DRIVER),
    }
}
