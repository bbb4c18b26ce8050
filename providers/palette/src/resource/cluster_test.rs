//! Unit tests for the libvirt cluster lifecycle
//!
//! Time is paused so the 30 s initial poll delay and 10 s interval elapse
//! instantly.

#[cfg(test)]
mod tests {
    use crate::config::ProviderConfig;
    use crate::error::ProviderError;
    use crate::mapper::expand_backup_policy;
    use crate::resource::*;
    use crate::test_utils::*;
    use palette_client::{ClusterBackupConfigEntity, MockPaletteClient, PaletteClientTrait, RecordedCall};
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    fn config() -> ProviderConfig {
        ProviderConfig::new("test-key")
    }

    fn mock() -> MockPaletteClient {
        MockPaletteClient::new("http://palette.test")
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_reads_back_declared_state() {
        let mock = mock();
        let mut spec = cluster_spec("edge-1", &[("worker", false, 2), ("cp", true, 1)]);
        spec.tags = ["env:prod".to_string(), "edge".to_string()].into_iter().collect();
        spec.backup_policy = Some(backup_policy());

        let state = create_libvirt_cluster(&mock, &config(), &CancellationToken::new(), &spec)
            .await
            .expect("create should succeed");

        assert!(!state.uid.is_empty());
        assert!(!state.cloud_config_id.is_empty());
        assert!(state.kubeconfig.as_deref().is_some_and(|k| k.contains("edge-1")));
        assert_eq!(state.tags, spec.tags);
        assert_eq!(state.backup_policy, spec.backup_policy);
        assert_eq!(state.scan_policy, None);
        let names: Vec<&str> = state.machine_pools.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["cp", "worker"]);

        assert_eq!(
            mock.calls(),
            vec![
                RecordedCall::CreateCluster {
                    name: "edge-1".to_string()
                },
                RecordedCall::GetClusterStatus { uid: state.uid.clone() },
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_rejects_invalid_declaration_before_any_call() {
        let mock = mock();
        let spec = cluster_spec("edge-1", &[("worker", false, 2)]);

        let err = create_libvirt_cluster(&mock, &config(), &CancellationToken::new(), &spec)
            .await
            .expect_err("a cluster without a control plane pool is invalid");

        assert!(matches!(err, ProviderError::Configuration(_)));
        assert!(mock.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_polls_until_running() {
        let mock = mock();
        let spec = cluster_spec("edge-1", &[("cp", true, 1)]);
        let uid = submit_libvirt_cluster(&mock, &spec).await.expect("submit should succeed");
        mock.script_cluster_states(&uid, &["Pending", "Provisioning", "Running"]);

        let report = wait_for_cluster_running(&mock, &config(), &CancellationToken::new(), "libvirt cluster 'edge-1'", &uid)
            .await
            .expect("cluster should become ready");

        assert_eq!(report.polls, 3);
        assert!(report.elapsed >= Duration::from_secs(30 + 2 * 10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_times_out_with_uid_in_error() {
        let mock = mock();
        let mut config = config();
        config.cluster_create_timeout = Duration::from_secs(3 * 60);

        let spec = cluster_spec("edge-1", &[("cp", true, 1)]);
        let uid = submit_libvirt_cluster(&mock, &spec).await.expect("submit should succeed");
        mock.set_cluster_state(&uid, "Provisioning");

        let err = wait_for_cluster_running(&mock, &config, &CancellationToken::new(), "libvirt cluster 'edge-1'", &uid)
            .await
            .expect_err("cluster never becomes ready");

        assert!(matches!(err, ProviderError::Timeout { ref last_state, .. } if last_state == "Provisioning"));
        assert!(err.to_string().contains(&uid));
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_timeout_keeps_cluster_uid() {
        let mock = mock();
        mock.set_initial_cluster_state("Provisioning");
        let mut config = config();
        config.cluster_create_timeout = Duration::from_secs(3 * 60);
        let spec = cluster_spec("edge-1", &[("cp", true, 1)]);

        let err = create_libvirt_cluster(&mock, &config, &CancellationToken::new(), &spec)
            .await
            .expect_err("cluster never becomes ready");

        assert!(matches!(err, ProviderError::NotReady { ref source, .. } if matches!(**source, ProviderError::Timeout { .. })));
        let uid = err.created_uid().expect("error should carry the cluster uid");
        assert_eq!(mock.calls()[0], RecordedCall::CreateCluster { name: "edge-1".to_string() });
        assert!(mock.calls().contains(&RecordedCall::GetClusterStatus { uid: uid.to_string() }));

        // The cluster is still there and can be re-read or deleted
        let state = read_libvirt_cluster(&mock, uid).await.expect("read should succeed");
        assert_eq!(state.map(|s| s.name), Some("edge-1".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_cluster_is_unexpected_state() {
        let mock = mock();
        let spec = cluster_spec("edge-1", &[("cp", true, 1)]);
        let uid = submit_libvirt_cluster(&mock, &spec).await.expect("submit should succeed");
        mock.script_cluster_states(&uid, &["Provisioning", "Failed"]);

        let err = wait_for_cluster_running(&mock, &config(), &CancellationToken::new(), "libvirt cluster 'edge-1'", &uid)
            .await
            .expect_err("failed cluster should stop the wait");

        assert!(matches!(err, ProviderError::UnexpectedState { ref state, .. } if state == "Failed"));
    }

    #[tokio::test]
    async fn test_read_missing_cluster_is_none() {
        let state = read_libvirt_cluster(&mock(), "missing").await.expect("read should succeed");
        assert!(state.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_update_applies_changes_in_order() {
        let mock = mock();
        let previous = cluster_spec("edge-1", &[("edge", true, 1), ("worker", false, 2)]);
        let created = create_libvirt_cluster(&mock, &config(), &CancellationToken::new(), &previous)
            .await
            .expect("create should succeed");
        mock.clear_calls();

        let mut spec = cluster_spec("edge-1", &[("worker", false, 3), ("control", true, 1)]);
        spec.cluster_profiles[0].id = "profile-2".to_string();
        spec.scan_policy = Some(scan_policy());
        spec.os_patch_on_boot = true;

        let state = update_libvirt_cluster(&mock, &created.uid, &previous, &spec)
            .await
            .expect("update should succeed");

        let config_uid = created.cloud_config_id.clone();
        assert_eq!(
            mock.calls(),
            vec![
                RecordedCall::CreateMachinePool {
                    config_uid: config_uid.clone(),
                    name: "control".to_string()
                },
                RecordedCall::UpdateMachinePool {
                    config_uid: config_uid.clone(),
                    name: "worker".to_string()
                },
                RecordedCall::DeleteMachinePool {
                    config_uid,
                    name: "edge".to_string()
                },
                RecordedCall::UpdateProfiles { uid: created.uid.clone() },
                RecordedCall::UpdateScan { uid: created.uid.clone() },
                RecordedCall::UpdateOsPatch { uid: created.uid.clone() },
            ]
        );

        assert_eq!(mock.cluster_profiles(&created.uid)[0].uid, "profile-2");
        assert_eq!(state.scan_policy, spec.scan_policy);
        assert!(state.os_patch_on_boot);
        let expected: Vec<_> = spec.ordered_machine_pools().into_iter().cloned().collect();
        assert_eq!(state.machine_pools, expected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_update_without_changes_makes_no_writes() {
        let mock = mock();
        let spec = cluster_spec("edge-1", &[("cp", true, 1), ("worker", false, 2)]);
        let created = create_libvirt_cluster(&mock, &config(), &CancellationToken::new(), &spec)
            .await
            .expect("create should succeed");
        mock.clear_calls();

        let state = update_libvirt_cluster(&mock, &created.uid, &spec, &spec)
            .await
            .expect("update should succeed");

        assert!(mock.calls().is_empty());
        assert_eq!(state, created);
    }

    #[tokio::test(start_paused = true)]
    async fn test_update_reverts_policy_drift() {
        let mock = mock();
        let mut spec = cluster_spec("edge-1", &[("cp", true, 1)]);
        spec.backup_policy = Some(backup_policy());
        spec.scan_policy = Some(scan_policy());
        let created = create_libvirt_cluster(&mock, &config(), &CancellationToken::new(), &spec)
            .await
            .expect("create should succeed");

        // Someone shortens the backup expiry outside the provider
        let mut edited = backup_policy();
        edited.expiry_in_hour = 1;
        mock.update_cluster_backup_config(
            &created.uid,
            &ClusterBackupConfigEntity {
                backup_config: expand_backup_policy(&edited),
            },
        )
        .await
        .expect("remote edit should succeed");
        mock.clear_calls();

        let state = update_libvirt_cluster(&mock, &created.uid, &spec, &spec)
            .await
            .expect("update should succeed");

        assert_eq!(mock.calls(), vec![RecordedCall::UpdateBackup { uid: created.uid.clone() }]);
        assert_eq!(state.backup_policy.map(|p| p.expiry_in_hour), Some(24));
        assert_eq!(state.scan_policy, spec.scan_policy);
    }

    #[tokio::test(start_paused = true)]
    async fn test_policies_cannot_be_destroyed() {
        let mock = mock();
        let mut previous = cluster_spec("edge-1", &[("cp", true, 1)]);
        previous.backup_policy = Some(backup_policy());
        previous.scan_policy = Some(scan_policy());
        let created = create_libvirt_cluster(&mock, &config(), &CancellationToken::new(), &previous)
            .await
            .expect("create should succeed");
        mock.clear_calls();

        let mut without_backup = previous.clone();
        without_backup.backup_policy = None;
        let err = update_libvirt_cluster(&mock, &created.uid, &previous, &without_backup)
            .await
            .expect_err("removing the backup policy should fail");
        assert!(err.to_string().contains("backup_policy cannot be destroyed"));

        let mut without_scan = previous.clone();
        without_scan.scan_policy = None;
        let err = update_libvirt_cluster(&mock, &created.uid, &previous, &without_scan)
            .await
            .expect_err("removing the scan policy should fail");
        assert!(err.to_string().contains("scan_policy cannot be destroyed"));

        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn test_update_rejects_replacement_fields() {
        let mock = mock();
        let previous = cluster_spec("edge-1", &[("cp", true, 1)]);

        let mut renamed = previous.clone();
        renamed.name = "edge-2".to_string();
        let err = update_libvirt_cluster(&mock, "c-1", &previous, &renamed)
            .await
            .expect_err("rename should be rejected");
        assert!(matches!(err, ProviderError::Configuration(ref m) if m.contains("name")));

        let mut moved = previous.clone();
        moved.cloud_config.vip = "192.168.100.16".to_string();
        let err = update_libvirt_cluster(&mock, "c-1", &previous, &moved)
            .await
            .expect_err("vip change should be rejected");
        assert!(matches!(err, ProviderError::Configuration(ref m) if m.contains("cloud_config")));
    }

    #[tokio::test]
    async fn test_update_of_deleted_cluster_is_not_found() {
        let spec = cluster_spec("edge-1", &[("cp", true, 1)]);
        let err = update_libvirt_cluster(&mock(), "gone", &spec, &spec)
            .await
            .expect_err("update of a missing cluster should fail");
        assert!(matches!(err, ProviderError::NotFound(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_delete_waits_until_gone() {
        let mock = mock();
        let spec = cluster_spec("edge-1", &[("cp", true, 1)]);
        let uid = submit_libvirt_cluster(&mock, &spec).await.expect("submit should succeed");
        mock.script_cluster_states(&uid, &["Deleting", "Deleting"]);
        mock.clear_calls();

        delete_libvirt_cluster(&mock, &config(), &CancellationToken::new(), &uid)
            .await
            .expect("delete should succeed");

        let status_calls = mock
            .calls()
            .iter()
            .filter(|c| matches!(c, RecordedCall::GetClusterStatus { .. }))
            .count();
        assert_eq!(status_calls, 3);
        assert!(read_libvirt_cluster(&mock, &uid).await.expect("read should succeed").is_none());
    }

    #[tokio::test]
    async fn test_delete_missing_cluster_succeeds() {
        let mock = mock();
        delete_libvirt_cluster(&mock, &config(), &CancellationToken::new(), "gone")
            .await
            .expect("deleting a missing cluster should succeed");
        assert_eq!(mock.calls(), vec![RecordedCall::DeleteCluster { uid: "gone".to_string() }]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delete_cancelled_while_waiting() {
        let mock = mock();
        let spec = cluster_spec("edge-1", &[("cp", true, 1)]);
        let uid = submit_libvirt_cluster(&mock, &spec).await.expect("submit should succeed");

        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = delete_libvirt_cluster(&mock, &config(), &cancel, &uid)
            .await
            .expect_err("cancelled wait should fail");

        assert!(matches!(err, ProviderError::Cancelled(_)));
        assert!(mock.calls().contains(&RecordedCall::DeleteCluster { uid }));
    }
}
