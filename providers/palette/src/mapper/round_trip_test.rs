//! Randomised round-trip tests: for every valid declaration, flattening what
//! the API echoes back for its expanded form reproduces the declaration.

#[cfg(test)]
mod tests {
    use crate::mapper::{expand_libvirt_cluster, expand_project, flatten_libvirt_cluster, flatten_project};
    use crate::reconciler::plan_machine_pools;
    use crate::test_utils::{echo_cluster, random_cluster_spec, random_project_spec};
    use palette_client::{Project, ProjectStatus};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use resources::Validate;

    const ITERATIONS: usize = 300;

    #[test]
    fn test_project_round_trip() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..ITERATIONS {
            let spec = random_project_spec(&mut rng);
            spec.validate().expect("generated project should be valid");
            let entity = expand_project(&spec, "").expect("project should expand");
            let echoed = Project {
                metadata: entity.metadata,
                status: ProjectStatus::default(),
            };

            assert_eq!(flatten_project(&echoed).spec, spec);
        }
    }

    #[test]
    fn test_cluster_round_trip() {
        let mut rng = StdRng::seed_from_u64(0xc1a5);
        for i in 0..ITERATIONS {
            let spec = random_cluster_spec(&mut rng);
            spec.validate().expect("generated cluster should be valid");
            let entity = expand_libvirt_cluster(&spec, "").expect("cluster should expand");
            let state = flatten_libvirt_cluster(&echo_cluster(&entity, &format!("c-{}", i), &format!("cc-{}", i)));

            assert_eq!(state.uid, format!("c-{}", i));
            assert_eq!(state.cloud_config_id, format!("cc-{}", i));
            assert_eq!(state.name, spec.name);
            assert_eq!(state.tags, spec.tags);
            assert_eq!(state.os_patch_on_boot, spec.os_patch_on_boot);
            assert_eq!(state.os_patch_schedule, spec.os_patch_schedule);
            assert_eq!(state.os_patch_after, spec.os_patch_after);
            assert_eq!(state.backup_policy, spec.backup_policy);
            assert_eq!(state.scan_policy, spec.scan_policy);

            let expected: Vec<_> = spec.ordered_machine_pools().into_iter().cloned().collect();
            assert_eq!(state.machine_pools, expected, "pools of {} did not round trip", spec.name);
        }
    }

    #[test]
    fn test_echoed_pools_plan_nothing() {
        let mut rng = StdRng::seed_from_u64(0x1de4);
        for _ in 0..ITERATIONS {
            let spec = random_cluster_spec(&mut rng);
            spec.validate().expect("generated cluster should be valid");
            let entity = expand_libvirt_cluster(&spec, "").expect("cluster should expand");
            let observed = echo_cluster(&entity, "c-1", "cc-1");

            let plan = plan_machine_pools(&spec, &observed.cloud_config).expect("plan should succeed");
            assert!(plan.is_empty(), "unexpected operations for {}: {:?}", spec.name, plan.operations());
            assert_eq!(plan.unchanged().len(), spec.machine_pools.len());
        }
    }
}
