// ABOUTME: Tests for compensating rollback after a failed deployment step.
// ABOUTME: Verifies LIFO order, best-effort execution and what is left behind.

mod support;

use edgesite::deploy::{Compensation, DeployErrorKind, Orchestrator, Phase};
use edgesite::provider::{MemoryCloud, Operation};
use parking_lot::Mutex;

fn position(ops: &[Operation], wanted: Operation) -> usize {
    ops.iter()
        .position(|op| *op == wanted)
        .unwrap_or_else(|| panic!("{wanted} was never called"))
}

fn assert_nothing_left(cloud: &MemoryCloud) {
    assert!(cloud.origin_names().is_empty(), "origin left behind");
    assert!(cloud.distributions().is_empty(), "distribution left behind");
    assert!(cloud.records().is_empty(), "record left behind");
}

/// Each step in pipeline order, with the phase the run had reached before it.
const FAILURE_POINTS: &[(Operation, Phase)] = &[
    (Operation::ListOrigins, Phase::Init),
    (Operation::CreateOrigin, Phase::Init),
    (Operation::EnableWebsiteHosting, Phase::Init),
    (Operation::UnblockPublicAccess, Phase::Init),
    (Operation::SetPublicReadPolicy, Phase::Init),
    (Operation::PutObject, Phase::OriginReady),
    (Operation::CreateDistribution, Phase::ContentPublished),
    (Operation::ListZones, Phase::EdgeReady),
    (Operation::UpsertAliasRecord, Phase::EdgeReady),
];

#[tokio::test]
async fn failure_at_any_step_leaves_nothing_behind() {
    support::init_tracing();

    for (operation, phase) in FAILURE_POINTS {
        let site = support::site_dir();
        let cloud = support::cloud();
        cloud.fail(*operation);

        let failure = Orchestrator::new(&cloud, support::fast_settings())
            .run(support::myblog(site.path()))
            .await
            .unwrap_err();

        assert_eq!(failure.phase, *phase, "phase when {operation} fails");
        assert_eq!(failure.error.kind(), DeployErrorKind::Provider);
        assert!(
            failure.rollback.all_succeeded(),
            "rollback failed when {operation} fails: {:?}",
            failure.rollback.failed
        );
        assert_nothing_left(&cloud);
    }
}

#[tokio::test]
async fn compensations_match_what_was_created() {
    let cases: &[(Operation, usize)] = &[
        (Operation::CreateOrigin, 0),
        (Operation::EnableWebsiteHosting, 1),
        (Operation::PutObject, 1),
        (Operation::CreateDistribution, 1),
        (Operation::UpsertAliasRecord, 2),
    ];

    for (operation, expected) in cases {
        let site = support::site_dir();
        let cloud = support::cloud();
        cloud.fail(*operation);

        let failure = Orchestrator::new(&cloud, support::fast_settings())
            .run(support::myblog(site.path()))
            .await
            .unwrap_err();

        assert_eq!(
            failure.rollback.completed.len(),
            *expected,
            "compensations when {operation} fails"
        );
    }
}

#[tokio::test]
async fn edge_is_torn_down_before_origin_is_removed() {
    let site = support::site_dir();
    let cloud = support::cloud();
    cloud.fail(Operation::UpsertAliasRecord);

    let failure = Orchestrator::new(&cloud, support::fast_settings())
        .run(support::myblog(site.path()))
        .await
        .unwrap_err();

    assert!(matches!(
        failure.rollback.completed.as_slice(),
        [Compensation::TeardownEdge { .. }, Compensation::RemoveOrigin { .. }]
    ));

    let ops = cloud.operations();
    assert!(
        position(&ops, Operation::DeleteDistribution) < position(&ops, Operation::DeleteOrigin)
    );
    assert!(
        position(&ops, Operation::UpdateDistributionConfig)
            < position(&ops, Operation::DeleteDistribution)
    );
}

#[tokio::test]
async fn teardown_waits_for_disabled_distribution_to_settle() {
    let site = support::site_dir();
    let cloud = support::cloud().with_propagation_polls(3);
    cloud.fail(Operation::UpsertAliasRecord);

    let failure = Orchestrator::new(&cloud, support::fast_settings())
        .run(support::myblog(site.path()))
        .await
        .unwrap_err();

    assert!(failure.rollback.all_succeeded());
    assert!(cloud.call_count(Operation::DistributionStatus) >= 4);
    assert!(cloud.distributions().is_empty());
}

#[tokio::test]
async fn failed_compensation_does_not_stop_the_rest() {
    let site = support::site_dir();
    let cloud = support::cloud();
    cloud.fail(Operation::UpsertAliasRecord);
    cloud.fail(Operation::DeleteDistribution);

    let failure = Orchestrator::new(&cloud, support::fast_settings())
        .run(support::myblog(site.path()))
        .await
        .unwrap_err();

    // the original error is kept; rollback errors are reported separately
    assert_eq!(failure.error.operation(), Some("upsert_alias_record"));
    assert_eq!(failure.rollback.failed.len(), 1);
    assert!(matches!(
        failure.rollback.failed[0].action,
        Compensation::TeardownEdge { .. }
    ));
    assert_eq!(
        failure.rollback.failed[0].error.operation(),
        Some("delete_distribution")
    );
    assert!(matches!(
        failure.rollback.completed.as_slice(),
        [Compensation::RemoveOrigin { .. }]
    ));
    assert!(cloud.origin_names().is_empty());
    assert_eq!(cloud.distributions().len(), 1);
    assert!(!cloud.distributions()[0].config.enabled);
}

#[tokio::test]
async fn preexisting_origin_is_kept_on_rollback() {
    let site = support::site_dir();
    let cloud = support::cloud();
    cloud.seed_origin("myblog.example.com");
    cloud.seed_object("myblog.example.com", "old.html", b"old");
    cloud.fail(Operation::CreateDistribution);

    let failure = Orchestrator::new(&cloud, support::fast_settings())
        .run(support::myblog(site.path()))
        .await
        .unwrap_err();

    assert!(failure.rollback.is_empty());
    let origin = cloud.origin("myblog.example.com").unwrap();
    assert!(origin.objects.contains_key("old.html"));
    // objects published by the failed run stay in the reused origin
    assert!(origin.objects.contains_key("index.html"));
}

#[tokio::test]
async fn observer_sees_rolling_back_then_failed() {
    let site = support::site_dir();
    let cloud = support::cloud();
    cloud.fail(Operation::CreateDistribution);

    let phases = Mutex::new(Vec::new());
    let result = Orchestrator::new(&cloud, support::fast_settings())
        .with_observer(|phase| phases.lock().push(phase))
        .run(support::myblog(site.path()))
        .await;
    assert!(result.is_err());

    assert_eq!(
        phases.into_inner(),
        vec![
            Phase::Init,
            Phase::OriginReady,
            Phase::ContentPublished,
            Phase::RollingBack,
            Phase::Failed,
        ]
    );
}
