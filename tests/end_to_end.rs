// ABOUTME: End-to-end deployment runs against the in-memory cloud.
// ABOUTME: Covers the myblog scenario, a repeated run and a forced DNS failure.

mod support;

use edgesite::deploy::{DeployErrorKind, Orchestrator, Phase};
use edgesite::provider::{MemoryCloud, Operation};

#[tokio::test]
async fn myblog_deploys_origin_edge_and_alias() {
    support::init_tracing();
    let site = support::site_dir();
    let cloud = support::cloud();

    let outcome = Orchestrator::new(&cloud, support::fast_settings())
        .run(support::myblog(site.path()))
        .await
        .unwrap();

    assert_eq!(outcome.url, "https://myblog.example.com");
    assert_eq!(outcome.host.as_str(), "myblog.example.com");
    assert!(outcome.origin_created);
    assert_eq!(outcome.files_published, 2);
    assert_eq!(outcome.bytes_published, 14 + 18);
    assert_eq!(
        outcome.origin_endpoint,
        "myblog.example.com.s3-website-us-east-1.amazonaws.com"
    );

    let origin = cloud.origin("myblog.example.com").unwrap();
    assert_eq!(origin.objects.len(), 2);
    let policy = origin.policy.unwrap();
    assert_eq!(
        policy.statement[0].resource,
        "arn:aws:s3:::myblog.example.com/*"
    );

    let distributions = cloud.distributions();
    assert_eq!(distributions.len(), 1);
    assert_eq!(distributions[0].id, outcome.distribution_id);
    assert_eq!(
        distributions[0].config.certificate.certificate_arn,
        support::CERTIFICATE
    );

    let records = cloud.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "myblog.example.com.");
    assert_eq!(records[0].target, format!("{}.", outcome.distribution_domain));
}

#[tokio::test]
async fn pipeline_calls_providers_in_order() {
    let site = support::site_dir();
    let cloud = support::cloud();

    Orchestrator::new(&cloud, support::fast_settings())
        .run(support::myblog(site.path()))
        .await
        .unwrap();

    let ops: Vec<_> = cloud
        .operations()
        .into_iter()
        .filter(|op| *op != Operation::PutObject)
        .collect();
    assert_eq!(
        ops,
        vec![
            Operation::ListOrigins,
            Operation::CreateOrigin,
            Operation::EnableWebsiteHosting,
            Operation::UnblockPublicAccess,
            Operation::SetPublicReadPolicy,
            Operation::CreateDistribution,
            Operation::ListZones,
            Operation::UpsertAliasRecord,
        ]
    );
    assert_eq!(cloud.call_count(Operation::PutObject), 2);
}

#[tokio::test]
async fn successful_run_reports_every_phase() {
    let site = support::site_dir();
    let cloud = support::cloud();
    let phases = parking_lot::Mutex::new(Vec::new());

    Orchestrator::new(&cloud, support::fast_settings())
        .with_observer(|phase| phases.lock().push(phase))
        .run(support::myblog(site.path()))
        .await
        .unwrap();

    assert_eq!(
        phases.into_inner(),
        vec![
            Phase::Init,
            Phase::OriginReady,
            Phase::ContentPublished,
            Phase::EdgeReady,
            Phase::NameReady,
        ]
    );
}

#[tokio::test]
async fn forced_dns_failure_leaves_no_origin_and_no_distribution() {
    let site = support::site_dir();
    let cloud = support::cloud();
    cloud.fail(Operation::UpsertAliasRecord);

    let failure = Orchestrator::new(&cloud, support::fast_settings())
        .run(support::myblog(site.path()))
        .await
        .unwrap_err();

    assert_eq!(failure.phase, Phase::EdgeReady);
    assert_eq!(failure.error.kind(), DeployErrorKind::Provider);
    assert!(failure.to_string().starts_with("deployment failed after edge_ready"));
    assert_eq!(failure.rollback.completed.len(), 2);
    assert!(cloud.origin("myblog.example.com").is_none());
    assert!(cloud.distributions().is_empty());
    assert!(cloud.records().is_empty());
}

#[tokio::test]
async fn second_run_cannot_claim_alias_and_keeps_first_deployment() {
    let site = support::site_dir();
    let cloud = support::cloud();
    let orchestrator = Orchestrator::new(&cloud, support::fast_settings());

    let first = orchestrator
        .run(support::myblog(site.path()))
        .await
        .unwrap();
    std::fs::write(site.path().join("about.html"), "<p>about</p>").unwrap();
    let failure = orchestrator
        .run(support::myblog(site.path()))
        .await
        .unwrap_err();

    assert_eq!(failure.phase, Phase::ContentPublished);
    assert_eq!(failure.error.operation(), Some("create_distribution"));
    // the origin already existed, so there was nothing to compensate
    assert!(failure.rollback.is_empty());

    let origin = cloud.origin("myblog.example.com").unwrap();
    assert!(origin.objects.contains_key("about.html"));

    let distributions = cloud.distributions();
    assert_eq!(distributions.len(), 1);
    assert_eq!(distributions[0].id, first.distribution_id);
    assert_eq!(cloud.records().len(), 1);
}

#[tokio::test]
async fn missing_zone_rolls_back_with_not_found() {
    let site = support::site_dir();
    let cloud = MemoryCloud::new();

    let failure = Orchestrator::new(&cloud, support::fast_settings())
        .run(support::myblog(site.path()))
        .await
        .unwrap_err();

    assert_eq!(failure.error.kind(), DeployErrorKind::NotFound);
    assert!(failure.rollback.all_succeeded());
    assert!(cloud.origin_names().is_empty());
    assert!(cloud.distributions().is_empty());
}

#[tokio::test]
async fn outcome_serializes_for_json_output() {
    let site = support::site_dir();
    let cloud = support::cloud();

    let outcome = Orchestrator::new(&cloud, support::fast_settings())
        .run(support::myblog(site.path()))
        .await
        .unwrap();

    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["url"], "https://myblog.example.com");
    assert_eq!(json["host"], "myblog.example.com");
    assert_eq!(json["files_published"], 2);
    assert_eq!(json["distribution_id"], outcome.distribution_id.as_str());
}
