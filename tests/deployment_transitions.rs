// ABOUTME: Tests for deployment state transitions against the in-memory cloud.
// ABOUTME: Verifies each transition's effects and what it registers for rollback.

mod support;

use edgesite::deploy::{
    Compensation, ContentPublished, DEFAULT_MAX_CONTENT_SIZE, DeployError, DeployErrorKind,
    Deployment, EdgeReady, Init, NameReady, OriginReady, Phase,
};
use edgesite::provider::{MemoryCloud, Operation};
use edgesite::provision::DEFAULT_INDEX_DOCUMENT;

/// Verifies the transition chain type-checks end to end.
#[test]
fn transition_type_signatures_compile() {
    use edgesite::provider::CloudProvider;

    // Never called; it only has to compile.
    #[allow(dead_code)]
    async fn check_signatures<P: CloudProvider>(provider: &P, d0: Deployment<Init>) {
        let d1: Result<Deployment<OriginReady>, (Deployment<Init>, DeployError)> =
            d0.provision_origin(provider, "index.html").await;
        let d2: Result<Deployment<ContentPublished>, (Deployment<OriginReady>, DeployError)> =
            d1.ok().unwrap().publish_content(provider, 4).await;
        let d3: Result<Deployment<EdgeReady>, (Deployment<ContentPublished>, DeployError)> =
            d2.ok().unwrap().provision_edge(provider).await;
        let d4: Result<Deployment<NameReady>, (Deployment<EdgeReady>, DeployError)> =
            d3.ok().unwrap().bind_name(provider).await;
        let _outcome = d4.ok().unwrap().finish();
    }
}

fn prepare(root: &std::path::Path) -> Deployment<Init> {
    Deployment::prepare(support::myblog(root), DEFAULT_MAX_CONTENT_SIZE).unwrap()
}

#[tokio::test]
async fn provision_origin_registers_removal_when_created() {
    support::init_tracing();
    let site = support::site_dir();
    let cloud = support::cloud();

    let deployment = prepare(site.path())
        .provision_origin(&cloud, DEFAULT_INDEX_DOCUMENT)
        .await
        .unwrap();

    assert_eq!(deployment.phase(), Phase::OriginReady);
    assert!(deployment.origin().created);
    assert_eq!(
        deployment.origin().endpoint,
        "myblog.example.com.s3-website-us-east-1.amazonaws.com"
    );
    let pending: Vec<_> = deployment.rollback_plan().pending().cloned().collect();
    assert_eq!(
        pending,
        vec![Compensation::RemoveOrigin {
            name: deployment.host().clone()
        }]
    );

    let origin = cloud.origin("myblog.example.com").unwrap();
    assert!(origin.public_access_unblocked);
    assert!(origin.website.is_some());
    assert!(origin.policy.is_some());
}

#[tokio::test]
async fn provision_origin_reuses_existing_origin_without_registering() {
    let site = support::site_dir();
    let cloud = support::cloud();
    cloud.seed_origin("myblog.example.com");

    let deployment = prepare(site.path())
        .provision_origin(&cloud, DEFAULT_INDEX_DOCUMENT)
        .await
        .unwrap();

    assert!(!deployment.origin().created);
    assert!(deployment.rollback_plan().is_empty());
    assert_eq!(cloud.call_count(Operation::CreateOrigin), 0);
}

#[tokio::test]
async fn failed_configuration_still_registers_created_origin() {
    let site = support::site_dir();
    let cloud = support::cloud();
    cloud.fail(Operation::SetPublicReadPolicy);

    let (failed, error) = prepare(site.path())
        .provision_origin(&cloud, DEFAULT_INDEX_DOCUMENT)
        .await
        .unwrap_err();

    assert_eq!(error.kind(), DeployErrorKind::Provider);
    assert_eq!(error.operation(), Some("set_public_read_policy"));
    assert_eq!(failed.phase(), Phase::Init);
    assert_eq!(failed.rollback_plan().len(), 1);
}

#[tokio::test]
async fn publish_content_uploads_every_file_with_content_type() {
    let site = support::site_dir();
    let cloud = support::cloud();

    let deployment = prepare(site.path())
        .provision_origin(&cloud, DEFAULT_INDEX_DOCUMENT)
        .await
        .unwrap()
        .publish_content(&cloud, 2)
        .await
        .unwrap();

    assert_eq!(deployment.state().published.files, 2);
    let origin = cloud.origin("myblog.example.com").unwrap();
    assert_eq!(
        origin.objects["index.html"].content_type,
        "text/html; charset=utf-8"
    );
    assert_eq!(
        origin.objects["css/site.css"].content_type,
        "text/css; charset=utf-8"
    );
    assert_eq!(&origin.objects["index.html"].body[..], b"<h1>hello</h1>");
}

#[tokio::test]
async fn publish_failure_hands_back_origin_state() {
    let site = support::site_dir();
    let cloud = support::cloud();
    cloud.fail(Operation::PutObject);

    let (failed, error) = prepare(site.path())
        .provision_origin(&cloud, DEFAULT_INDEX_DOCUMENT)
        .await
        .unwrap()
        .publish_content(&cloud, 2)
        .await
        .unwrap_err();

    assert_eq!(error.operation(), Some("put_object"));
    assert_eq!(failed.phase(), Phase::OriginReady);
    assert_eq!(failed.rollback_plan().len(), 1);
}

#[tokio::test]
async fn provision_edge_registers_teardown_after_origin() {
    let site = support::site_dir();
    let cloud = support::cloud();

    let deployment = prepare(site.path())
        .provision_origin(&cloud, DEFAULT_INDEX_DOCUMENT)
        .await
        .unwrap()
        .publish_content(&cloud, 2)
        .await
        .unwrap()
        .provision_edge(&cloud)
        .await
        .unwrap();

    let edge = deployment.edge().clone();
    assert!(edge.domain_name.ends_with(".cloudfront.net"));

    let pending: Vec<_> = deployment.rollback_plan().pending().cloned().collect();
    assert_eq!(pending.len(), 2);
    assert_eq!(pending[0], Compensation::TeardownEdge { id: edge.id });

    let distributions = cloud.distributions();
    assert_eq!(distributions.len(), 1);
    assert_eq!(
        distributions[0].config.aliases,
        vec!["myblog.example.com".to_string()]
    );
    assert_eq!(
        distributions[0].config.origin.domain_name,
        "myblog.example.com.s3-website-us-east-1.amazonaws.com"
    );
}

#[tokio::test]
async fn bind_name_upserts_alias_in_matching_zone() {
    let site = support::site_dir();
    let cloud = support::cloud();

    let deployment = prepare(site.path())
        .provision_origin(&cloud, DEFAULT_INDEX_DOCUMENT)
        .await
        .unwrap()
        .publish_content(&cloud, 2)
        .await
        .unwrap()
        .provision_edge(&cloud)
        .await
        .unwrap()
        .bind_name(&cloud)
        .await
        .unwrap();

    let edge_domain = deployment.edge().domain_name.clone();
    let outcome = deployment.finish();

    let records = cloud.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "myblog.example.com.");
    assert_eq!(records[0].target, format!("{}.", edge_domain));
    assert_eq!(outcome.url, "https://myblog.example.com");
    assert_eq!(outcome.distribution_domain, edge_domain);
}

#[tokio::test]
async fn bind_name_without_zone_is_not_found() {
    let site = support::site_dir();
    let cloud = MemoryCloud::new();
    cloud.add_zone("other.org");

    let (failed, error) = prepare(site.path())
        .provision_origin(&cloud, DEFAULT_INDEX_DOCUMENT)
        .await
        .unwrap()
        .publish_content(&cloud, 2)
        .await
        .unwrap()
        .provision_edge(&cloud)
        .await
        .unwrap()
        .bind_name(&cloud)
        .await
        .unwrap_err();

    assert_eq!(error.kind(), DeployErrorKind::NotFound);
    assert_eq!(failed.phase(), Phase::EdgeReady);
    assert_eq!(failed.rollback_plan().len(), 2);
    assert_eq!(cloud.call_count(Operation::UpsertAliasRecord), 0);

    // hand the plan back to the cloud so nothing is left behind
    failed
        .into_rollback_plan()
        .execute(&cloud, support::fast_teardown())
        .await;
}
