// ABOUTME: Tests for deployment state marker types.
// ABOUTME: Verifies phases, marker sizes and what each state exposes.

mod support;

use edgesite::deploy::{
    ContentPublished, DEFAULT_MAX_CONTENT_SIZE, Deployment, DeploymentState, EdgeReady, Init,
    NameReady, OriginReady, Phase,
};
use std::mem::size_of;

#[test]
fn init_marker_is_zero_sized() {
    assert_eq!(size_of::<Init>(), 0);
}

#[test]
fn later_markers_hold_resource_handles() {
    assert!(size_of::<OriginReady>() > 0);
    assert!(size_of::<ContentPublished>() > size_of::<OriginReady>());
    assert!(size_of::<EdgeReady>() > size_of::<ContentPublished>());
    assert!(size_of::<NameReady>() > size_of::<EdgeReady>());
}

#[test]
fn markers_report_their_phase() {
    assert_eq!(Init::PHASE, Phase::Init);
    assert_eq!(OriginReady::PHASE, Phase::OriginReady);
    assert_eq!(ContentPublished::PHASE, Phase::ContentPublished);
    assert_eq!(EdgeReady::PHASE, Phase::EdgeReady);
    assert_eq!(NameReady::PHASE, Phase::NameReady);
}

#[test]
fn phases_display_in_snake_case() {
    assert_eq!(Phase::Init.to_string(), "init");
    assert_eq!(Phase::ContentPublished.to_string(), "content_published");
    assert_eq!(Phase::RollingBack.to_string(), "rolling_back");
    assert_eq!(Phase::Failed.to_string(), "failed");
}

#[test]
fn prepared_deployment_starts_in_init_with_empty_plan() {
    let site = support::site_dir();
    let deployment: Deployment<Init> =
        Deployment::prepare(support::myblog(site.path()), DEFAULT_MAX_CONTENT_SIZE).unwrap();

    assert_eq!(deployment.phase(), Phase::Init);
    assert_eq!(deployment.host().as_str(), "myblog.example.com");
    assert_eq!(deployment.content().len(), 2);
    assert!(deployment.rollback_plan().is_empty());
    assert_eq!(deployment.request().site().as_str(), "myblog");
}

#[test]
fn deployment_implements_debug() {
    let site = support::site_dir();
    let deployment =
        Deployment::prepare(support::myblog(site.path()), DEFAULT_MAX_CONTENT_SIZE).unwrap();
    let debug = format!("{:?}", deployment);
    assert!(debug.contains("myblog.example.com"));
}
