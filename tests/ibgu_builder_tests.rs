//! Integration tests for the ImageBasedGroupUpgrade builder
//!
//! These tests run the builder against an in-memory cluster and verify the
//! configuration steps, the deferred error behaviour and the round trips
//! issued by `get`, `exists`, `create` and `delete`.

use std::collections::BTreeMap;

use kube::ResourceExt;
use tokio_test::{assert_err, assert_ok};

use kube_resource_builders::adapters::IbguBuilder;
use kube_resource_builders::client::{MemoryCluster, Verb};
use kube_resource_builders::crd::{
    ConfigMapRef, ImageBasedGroupUpgrade, PlanItem, RolloutStrategy,
};
use kube_resource_builders::{metrics, Error};

// ============================================================================
// Test Helpers
// ============================================================================

const NAME: &str = "upgrade-4-16";
const NAMESPACE: &str = "ztp-group";

type Cluster = MemoryCluster<ImageBasedGroupUpgrade>;

fn labels(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn actions(names: &[&str]) -> Vec<String> {
    names.iter().map(|a| a.to_string()).collect()
}

fn valid_builder(cluster: &Cluster) -> IbguBuilder<Cluster> {
    IbguBuilder::new(cluster.clone(), NAME, NAMESPACE)
        .with_cluster_label_selectors(labels(&[("common", "true")]))
        .with_seed_image_ref("quay.io/ran/seed:4.16.1", "4.16.1")
        .with_oadp_content("oadp-cm", "openshift-adp")
        .with_plan(actions(&["Prep", "Upgrade"]), 10, 60)
}

fn existing_ibgu(cluster: &Cluster) -> ImageBasedGroupUpgrade {
    let ibgu = valid_builder(cluster).definition().clone();
    cluster.insert(ibgu.clone());
    ibgu
}

fn builder_error(err: Error) -> String {
    match err {
        Error::BuilderError(msg) => msg,
        other => panic!("expected a builder error, got {:?}", other),
    }
}

// ============================================================================
// Construction Tests
// ============================================================================

#[test]
fn ibgu_new_sets_identity() {
    let cluster = Cluster::new();
    let builder = IbguBuilder::new(cluster, NAME, NAMESPACE);

    assert_eq!(builder.error(), None);
    assert_eq!(builder.definition().name_any(), NAME);
    assert_eq!(builder.definition().namespace().as_deref(), Some(NAMESPACE));
    assert!(builder.definition().spec.plan.is_empty());
    assert!(builder.object().is_none());
}

#[test]
fn ibgu_builder_client_defaults_to_kube_client() {
    fn accepts_default(builder: Option<IbguBuilder>) -> bool {
        builder.is_none()
    }

    assert!(accepts_default(None::<IbguBuilder<kube::Client>>));
}

#[test]
fn ibgu_new_empty_name_records_error() {
    let builder = IbguBuilder::new(Cluster::new(), "", NAMESPACE);

    assert_eq!(builder.error(), Some("ibgu 'name' cannot be empty"));
}

#[test]
fn ibgu_new_empty_namespace_records_error() {
    let builder = IbguBuilder::new(Cluster::new(), NAME, "");

    assert_eq!(builder.error(), Some("ibgu 'nsname' cannot be empty"));
}

#[test]
fn ibgu_new_reports_name_before_namespace() {
    let builder = IbguBuilder::new(Cluster::new(), "", "");

    assert_eq!(builder.error(), Some("ibgu 'name' cannot be empty"));
}

// ============================================================================
// Configuration Tests
// ============================================================================

#[test]
fn ibgu_with_cluster_label_selectors_replaces_selectors() {
    let builder = IbguBuilder::new(Cluster::new(), NAME, NAMESPACE)
        .with_cluster_label_selectors(labels(&[("a", "1")]))
        .with_cluster_label_selectors(labels(&[("b", "2")]));

    let selectors = &builder.definition().spec.cluster_label_selectors;
    assert_eq!(selectors.len(), 1);
    assert_eq!(selectors[0].match_labels, labels(&[("b", "2")]));
}

#[test]
fn ibgu_with_empty_cluster_label_selectors_fails() {
    let builder = IbguBuilder::new(Cluster::new(), NAME, NAMESPACE)
        .with_cluster_label_selectors(BTreeMap::new());

    assert_eq!(
        builder.error(),
        Some("can not apply empty cluster label selectors to the IBGU")
    );
    assert!(builder.definition().spec.cluster_label_selectors.is_empty());
}

#[test]
fn ibgu_with_seed_image_ref_keeps_appended_content() {
    let builder = IbguBuilder::new(Cluster::new(), NAME, NAMESPACE)
        .with_oadp_content("oadp-cm", "openshift-adp")
        .with_seed_image_ref("quay.io/ran/seed:4.16.1", "4.16.1");

    let ibu = &builder.definition().spec.ibu_spec;
    assert_eq!(ibu.seed_image_ref.image, "quay.io/ran/seed:4.16.1");
    assert_eq!(ibu.seed_image_ref.version, "4.16.1");
    assert_eq!(ibu.oadp_content.len(), 1);
}

#[test]
fn ibgu_with_seed_image_ref_rejects_empty_values() {
    let no_image =
        IbguBuilder::new(Cluster::new(), NAME, NAMESPACE).with_seed_image_ref("", "4.16.1");
    assert_eq!(no_image.error(), Some("seedImage cannot be empty"));

    let no_version =
        IbguBuilder::new(Cluster::new(), NAME, NAMESPACE).with_seed_image_ref("quay.io/seed", "");
    assert_eq!(no_version.error(), Some("seedVersion cannot be empty"));
}

#[test]
fn ibgu_with_oadp_content_appends_in_call_order() {
    let builder = IbguBuilder::new(Cluster::new(), NAME, NAMESPACE)
        .with_oadp_content("first", "openshift-adp")
        .with_oadp_content("second", "openshift-adp");

    let names: Vec<&str> = builder
        .definition()
        .spec
        .ibu_spec
        .oadp_content
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(names, vec!["first", "second"]);
}

#[test]
fn ibgu_with_oadp_content_rejects_empty_values() {
    let no_name = IbguBuilder::new(Cluster::new(), NAME, NAMESPACE).with_oadp_content("", "ns");
    assert_eq!(no_name.error(), Some("oadp content name cannot be empty"));

    let no_ns = IbguBuilder::new(Cluster::new(), NAME, NAMESPACE).with_oadp_content("cm", "");
    assert_eq!(no_ns.error(), Some("oadp content namespace cannot be empty"));
}

#[test]
fn ibgu_with_extra_manifests_appends() {
    let builder = IbguBuilder::new(Cluster::new(), NAME, NAMESPACE)
        .with_extra_manifests("sriov-extra", "ztp-group");

    assert_eq!(
        builder.definition().spec.ibu_spec.extra_manifests,
        vec![ConfigMapRef {
            name: "sriov-extra".to_string(),
            namespace: "ztp-group".to_string(),
        }]
    );
}

#[test]
fn ibgu_with_extra_manifests_rejects_empty_values() {
    let no_name = IbguBuilder::new(Cluster::new(), NAME, NAMESPACE).with_extra_manifests("", "ns");
    assert_eq!(no_name.error(), Some("extra manifests name cannot be empty"));

    let no_ns = IbguBuilder::new(Cluster::new(), NAME, NAMESPACE).with_extra_manifests("cm", "");
    assert_eq!(no_ns.error(), Some("extra manifests namespace cannot be empty"));
    assert!(no_ns.definition().spec.ibu_spec.extra_manifests.is_empty());
}

#[test]
fn ibgu_with_plan_twice_accumulates_in_call_order() {
    let builder = IbguBuilder::new(Cluster::new(), NAME, NAMESPACE)
        .with_plan(actions(&["Prep"]), 5, 30)
        .with_plan(actions(&["Upgrade", "FinalizeUpgrade"]), 2, 90);

    assert_eq!(
        builder.definition().spec.plan,
        vec![
            PlanItem {
                actions: actions(&["Prep"]),
                rollout_strategy: RolloutStrategy {
                    max_concurrency: 5,
                    timeout: 30,
                },
            },
            PlanItem {
                actions: actions(&["Upgrade", "FinalizeUpgrade"]),
                rollout_strategy: RolloutStrategy {
                    max_concurrency: 2,
                    timeout: 90,
                },
            },
        ]
    );
}

#[test]
fn ibgu_with_plan_rejects_invalid_arguments() {
    let cases = [
        (vec![], 1, 1, "plan actions cannot be empty"),
        (actions(&["Prep"]), 0, 1, "maxConcurrency must be greater than 0"),
        (actions(&["Prep"]), 1, -5, "timeout must be greater than 0"),
    ];

    for (plan_actions, max_concurrency, timeout, expected) in cases {
        let builder = IbguBuilder::new(Cluster::new(), NAME, NAMESPACE).with_plan(
            plan_actions,
            max_concurrency,
            timeout,
        );

        assert_eq!(builder.error(), Some(expected));
        assert!(builder.definition().spec.plan.is_empty());
    }
}

// ============================================================================
// Deferred Error Tests
// ============================================================================

#[tokio::test]
async fn ibgu_first_error_sticks_and_blocks_everything() {
    let cluster = Cluster::new();
    let mut builder = IbguBuilder::new(cluster.clone(), NAME, NAMESPACE)
        .with_plan(actions(&["Prep"]), 1, 10)
        .with_plan(vec![], 1, 10)
        .with_seed_image_ref("", "")
        .with_oadp_content("oadp-cm", "openshift-adp");

    assert_eq!(builder.error(), Some("plan actions cannot be empty"));
    assert_eq!(builder.definition().spec.plan.len(), 1);
    assert!(builder.definition().spec.ibu_spec.oadp_content.is_empty());

    let err = assert_err!(builder.get().await);
    assert_eq!(builder_error(err), "plan actions cannot be empty");

    assert!(!builder.exists().await);

    let err = builder.create().await.err().expect("create must fail");
    assert_eq!(builder_error(err), "plan actions cannot be empty");

    let err = assert_err!(builder.delete().await);
    assert_eq!(builder_error(err), "plan actions cannot be empty");

    assert!(cluster.requests().is_empty());
}

#[tokio::test]
async fn ibgu_construction_error_is_replayed_without_requests() {
    let cluster = Cluster::new();
    let mut builder = IbguBuilder::new(cluster.clone(), "", NAMESPACE)
        .with_plan(actions(&["Prep"]), 1, 10);

    assert!(builder.definition().spec.plan.is_empty());
    assert!(!builder.exists().await);
    let err = assert_err!(builder.get().await);
    assert_eq!(err.to_string(), "ibgu 'name' cannot be empty");
    assert!(cluster.requests().is_empty());
}

// ============================================================================
// Cluster Round Trip Tests
// ============================================================================

#[tokio::test]
async fn ibgu_create_twice_creates_once() {
    let cluster = Cluster::new();
    let mut builder = valid_builder(&cluster);

    assert_ok!(builder.create().await);
    assert!(cluster.contains(NAMESPACE, NAME));
    assert_eq!(builder.object(), Some(builder.definition()));

    assert_ok!(builder.create().await);
    assert_eq!(cluster.requests_of(Verb::Create).len(), 1);
    assert!(builder.object().is_some());
}

#[tokio::test]
async fn ibgu_create_stores_definition_in_cluster() {
    let cluster = Cluster::new();
    let mut builder = valid_builder(&cluster);

    assert_ok!(builder.create().await);

    let stored = cluster.object(NAMESPACE, NAME).expect("ibgu stored");
    assert_eq!(stored.spec, builder.definition().spec);
    assert_eq!(stored.spec.plan[0].actions, actions(&["Prep", "Upgrade"]));
}

#[tokio::test]
async fn ibgu_create_failure_leaves_object_empty() {
    let cluster = Cluster::new();
    cluster.fail_on(Verb::Create, NAME, "admission webhook denied the request");
    let mut builder = valid_builder(&cluster);

    let err = builder.create().await.err().expect("create must fail");
    assert!(!err.is_not_found());
    assert!(err.to_string().contains("admission webhook"));
    assert!(builder.object().is_none());
}

#[tokio::test]
async fn ibgu_get_returns_object_without_storing_it() {
    let cluster = Cluster::new();
    let existing = existing_ibgu(&cluster);
    let builder = valid_builder(&cluster);

    let fetched = assert_ok!(builder.get().await);
    assert_eq!(fetched, existing);
    assert!(builder.object().is_none());
}

#[tokio::test]
async fn ibgu_get_missing_returns_not_found() {
    let cluster = Cluster::new();
    let builder = valid_builder(&cluster);

    let err = assert_err!(builder.get().await);
    assert!(err.is_not_found());
}

#[tokio::test]
async fn ibgu_exists_refreshes_object() {
    let cluster = Cluster::new();
    let existing = existing_ibgu(&cluster);
    let mut builder = valid_builder(&cluster);

    assert!(builder.exists().await);
    assert_eq!(builder.object(), Some(&existing));
    assert_eq!(cluster.requests_of(Verb::Get).len(), 1);
}

#[tokio::test]
async fn ibgu_exists_false_when_absent() {
    let cluster = Cluster::new();
    let mut builder = valid_builder(&cluster);

    assert!(!builder.exists().await);
    assert!(builder.object().is_none());
}

#[tokio::test]
async fn ibgu_exists_true_on_non_not_found_error() {
    let cluster = Cluster::new();
    cluster.fail_on(Verb::Get, NAME, "etcdserver: request timed out");
    let mut builder = valid_builder(&cluster);

    assert!(builder.exists().await);
    assert!(builder.object().is_none());

    // Treated as present, so create issues nothing and reports no error.
    assert_ok!(builder.create().await);
    assert!(cluster.requests_of(Verb::Create).is_empty());
}

#[tokio::test]
async fn ibgu_delete_then_exists_is_clean() {
    let cluster = Cluster::new();
    existing_ibgu(&cluster);
    let mut builder = valid_builder(&cluster);

    assert_ok!(builder.delete().await);
    assert!(builder.object().is_none());
    assert!(!cluster.contains(NAMESPACE, NAME));

    assert!(!builder.exists().await);
    assert!(builder.object().is_none());
}

#[tokio::test]
async fn ibgu_repeated_delete_is_a_no_op() {
    let cluster = Cluster::new();
    existing_ibgu(&cluster);
    let mut builder = valid_builder(&cluster);

    assert_ok!(builder.delete().await);
    assert_ok!(builder.delete().await);
    assert_ok!(builder.delete().await);

    assert_eq!(cluster.requests_of(Verb::Delete).len(), 1);
    assert!(builder.object().is_none());
}

#[tokio::test]
async fn ibgu_delete_failure_keeps_object() {
    let cluster = Cluster::new();
    let existing = existing_ibgu(&cluster);
    cluster.fail_on(Verb::Delete, NAME, "forbidden");
    let mut builder = valid_builder(&cluster);

    let err = assert_err!(builder.delete().await);
    assert!(err.to_string().contains("forbidden"));
    assert_eq!(builder.object(), Some(&existing));
    assert!(cluster.contains(NAMESPACE, NAME));
}

#[tokio::test]
async fn ibgu_delete_after_failed_lookup_of_missing_resource_succeeds() {
    let cluster = Cluster::new();
    cluster.fail_on(Verb::Get, NAME, "etcdserver: request timed out");
    let mut builder = valid_builder(&cluster);

    assert_ok!(builder.delete().await);
    assert!(builder.object().is_none());

    let verbs: Vec<Verb> = cluster.requests().iter().map(|r| r.verb).collect();
    assert_eq!(verbs, vec![Verb::Get, Verb::Delete]);
}

#[tokio::test]
async fn ibgu_delete_after_failed_lookup_removes_existing_resource() {
    let cluster = Cluster::new();
    existing_ibgu(&cluster);
    cluster.fail_on(Verb::Get, NAME, "etcdserver: request timed out");
    let mut builder = valid_builder(&cluster);

    assert_ok!(builder.delete().await);
    assert!(builder.object().is_none());
    assert!(!cluster.contains(NAMESPACE, NAME));
}

#[tokio::test]
async fn ibgu_delete_after_failed_lookup_returns_delete_error() {
    let cluster = Cluster::new();
    existing_ibgu(&cluster);
    cluster.fail_on(Verb::Get, NAME, "etcdserver: request timed out");
    cluster.fail_on(Verb::Delete, NAME, "connection reset");
    let mut builder = valid_builder(&cluster);

    let err = assert_err!(builder.delete().await);
    assert!(err.to_string().contains("connection reset"));
    assert!(!err.is_not_found());
    assert!(cluster.contains(NAMESPACE, NAME));
}

#[tokio::test]
async fn ibgu_create_then_delete_round_trip() {
    let cluster = Cluster::new();
    let mut builder = valid_builder(&cluster);

    assert_ok!(builder.create().await);
    assert_ok!(builder.delete().await);

    assert!(cluster.names(NAMESPACE).is_empty());
    assert!(builder.object().is_none());
}

// ============================================================================
// Pull Tests
// ============================================================================

#[tokio::test]
async fn ibgu_pull_existing() {
    let cluster = Cluster::new();
    let existing = existing_ibgu(&cluster);

    let builder = assert_ok!(IbguBuilder::pull(cluster.clone(), NAME, NAMESPACE).await);

    assert_eq!(builder.definition(), &existing);
    assert_eq!(builder.object(), Some(&existing));
    assert_eq!(builder.error(), None);
}

#[tokio::test]
async fn ibgu_pull_missing_is_not_found() {
    let cluster = Cluster::new();

    let err = IbguBuilder::pull(cluster.clone(), NAME, NAMESPACE)
        .await
        .err()
        .expect("pull must fail");
    assert!(err.is_not_found());
}

#[tokio::test]
async fn ibgu_pull_with_empty_name_skips_request() {
    let cluster = Cluster::new();

    let err = IbguBuilder::pull(cluster.clone(), "", NAMESPACE)
        .await
        .err()
        .expect("pull must fail");
    assert_eq!(builder_error(err), "ibgu 'name' cannot be empty");
    assert!(cluster.requests().is_empty());
}

// ============================================================================
// Metrics Tests
// ============================================================================

#[tokio::test]
async fn ibgu_round_trips_are_counted() {
    let counter = metrics::API_REQUESTS.with_label_values(&["ImageBasedGroupUpgrade", "create"]);
    let before = counter.get();

    let cluster = Cluster::new();
    let mut builder = valid_builder(&cluster);
    assert_ok!(builder.create().await);

    assert!(counter.get() > before);
    assert!(metrics::render().contains("kube_resource_builders_api_requests_total"));
}
