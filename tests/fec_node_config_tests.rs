//! Integration tests for SriovFecNodeConfig discovery

use kube::ResourceExt;
use tokio_test::{assert_err, assert_ok};

use kube_resource_builders::adapters::NodeConfigBuilder;
use kube_resource_builders::client::{MemoryCluster, Verb};
use kube_resource_builders::crd::{
    NodeInventory, SriovAccelerator, SriovFecNodeConfig, SriovFecNodeConfigSpec,
    SriovFecNodeConfigStatus,
};

const NODE: &str = "worker-0.ran.lab";
const NAMESPACE: &str = "vran-acceleration-operators";

type Cluster = MemoryCluster<SriovFecNodeConfig>;

fn discovered_config() -> SriovFecNodeConfig {
    let mut config = SriovFecNodeConfig::new(NODE, SriovFecNodeConfigSpec::default());
    config.metadata.namespace = Some(NAMESPACE.to_string());
    config.status = Some(SriovFecNodeConfigStatus {
        conditions: vec![],
        inventory: NodeInventory {
            sriov_accelerators: vec![SriovAccelerator {
                vendor_id: "8086".to_string(),
                device_id: "0d5c".to_string(),
                pci_address: "0000:8a:00.0".to_string(),
                driver: "pci-pf-stub".to_string(),
                max_virtual_functions: 16,
                virtual_functions: vec![],
            }],
        },
    });
    config
}

#[test]
fn node_config_new_targets_node() {
    let builder = NodeConfigBuilder::new(Cluster::new(), NODE, NAMESPACE);

    assert_eq!(builder.error(), None);
    assert_eq!(builder.definition().name_any(), NODE);
    assert_eq!(builder.definition().namespace().as_deref(), Some(NAMESPACE));
}

#[test]
fn node_config_new_rejects_empty_identity() {
    let no_node = NodeConfigBuilder::new(Cluster::new(), "", NAMESPACE);
    assert_eq!(no_node.error(), Some("SriovFecNodeConfig 'nodeName' is empty"));

    let no_ns = NodeConfigBuilder::new(Cluster::new(), NODE, "");
    assert_eq!(no_ns.error(), Some("SriovFecNodeConfig 'nsname' is empty"));
}

#[tokio::test]
async fn node_config_discover_stores_object() {
    let cluster = Cluster::new().with_object(discovered_config());
    let mut builder = NodeConfigBuilder::new(cluster.clone(), NODE, NAMESPACE);

    let config = assert_ok!(builder.discover().await).clone();

    let accelerators = &config
        .status
        .as_ref()
        .expect("status present")
        .inventory
        .sriov_accelerators;
    assert_eq!(accelerators.len(), 1);
    assert_eq!(accelerators[0].pci_address, "0000:8a:00.0");
    assert_eq!(builder.object(), Some(&config));
}

#[tokio::test]
async fn node_config_discover_missing_is_not_found() {
    let cluster = Cluster::new();
    let mut builder = NodeConfigBuilder::new(cluster.clone(), NODE, NAMESPACE);

    let err = assert_err!(builder.discover().await.map(|_| ()));
    assert!(err.is_not_found());
    assert!(builder.object().is_none());
    assert!(!builder.exists().await);
}

#[tokio::test]
async fn node_config_discover_with_empty_node_skips_request() {
    let cluster = Cluster::new().with_object(discovered_config());
    let mut builder = NodeConfigBuilder::new(cluster.clone(), "", NAMESPACE);

    let err = assert_err!(builder.discover().await.map(|_| ()));
    assert_eq!(err.to_string(), "SriovFecNodeConfig 'nodeName' is empty");
    assert!(cluster.requests().is_empty());
}

#[tokio::test]
async fn node_config_exists_reads_cluster() {
    let cluster = Cluster::new().with_object(discovered_config());
    let mut builder = NodeConfigBuilder::new(cluster.clone(), NODE, NAMESPACE);

    assert!(builder.exists().await);
    assert_eq!(builder.object(), Some(&discovered_config()));
    assert_eq!(cluster.requests_of(Verb::Get).len(), 1);
}
