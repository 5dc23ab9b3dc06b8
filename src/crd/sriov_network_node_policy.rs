//! SriovNetworkNodePolicy Custom Resource Definition

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Desired SR-IOV virtual function layout for the NICs of selected nodes
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[kube(
    group = "sriovnetwork.openshift.io",
    version = "v1",
    kind = "SriovNetworkNodePolicy",
    plural = "sriovnetworknodepolicies",
    singular = "sriovnetworknodepolicy",
    namespaced,
    derive = "PartialEq",
    printcolumn = r#"{"name": "Resource", "type": "string", "jsonPath": ".spec.resourceName"}"#,
    printcolumn = r#"{"name": "VFs", "type": "integer", "jsonPath": ".spec.numVfs"}"#,
    printcolumn = r#"{"name": "Age", "type": "date", "jsonPath": ".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct SriovNetworkNodePolicySpec {
    /// Name of the device plugin resource the VFs are advertised under
    pub resource_name: String,

    /// Nodes the policy applies to
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub node_selector: BTreeMap<String, String>,

    /// Policy priority, 0 is highest and 99 lowest
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mtu: Option<i32>,

    /// Number of virtual functions per physical function
    pub num_vfs: i32,

    pub nic_selector: NicSelector,

    /// VF driver type (netdevice or vfio-pci)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_type: Option<String>,

    #[serde(default)]
    pub is_rdma: bool,

    /// NIC link type (eth or ib)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_type: Option<String>,

    /// NIC eswitch mode (legacy or switchdev)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub e_switch_mode: Option<String>,

    #[serde(default)]
    pub exclude_topology: bool,
}

/// Selects the physical functions the policy configures
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NicSelector {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,

    #[serde(rename = "deviceID", skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub root_devices: Vec<String>,

    /// Interface names, optionally with a `#first-last` VF range suffix
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pf_names: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub net_filter: Option<String>,
}
