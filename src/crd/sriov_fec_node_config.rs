//! SriovFecNodeConfig Custom Resource Definition
//!
//! One object per node, named after the node, created by the SR-IOV FEC
//! operator. Its status carries the discovered accelerator inventory.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[kube(
    group = "sriovfec.intel.com",
    version = "v2",
    kind = "SriovFecNodeConfig",
    plural = "sriovfecnodeconfigs",
    singular = "sriovfecnodeconfig",
    namespaced,
    status = "SriovFecNodeConfigStatus",
    derive = "PartialEq",
    printcolumn = r#"{"name": "Configured", "type": "string", "jsonPath": ".status.conditions[?(@.type==\"Configured\")].status"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct SriovFecNodeConfigSpec {
    /// Accelerator physical functions to configure
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub physical_functions: Vec<PhysicalFunctionConfig>,

    /// Skip draining the node before applying the configuration
    #[serde(default)]
    pub drain_skip: bool,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PhysicalFunctionConfig {
    pub pci_address: String,

    pub pf_driver: String,

    pub vf_driver: String,

    pub vf_amount: i32,

    /// Device specific queue and engine layout (ACC100, N3000, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bb_dev_config: Option<serde_json::Value>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SriovFecNodeConfigStatus {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<FecCondition>,

    #[serde(default)]
    pub inventory: NodeInventory,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FecCondition {
    #[serde(rename = "type")]
    pub type_: String,

    pub status: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_generation: Option<i64>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NodeInventory {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sriov_accelerators: Vec<SriovAccelerator>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SriovAccelerator {
    #[serde(rename = "vendorID")]
    pub vendor_id: String,

    #[serde(rename = "deviceID")]
    pub device_id: String,

    pub pci_address: String,

    pub driver: String,

    #[serde(default)]
    pub max_virtual_functions: i32,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub virtual_functions: Vec<VirtualFunction>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VirtualFunction {
    pub pci_address: String,

    pub driver: String,

    #[serde(rename = "deviceID")]
    pub device_id: String,
}
