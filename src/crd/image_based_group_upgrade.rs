//! ImageBasedGroupUpgrade Custom Resource Definition

use chrono::{DateTime, Utc};
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Upgrades a group of managed clusters to a seed image, one plan step at a time
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[kube(
    group = "lcm.openshift.io",
    version = "v1alpha1",
    kind = "ImageBasedGroupUpgrade",
    plural = "imagebasedgroupupgrades",
    singular = "imagebasedgroupupgrade",
    shortname = "ibgu",
    namespaced,
    status = "ImageBasedGroupUpgradeStatus",
    derive = "PartialEq",
    printcolumn = r#"{"name": "Seed Image", "type": "string", "jsonPath": ".spec.ibuSpec.seedImageRef.image"}"#,
    printcolumn = r#"{"name": "Age", "type": "date", "jsonPath": ".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct ImageBasedGroupUpgradeSpec {
    /// Selectors picking the managed clusters to upgrade
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cluster_label_selectors: Vec<ClusterLabelSelector>,

    /// Upgrade definition handed to every selected cluster
    #[serde(default)]
    pub ibu_spec: ImageBasedUpgradeSpec,

    /// Ordered plan steps
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub plan: Vec<PlanItem>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClusterLabelSelector {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub match_labels: BTreeMap<String, String>,
}

/// Per-cluster upgrade definition
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImageBasedUpgradeSpec {
    /// Seed image to upgrade to
    #[serde(default)]
    pub seed_image_ref: SeedImageRef,

    /// Config maps holding OADP backup and restore content, applied in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub oadp_content: Vec<ConfigMapRef>,

    /// Config maps holding extra manifests applied after the upgrade
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_manifests: Vec<ConfigMapRef>,

    /// Automatic rollback settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_rollback_on_failure: Option<AutoRollbackOnFailure>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SeedImageRef {
    #[serde(default)]
    pub image: String,

    #[serde(default)]
    pub version: String,

    /// Secret used to pull the seed image
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pull_secret_ref: Option<PullSecretRef>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
pub struct PullSecretRef {
    pub name: String,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
pub struct ConfigMapRef {
    pub name: String,
    pub namespace: String,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AutoRollbackOnFailure {
    /// Seconds to wait for the upgraded cluster to become healthy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub init_monitor_timeout_seconds: Option<i32>,
}

/// One plan step: the actions to run and how to roll them out
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlanItem {
    /// Actions such as Prep, Upgrade, FinalizeUpgrade, Abort
    pub actions: Vec<String>,

    pub rollout_strategy: RolloutStrategy,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RolloutStrategy {
    /// Number of clusters processed at once
    pub max_concurrency: i32,

    /// Step timeout in minutes
    pub timeout: i32,
}

/// ImageBasedGroupUpgrade status, written by the lifecycle controller
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImageBasedGroupUpgradeStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_generation: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,

    /// Progress per managed cluster
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub clusters: Vec<ClusterState>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClusterState {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_action: Option<ActionMessage>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub completed_actions: Vec<ActionMessage>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failed_actions: Vec<ActionMessage>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
pub struct ActionMessage {
    pub action: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Status condition
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    /// Condition type (Progressing, Succeeded, ...)
    #[serde(rename = "type")]
    pub type_: String,

    /// Status (True, False, Unknown)
    pub status: String,

    pub last_transition_time: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
