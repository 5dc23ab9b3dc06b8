//! Environment configuration for the policy cleanup tool

use std::env;

use kube::api::ListParams;

/// Namespace the SR-IOV network operator runs in on OpenShift
pub const DEFAULT_OPERATOR_NAMESPACE: &str = "openshift-sriov-network-operator";

pub const NAMESPACE_VAR: &str = "SRIOV_OPERATOR_NAMESPACE";
pub const LABEL_SELECTOR_VAR: &str = "SRIOV_POLICY_LABEL_SELECTOR";
pub const DRY_RUN_VAR: &str = "SRIOV_CLEANUP_DRY_RUN";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CleanupConfig {
    /// Namespace holding the SriovNetworkNodePolicies
    pub namespace: String,
    /// Restricts which policies are considered
    pub label_selector: Option<String>,
    /// List only, delete nothing
    pub dry_run: bool,
}

impl CleanupConfig {
    /// Read the configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read the configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let namespace = lookup(NAMESPACE_VAR)
            .filter(|ns| !ns.is_empty())
            .unwrap_or_else(|| DEFAULT_OPERATOR_NAMESPACE.to_string());

        let label_selector = lookup(LABEL_SELECTOR_VAR).filter(|s| !s.is_empty());

        let dry_run = lookup(DRY_RUN_VAR)
            .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Self {
            namespace,
            label_selector,
            dry_run,
        }
    }

    pub fn list_params(&self) -> ListParams {
        match &self.label_selector {
            Some(selector) => ListParams::default().labels(selector),
            None => ListParams::default(),
        }
    }
}
