//! Builder, listing and cleanup for SriovNetworkNodePolicy resources

use std::collections::BTreeMap;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::api::ListParams;
use tracing::debug;

use crate::builder::{self, Draft, ResourceBuilder};
use crate::client::ResourceApi;
use crate::crd::{NicSelector, SriovNetworkNodePolicy, SriovNetworkNodePolicySpec};
use crate::Result;

pub type PolicyBuilder<C = kube::Client> = ResourceBuilder<SriovNetworkNodePolicy, C>;

/// Policy the SR-IOV operator creates itself and requires to stay in place
pub const DEFAULT_POLICY_NAME: &str = "default";

const DEVICE_TYPES: [&str; 2] = ["netdevice", "vfio-pci"];

const MAX_MTU: i32 = 9192;

const MAX_PRIORITY: i32 = 99;

impl<C> ResourceBuilder<SriovNetworkNodePolicy, C>
where
    C: ResourceApi<SriovNetworkNodePolicy>,
{
    /// Start a policy exposing `num_vfs` VFs of `nic_names` as `resource_name`
    pub fn new(
        client: C,
        name: &str,
        namespace: &str,
        resource_name: &str,
        num_vfs: i32,
        nic_names: Vec<String>,
        node_selector: BTreeMap<String, String>,
    ) -> Self {
        debug!(
            "Initializing new policy structure with the following params: {}, {}, {}, {}, {:?}, {:?}",
            name, namespace, resource_name, num_vfs, nic_names, node_selector
        );

        let draft = Draft::new(SriovNetworkNodePolicy {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                namespace: Some(namespace.to_string()),
                ..Default::default()
            },
            spec: SriovNetworkNodePolicySpec {
                resource_name: resource_name.to_string(),
                num_vfs,
                nic_selector: NicSelector {
                    pf_names: nic_names.clone(),
                    ..Default::default()
                },
                node_selector: node_selector.clone(),
                ..Default::default()
            },
        })
        .require(!name.is_empty(), "SriovNetworkNodePolicy 'name' cannot be empty")
        .require(
            !namespace.is_empty(),
            "SriovNetworkNodePolicy 'nsname' cannot be empty",
        )
        .require(
            !resource_name.is_empty(),
            "SriovNetworkNodePolicy 'resourceName' cannot be empty",
        )
        .require(
            num_vfs > 0,
            "SriovNetworkNodePolicy 'numVfs' must be greater than 0",
        )
        .require(
            !nic_names.is_empty(),
            "SriovNetworkNodePolicy 'nicNames' cannot be empty",
        )
        .require(
            !node_selector.is_empty(),
            "SriovNetworkNodePolicy 'nodeSelector' cannot be empty",
        );

        Self::from_draft(client, draft)
    }

    /// Load an existing policy from the cluster
    pub async fn pull(client: C, name: &str, namespace: &str) -> Result<Self> {
        debug!("Pulling existing policy {} in namespace {}", name, namespace);

        let mut policy = SriovNetworkNodePolicy::new(name, SriovNetworkNodePolicySpec::default());
        policy.metadata.namespace = Some(namespace.to_string());

        let draft = Draft::new(policy)
            .require(!name.is_empty(), "SriovNetworkNodePolicy 'name' cannot be empty")
            .require(
                !namespace.is_empty(),
                "SriovNetworkNodePolicy 'nsname' cannot be empty",
            );

        Self::pull_from(client, draft).await
    }

    /// Set the VF driver type, `netdevice` or `vfio-pci`
    pub fn with_device_type(self, device_type: &str) -> Self {
        debug!("Defining SriovNetworkNodePolicy with device type {}", device_type);

        self.configure(|policy| {
            if !DEVICE_TYPES.contains(&device_type) {
                return Err(format!(
                    "invalid device type {}, allowed devType values are: {:?}",
                    device_type, DEVICE_TYPES
                ));
            }

            policy.spec.device_type = Some(device_type.to_string());
            Ok(())
        })
    }

    pub fn with_mtu(self, mtu: i32) -> Self {
        debug!("Defining SriovNetworkNodePolicy with mtu {}", mtu);

        self.configure(|policy| {
            if !(1..=MAX_MTU).contains(&mtu) {
                return Err(format!(
                    "invalid mtu size {}, allowed mtu should be in range 1...{}",
                    mtu, MAX_MTU
                ));
            }

            policy.spec.mtu = Some(mtu);
            Ok(())
        })
    }

    /// Set the policy priority; 0 wins over 99
    pub fn with_priority(self, priority: i32) -> Self {
        debug!("Defining SriovNetworkNodePolicy with priority {}", priority);

        self.configure(|policy| {
            if !(0..=MAX_PRIORITY).contains(&priority) {
                return Err(format!(
                    "invalid priority {}, allowed priority should be in range 0...{}",
                    priority, MAX_PRIORITY
                ));
            }

            policy.spec.priority = Some(priority);
            Ok(())
        })
    }

    pub fn with_rdma(self, rdma: bool) -> Self {
        debug!("Defining SriovNetworkNodePolicy with rdma {}", rdma);

        self.configure(|policy| {
            policy.spec.is_rdma = rdma;
            Ok(())
        })
    }

    /// Restrict every PF name to the VF index range `first..=last`
    pub fn with_vf_range(self, first: i32, last: i32) -> Self {
        debug!("Defining SriovNetworkNodePolicy with vf range {}-{}", first, last);

        self.configure(|policy| {
            if first < 0 || last < 0 {
                return Err("vf range bounds cannot be negative".to_string());
            }

            if first > last {
                return Err(format!(
                    "first vf index {} is greater than last vf index {}",
                    first, last
                ));
            }

            if last >= policy.spec.num_vfs {
                return Err(format!(
                    "last vf index {} is out of range for {} vfs",
                    last, policy.spec.num_vfs
                ));
            }

            for pf_name in policy.spec.nic_selector.pf_names.iter_mut() {
                let base = pf_name.split('#').next().unwrap_or_default().to_string();
                *pf_name = format!("{}#{}-{}", base, first, last);
            }
            Ok(())
        })
    }
}

/// List the SriovNetworkNodePolicies in `namespace`
pub async fn list_policy<C>(
    client: &C,
    namespace: &str,
    params: &ListParams,
) -> Result<Vec<PolicyBuilder<C>>>
where
    C: ResourceApi<SriovNetworkNodePolicy> + Clone,
{
    builder::list(client, namespace, params).await
}

/// Remove every SriovNetworkNodePolicy in the operator namespace except the
/// operator-owned `default` one
pub async fn clean_all_network_node_policies<C>(
    client: &C,
    operator_namespace: &str,
    params: &ListParams,
) -> Result<()>
where
    C: ResourceApi<SriovNetworkNodePolicy> + Clone,
{
    builder::clean_all_except::<SriovNetworkNodePolicy, C>(
        client,
        operator_namespace,
        params,
        DEFAULT_POLICY_NAME,
    )
    .await
}
