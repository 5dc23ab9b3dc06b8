//! Custom Resource Definitions the builders operate on

mod image_based_group_upgrade;
mod sriov_fec_node_config;
mod sriov_network_node_policy;

pub use image_based_group_upgrade::*;
pub use sriov_fec_node_config::*;
pub use sriov_network_node_policy::*;

use kube::CustomResourceExt;

use crate::Result;

/// Generate CRD YAML manifests for all custom resources
pub fn generate_crds() -> Result<Vec<String>> {
    Ok(vec![
        serde_yaml::to_string(&ImageBasedGroupUpgrade::crd())?,
        serde_yaml::to_string(&SriovNetworkNodePolicy::crd())?,
        serde_yaml::to_string(&SriovFecNodeConfig::crd())?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_one_manifest_per_resource() {
        let crds = generate_crds().expect("crds render");

        assert_eq!(crds.len(), 3);
        assert!(crds[0].contains("imagebasedgroupupgrades.lcm.openshift.io"));
        assert!(crds[1].contains("sriovnetworknodepolicies.sriovnetwork.openshift.io"));
        assert!(crds[2].contains("sriovfecnodeconfigs.sriovfec.intel.com"));
    }
}
