//! Discovery of the per-node SriovFecNodeConfig

use tracing::debug;

use crate::builder::{Draft, ResourceBuilder};
use crate::client::ResourceApi;
use crate::crd::{SriovFecNodeConfig, SriovFecNodeConfigSpec};
use crate::Result;

pub type NodeConfigBuilder<C = kube::Client> = ResourceBuilder<SriovFecNodeConfig, C>;

impl<C> ResourceBuilder<SriovFecNodeConfig, C>
where
    C: ResourceApi<SriovFecNodeConfig>,
{
    /// Point at the config of `node_name` in the SR-IOV FEC operator namespace
    pub fn new(client: C, node_name: &str, namespace: &str) -> Self {
        debug!(
            "Initializing new NodeConfigBuilder structure with the following params: {}, {}",
            node_name, namespace
        );

        let mut config = SriovFecNodeConfig::new(node_name, SriovFecNodeConfigSpec::default());
        config.metadata.namespace = Some(namespace.to_string());

        let draft = Draft::new(config)
            .require(!node_name.is_empty(), "SriovFecNodeConfig 'nodeName' is empty")
            .require(!namespace.is_empty(), "SriovFecNodeConfig 'nsname' is empty");

        Self::from_draft(client, draft)
    }

    /// Fetch the node's config and keep it as the observed object
    pub async fn discover(&mut self) -> Result<&SriovFecNodeConfig> {
        let config = self.get().await?;

        debug!(
            "Discovered SriovFecNodeConfig with {} accelerators",
            config
                .status
                .as_ref()
                .map_or(0, |status| status.inventory.sriov_accelerators.len())
        );

        Ok(self.observe(config))
    }
}
