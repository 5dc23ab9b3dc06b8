//! Builder for ImageBasedGroupUpgrade resources

use std::collections::BTreeMap;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use tracing::debug;

use crate::builder::{Draft, ResourceBuilder};
use crate::client::ResourceApi;
use crate::crd::{
    ClusterLabelSelector, ConfigMapRef, ImageBasedGroupUpgrade, ImageBasedGroupUpgradeSpec,
    PlanItem, RolloutStrategy, SeedImageRef,
};
use crate::Result;

pub type IbguBuilder<C = kube::Client> = ResourceBuilder<ImageBasedGroupUpgrade, C>;

fn identity_draft(name: &str, namespace: &str) -> Draft<ImageBasedGroupUpgrade> {
    let ibgu = ImageBasedGroupUpgrade {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            ..Default::default()
        },
        spec: ImageBasedGroupUpgradeSpec::default(),
        status: None,
    };

    Draft::new(ibgu)
        .require(!name.is_empty(), "ibgu 'name' cannot be empty")
        .require(!namespace.is_empty(), "ibgu 'nsname' cannot be empty")
}

impl<C> ResourceBuilder<ImageBasedGroupUpgrade, C>
where
    C: ResourceApi<ImageBasedGroupUpgrade>,
{
    /// Start an empty ibgu definition with the given identity
    pub fn new(client: C, name: &str, namespace: &str) -> Self {
        debug!(
            "Initializing new ibgu structure with the following params: name: {}, nsname: {}",
            name, namespace
        );

        Self::from_draft(client, identity_draft(name, namespace))
    }

    /// Load an existing ibgu from the cluster
    pub async fn pull(client: C, name: &str, namespace: &str) -> Result<Self> {
        debug!("Pulling existing ibgu {} in namespace {}", name, namespace);

        Self::pull_from(client, identity_draft(name, namespace)).await
    }

    /// Select the target clusters by label, replacing any previous selectors
    pub fn with_cluster_label_selectors(self, labels: BTreeMap<String, String>) -> Self {
        debug!("Creating IBGU with {:?} cluster label selector", labels);

        self.configure(|ibgu| {
            if labels.is_empty() {
                return Err("can not apply empty cluster label selectors to the IBGU".to_string());
            }

            ibgu.spec.cluster_label_selectors = vec![ClusterLabelSelector {
                match_labels: labels,
            }];
            Ok(())
        })
    }

    /// Set the seed image and version
    pub fn with_seed_image_ref(self, seed_image: &str, seed_version: &str) -> Self {
        debug!(
            "Creating IBGU with {} seed image and {} seed version",
            seed_image, seed_version
        );

        self.configure(|ibgu| {
            if seed_image.is_empty() {
                return Err("seedImage cannot be empty".to_string());
            }

            if seed_version.is_empty() {
                return Err("seedVersion cannot be empty".to_string());
            }

            ibgu.spec.ibu_spec.seed_image_ref = SeedImageRef {
                image: seed_image.to_string(),
                version: seed_version.to_string(),
                pull_secret_ref: None,
            };
            Ok(())
        })
    }

    /// Append an OADP content config map
    pub fn with_oadp_content(self, name: &str, namespace: &str) -> Self {
        debug!(
            "Creating IBGU with OADP configmap {} in namespace {}",
            name, namespace
        );

        self.configure(|ibgu| {
            let content = config_map_ref("oadp content", name, namespace)?;
            ibgu.spec.ibu_spec.oadp_content.push(content);
            Ok(())
        })
    }

    /// Append an extra manifests config map
    pub fn with_extra_manifests(self, name: &str, namespace: &str) -> Self {
        debug!(
            "Creating IBGU with extra manifests configmap {} in namespace {}",
            name, namespace
        );

        self.configure(|ibgu| {
            let manifests = config_map_ref("extra manifests", name, namespace)?;
            ibgu.spec.ibu_spec.extra_manifests.push(manifests);
            Ok(())
        })
    }

    /// Append a plan step
    pub fn with_plan(self, actions: Vec<String>, max_concurrency: i32, timeout: i32) -> Self {
        debug!(
            "Creating IBGU with plan actions {:?}, maxConcurrency {} and timeout {}",
            actions, max_concurrency, timeout
        );

        self.configure(|ibgu| {
            if actions.is_empty() {
                return Err("plan actions cannot be empty".to_string());
            }

            if max_concurrency <= 0 {
                return Err("maxConcurrency must be greater than 0".to_string());
            }

            if timeout <= 0 {
                return Err("timeout must be greater than 0".to_string());
            }

            ibgu.spec.plan.push(PlanItem {
                actions,
                rollout_strategy: RolloutStrategy {
                    max_concurrency,
                    timeout,
                },
            });
            Ok(())
        })
    }
}

fn config_map_ref(
    what: &str,
    name: &str,
    namespace: &str,
) -> std::result::Result<ConfigMapRef, String> {
    if name.is_empty() {
        return Err(format!("{} name cannot be empty", what));
    }

    if namespace.is_empty() {
        return Err(format!("{} namespace cannot be empty", what));
    }

    Ok(ConfigMapRef {
        name: name.to_string(),
        namespace: namespace.to_string(),
    })
}
