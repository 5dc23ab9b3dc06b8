//! Collection helpers: list a namespace into builders, clean it up

use std::fmt::Debug;

use kube::api::ListParams;
use kube::{Resource, ResourceExt};
use tracing::{debug, warn};

use super::ResourceBuilder;
use crate::client::ResourceApi;
use crate::metrics;
use crate::{Error, Result};

/// List the resources of kind `K` in `namespace`, one builder per item
///
/// Builders come back in the order the server returned the items. An empty
/// namespace is rejected before any request is made.
pub async fn list<K, C>(
    client: &C,
    namespace: &str,
    params: &ListParams,
) -> Result<Vec<ResourceBuilder<K, C>>>
where
    K: Resource<DynamicType = ()> + Clone + Debug + Send + Sync + 'static,
    C: ResourceApi<K> + Clone,
{
    let kind = K::kind(&());

    debug!(
        "Listing {} in the namespace {} with the options {:?}",
        kind, namespace, params
    );

    if namespace.is_empty() {
        debug!("{} 'nsname' parameter can not be empty", kind);

        return Err(Error::InvalidArgument(format!(
            "failed to list {}, 'nsname' parameter is empty",
            K::plural(&())
        )));
    }

    let result = client.list(namespace, params).await;
    metrics::record(&kind, "list", &result);

    let items = result.map_err(|e| {
        debug!("Failed to list {} in the namespace {} due to {}", kind, namespace, e);
        e
    })?;

    Ok(items
        .into_iter()
        .map(|item| ResourceBuilder::from_object(client.clone(), item))
        .collect())
}

/// Delete every resource in `namespace` except the one named `keep`
///
/// Stops at the first failed deletion and returns its error; resources
/// deleted before that stay deleted.
pub async fn clean_all_except<K, C>(
    client: &C,
    namespace: &str,
    params: &ListParams,
    keep: &str,
) -> Result<()>
where
    K: Resource<DynamicType = ()> + Clone + Debug + Send + Sync + 'static,
    C: ResourceApi<K> + Clone,
{
    debug!(
        "Cleaning up {} in the {} namespace, keeping {:?}",
        K::plural(&()),
        namespace,
        keep
    );

    if namespace.is_empty() {
        return Err(Error::InvalidArgument(format!(
            "failed to clean up {}, 'operatornsname' parameter is empty",
            K::plural(&())
        )));
    }

    let builders = list::<K, C>(client, namespace, params).await?;

    for mut builder in builders {
        let name = builder.definition().name_any();
        if name == keep {
            continue;
        }

        if let Err(e) = builder.delete().await {
            warn!("Failed to delete {} {}: {}", K::kind(&()), name, e);
            return Err(e);
        }
    }

    Ok(())
}
