//! Cluster API handle consumed by the builders
//!
//! Builders never talk to `kube::Api` directly. They go through
//! [`ResourceApi`], which `kube::Client` implements for every namespaced
//! resource and [`MemoryCluster`] implements for tests and dry runs.

mod memory;

pub use memory::{MemoryCluster, Request, Verb};

use std::fmt::Debug;

use async_trait::async_trait;
use kube::api::{DeleteParams, ListParams, PostParams};
use kube::core::NamespaceResourceScope;
use kube::{Api, Client, Resource};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Typed CRUD operations over one namespaced resource collection
#[async_trait]
pub trait ResourceApi<K>: Send + Sync
where
    K: Send + Sync + 'static,
{
    /// Point lookup by namespace and name
    async fn get(&self, namespace: &str, name: &str) -> Result<K, kube::Error>;

    /// Collection query in a namespace, in server order
    async fn list(&self, namespace: &str, params: &ListParams) -> Result<Vec<K>, kube::Error>;

    /// Submit a new object, returning what the server stored
    async fn create(&self, namespace: &str, object: &K) -> Result<K, kube::Error>;

    /// Remove an object by name
    async fn delete(&self, namespace: &str, name: &str) -> Result<(), kube::Error>;
}

#[async_trait]
impl<K> ResourceApi<K> for Client
where
    K: Resource<Scope = NamespaceResourceScope>
        + Clone
        + DeserializeOwned
        + Serialize
        + Debug
        + Send
        + Sync
        + 'static,
    K::DynamicType: Default,
{
    async fn get(&self, namespace: &str, name: &str) -> Result<K, kube::Error> {
        let api: Api<K> = Api::namespaced(self.clone(), namespace);
        api.get(name).await
    }

    async fn list(&self, namespace: &str, params: &ListParams) -> Result<Vec<K>, kube::Error> {
        let api: Api<K> = Api::namespaced(self.clone(), namespace);
        Ok(api.list(params).await?.items)
    }

    async fn create(&self, namespace: &str, object: &K) -> Result<K, kube::Error> {
        let api: Api<K> = Api::namespaced(self.clone(), namespace);
        api.create(&PostParams::default(), object).await
    }

    async fn delete(&self, namespace: &str, name: &str) -> Result<(), kube::Error> {
        let api: Api<K> = Api::namespaced(self.clone(), namespace);
        api.delete(name, &DeleteParams::default()).await.map(|_| ())
    }
}

/// True when the API server answered with 404 Not Found
pub fn is_not_found(err: &kube::Error) -> bool {
    matches!(err, kube::Error::Api(response) if response.code == 404)
}
