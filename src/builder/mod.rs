//! Generic builder core shared by every concrete resource builder
//!
//! A [`ResourceBuilder`] pairs a [`Draft`] (the desired state being
//! configured) with the last object observed in the cluster and the client
//! used to reach it. Configuration steps consume and return the builder so
//! they chain; terminal operations (`get`, `exists`, `create`, `delete`)
//! check the draft before issuing any request.

mod draft;
mod list;

pub use draft::Draft;
pub use list::{clean_all_except, list};

use std::fmt::Debug;

use kube::{Resource, ResourceExt};
use tracing::{debug, info};

use crate::client::{is_not_found, ResourceApi};
use crate::metrics;
use crate::Result;

/// Desired state, observed state and cluster handle for one resource
pub struct ResourceBuilder<K, C = kube::Client> {
    draft: Draft<K>,
    object: Option<K>,
    client: C,
}

impl<K, C> ResourceBuilder<K, C>
where
    K: Resource<DynamicType = ()> + Clone + Debug + Send + Sync + 'static,
    C: ResourceApi<K>,
{
    /// Wrap a draft; nothing is sent to the cluster
    pub fn from_draft(client: C, draft: Draft<K>) -> Self {
        if let Some(reason) = draft.reason() {
            debug!("The {} builder starts out invalid: {}", K::kind(&()), reason);
        }

        Self {
            draft,
            object: None,
            client,
        }
    }

    /// Wrap an object returned by the cluster as both definition and object
    pub fn from_object(client: C, object: K) -> Self {
        Self {
            draft: Draft::new(object.clone()),
            object: Some(object),
            client,
        }
    }

    /// Fetch an existing resource into a fresh builder
    ///
    /// `draft` carries the identity to look up; an invalid draft is returned
    /// as its error without contacting the cluster.
    pub async fn pull_from(client: C, draft: Draft<K>) -> Result<Self> {
        let mut builder = Self::from_draft(client, draft);
        let object = builder.get().await?;

        debug!(
            "Pulled {} {}/{}",
            K::kind(&()),
            object.namespace().unwrap_or_default(),
            object.name_any()
        );

        builder.draft = Draft::new(object.clone());
        builder.object = Some(object);
        Ok(builder)
    }

    pub fn definition(&self) -> &K {
        self.draft.definition()
    }

    /// Last object observed in the cluster
    pub fn object(&self) -> Option<&K> {
        self.object.as_ref()
    }

    /// Recorded construction or configuration error
    pub fn error(&self) -> Option<&str> {
        self.draft.reason()
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Apply one configuration step to the definition
    ///
    /// The step runs only while the builder is valid. Returning `Err` records
    /// the message as the builder's error and discards the step's changes.
    pub fn configure<F>(self, step: F) -> Self
    where
        F: FnOnce(&mut K) -> std::result::Result<(), String>,
    {
        if let Some(reason) = self.draft.reason() {
            debug!("The {} builder has error message: {}", K::kind(&()), reason);
            return self;
        }

        let draft = self.draft.apply(step);
        if let Some(reason) = draft.reason() {
            debug!("Rejected {} configuration: {}", K::kind(&()), reason);
        }

        Self {
            draft,
            object: self.object,
            client: self.client,
        }
    }

    /// The definition, or the recorded error
    pub fn validate(&self) -> Result<&K> {
        self.draft.check()
    }

    fn identity(definition: &K) -> (String, String) {
        (
            definition.namespace().unwrap_or_default(),
            definition.name_any(),
        )
    }

    /// Fetch the resource named by the definition; never stores the result
    pub async fn get(&self) -> Result<K> {
        let definition = self.validate()?;
        let (namespace, name) = Self::identity(definition);

        debug!("Getting {} {} in namespace {}", K::kind(&()), name, namespace);

        let result = self.client.get(&namespace, &name).await;
        metrics::record(&K::kind(&()), "get", &result);

        Ok(result?)
    }

    /// Refresh the observed object and report whether the resource exists
    ///
    /// Any error other than not-found also reports `true`; the error itself
    /// surfaces from the next operation that needs the cluster.
    pub async fn exists(&mut self) -> bool {
        if self.validate().is_err() {
            return false;
        }

        debug!(
            "Checking if {} {} exists",
            K::kind(&()),
            self.definition().name_any()
        );

        match self.get().await {
            Ok(object) => {
                self.object = Some(object);
                true
            }
            Err(err) => {
                self.object = None;
                !err.is_not_found()
            }
        }
    }

    /// Create the resource unless it already exists
    pub async fn create(&mut self) -> Result<&mut Self> {
        let definition = self.validate()?.clone();
        let (namespace, name) = Self::identity(&definition);

        debug!("Creating {} {} in namespace {}", K::kind(&()), name, namespace);

        if !self.exists().await {
            let result = self.client.create(&namespace, &definition).await;
            metrics::record(&K::kind(&()), "create", &result);

            self.object = Some(result?);
            info!("Created {} {}/{}", K::kind(&()), namespace, name);
        }

        Ok(self)
    }

    /// Delete the resource; deleting a missing resource succeeds
    pub async fn delete(&mut self) -> Result<()> {
        let (namespace, name) = Self::identity(self.validate()?);

        debug!("Deleting {} {} in namespace {}", K::kind(&()), name, namespace);

        if !self.exists().await {
            self.object = None;
            return Ok(());
        }

        // Target the observed object; it is absent only when the lookup
        // failed with something other than not-found.
        let observed = self.object.is_some();
        let (namespace, name) = match &self.object {
            Some(object) => (object.namespace().unwrap_or(namespace), object.name_any()),
            None => (namespace, name),
        };

        let result = self.client.delete(&namespace, &name).await;
        metrics::record(&K::kind(&()), "delete", &result);

        match result {
            Ok(()) => {}
            Err(err) if !observed && is_not_found(&err) => {
                debug!("{} {}/{} was already gone", K::kind(&()), namespace, name);
                self.object = None;
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        }

        self.object = None;
        info!("Deleted {} {}/{}", K::kind(&()), namespace, name);

        Ok(())
    }

    /// Store an object fetched outside of `exists`
    pub(crate) fn observe(&mut self, object: K) -> &K {
        self.object.insert(object)
    }
}
