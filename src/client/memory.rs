//! In-memory stand-in for the API server
//!
//! Holds objects of a single kind keyed by namespace and name, records every
//! request it serves, and can be told to fail specific requests. Clones share
//! the same state, so a test can keep one handle while a builder owns another.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use kube::api::ListParams;
use kube::error::ErrorResponse;
use kube::{Resource, ResourceExt};

use super::ResourceApi;

/// Kind of request served by the cluster
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Verb {
    Get,
    List,
    Create,
    Delete,
}

/// A request as seen by the cluster
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Request {
    pub verb: Verb,
    pub namespace: String,
    /// Object name; `None` for list requests
    pub name: Option<String>,
}

struct State<K> {
    objects: BTreeMap<(String, String), K>,
    requests: Vec<Request>,
    failures: HashMap<(Verb, String), String>,
}

/// In-memory cluster holding objects of kind `K`
pub struct MemoryCluster<K> {
    state: Arc<Mutex<State<K>>>,
}

impl<K> Clone for MemoryCluster<K> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<K> Default for MemoryCluster<K> {
    fn default() -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                objects: BTreeMap::new(),
                requests: Vec::new(),
                failures: HashMap::new(),
            })),
        }
    }
}

impl<K> MemoryCluster<K>
where
    K: Resource<DynamicType = ()> + Clone,
{
    /// Create an empty cluster
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object without recording a request
    pub fn insert(&self, object: K) {
        let key = (object.namespace().unwrap_or_default(), object.name_any());
        self.lock().objects.insert(key, object);
    }

    /// Builder-style variant of [`MemoryCluster::insert`]
    pub fn with_object(self, object: K) -> Self {
        self.insert(object);
        self
    }

    /// Make every `verb` request against `target` fail with a 500 carrying
    /// `message`; list requests are matched by namespace, the rest by name
    pub fn fail_on(&self, verb: Verb, target: &str, message: &str) {
        self.lock()
            .failures
            .insert((verb, target.to_string()), message.to_string());
    }

    /// Stored object, if any
    pub fn object(&self, namespace: &str, name: &str) -> Option<K> {
        self.lock()
            .objects
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
    }

    pub fn contains(&self, namespace: &str, name: &str) -> bool {
        self.object(namespace, name).is_some()
    }

    /// Names of all stored objects in `namespace`, sorted
    pub fn names(&self, namespace: &str) -> Vec<String> {
        self.lock()
            .objects
            .keys()
            .filter(|(ns, _)| ns == namespace)
            .map(|(_, name)| name.clone())
            .collect()
    }

    /// Every request served so far, in arrival order
    pub fn requests(&self) -> Vec<Request> {
        self.lock().requests.clone()
    }

    /// Requests of one verb, in arrival order
    pub fn requests_of(&self, verb: Verb) -> Vec<Request> {
        self.lock()
            .requests
            .iter()
            .filter(|r| r.verb == verb)
            .cloned()
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, State<K>> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Record the request and return the injected failure for it, if any
    fn begin(&self, verb: Verb, namespace: &str, name: Option<&str>) -> Result<(), kube::Error> {
        let mut state = self.lock();
        state.requests.push(Request {
            verb,
            namespace: namespace.to_string(),
            name: name.map(str::to_string),
        });

        let target = name.unwrap_or(namespace);
        let injected = state.failures.get(&(verb, target.to_string())).cloned();
        match injected {
            Some(message) => Err(api_error(500, "InternalError", message)),
            None => Ok(()),
        }
    }

    fn not_found(name: &str) -> kube::Error {
        api_error(
            404,
            "NotFound",
            format!("{} \"{}\" not found", K::plural(&()), name),
        )
    }
}

#[async_trait]
impl<K> ResourceApi<K> for MemoryCluster<K>
where
    K: Resource<DynamicType = ()> + Clone + Send + Sync + 'static,
{
    async fn get(&self, namespace: &str, name: &str) -> Result<K, kube::Error> {
        self.begin(Verb::Get, namespace, Some(name))?;
        self.object(namespace, name)
            .ok_or_else(|| Self::not_found(name))
    }

    /// Label and field selectors are honoured; `limit` and `continue_token`
    /// are ignored and every match is returned in one page
    async fn list(&self, namespace: &str, params: &ListParams) -> Result<Vec<K>, kube::Error> {
        self.begin(Verb::List, namespace, None)?;
        let state = self.lock();
        let items = state
            .objects
            .iter()
            .filter(|((ns, _), _)| ns == namespace)
            .map(|(_, object)| object)
            .filter(|object| {
                params
                    .label_selector
                    .as_deref()
                    .map_or(true, |selector| matches_labels(selector, object.labels()))
            })
            .filter(|object| {
                params.field_selector.as_deref().map_or(true, |selector| {
                    matches_fields(selector, &object.name_any(), namespace)
                })
            })
            .cloned()
            .collect();
        Ok(items)
    }

    async fn create(&self, namespace: &str, object: &K) -> Result<K, kube::Error> {
        let name = object.name_any();
        self.begin(Verb::Create, namespace, Some(&name))?;

        let mut state = self.lock();
        let key = (namespace.to_string(), name.clone());
        if state.objects.contains_key(&key) {
            return Err(api_error(
                409,
                "AlreadyExists",
                format!("{} \"{}\" already exists", K::plural(&()), name),
            ));
        }

        let mut stored = object.clone();
        stored.meta_mut().namespace = Some(namespace.to_string());
        state.objects.insert(key, stored.clone());
        Ok(stored)
    }

    async fn delete(&self, namespace: &str, name: &str) -> Result<(), kube::Error> {
        self.begin(Verb::Delete, namespace, Some(name))?;
        self.lock()
            .objects
            .remove(&(namespace.to_string(), name.to_string()))
            .map(|_| ())
            .ok_or_else(|| Self::not_found(name))
    }
}

fn api_error(code: u16, reason: &str, message: String) -> kube::Error {
    kube::Error::Api(ErrorResponse {
        status: "Failure".to_string(),
        message,
        reason: reason.to_string(),
        code,
    })
}

/// Equality-based label selector: `k=v`, `k==v`, `k!=v`, `k` and `!k`
fn matches_labels(selector: &str, labels: &BTreeMap<String, String>) -> bool {
    selector
        .split(',')
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .all(|term| {
            if let Some((key, value)) = term.split_once("!=") {
                labels.get(key.trim()).map(String::as_str) != Some(value.trim())
            } else if let Some((key, value)) = term.split_once("==").or_else(|| term.split_once('=')) {
                labels.get(key.trim()).map(String::as_str) == Some(value.trim())
            } else if let Some(key) = term.strip_prefix('!') {
                !labels.contains_key(key.trim())
            } else {
                labels.contains_key(term)
            }
        })
}

/// Field selector over `metadata.name` and `metadata.namespace`
fn matches_fields(selector: &str, name: &str, namespace: &str) -> bool {
    selector
        .split(',')
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .all(|term| {
            let (field, value, negated) = match term.split_once("!=") {
                Some((field, value)) => (field, value, true),
                None => match term.split_once("==").or_else(|| term.split_once('=')) {
                    Some((field, value)) => (field, value, false),
                    None => return false,
                },
            };
            let actual = match field.trim() {
                "metadata.name" => name,
                "metadata.namespace" => namespace,
                _ => return false,
            };
            (actual == value.trim()) != negated
        })
}
