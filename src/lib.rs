//! Declarative builders for Kubernetes custom resources
//!
//! Each builder mirrors a CRD, collects configuration through chained
//! `with_*` calls and performs one round trip against the API server per
//! `get`, `exists`, `create` or `delete`.

pub mod adapters;
pub mod builder;
pub mod client;
pub mod config;
pub mod crd;
pub mod error;
pub mod metrics;

pub use error::{Error, Result};
