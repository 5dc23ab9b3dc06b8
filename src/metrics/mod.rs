//! Prometheus metrics for cluster round trips made by the builders

pub mod prometheus;

pub use self::prometheus::*;
