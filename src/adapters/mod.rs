//! Concrete builders mapping each custom resource onto the generic core

pub mod fec_node_config_builder;
pub mod ibgu_builder;
pub mod policy_builder;

pub use fec_node_config_builder::NodeConfigBuilder;
pub use ibgu_builder::IbguBuilder;
pub use policy_builder::{
    clean_all_network_node_policies, list_policy, PolicyBuilder, DEFAULT_POLICY_NAME,
};
