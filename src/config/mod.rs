//! Configuration
//!
//! Environment-driven settings for each command, the declarative wiring
//! graph and explorer polling behavior.

mod commands;
pub mod env;
mod polling;
pub mod wiring;

pub use commands::{
    BridgeTestConfig, DeployAdapterConfig, DeployOftConfig, DeploySettings, ProbeConfig,
    WireConfig, DEFAULT_ARTIFACTS_DIR, DEFAULT_DEPLOYMENTS_DIR,
};
pub use env::EnvSource;
pub use polling::PollingConfig;
pub use wiring::OAppGraph;
