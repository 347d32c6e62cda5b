//! Operational steps behind each subcommand
//!
//! Each step is an ordered pipeline over the traits in [`crate::traits`]:
//! every remote call is awaited and its confirmed result feeds the next call.

pub mod artifacts;
pub mod bridge_test;
pub mod convert;
pub mod deploy;
pub mod probe;
pub mod records;
pub mod verify;
pub mod wire;

pub use artifacts::{ArtifactStore, BuildInfo, HardhatArtifact};
pub use bridge_test::{run_bridge_test, BridgeTestParams, BridgeTestReport, ONE_RDAT};
pub use convert::SolanaPeerConversion;
pub use deploy::{
    deploy_contract, CheckStatus, ContractKind, DeployOutcome, DeployReport, DeploymentCheck,
    DeploymentPlan, VerifyContext, ADAPTER_CONTRACT, OFT_CONTRACT,
};
pub use probe::{probe_endpoint, probe_endpoints, ProbeCheck, ProbeReport, ProbeVerdict};
pub use records::{DeploymentRecord, DeploymentStore};
pub use verify::{poll_verification, verify_best_effort};
pub use wire::{rdat_links, wire_peers, wire_rdat, LinkOutcome, LinkStatus, PeerLink, WireReport};
