//! Network descriptors and well-known addresses
//!
//! This module contains the static per-network configuration (chain id,
//! endpoint id, RPC and explorer URLs) and the addresses the operational
//! commands refer to by default.

pub mod addresses;
mod network;

pub use network::{ExplorerConfig, NetworkDescriptor, NetworkName, TxKind};
