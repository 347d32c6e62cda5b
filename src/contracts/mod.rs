//! Contract bindings
//!
//! Alloy-generated bindings for the bridge contracts, the LayerZero endpoint
//! and the RDAT ERC20, each wrapped in an instrumented contract type.

pub mod constructor;
pub mod endpoint;
pub mod erc20;
pub mod oft;
