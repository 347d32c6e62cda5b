//! # rdat-oft
//!
//! Deployment and operations tooling for the RDAT omnichain fungible token
//! (OFT) bridge on LayerZero V2.
//!
//! RDAT lives natively on Vana. An `RdatOFTAdapter` on Vana locks and unlocks
//! the existing token while an `RdatOFT` on Base (and on Solana, through its
//! own toolchain) mints and burns the bridged supply. This crate deploys the
//! EVM contracts, registers them as each other's peers, emits the wiring
//! configuration consumed by the LayerZero tooling and runs test transfers.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rdat_oft::operations::{run_bridge_test, BridgeTestParams};
//! use rdat_oft::providers::AlloyChainClient;
//! use rdat_oft::{NetworkName, OftError};
//! use alloy_primitives::address;
//! use alloy_signer_local::PrivateKeySigner;
//!
//! # async fn example() -> Result<(), OftError> {
//! let network = NetworkName::Vana.descriptor();
//! let signer: PrivateKeySigner = std::env::var("DEPLOYER_PRIVATE_KEY")
//!     .unwrap()
//!     .parse()
//!     .unwrap();
//! let sender = signer.address();
//! let client = AlloyChainClient::connect(network, network.default_rpc_url.parse().unwrap(), signer, false);
//!
//! let adapter = client.oapp(address!("d546C45872eeA596155EAEAe9B8495f02ca4fc58"));
//! let token = client.token(address!("2c1cb46c1a4d9b5d6e1c1e5bc1f2ae4c3d5e6f70"));
//!
//! let params = BridgeTestParams::builder().sender(sender).build();
//! let report = run_bridge_test(&token, &adapter, &params).await?;
//! println!("track it at {}", report.scan_url);
//! # Ok(())
//! # }
//! ```
//!
//! ## Peers
//!
//! Every OApp keeps a `peers(eid) -> bytes32` mapping. EVM addresses are left
//! padded to 32 bytes; Solana accounts are their raw 32-byte public key:
//!
//! ```rust
//! use rdat_oft::{EndpointId, PeerAddress};
//!
//! let peer = PeerAddress::parse_for(
//!     EndpointId::Solana,
//!     "FkVGPvVoE3oYoz6EDuJ3ZP2D9aSgM5HHuxk3jf9ckU35",
//! )
//! .unwrap();
//! assert!(peer.to_evm().is_none());
//! ```
//!
//! ## Public API
//!
//! - [`operations`] - deploy, wire, bridge test, endpoint probe and address conversion
//! - [`traits`] - the chain and explorer seams every operation runs over
//! - [`providers`] - alloy and explorer implementations of those traits
//! - [`testing`] - in-memory fakes of the same traits
//! - [`config`] - environment-driven command configuration and the wiring graph
//! - [`OftError`] and [`Result`] - error types for error handling

pub mod chain;
pub mod config;
mod contracts;
mod error;
pub mod operations;
mod protocol;
mod provider;
pub mod providers;
pub mod testing;
pub mod traits;
mod verification;

pub use chain::addresses::{
    COMMON_ENDPOINT_V2, CREATE2_DEPLOYER, SOLANA_RDAT_OFT_STORE, VANA_ENDPOINT_V2,
    VANA_RDAT_ADAPTER,
};
pub use chain::{ExplorerConfig, NetworkDescriptor, NetworkName};
pub use contracts::{
    constructor::{adapter_constructor_args, oft_constructor_args, OFT_NAME, OFT_SYMBOL},
    endpoint::EndpointContract,
    erc20::Erc20Contract,
    oft::OftContract,
};
pub use config::PollingConfig;
pub use error::{OftError, Result};
pub use protocol::{
    layerzero_scan_url, ChainFamily, ConfirmedTx, EndpointId, ExecutorOptionType,
    ExecutorOptions, InvalidEndpointId, MessagingFee, OftSent, PeerAddress, SendParam,
    SendReceipt,
};
pub use provider::{apply_gas_buffer, DEFAULT_GAS_BUFFER_PERCENT};
pub use verification::{
    Submission, VerificationOutcome, VerificationRequest, VerificationStatus,
};

// Public module for advanced users who need custom instrumentation
pub mod spans;
