//! Trait abstractions over the chain and explorer seams.
//!
//! Every operation in [`crate::operations`] talks to contracts and block
//! explorers only through these traits. The alloy-backed implementations live
//! in [`crate::providers`]; in-memory fakes for tests live in
//! [`crate::testing`].
//!
//! # Example: Implementing a Test Fake
//!
//! ```rust,ignore
//! use rdat_oft::traits::CodeReader;
//! use std::collections::HashMap;
//!
//! struct FakeCode {
//!     code: HashMap<Address, Bytes>,
//! }
//!
//! #[async_trait::async_trait]
//! impl CodeReader for FakeCode {
//!     async fn code_at(&self, address: Address) -> Result<Bytes> {
//!         Ok(self.code.get(&address).cloned().unwrap_or_default())
//!     }
//! }
//! ```

use alloy_primitives::{Address, Bytes, B256, U256};
use async_trait::async_trait;
use std::time::{Duration, Instant};

use crate::error::Result;
use crate::protocol::{ConfirmedTx, EndpointId, MessagingFee, PeerAddress, SendParam, SendReceipt};
use crate::verification::{Submission, VerificationRequest, VerificationStatus};

/// The OApp peer registry of a deployed adapter or OFT.
///
/// Only the owner may call `setPeer`; implementations must surface the
/// revert as an error rather than a silent no-op.
#[async_trait]
pub trait PeerRegistry: Send + Sync {
    /// Address of the contract holding the registry
    fn address(&self) -> Address;

    async fn owner(&self) -> Result<Address>;

    /// Peer registered for `eid`, [`PeerAddress::ZERO`] when unset
    async fn peer(&self, eid: EndpointId) -> Result<PeerAddress>;

    /// Submits `setPeer(eid, peer)` and waits for confirmation
    async fn set_peer(&self, eid: EndpointId, peer: PeerAddress) -> Result<ConfirmedTx>;
}

/// ERC20 operations the bridge test needs on the source token
#[async_trait]
pub trait TokenLedger: Send + Sync {
    fn address(&self) -> Address;

    async fn balance_of(&self, account: Address) -> Result<U256>;

    /// Submits `approve(spender, amount)` and waits for confirmation
    async fn approve(&self, spender: Address, amount: U256) -> Result<ConfirmedTx>;
}

/// Fee quoting and sending through an OFT or OFT adapter
#[async_trait]
pub trait OftMessenger: Send + Sync {
    fn address(&self) -> Address;

    async fn quote_send(&self, param: &SendParam, pay_in_lz_token: bool) -> Result<MessagingFee>;

    /// Submits `send`, paying `fee.native_fee` as value, and waits for the
    /// receipt. The `OFTSent` event is decoded when present.
    async fn send(
        &self,
        param: &SendParam,
        fee: MessagingFee,
        refund_address: Address,
    ) -> Result<SendReceipt>;
}

/// Reads deployed bytecode
#[async_trait]
pub trait CodeReader: Send + Sync {
    /// Runtime code at `address`; empty when no contract is deployed there
    async fn code_at(&self, address: Address) -> Result<Bytes>;
}

/// Read-only calls against a candidate LayerZero endpoint
#[async_trait]
pub trait EndpointInspector: CodeReader {
    async fn endpoint_eid(&self, endpoint: Address) -> Result<u32>;

    async fn is_supported_eid(&self, endpoint: Address, eid: EndpointId) -> Result<bool>;

    async fn default_send_library(&self, endpoint: Address, eid: EndpointId) -> Result<Address>;
}

/// A contract created by a confirmed deployment transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeployedContract {
    pub address: Address,
    pub tx: ConfirmedTx,
}

/// Contract creation from the deployer account
#[async_trait]
pub trait ContractDeployer: CodeReader {
    /// Account paying for and signing deployments
    fn deployer(&self) -> Address;

    /// Deploys `init_code` (bytecode followed by encoded constructor args)
    /// with a plain creation transaction.
    async fn deploy(&self, init_code: Bytes) -> Result<DeployedContract>;

    /// Deploys `init_code` through the deterministic CREATE2 proxy.
    async fn deploy_create2(&self, salt: B256, init_code: Bytes) -> Result<DeployedContract>;
}

/// Reads the state a deployment is checked against right after creation
#[async_trait]
pub trait DeploymentReader: Send + Sync {
    async fn owner_of(&self, contract: Address) -> Result<Address>;

    /// `token()` of an adapter (the wrapped ERC20) or an OFT (itself)
    async fn token_of(&self, contract: Address) -> Result<Address>;

    async fn total_supply_of(&self, contract: Address) -> Result<U256>;
}

/// Source code verification on an Etherscan-compatible explorer
#[async_trait]
pub trait SourceVerifier: Send + Sync {
    /// Submits a verification request; the explorer either queues a job or
    /// reports the contract as already verified
    async fn submit(&self, request: &VerificationRequest) -> Result<Submission>;

    async fn check_status(&self, guid: &str) -> Result<VerificationStatus>;
}

/// Trait for time-based operations.
///
/// Lets verification polling run instantly under test.
#[async_trait]
pub trait Clock: Send + Sync {
    async fn sleep(&self, duration: Duration);

    fn now(&self) -> Instant;
}
