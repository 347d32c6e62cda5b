//! In-memory fakes of the chain and explorer traits
//!
//! The fakes keep the on-chain rules the operations depend on: `setPeer` is
//! owner gated, a freshly deployed OFT has no supply, CREATE2 addresses are
//! deterministic and an address with code cannot be deployed to twice. Every
//! fake records the calls it receives so tests can assert on what was sent.

use alloy_primitives::{keccak256, Address, Bytes, TxHash, B256, U256};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::chain::addresses::CREATE2_DEPLOYER;
use crate::error::{OftError, Result};
use crate::protocol::{
    ConfirmedTx, EndpointId, MessagingFee, OftSent, PeerAddress, SendParam, SendReceipt,
};
use crate::traits::{
    Clock, CodeReader, ContractDeployer, DeployedContract, DeploymentReader, EndpointInspector,
    OftMessenger, PeerRegistry, SourceVerifier, TokenLedger,
};
use crate::verification::{Submission, VerificationRequest, VerificationStatus};

static TX_COUNTER: AtomicU64 = AtomicU64::new(1);

/// A confirmed transaction with a unique hash
fn next_tx(gas_used: u64) -> ConfirmedTx {
    let n = TX_COUNTER.fetch_add(1, Ordering::Relaxed);
    ConfirmedTx {
        tx_hash: TxHash::left_padding_from(&n.to_be_bytes()),
        block_number: Some(n),
        gas_used,
    }
}

// ============================================================================
// Fake OApp
// ============================================================================

/// A `send` received by [`FakeOApp`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedSend {
    pub param: SendParam,
    pub value: U256,
    pub refund: Address,
}

/// An adapter or OFT with a peer registry and a fixed messaging fee.
///
/// Transactions are sent as `caller`, which defaults to the owner.
#[derive(Clone, Debug)]
pub struct FakeOApp {
    address: Address,
    owner: Address,
    caller: Address,
    native_fee: U256,
    emits_oft_sent: bool,
    peers: Arc<Mutex<HashMap<EndpointId, PeerAddress>>>,
    set_peer_calls: Arc<Mutex<Vec<(EndpointId, PeerAddress)>>>,
    sends: Arc<Mutex<Vec<RecordedSend>>>,
}

impl FakeOApp {
    pub fn new(address: Address, owner: Address) -> Self {
        Self {
            address,
            owner,
            caller: owner,
            native_fee: U256::ZERO,
            emits_oft_sent: true,
            peers: Arc::default(),
            set_peer_calls: Arc::default(),
            sends: Arc::default(),
        }
    }

    /// Sends subsequent transactions from `caller`
    pub fn acting_as(mut self, caller: Address) -> Self {
        self.caller = caller;
        self
    }

    pub fn with_fee(mut self, native_fee: U256) -> Self {
        self.native_fee = native_fee;
        self
    }

    /// Receipts of subsequent sends carry no `OFTSent` log
    pub fn without_oft_sent(mut self) -> Self {
        self.emits_oft_sent = false;
        self
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Peer stored for `eid`, zero when unset
    pub fn stored_peer(&self, eid: EndpointId) -> PeerAddress {
        self.peers
            .lock()
            .unwrap()
            .get(&eid)
            .copied()
            .unwrap_or(PeerAddress::ZERO)
    }

    /// Successful `setPeer` calls, in order
    pub fn set_peer_calls(&self) -> Vec<(EndpointId, PeerAddress)> {
        self.set_peer_calls.lock().unwrap().clone()
    }

    pub fn sent(&self) -> Vec<RecordedSend> {
        self.sends.lock().unwrap().clone()
    }
}

#[async_trait]
impl PeerRegistry for FakeOApp {
    fn address(&self) -> Address {
        self.address
    }

    async fn owner(&self) -> Result<Address> {
        Ok(self.owner)
    }

    async fn peer(&self, eid: EndpointId) -> Result<PeerAddress> {
        Ok(self.stored_peer(eid))
    }

    async fn set_peer(&self, eid: EndpointId, peer: PeerAddress) -> Result<ConfirmedTx> {
        if self.caller != self.owner {
            return Err(OftError::NotOwner {
                contract: self.address,
                caller: self.caller,
            });
        }
        self.peers.lock().unwrap().insert(eid, peer);
        self.set_peer_calls.lock().unwrap().push((eid, peer));
        Ok(next_tx(47_000))
    }
}

#[async_trait]
impl OftMessenger for FakeOApp {
    fn address(&self) -> Address {
        self.address
    }

    async fn quote_send(&self, _param: &SendParam, _pay_in_lz_token: bool) -> Result<MessagingFee> {
        Ok(MessagingFee {
            native_fee: self.native_fee,
            lz_token_fee: U256::ZERO,
        })
    }

    async fn send(
        &self,
        param: &SendParam,
        fee: MessagingFee,
        refund_address: Address,
    ) -> Result<SendReceipt> {
        if fee.native_fee < self.native_fee {
            return Err(OftError::TransactionFailed {
                reason: format!("NotEnoughNative({})", fee.native_fee),
            });
        }

        let tx = next_tx(180_000);
        self.sends.lock().unwrap().push(RecordedSend {
            param: param.clone(),
            value: fee.native_fee,
            refund: refund_address,
        });

        let oft_sent = self.emits_oft_sent.then(|| OftSent {
            guid: keccak256(tx.tx_hash),
            dst_eid: param.dst_eid().as_u32(),
            from: self.caller,
            amount_sent_ld: param.amount_ld(),
            amount_received_ld: param.amount_ld(),
        });
        Ok(SendReceipt { tx, oft_sent })
    }
}

// ============================================================================
// Fake Token
// ============================================================================

/// An ERC20 with per-account balances, all zero until set.
#[derive(Clone, Debug)]
pub struct FakeToken {
    address: Address,
    balances: Arc<Mutex<HashMap<Address, U256>>>,
    approvals: Arc<Mutex<Vec<(Address, U256)>>>,
}

impl FakeToken {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            balances: Arc::default(),
            approvals: Arc::default(),
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn set_balance(&self, account: Address, amount: U256) {
        self.balances.lock().unwrap().insert(account, amount);
    }

    /// `(spender, amount)` of every approval, in order
    pub fn approvals(&self) -> Vec<(Address, U256)> {
        self.approvals.lock().unwrap().clone()
    }
}

#[async_trait]
impl TokenLedger for FakeToken {
    fn address(&self) -> Address {
        self.address
    }

    async fn balance_of(&self, account: Address) -> Result<U256> {
        Ok(self
            .balances
            .lock()
            .unwrap()
            .get(&account)
            .copied()
            .unwrap_or_default())
    }

    async fn approve(&self, spender: Address, amount: U256) -> Result<ConfirmedTx> {
        self.approvals.lock().unwrap().push((spender, amount));
        Ok(next_tx(46_000))
    }
}

// ============================================================================
// Fake Chain
// ============================================================================

/// Read-only behavior of a deployed endpoint
#[derive(Clone, Debug)]
pub struct FakeEndpoint {
    eid: u32,
    supported: Vec<u32>,
    send_library: Address,
}

impl FakeEndpoint {
    pub fn new(eid: u32) -> Self {
        Self {
            eid,
            supported: Vec::new(),
            send_library: Address::with_last_byte(0x51),
        }
    }

    pub fn supporting(mut self, eids: &[u32]) -> Self {
        self.supported = eids.to_vec();
        self
    }
}

/// Owner, token and supply reported for a deployed adapter or OFT
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FakeContractState {
    pub owner: Address,
    /// Wrapped ERC20 of an adapter; `None` for an OFT, whose token is itself
    pub token: Option<Address>,
    pub total_supply: U256,
}

impl FakeContractState {
    pub fn adapter(owner: Address, token: Address) -> Self {
        Self {
            owner,
            token: Some(token),
            total_supply: U256::ZERO,
        }
    }

    /// An OFT straight out of its constructor: nothing minted
    pub fn oft(owner: Address) -> Self {
        Self {
            owner,
            token: None,
            total_supply: U256::ZERO,
        }
    }
}

/// Account code, contract creation and endpoint calls of a single chain.
///
/// Plain creations land at the deployer's CREATE addresses; CREATE2
/// deployments at the address the deterministic proxy would compute. Every
/// new contract starts with the state set by [`FakeChain::constructing`], an
/// OFT owned by the deployer unless configured.
#[derive(Clone, Debug)]
pub struct FakeChain {
    deployer: Address,
    nonce: Arc<AtomicU64>,
    code: Arc<Mutex<HashMap<Address, Bytes>>>,
    constructed: FakeContractState,
    contracts: Arc<Mutex<HashMap<Address, FakeContractState>>>,
    unreachable: Arc<Mutex<HashSet<Address>>>,
    endpoints: Arc<Mutex<HashMap<Address, FakeEndpoint>>>,
    deployments: Arc<Mutex<Vec<Address>>>,
}

impl FakeChain {
    pub fn new(deployer: Address) -> Self {
        Self {
            deployer,
            nonce: Arc::default(),
            code: Arc::default(),
            constructed: FakeContractState::oft(deployer),
            contracts: Arc::default(),
            unreachable: Arc::default(),
            endpoints: Arc::default(),
            deployments: Arc::default(),
        }
    }

    /// State every subsequently deployed contract starts with
    pub fn constructing(mut self, state: FakeContractState) -> Self {
        self.constructed = state;
        self
    }

    pub fn set_contract_state(&self, address: Address, state: FakeContractState) {
        self.contracts.lock().unwrap().insert(address, state);
    }

    /// Makes every `eth_getCode` for `address` fail
    pub fn fail_code_reads(&self, address: Address) {
        self.unreachable.lock().unwrap().insert(address);
    }

    pub fn install_code(&self, address: Address, code: impl Into<Bytes>) {
        self.code.lock().unwrap().insert(address, code.into());
    }

    /// Removes the code at `address`, as on a reset local chain
    pub fn clear_code(&self, address: Address) {
        self.code.lock().unwrap().remove(&address);
    }

    pub fn install_endpoint(&self, address: Address, endpoint: FakeEndpoint) {
        self.install_code(address, vec![0x60, 0x80, 0x60, 0x40]);
        self.endpoints.lock().unwrap().insert(address, endpoint);
    }

    /// Addresses of every contract deployed through this chain
    pub fn deployments(&self) -> Vec<Address> {
        self.deployments.lock().unwrap().clone()
    }

    fn endpoint(&self, address: Address) -> Result<FakeEndpoint> {
        self.endpoints
            .lock()
            .unwrap()
            .get(&address)
            .cloned()
            .ok_or_else(|| OftError::ContractCall("execution reverted".to_string()))
    }

    fn contract(&self, address: Address) -> Result<FakeContractState> {
        self.contracts
            .lock()
            .unwrap()
            .get(&address)
            .copied()
            .ok_or_else(|| OftError::ContractCall("execution reverted".to_string()))
    }

    fn create_at(&self, address: Address, init_code: Bytes) -> Result<DeployedContract> {
        let mut code = self.code.lock().unwrap();
        if code.contains_key(&address) {
            return Err(OftError::TransactionFailed {
                reason: format!("contract already deployed at {address}"),
            });
        }
        code.insert(address, init_code);
        self.set_contract_state(address, self.constructed);
        self.deployments.lock().unwrap().push(address);
        Ok(DeployedContract {
            address,
            tx: next_tx(2_500_000),
        })
    }
}

#[async_trait]
impl CodeReader for FakeChain {
    async fn code_at(&self, address: Address) -> Result<Bytes> {
        if self.unreachable.lock().unwrap().contains(&address) {
            return Err(OftError::Provider(format!(
                "eth_getCode({address}): connection reset"
            )));
        }
        Ok(self
            .code
            .lock()
            .unwrap()
            .get(&address)
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl EndpointInspector for FakeChain {
    async fn endpoint_eid(&self, endpoint: Address) -> Result<u32> {
        Ok(self.endpoint(endpoint)?.eid)
    }

    async fn is_supported_eid(&self, endpoint: Address, eid: EndpointId) -> Result<bool> {
        Ok(self.endpoint(endpoint)?.supported.contains(&eid.as_u32()))
    }

    async fn default_send_library(&self, endpoint: Address, eid: EndpointId) -> Result<Address> {
        let endpoint = self.endpoint(endpoint)?;
        if endpoint.supported.contains(&eid.as_u32()) {
            Ok(endpoint.send_library)
        } else {
            Err(OftError::ContractCall(format!(
                "LZ_DefaultSendLibUnavailable({})",
                eid.as_u32()
            )))
        }
    }
}

#[async_trait]
impl ContractDeployer for FakeChain {
    fn deployer(&self) -> Address {
        self.deployer
    }

    async fn deploy(&self, init_code: Bytes) -> Result<DeployedContract> {
        let nonce = self.nonce.fetch_add(1, Ordering::Relaxed);
        self.create_at(self.deployer.create(nonce), init_code)
    }

    async fn deploy_create2(&self, salt: B256, init_code: Bytes) -> Result<DeployedContract> {
        let address = CREATE2_DEPLOYER.create2_from_code(salt.0, &init_code);
        self.create_at(address, init_code)
    }
}

#[async_trait]
impl DeploymentReader for FakeChain {
    async fn owner_of(&self, contract: Address) -> Result<Address> {
        Ok(self.contract(contract)?.owner)
    }

    async fn token_of(&self, contract: Address) -> Result<Address> {
        Ok(self.contract(contract)?.token.unwrap_or(contract))
    }

    async fn total_supply_of(&self, contract: Address) -> Result<U256> {
        Ok(self.contract(contract)?.total_supply)
    }
}

// ============================================================================
// Fake Verifier
// ============================================================================

#[derive(Clone, Debug)]
enum SubmitBehavior {
    Queue,
    AlreadyVerified,
    Reject(String),
}

/// An explorer that answers status checks from a scripted sequence.
///
/// Once the sequence is exhausted every further check is pending.
#[derive(Clone, Debug)]
pub struct FakeVerifier {
    behavior: SubmitBehavior,
    statuses: Arc<Mutex<VecDeque<VerificationStatus>>>,
    submissions: Arc<Mutex<Vec<VerificationRequest>>>,
    status_checks: Arc<AtomicU64>,
}

impl FakeVerifier {
    fn with_behavior(behavior: SubmitBehavior, statuses: Vec<VerificationStatus>) -> Self {
        Self {
            behavior,
            statuses: Arc::new(Mutex::new(statuses.into())),
            submissions: Arc::default(),
            status_checks: Arc::default(),
        }
    }

    /// Accepts submissions and reports `statuses` on successive checks
    pub fn queued(statuses: Vec<VerificationStatus>) -> Self {
        Self::with_behavior(SubmitBehavior::Queue, statuses)
    }

    pub fn already_verified() -> Self {
        Self::with_behavior(SubmitBehavior::AlreadyVerified, Vec::new())
    }

    /// Rejects every submission with `message`
    pub fn rejecting(message: &str) -> Self {
        Self::with_behavior(SubmitBehavior::Reject(message.to_string()), Vec::new())
    }

    pub fn submissions(&self) -> Vec<VerificationRequest> {
        self.submissions.lock().unwrap().clone()
    }

    pub fn status_checks(&self) -> u64 {
        self.status_checks.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl SourceVerifier for FakeVerifier {
    async fn submit(&self, request: &VerificationRequest) -> Result<Submission> {
        self.submissions.lock().unwrap().push(request.clone());
        match &self.behavior {
            SubmitBehavior::Queue => Ok(Submission::Queued {
                guid: format!("fake-guid-{}", self.submissions.lock().unwrap().len()),
            }),
            SubmitBehavior::AlreadyVerified => Ok(Submission::AlreadyVerified),
            SubmitBehavior::Reject(message) => Err(OftError::Explorer(message.clone())),
        }
    }

    async fn check_status(&self, _guid: &str) -> Result<VerificationStatus> {
        self.status_checks.fetch_add(1, Ordering::Relaxed);
        Ok(self
            .statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(VerificationStatus::Pending))
    }
}

// ============================================================================
// Fake Clock
// ============================================================================

/// A clock whose `sleep` returns immediately and advances virtual time.
#[derive(Clone, Debug)]
pub struct FakeClock {
    current_time: Arc<Mutex<Instant>>,
    sleep_log: Arc<Mutex<Vec<Duration>>>,
}

impl Default for FakeClock {
    fn default() -> Self {
        Self {
            current_time: Arc::new(Mutex::new(Instant::now())),
            sleep_log: Arc::default(),
        }
    }
}

impl FakeClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_sleep_time(&self) -> Duration {
        self.sleep_log.lock().unwrap().iter().sum()
    }

    pub fn sleep_count(&self) -> usize {
        self.sleep_log.lock().unwrap().len()
    }
}

#[async_trait]
impl Clock for FakeClock {
    async fn sleep(&self, duration: Duration) {
        self.sleep_log.lock().unwrap().push(duration);
        *self.current_time.lock().unwrap() += duration;
    }

    fn now(&self) -> Instant {
        *self.current_time.lock().unwrap()
    }
}
