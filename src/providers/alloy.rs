//! Alloy-backed implementations of the chain traits.

use alloy_network::{Ethereum, ReceiptResponse, TransactionBuilder};
use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_provider::{DynProvider, Provider};
use alloy_rpc_types::{TransactionReceipt, TransactionRequest};
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use tracing::{debug, info, instrument, Instrument};
use url::Url;

use crate::chain::addresses::CREATE2_DEPLOYER;
use crate::chain::{NetworkDescriptor, TxKind};
use crate::contracts::endpoint::EndpointContract;
use crate::contracts::erc20::Erc20Contract;
use crate::contracts::oft::{find_oft_sent, OftContract};
use crate::error::{OftError, Result};
use crate::protocol::{ConfirmedTx, EndpointId, MessagingFee, PeerAddress, SendParam, SendReceipt};
use crate::provider::{connect_read_only, connect_signer, estimate_gas_with_buffer};
use crate::spans;
use crate::traits::{
    CodeReader, ContractDeployer, DeployedContract, DeploymentReader, EndpointInspector,
    OftMessenger, PeerRegistry, TokenLedger,
};

/// Chain client for one network, signing with the deployer key.
///
/// Cloning is cheap: the underlying provider is reference counted.
///
/// # Examples
///
/// ```rust,no_run
/// use rdat_oft::providers::AlloyChainClient;
/// use rdat_oft::NetworkName;
/// use alloy_signer_local::PrivateKeySigner;
///
/// let network = NetworkName::Vana.descriptor();
/// let signer = PrivateKeySigner::random();
/// let client = AlloyChainClient::connect(
///     network,
///     network.default_rpc_url.parse().unwrap(),
///     signer,
///     false,
/// );
/// ```
#[derive(Clone)]
pub struct AlloyChainClient {
    provider: DynProvider<Ethereum>,
    signer: Address,
    network: &'static NetworkDescriptor,
    report_gas: bool,
}

impl AlloyChainClient {
    pub fn connect(
        network: &'static NetworkDescriptor,
        rpc_url: Url,
        signer: PrivateKeySigner,
        report_gas: bool,
    ) -> Self {
        let address = signer.address();
        debug!(
            network = network.name,
            rpc_url = %rpc_url,
            signer = %address,
            event = "chain_client_connected"
        );
        Self {
            provider: connect_signer(rpc_url, signer),
            signer: address,
            network,
            report_gas,
        }
    }

    /// Client without a key; any transaction it attempts fails at the node
    pub fn read_only(network: &'static NetworkDescriptor, rpc_url: Url) -> Self {
        debug!(
            network = network.name,
            rpc_url = %rpc_url,
            event = "read_only_client_connected"
        );
        Self {
            provider: connect_read_only(rpc_url),
            signer: Address::ZERO,
            network,
            report_gas: false,
        }
    }

    pub fn signer(&self) -> Address {
        self.signer
    }

    pub fn network(&self) -> &'static NetworkDescriptor {
        self.network
    }

    /// Handle to a deployed adapter or OFT
    pub fn oapp(&self, address: Address) -> AlloyOApp {
        AlloyOApp {
            client: self.clone(),
            contract: OftContract::new(address, self.provider.clone()),
        }
    }

    /// Handle to an ERC20 token
    pub fn token(&self, address: Address) -> AlloyToken {
        AlloyToken {
            client: self.clone(),
            contract: Erc20Contract::new(address, self.provider.clone()),
        }
    }

    /// Native balance of the signer, used to warn before deployments
    pub async fn native_balance(&self) -> Result<U256> {
        Ok(self.provider.get_balance(self.signer).await?)
    }

    /// Sends `tx` and waits for its receipt, as deep as `kind` requires
    async fn send_and_confirm(
        &self,
        tx: TransactionRequest,
        label: &str,
        kind: TxKind,
    ) -> Result<TransactionReceipt> {
        let confirmations = self.network.confirmations_for(kind);
        let span = spans::send_transaction(label, self.network.name, confirmations);

        async move {
            let pending = self.provider.send_transaction(tx).await?;
            let tx_hash = *pending.tx_hash();
            spans::record_tx_hash(&tx_hash);

            info!(
                label = label,
                tx_hash = %tx_hash,
                network = self.network.name,
                event = "transaction_submitted"
            );

            let receipt = pending
                .with_required_confirmations(confirmations)
                .get_receipt()
                .await
                .map_err(|e| OftError::Provider(format!("{label}: {e}")))?;

            if !receipt.status() {
                return Err(OftError::TransactionFailed {
                    reason: format!("{label} reverted in {tx_hash}"),
                });
            }

            if self.report_gas {
                info!(
                    label = label,
                    tx_hash = %tx_hash,
                    gas_used = receipt.gas_used(),
                    effective_gas_price = receipt.effective_gas_price(),
                    event = "gas_report"
                );
            }

            info!(
                label = label,
                tx_hash = %tx_hash,
                block_number = ?receipt.block_number(),
                confirmations = confirmations,
                event = "transaction_confirmed"
            );

            Ok(receipt)
        }
        .instrument(span)
        .await
    }
}

fn confirmed(receipt: &TransactionReceipt) -> ConfirmedTx {
    ConfirmedTx {
        tx_hash: receipt.transaction_hash(),
        block_number: receipt.block_number(),
        gas_used: receipt.gas_used(),
    }
}

fn contract_error(call: &str, err: alloy_contract::Error) -> OftError {
    OftError::ContractCall(format!("{call}: {err}"))
}

#[async_trait]
impl CodeReader for AlloyChainClient {
    #[instrument(skip(self), fields(network = self.network.name))]
    async fn code_at(&self, address: Address) -> Result<Bytes> {
        let code = self.provider.get_code_at(address).await?;
        debug!(
            address = %address,
            code_len = code.len(),
            event = "code_retrieved"
        );
        Ok(code)
    }
}

#[async_trait]
impl EndpointInspector for AlloyChainClient {
    async fn endpoint_eid(&self, endpoint: Address) -> Result<u32> {
        EndpointContract::new(endpoint, self.provider.clone())
            .eid()
            .await
            .map_err(|e| contract_error("eid()", e))
    }

    async fn is_supported_eid(&self, endpoint: Address, eid: EndpointId) -> Result<bool> {
        EndpointContract::new(endpoint, self.provider.clone())
            .is_supported_eid(eid)
            .await
            .map_err(|e| contract_error("isSupportedEid", e))
    }

    async fn default_send_library(&self, endpoint: Address, eid: EndpointId) -> Result<Address> {
        EndpointContract::new(endpoint, self.provider.clone())
            .default_send_library(eid)
            .await
            .map_err(|e| contract_error("defaultSendLibrary", e))
    }
}

#[async_trait]
impl ContractDeployer for AlloyChainClient {
    fn deployer(&self) -> Address {
        self.signer
    }

    async fn deploy(&self, init_code: Bytes) -> Result<DeployedContract> {
        let tx = TransactionRequest::default()
            .with_from(self.signer)
            .with_deploy_code(init_code);
        let gas_limit = estimate_gas_with_buffer(&self.provider, &tx, None).await?;
        let tx = tx.with_gas_limit(gas_limit);

        let receipt = self.send_and_confirm(tx, "deploy", TxKind::Deploy).await?;
        let address = receipt
            .contract_address()
            .ok_or_else(|| OftError::TransactionFailed {
                reason: format!(
                    "deployment {} has no contract address",
                    receipt.transaction_hash()
                ),
            })?;

        Ok(DeployedContract {
            address,
            tx: confirmed(&receipt),
        })
    }

    async fn deploy_create2(&self, salt: B256, init_code: Bytes) -> Result<DeployedContract> {
        if self.code_at(CREATE2_DEPLOYER).await?.is_empty() {
            return Err(OftError::InvalidConfig {
                name: "DEPLOY_SALT".to_string(),
                reason: format!(
                    "no CREATE2 deployer at {CREATE2_DEPLOYER} on {}",
                    self.network.name
                ),
            });
        }

        let address = CREATE2_DEPLOYER.create2_from_code(salt.0, &init_code);
        let mut input = Vec::with_capacity(32 + init_code.len());
        input.extend_from_slice(salt.as_slice());
        input.extend_from_slice(&init_code);

        let tx = TransactionRequest::default()
            .with_from(self.signer)
            .with_to(CREATE2_DEPLOYER)
            .with_input(Bytes::from(input));
        let gas_limit = estimate_gas_with_buffer(&self.provider, &tx, None).await?;
        let tx = tx.with_gas_limit(gas_limit);

        let receipt = self.send_and_confirm(tx, "deploy_create2", TxKind::Deploy).await?;

        Ok(DeployedContract {
            address,
            tx: confirmed(&receipt),
        })
    }
}

#[async_trait]
impl DeploymentReader for AlloyChainClient {
    async fn owner_of(&self, contract: Address) -> Result<Address> {
        OftContract::new(contract, self.provider.clone())
            .owner()
            .await
            .map_err(|e| contract_error("owner()", e))
    }

    async fn token_of(&self, contract: Address) -> Result<Address> {
        OftContract::new(contract, self.provider.clone())
            .token()
            .await
            .map_err(|e| contract_error("token()", e))
    }

    async fn total_supply_of(&self, contract: Address) -> Result<U256> {
        OftContract::new(contract, self.provider.clone())
            .total_supply()
            .await
            .map_err(|e| contract_error("totalSupply()", e))
    }
}

/// Adapter or OFT contract reached through an [`AlloyChainClient`]
pub struct AlloyOApp {
    client: AlloyChainClient,
    contract: OftContract<DynProvider<Ethereum>>,
}

#[async_trait]
impl PeerRegistry for AlloyOApp {
    fn address(&self) -> Address {
        self.contract.address()
    }

    async fn owner(&self) -> Result<Address> {
        self.contract
            .owner()
            .await
            .map_err(|e| contract_error("owner()", e))
    }

    async fn peer(&self, eid: EndpointId) -> Result<PeerAddress> {
        self.contract
            .peer(eid.as_u32())
            .await
            .map_err(|e| contract_error("peers", e))
    }

    async fn set_peer(&self, eid: EndpointId, peer: PeerAddress) -> Result<ConfirmedTx> {
        let tx = self
            .contract
            .set_peer_transaction(self.client.signer, eid.as_u32(), peer);
        let receipt = self.client.send_and_confirm(tx, "setPeer", TxKind::Call).await?;
        Ok(confirmed(&receipt))
    }
}

#[async_trait]
impl OftMessenger for AlloyOApp {
    fn address(&self) -> Address {
        self.contract.address()
    }

    async fn quote_send(&self, param: &SendParam, pay_in_lz_token: bool) -> Result<MessagingFee> {
        self.contract
            .quote_send(param, pay_in_lz_token)
            .await
            .map_err(|e| contract_error("quoteSend", e))
    }

    async fn send(
        &self,
        param: &SendParam,
        fee: MessagingFee,
        refund_address: Address,
    ) -> Result<SendReceipt> {
        let tx = self
            .contract
            .send_transaction(self.client.signer, param, fee, refund_address);
        let receipt = self.client.send_and_confirm(tx, "send", TxKind::Call).await?;

        Ok(SendReceipt {
            tx: confirmed(&receipt),
            oft_sent: find_oft_sent(receipt.inner.logs(), self.contract.address()),
        })
    }
}

/// ERC20 token reached through an [`AlloyChainClient`]
pub struct AlloyToken {
    client: AlloyChainClient,
    contract: Erc20Contract<DynProvider<Ethereum>>,
}

#[async_trait]
impl TokenLedger for AlloyToken {
    fn address(&self) -> Address {
        self.contract.address()
    }

    async fn balance_of(&self, account: Address) -> Result<U256> {
        self.contract
            .balance_of(account)
            .await
            .map_err(|e| contract_error("balanceOf", e))
    }

    async fn approve(&self, spender: Address, amount: U256) -> Result<ConfirmedTx> {
        let tx = self
            .contract
            .approve_transaction(self.client.signer, spender, amount);
        let receipt = self.client.send_and_confirm(tx, "approve", TxKind::Call).await?;
        Ok(confirmed(&receipt))
    }
}
