// SPDX-FileCopyrightText: 2025 Vana Foundation
//
// SPDX-License-Identifier: Apache-2.0
//! ERC20 bindings for the RDAT token
//!
//! The Vana adapter pulls tokens with `transferFrom`, so the sender must
//! approve it before `send`; the balance read gates the bridge test.

use alloy_network::Ethereum;
use alloy_primitives::{Address, U256};
use alloy_provider::Provider;
use alloy_rpc_types::TransactionRequest;
use alloy_sol_types::sol;
use tracing::{debug, info};

use Erc20::Erc20Instance;

/// ERC20 contract wrapper
///
/// # Example
///
/// ```rust,no_run
/// use rdat_oft::Erc20Contract;
/// use alloy_primitives::{address, utils::parse_ether};
/// use alloy_provider::ProviderBuilder;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let provider = ProviderBuilder::new().connect("https://rpc.vana.org").await?;
/// let rdat = address!("2c1cb46c1a4d9b5d6e1c1e5bc1f2ae4c3d5e6f70");
/// let adapter = address!("d546C45872eeA596155EAEAe9B8495f02ca4fc58");
///
/// let erc20 = Erc20Contract::new(rdat, provider);
///
/// let owner = address!("1234567890123456789012345678901234567890");
/// let amount = parse_ether("1")?;
/// if erc20.balance_of(owner).await? >= amount {
///     let tx = erc20.approve_transaction(owner, adapter, amount);
///     // Send transaction...
/// }
/// # Ok(())
/// # }
/// ```
pub struct Erc20Contract<P: Provider<Ethereum>> {
    instance: Erc20Instance<P>,
}

impl<P: Provider<Ethereum>> Erc20Contract<P> {
    pub fn new(address: Address, provider: P) -> Self {
        debug!(
            contract_address = %address,
            event = "erc20_contract_initialized"
        );
        Self {
            instance: Erc20Instance::new(address, provider),
        }
    }

    /// Create (but do not send) an `approve(spender, amount)` transaction
    pub fn approve_transaction(
        &self,
        from: Address,
        spender: Address,
        amount: U256,
    ) -> TransactionRequest {
        info!(
            from = %from,
            spender = %spender,
            amount = %amount,
            contract_address = %self.instance.address(),
            event = "approve_transaction_created"
        );

        self.instance
            .approve(spender, amount)
            .from(from)
            .into_transaction_request()
    }

    pub async fn balance_of(&self, account: Address) -> Result<U256, alloy_contract::Error> {
        let result = self.instance.balanceOf(account).call().await?;

        info!(
            account = %account,
            balance = %result,
            contract_address = %self.instance.address(),
            event = "balance_retrieved"
        );

        Ok(result)
    }

    pub fn address(&self) -> Address {
        *self.instance.address()
    }
}

sol!(
    #[allow(missing_docs)]
    #[sol(rpc)]
    contract Erc20 {
        function approve(address spender, uint256 amount) external returns (bool);
        function balanceOf(address account) external view returns (uint256);
    }
);
