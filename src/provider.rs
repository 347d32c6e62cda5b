// SPDX-FileCopyrightText: 2025 Vana Foundation
//
// SPDX-License-Identifier: Apache-2.0

//! Provider construction and gas helpers.

use crate::error::{OftError, Result};
use alloy_network::{Ethereum, EthereumWallet};
use alloy_provider::{DynProvider, Provider, ProviderBuilder};
use alloy_rpc_types::TransactionRequest;
use alloy_signer_local::PrivateKeySigner;
use url::Url;

/// Default gas buffer percentage (20%)
pub const DEFAULT_GAS_BUFFER_PERCENT: u64 = 20;

/// Default request timeout for explorer API calls, in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connects a signing provider: nonce, gas and chain id are filled in and
/// every transaction is signed by `signer`.
pub fn connect_signer(rpc_url: Url, signer: PrivateKeySigner) -> DynProvider<Ethereum> {
    ProviderBuilder::new()
        .wallet(EthereumWallet::from(signer))
        .connect_http(rpc_url)
        .erased()
}

/// Connects a provider that can only read chain state
pub fn connect_read_only(rpc_url: Url) -> DynProvider<Ethereum> {
    ProviderBuilder::new().connect_http(rpc_url).erased()
}

/// Estimate gas for a transaction with an optional safety buffer.
///
/// Contract creation on Vana is occasionally underestimated; the buffer
/// avoids out-of-gas reverts on deployment.
///
/// # Example
///
/// ```rust,ignore
/// use rdat_oft::provider::estimate_gas_with_buffer;
///
/// let gas_limit = estimate_gas_with_buffer(&provider, &tx, Some(20)).await?;
/// let tx = tx.with_gas_limit(gas_limit);
/// ```
pub async fn estimate_gas_with_buffer<P: Provider<Ethereum>>(
    provider: &P,
    tx: &TransactionRequest,
    buffer_percent: Option<u64>,
) -> Result<u64> {
    let buffer = buffer_percent.unwrap_or(DEFAULT_GAS_BUFFER_PERCENT);

    let estimate = provider
        .estimate_gas(tx.clone())
        .await
        .map_err(|e| OftError::Provider(format!("Gas estimation failed: {e}")))?;

    Ok(apply_gas_buffer(estimate, buffer))
}

/// `estimate * (100 + buffer) / 100`, capped at `u64::MAX`; never below the estimate
pub fn apply_gas_buffer(estimate: u64, buffer_percent: u64) -> u64 {
    let buffered = u128::from(estimate) * (100 + u128::from(buffer_percent)) / 100;
    u64::try_from(buffered).unwrap_or(u64::MAX)
}
