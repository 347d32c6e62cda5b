//! OpenTelemetry span helpers for bridge operations
//!
//! Static span names with structured attributes, kept apart from the
//! operation logic. Spans that can fail declare the `error.*` fields so
//! [`record_error_with_context`] can fill them in.
//!
//! # Example
//!
//! ```rust,no_run
//! use rdat_oft::spans;
//! use alloy_primitives::Address;
//!
//! let span = spans::deploy_contract("vana", "RdatOFTAdapter", &Address::ZERO);
//! let _guard = span.enter();
//! // deployment logic here
//! ```

use alloy_primitives::{Address, TxHash, U256};
use tracing::Span;
use url::Url;

use crate::protocol::PeerAddress;

/// Create span for a contract deployment step.
///
/// Parent: Top-level command span
/// Children: rdat_oft.send_transaction, rdat_oft.verify_contract
#[inline]
pub fn deploy_contract(network: &str, contract: &str, deployer: &Address) -> Span {
    tracing::info_span!(
        "rdat_oft.deploy_contract",
        network = network,
        contract = contract,
        deployer = %deployer,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        error.context = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Create span for one `setPeer` call.
///
/// Parent: rdat_oft.wire
/// Children: rdat_oft.send_transaction
#[inline]
pub fn set_peer(contract: &Address, eid: u32, peer: &PeerAddress) -> Span {
    tracing::info_span!(
        "rdat_oft.set_peer",
        contract = %contract,
        eid = eid,
        peer = %peer,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        error.context = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Create span for wiring a pair of contracts.
///
/// Parent: Top-level command span
/// Children: rdat_oft.set_peer (one per direction)
#[inline]
pub fn wire(vana_adapter: &Address, base_oft: &Address, with_solana: bool) -> Span {
    tracing::info_span!(
        "rdat_oft.wire",
        vana_adapter = %vana_adapter,
        base_oft = %base_oft,
        with_solana = with_solana,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        error.context = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Create span for the approve, quote, send sequence of a test transfer.
///
/// Parent: Top-level command span
/// Children: rdat_oft.send_transaction
#[inline]
pub fn bridge_test(from: &Address, oft: &Address, dst_eid: u32, amount: &U256) -> Span {
    tracing::info_span!(
        "rdat_oft.bridge_test",
        from = %from,
        oft = %oft,
        dst_eid = dst_eid,
        amount = %amount,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        error.context = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Create span for explorer verification with status polling.
///
/// Parent: rdat_oft.deploy_contract
/// Children: rdat_oft.http_request (submit and each status check)
#[inline]
pub fn verify_contract(address: &Address, max_attempts: u32, poll_interval_secs: u64) -> Span {
    tracing::info_span!(
        "rdat_oft.verify_contract",
        address = %address,
        max_attempts = max_attempts,
        poll_interval_secs = poll_interval_secs,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        error.context = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Create span for probing one candidate endpoint address.
///
/// Parent: Top-level command span
/// Children: Provider RPC calls
#[inline]
pub fn probe_endpoint(network: &str, candidate: &Address) -> Span {
    tracing::info_span!(
        "rdat_oft.probe_endpoint",
        network = network,
        candidate = %candidate,
    )
}

/// Create span for submitting a transaction and waiting for confirmations.
///
/// Parent: Operation span (e.g., set_peer, deploy_contract)
/// Children: Provider RPC calls
#[inline]
pub fn send_transaction(label: &str, network: &str, required_confirmations: u64) -> Span {
    tracing::debug_span!(
        "rdat_oft.send_transaction",
        label = label,
        network = network,
        required_confirmations = required_confirmations,
        tx_hash = tracing::field::Empty,
    )
}

/// Records the hash of a submitted transaction on the current span
pub fn record_tx_hash(tx_hash: &TxHash) {
    Span::current().record("tx_hash", tracing::field::display(tx_hash));
}

/// Create span for an HTTP request to a block explorer API.
///
/// Parent: rdat_oft.verify_contract
/// Children: None
#[inline]
pub fn http_request(method: &str, url: &Url, action: &str) -> Span {
    tracing::trace_span!(
        "rdat_oft.http_request",
        http.method = method,
        http.url = %url,
        explorer.action = action,
    )
}

/// Record error attributes on the current span.
///
/// Follows OpenTelemetry semantic conventions for error tracking:
/// - error.type: The error type/variant
/// - error.message: Human-readable error message
/// - error.context: Optional additional context
pub fn record_error_with_context(
    error_type: &str,
    error_message: &str,
    additional_context: Option<&str>,
) {
    let current_span = tracing::Span::current();
    current_span.record("error.type", error_type);
    current_span.record("error.message", error_message);
    current_span.record("otel.status_code", "ERROR");

    if let Some(context) = additional_context {
        current_span.record("error.context", context);
    }
}
