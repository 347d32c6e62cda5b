//! Test transfer from Vana to Base through the adapter

use alloy_primitives::{Address, U256};
use bon::Builder;
use tracing::{info, warn, Instrument};

use crate::error::{OftError, Result};
use crate::protocol::{
    layerzero_scan_url, ConfirmedTx, EndpointId, MessagingFee, PeerAddress, SendParam, SendReceipt,
};
use crate::spans;
use crate::traits::{OftMessenger, TokenLedger};

/// One RDAT in local decimals (18)
pub const ONE_RDAT: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

#[derive(Builder, Debug, Clone)]
pub struct BridgeTestParams {
    sender: Address,
    /// Defaults to the sender's own address on the destination chain
    recipient: Option<PeerAddress>,
    #[builder(default = ONE_RDAT)]
    amount: U256,
    #[builder(default = EndpointId::Base)]
    dst_eid: EndpointId,
}

impl BridgeTestParams {
    pub fn recipient(&self) -> PeerAddress {
        self.recipient
            .unwrap_or_else(|| PeerAddress::from_evm(self.sender))
    }

    /// `minAmountLD` equals `amountLD`; no extra options, compose message or
    /// OFT command
    pub fn send_param(&self) -> SendParam {
        SendParam::builder()
            .dst_eid(self.dst_eid)
            .to(self.recipient())
            .amount_ld(self.amount)
            .min_amount_ld(self.amount)
            .build()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeTestReport {
    pub balance_before: U256,
    pub approve_tx: ConfirmedTx,
    pub fee: MessagingFee,
    pub receipt: SendReceipt,
    pub scan_url: String,
}

/// Balance check, approve, quote, send.
///
/// Fails with [`OftError::InsufficientBalance`] before any transaction when
/// the sender holds less than the amount.
pub async fn run_bridge_test(
    token: &dyn TokenLedger,
    messenger: &dyn OftMessenger,
    params: &BridgeTestParams,
) -> Result<BridgeTestReport> {
    let span = spans::bridge_test(
        &params.sender,
        &messenger.address(),
        params.dst_eid.as_u32(),
        &params.amount,
    );

    async move {
        let balance = token.balance_of(params.sender).await?;
        info!(balance = %balance, amount = %params.amount, event = "balance_checked");
        if balance < params.amount {
            let err = OftError::InsufficientBalance {
                balance,
                required: params.amount,
            };
            spans::record_error_with_context("InsufficientBalance", &err.to_string(), None);
            return Err(err);
        }

        let approve_tx = token.approve(messenger.address(), params.amount).await?;
        info!(tx_hash = %approve_tx.tx_hash, event = "adapter_approved");

        let param = params.send_param();
        let fee = messenger.quote_send(&param, false).await?;
        info!(
            native_fee = %fee.native_fee,
            lz_token_fee = %fee.lz_token_fee,
            event = "send_quoted"
        );

        let receipt = messenger.send(&param, fee, params.sender).await?;
        let scan_url = layerzero_scan_url(receipt.tx.tx_hash);
        match &receipt.oft_sent {
            Some(sent) => info!(
                guid = %sent.guid,
                dst_eid = sent.dst_eid,
                amount_sent_ld = %sent.amount_sent_ld,
                amount_received_ld = %sent.amount_received_ld,
                scan_url = %scan_url,
                event = "oft_sent"
            ),
            None => warn!(
                tx_hash = %receipt.tx.tx_hash,
                event = "oft_sent_event_missing"
            ),
        }

        Ok(BridgeTestReport {
            balance_before: balance,
            approve_tx,
            fee,
            receipt,
            scan_url,
        })
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeOApp, FakeToken};

    const SENDER: Address = Address::with_last_byte(0x51);

    #[test]
    fn test_default_send_param() {
        let params = BridgeTestParams::builder().sender(SENDER).build();
        let param = params.send_param();

        assert_eq!(param.dst_eid(), EndpointId::Base);
        assert_eq!(param.to(), PeerAddress::from_evm(SENDER));
        assert_eq!(param.amount_ld(), ONE_RDAT);
        assert_eq!(param.min_amount_ld(), ONE_RDAT);
        assert!(param.extra_options().is_empty());
    }

    #[tokio::test]
    async fn test_insufficient_balance_sends_nothing() {
        let token = FakeToken::new(Address::with_last_byte(0x70));
        token.set_balance(SENDER, U256::from(5u64));
        let adapter = FakeOApp::new(Address::with_last_byte(1), SENDER);
        let params = BridgeTestParams::builder().sender(SENDER).build();

        let err = run_bridge_test(&token, &adapter, &params).await.unwrap_err();

        assert!(matches!(err, OftError::InsufficientBalance { .. }));
        assert!(token.approvals().is_empty());
        assert!(adapter.sent().is_empty());
    }

    #[tokio::test]
    async fn test_successful_transfer() {
        let token = FakeToken::new(Address::with_last_byte(0x70));
        token.set_balance(SENDER, ONE_RDAT * U256::from(3u64));
        let adapter = FakeOApp::new(Address::with_last_byte(1), SENDER)
            .with_fee(U256::from(42_000u64));
        let params = BridgeTestParams::builder().sender(SENDER).build();

        let report = run_bridge_test(&token, &adapter, &params).await.unwrap();

        assert_eq!(token.approvals(), vec![(adapter.address(), ONE_RDAT)]);
        assert_eq!(report.fee.native_fee, U256::from(42_000u64));
        let sent = report.receipt.oft_sent.unwrap();
        assert_eq!(sent.dst_eid, 30184);
        assert_eq!(sent.from, SENDER);
        assert_eq!(sent.amount_sent_ld, ONE_RDAT);
        assert!(report.scan_url.starts_with("https://layerzeroscan.com/tx/0x"));

        let sends = adapter.sent();
        assert_eq!(sends.len(), 1);
        assert_eq!(sends[0].refund, SENDER);
        assert_eq!(sends[0].value, U256::from(42_000u64));
    }

    #[tokio::test]
    async fn test_receipt_without_oft_sent_still_reports() {
        let token = FakeToken::new(Address::with_last_byte(0x70));
        token.set_balance(SENDER, ONE_RDAT);
        let adapter = FakeOApp::new(Address::with_last_byte(1), SENDER).without_oft_sent();
        let params = BridgeTestParams::builder().sender(SENDER).build();

        let report = run_bridge_test(&token, &adapter, &params).await.unwrap();

        assert!(report.receipt.oft_sent.is_none());
        assert_eq!(adapter.sent().len(), 1);
        assert_eq!(report.scan_url, layerzero_scan_url(report.receipt.tx.tx_hash));
    }
}
