//! OFT transfer types shared by the contract bindings and the operations

use alloy_primitives::{Address, BlockNumber, Bytes, TxHash, B256, U256};
use bon::Builder;

use crate::protocol::{EndpointId, ExecutorOptions, PeerAddress};

/// Parameters of an OFT `send`, mirroring the on-chain `SendParam` struct.
///
/// Amounts are in local decimals (`LD`) of the source token.
#[derive(Builder, Debug, Clone, PartialEq, Eq)]
pub struct SendParam {
    dst_eid: EndpointId,
    to: PeerAddress,
    amount_ld: U256,
    /// Defaults to `amount_ld` (no slippage)
    min_amount_ld: Option<U256>,
    #[builder(default)]
    extra_options: ExecutorOptions,
    #[builder(default)]
    compose_msg: Bytes,
    #[builder(default)]
    oft_cmd: Bytes,
}

impl SendParam {
    pub fn dst_eid(&self) -> EndpointId {
        self.dst_eid
    }

    pub fn to(&self) -> PeerAddress {
        self.to
    }

    pub fn amount_ld(&self) -> U256 {
        self.amount_ld
    }

    pub fn min_amount_ld(&self) -> U256 {
        self.min_amount_ld.unwrap_or(self.amount_ld)
    }

    pub fn extra_options(&self) -> Bytes {
        self.extra_options.encode()
    }

    pub fn compose_msg(&self) -> &Bytes {
        &self.compose_msg
    }

    pub fn oft_cmd(&self) -> &Bytes {
        &self.oft_cmd
    }
}

/// Fee quoted by `quoteSend`, paid with the `send` call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MessagingFee {
    pub native_fee: U256,
    pub lz_token_fee: U256,
}

/// A mined transaction that reached the requested confirmations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmedTx {
    pub tx_hash: TxHash,
    pub block_number: Option<BlockNumber>,
    pub gas_used: u64,
}

/// Decoded `OFTSent` event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OftSent {
    pub guid: B256,
    pub dst_eid: u32,
    pub from: Address,
    pub amount_sent_ld: U256,
    pub amount_received_ld: U256,
}

impl OftSent {
    pub fn destination(&self) -> Option<EndpointId> {
        EndpointId::from_u32(self.dst_eid)
    }
}

/// Confirmed `send` transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendReceipt {
    pub tx: ConfirmedTx,
    /// `None` when the receipt carried no `OFTSent` log
    pub oft_sent: Option<OftSent>,
}

/// LayerZero scan link for a source transaction
pub fn layerzero_scan_url(tx_hash: TxHash) -> String {
    format!("https://layerzeroscan.com/tx/{tx_hash}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_url() {
        let url = layerzero_scan_url(TxHash::repeat_byte(0xab));
        insta::assert_snapshot!(url, @"https://layerzeroscan.com/tx/0xabababababababababababababababababababababababababababababababab");
    }

    #[test]
    fn test_destination_lookup() {
        let sent = OftSent {
            guid: B256::ZERO,
            dst_eid: 30184,
            from: Address::ZERO,
            amount_sent_ld: U256::from(1),
            amount_received_ld: U256::from(1),
        };
        assert_eq!(sent.destination(), Some(EndpointId::Base));
    }

    #[test]
    fn test_send_param_defaults() {
        let param = SendParam::builder()
            .dst_eid(EndpointId::Base)
            .to(PeerAddress::from_evm(Address::with_last_byte(7)))
            .amount_ld(U256::from(1_000u64))
            .build();

        assert_eq!(param.min_amount_ld(), U256::from(1_000u64));
        assert!(param.extra_options().is_empty());
        assert!(param.compose_msg().is_empty());
        assert!(param.oft_cmd().is_empty());
    }

    #[test]
    fn test_send_param_slippage() {
        let param = SendParam::builder()
            .dst_eid(EndpointId::Solana)
            .to(PeerAddress::ZERO)
            .amount_ld(U256::from(1_000u64))
            .min_amount_ld(U256::from(990u64))
            .extra_options(ExecutorOptions::new().lz_receive(200_000, 0))
            .build();

        assert_eq!(param.min_amount_ld(), U256::from(990u64));
        assert_eq!(param.extra_options().len(), 22);
    }
}
