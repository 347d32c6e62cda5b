//! RDAT OFT and OFT adapter bindings
//!
//! `RdatOFTAdapter` (Vana) and `RdatOFT` (Base) are thin subclasses of the
//! LayerZero `OFTAdapter` / `OFT` base contracts and share the OApp surface
//! used here: ownership, peer registry, fee quoting and `send`.

use alloy_network::Ethereum;
use alloy_primitives::{Address, U256};
use alloy_provider::Provider;
use alloy_rpc_types::{Log, TransactionRequest};
use alloy_sol_types::{sol, SolEvent};
use tracing::{debug, info, trace};

use crate::protocol::{MessagingFee, OftSent, PeerAddress, SendParam};
use crate::spans;
use RdatOft::RdatOftInstance;

/// Wrapper over a deployed RDAT OFT or OFT adapter
///
/// Reads are executed directly; state-changing calls are returned as
/// [`TransactionRequest`]s for the caller to sign and submit.
pub struct OftContract<P: Provider<Ethereum>> {
    instance: RdatOftInstance<P>,
}

impl<P: Provider<Ethereum>> OftContract<P> {
    pub fn new(address: Address, provider: P) -> Self {
        debug!(
            contract_address = %address,
            event = "oft_contract_initialized"
        );
        Self {
            instance: RdatOftInstance::new(address, provider),
        }
    }

    pub fn address(&self) -> Address {
        *self.instance.address()
    }

    /// Account allowed to call `setPeer`
    pub async fn owner(&self) -> Result<Address, alloy_contract::Error> {
        self.instance.owner().call().await
    }

    /// Underlying ERC-20. The adapter returns the wrapped token, the OFT itself.
    pub async fn token(&self) -> Result<Address, alloy_contract::Error> {
        self.instance.token().call().await
    }

    pub async fn total_supply(&self) -> Result<U256, alloy_contract::Error> {
        self.instance.totalSupply().call().await
    }

    /// Peer registered for `eid`, zero when none is set
    pub async fn peer(&self, eid: u32) -> Result<PeerAddress, alloy_contract::Error> {
        let peer = self.instance.peers(eid).call().await?;

        trace!(
            contract_address = %self.address(),
            eid = eid,
            peer = %peer,
            event = "peer_retrieved"
        );

        Ok(PeerAddress::new(peer))
    }

    /// Create the transaction request for `setPeer(eid, peer)`
    pub fn set_peer_transaction(
        &self,
        from: Address,
        eid: u32,
        peer: PeerAddress,
    ) -> TransactionRequest {
        let span = spans::set_peer(&self.address(), eid, &peer);
        let _guard = span.enter();

        info!(
            from = %from,
            eid = eid,
            peer = %peer,
            contract_address = %self.address(),
            event = "set_peer_transaction_created"
        );

        self.instance
            .setPeer(eid, peer.as_b256())
            .from(from)
            .into_transaction_request()
    }

    pub async fn quote_send(
        &self,
        param: &SendParam,
        pay_in_lz_token: bool,
    ) -> Result<MessagingFee, alloy_contract::Error> {
        let fee = self
            .instance
            .quoteSend(param.into(), pay_in_lz_token)
            .call()
            .await?;

        let fee = MessagingFee {
            native_fee: fee.nativeFee,
            lz_token_fee: fee.lzTokenFee,
        };

        info!(
            dst_eid = param.dst_eid().as_u32(),
            amount_ld = %param.amount_ld(),
            native_fee = %fee.native_fee,
            lz_token_fee = %fee.lz_token_fee,
            contract_address = %self.address(),
            event = "send_quoted"
        );

        Ok(fee)
    }

    /// Create the transaction request for `send`, carrying the native fee as value
    pub fn send_transaction(
        &self,
        from: Address,
        param: &SendParam,
        fee: MessagingFee,
        refund_address: Address,
    ) -> TransactionRequest {
        info!(
            from = %from,
            dst_eid = param.dst_eid().as_u32(),
            to = %param.to(),
            amount_ld = %param.amount_ld(),
            native_fee = %fee.native_fee,
            refund_address = %refund_address,
            contract_address = %self.address(),
            event = "send_transaction_created"
        );

        self.instance
            .send(param.into(), fee.into(), refund_address)
            .value(fee.native_fee)
            .from(from)
            .into_transaction_request()
    }
}

/// Finds and decodes the first `OFTSent` log emitted by `emitter`
pub fn find_oft_sent(logs: &[Log], emitter: Address) -> Option<OftSent> {
    logs.iter()
        .filter(|log| log.address() == emitter)
        .find(|log| {
            log.topics()
                .first()
                .is_some_and(|topic| *topic == RdatOft::OFTSent::SIGNATURE_HASH)
        })
        .and_then(|log| RdatOft::OFTSent::decode_log(&log.inner).ok())
        .map(|decoded| OftSent {
            guid: decoded.data.guid,
            dst_eid: decoded.data.dstEid,
            from: decoded.data.fromAddress,
            amount_sent_ld: decoded.data.amountSentLD,
            amount_received_ld: decoded.data.amountReceivedLD,
        })
}

impl From<&SendParam> for RdatOft::SendParam {
    fn from(param: &SendParam) -> Self {
        Self {
            dstEid: param.dst_eid().as_u32(),
            to: param.to().as_b256(),
            amountLD: param.amount_ld(),
            minAmountLD: param.min_amount_ld(),
            extraOptions: param.extra_options(),
            composeMsg: param.compose_msg().clone(),
            oftCmd: param.oft_cmd().clone(),
        }
    }
}

impl From<MessagingFee> for RdatOft::MessagingFee {
    fn from(fee: MessagingFee) -> Self {
        Self {
            nativeFee: fee.native_fee,
            lzTokenFee: fee.lz_token_fee,
        }
    }
}

sol!(
    #[allow(missing_docs)]
    #[sol(rpc)]
    contract RdatOft {
        struct SendParam {
            uint32 dstEid;
            bytes32 to;
            uint256 amountLD;
            uint256 minAmountLD;
            bytes extraOptions;
            bytes composeMsg;
            bytes oftCmd;
        }

        struct MessagingFee {
            uint256 nativeFee;
            uint256 lzTokenFee;
        }

        struct MessagingReceipt {
            bytes32 guid;
            uint64 nonce;
            MessagingFee fee;
        }

        struct OFTReceipt {
            uint256 amountSentLD;
            uint256 amountReceivedLD;
        }

        event OFTSent(
            bytes32 indexed guid,
            uint32 dstEid,
            address indexed fromAddress,
            uint256 amountSentLD,
            uint256 amountReceivedLD
        );

        event PeerSet(uint32 eid, bytes32 peer);

        function owner() external view returns (address);
        function token() external view returns (address);
        function totalSupply() external view returns (uint256);
        function peers(uint32 eid) external view returns (bytes32);
        function setPeer(uint32 eid, bytes32 peer) external;
        function quoteSend(SendParam calldata sendParam, bool payInLzToken)
            external view returns (MessagingFee memory msgFee);
        function send(SendParam calldata sendParam, MessagingFee calldata fee, address refundAddress)
            external payable returns (MessagingReceipt memory msgReceipt, OFTReceipt memory oftReceipt);
    }
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::EndpointId;
    use alloy_primitives::{Bytes, LogData, B256};
    use alloy_sol_types::SolValue;

    fn oft_sent_log(emitter: Address, sent: &OftSent) -> Log {
        let event = RdatOft::OFTSent {
            guid: sent.guid,
            dstEid: sent.dst_eid,
            fromAddress: sent.from,
            amountSentLD: sent.amount_sent_ld,
            amountReceivedLD: sent.amount_received_ld,
        };
        Log {
            inner: alloy_primitives::Log {
                address: emitter,
                data: event.encode_log_data(),
            },
            ..Default::default()
        }
    }

    fn sample_sent() -> OftSent {
        OftSent {
            guid: B256::repeat_byte(0x11),
            dst_eid: EndpointId::Base.as_u32(),
            from: Address::with_last_byte(0xaa),
            amount_sent_ld: U256::from(10u64).pow(U256::from(18u64)),
            amount_received_ld: U256::from(10u64).pow(U256::from(18u64)),
        }
    }

    #[test]
    fn test_find_oft_sent() {
        let emitter = Address::with_last_byte(1);
        let sent = sample_sent();
        let noise = Log {
            inner: alloy_primitives::Log {
                address: emitter,
                data: LogData::new_unchecked(vec![B256::repeat_byte(0x99)], Bytes::new()),
            },
            ..Default::default()
        };

        let logs = vec![noise, oft_sent_log(emitter, &sent)];
        assert_eq!(find_oft_sent(&logs, emitter), Some(sent));
    }

    #[test]
    fn test_find_oft_sent_ignores_other_emitters() {
        let logs = vec![oft_sent_log(Address::with_last_byte(2), &sample_sent())];
        assert_eq!(find_oft_sent(&logs, Address::with_last_byte(1)), None);
    }

    #[test]
    fn test_send_param_conversion() {
        let recipient = Address::with_last_byte(0x42);
        let param = SendParam::builder()
            .dst_eid(EndpointId::Base)
            .to(PeerAddress::from_evm(recipient))
            .amount_ld(U256::from(5u64))
            .build();

        let raw: RdatOft::SendParam = (&param).into();
        assert_eq!(raw.dstEid, 30184);
        assert_eq!(raw.to, recipient.into_word());
        assert_eq!(raw.minAmountLD, U256::from(5u64));
        assert!(raw.extraOptions.is_empty());

        // head: 7 words, plus 3 empty dynamic byte strings (one length word each)
        assert_eq!(raw.abi_encode_params().len() % 32, 0);
    }

    #[test]
    fn test_event_signatures() {
        insta::assert_snapshot!(
            RdatOft::OFTSent::SIGNATURE,
            @"OFTSent(bytes32,uint32,address,uint256,uint256)"
        );
        insta::assert_snapshot!(RdatOft::PeerSet::SIGNATURE, @"PeerSet(uint32,bytes32)");
    }
}
