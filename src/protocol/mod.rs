//! LayerZero protocol types
//!
//! Endpoint identifiers, 32-byte peer identifiers, the executor options codec
//! and the fee/event types of an OFT transfer.

mod endpoint_id;
mod options;
mod peer;
mod transfer;

pub use endpoint_id::{ChainFamily, EndpointId, InvalidEndpointId};
pub use options::{ExecutorOptionType, ExecutorOptions, EXECUTOR_WORKER_ID, OPTIONS_TYPE_3};
pub use peer::PeerAddress;
pub use transfer::{
    layerzero_scan_url, ConfirmedTx, MessagingFee, OftSent, SendParam, SendReceipt,
};
