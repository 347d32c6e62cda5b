//! LayerZero executor options codec
//!
//! Options tell the destination executor how much gas (and native value) to
//! provide when delivering a message. The wire layout is the packed "type 3"
//! format:
//!
//! ```text
//! u16 options type (= 3)
//! repeated:
//!   u8  worker id   (= 1, executor)
//!   u16 size        (= payload length + 1)
//!   u8  option type
//!   ..  payload
//! ```

use alloy_primitives::{Bytes, B256};
use serde::{Deserialize, Serialize};

/// Packed options header for the current format
pub const OPTIONS_TYPE_3: u16 = 3;

/// Worker id of the executor
pub const EXECUTOR_WORKER_ID: u8 = 1;

/// Option kinds understood by the executor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum ExecutorOptionType {
    LzReceive = 1,
    NativeDrop = 2,
    Compose = 3,
    Ordered = 4,
}

impl ExecutorOptionType {
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Builder for packed executor options
///
/// # Example
///
/// ```rust
/// use rdat_oft::ExecutorOptions;
///
/// let options = ExecutorOptions::new().lz_receive(200_000, 0).encode();
/// assert_eq!(
///     options.to_string(),
///     "0x00030100110100000000000000000000000000030d40"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutorOptions {
    entries: Vec<(ExecutorOptionType, Vec<u8>)>,
}

impl ExecutorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gas and value for `lzReceive` on the destination.
    ///
    /// On Solana `gas` is a compute-unit limit and `value` lamports.
    pub fn lz_receive(mut self, gas: u128, value: u128) -> Self {
        let mut payload = gas.to_be_bytes().to_vec();
        if value > 0 {
            payload.extend_from_slice(&value.to_be_bytes());
        }
        self.entries.push((ExecutorOptionType::LzReceive, payload));
        self
    }

    /// Native token airdrop to `receiver` on the destination
    pub fn native_drop(mut self, amount: u128, receiver: B256) -> Self {
        let mut payload = amount.to_be_bytes().to_vec();
        payload.extend_from_slice(receiver.as_slice());
        self.entries.push((ExecutorOptionType::NativeDrop, payload));
        self
    }

    /// Gas and value for the compose call at `index`
    pub fn compose(mut self, index: u16, gas: u128, value: u128) -> Self {
        let mut payload = index.to_be_bytes().to_vec();
        payload.extend_from_slice(&gas.to_be_bytes());
        if value > 0 {
            payload.extend_from_slice(&value.to_be_bytes());
        }
        self.entries.push((ExecutorOptionType::Compose, payload));
        self
    }

    /// Request ordered delivery
    pub fn ordered(mut self) -> Self {
        self.entries.push((ExecutorOptionType::Ordered, Vec::new()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Packs the options. No options at all encode to empty bytes, which the
    /// OFT treats as "use enforced options only".
    pub fn encode(&self) -> Bytes {
        if self.entries.is_empty() {
            return Bytes::new();
        }

        let mut out = OPTIONS_TYPE_3.to_be_bytes().to_vec();
        for (kind, payload) in &self.entries {
            out.push(EXECUTOR_WORKER_ID);
            out.extend_from_slice(&(payload.len() as u16 + 1).to_be_bytes());
            out.push(kind.as_u8());
            out.extend_from_slice(payload);
        }
        out.into()
    }
}
