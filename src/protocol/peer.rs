//! Peer identifiers
//!
//! LayerZero stores every remote peer as a `bytes32`, regardless of the remote
//! chain's native address format. EVM addresses are left padded with zeros,
//! Solana public keys already occupy all 32 bytes.

use std::fmt;
use std::str::FromStr;

use alloy_primitives::{Address, B256};

use crate::error::{OftError, Result};
use crate::protocol::endpoint_id::{ChainFamily, EndpointId};

/// A remote peer in the 32-byte form expected by `setPeer(uint32,bytes32)`
///
/// # Example
///
/// ```rust
/// use rdat_oft::PeerAddress;
/// use alloy_primitives::address;
///
/// let peer = PeerAddress::from_evm(address!("d546C45872eeA596155EAEAe9B8495f02ca4fc58"));
/// assert_eq!(
///     peer.to_string(),
///     "0x000000000000000000000000d546c45872eea596155eaeae9b8495f02ca4fc58"
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PeerAddress(B256);

impl PeerAddress {
    pub const ZERO: Self = Self(B256::ZERO);

    pub const fn new(word: B256) -> Self {
        Self(word)
    }

    /// Left pads a 20-byte EVM address to 32 bytes
    pub fn from_evm(address: Address) -> Self {
        Self(address.into_word())
    }

    /// Decodes a base58 Solana public key
    pub fn from_solana(encoded: &str) -> Result<Self> {
        let bytes = bs58::decode(encoded.trim())
            .into_vec()
            .map_err(|e| OftError::InvalidAddress(format!("{encoded}: {e}")))?;

        if bytes.len() != 32 {
            return Err(OftError::InvalidAddress(format!(
                "{encoded}: expected 32 bytes, decoded {}",
                bytes.len()
            )));
        }

        Ok(Self(B256::from_slice(&bytes)))
    }

    /// Parses a peer written in the native format of the chain behind `eid`.
    ///
    /// A `0x`-prefixed 32-byte hex string is accepted for every chain family.
    pub fn parse_for(eid: EndpointId, input: &str) -> Result<Self> {
        let input = input.trim();
        if input.len() == 66 && input.starts_with("0x") {
            return input
                .parse::<B256>()
                .map(Self)
                .map_err(|e| OftError::InvalidAddress(format!("{input}: {e}")));
        }

        match eid.family() {
            ChainFamily::Evm => input
                .parse::<Address>()
                .map(Self::from_evm)
                .map_err(|e| OftError::InvalidAddress(format!("{input}: {e}"))),
            ChainFamily::Solana => Self::from_solana(input),
        }
    }

    /// Returns the EVM address if the peer is a padded 20-byte address
    pub fn to_evm(&self) -> Option<Address> {
        if self.0[..12].iter().all(|b| *b == 0) {
            Some(Address::from_word(self.0))
        } else {
            None
        }
    }

    /// Base58 rendering, the native format of Solana accounts
    pub fn to_base58(&self) -> String {
        bs58::encode(self.0.as_slice()).into_string()
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn as_b256(&self) -> B256 {
        self.0
    }
}

impl From<Address> for PeerAddress {
    fn from(address: Address) -> Self {
        Self::from_evm(address)
    }
}

impl From<B256> for PeerAddress {
    fn from(word: B256) -> Self {
        Self(word)
    }
}

impl From<PeerAddress> for B256 {
    fn from(peer: PeerAddress) -> Self {
        peer.0
    }
}

impl FromStr for PeerAddress {
    type Err = OftError;

    /// Accepts a 32-byte hex word, a 20-byte EVM address or a base58 key
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.starts_with("0x") {
            return Self::parse_for(EndpointId::Base, s);
        }
        Self::from_solana(s)
    }
}

impl fmt::Display for PeerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
