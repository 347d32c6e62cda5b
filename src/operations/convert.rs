//! Solana address to `setPeer` parameters
//!
//! The Vana adapter is owned by a multisig, so the Solana peer is registered
//! by hand. This produces everything the multisig transaction needs.

use std::fmt;

use alloy_primitives::Address;

use crate::chain::addresses::VANA_RDAT_ADAPTER;
use crate::error::Result;
use crate::protocol::{EndpointId, PeerAddress};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolanaPeerConversion {
    pub base58: String,
    pub peer: PeerAddress,
    /// Contract the multisig calls `setPeer` on
    pub contract: Address,
    pub eid: EndpointId,
}

impl SolanaPeerConversion {
    pub fn new(base58: &str) -> Result<Self> {
        Self::for_contract(base58, VANA_RDAT_ADAPTER)
    }

    pub fn for_contract(base58: &str, contract: Address) -> Result<Self> {
        let base58 = base58.trim();
        Ok(Self {
            peer: PeerAddress::from_solana(base58)?,
            base58: base58.to_string(),
            contract,
            eid: EndpointId::Solana,
        })
    }
}

impl fmt::Display for SolanaPeerConversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Solana address: {}", self.base58)?;
        writeln!(f, "bytes32 peer:   {}", self.peer)?;
        writeln!(f)?;
        writeln!(f, "Multisig transaction")?;
        writeln!(f, "  contract: {}", self.contract)?;
        writeln!(f, "  function: setPeer(uint32 _eid, bytes32 _peer)")?;
        writeln!(f, "  _eid:     {}", self.eid.as_u32())?;
        write!(f, "  _peer:    {}", self.peer)
    }
}
