//! LayerZero endpoint identifiers
//!
//! Every chain reachable through the LayerZero V2 messaging framework is
//! addressed by an endpoint ID (EID). The numbering belongs to the framework;
//! this module only gives the values used by the RDAT deployment a typed home
//! so a Base EID can never be passed where a Solana EID was meant.
//!
//! Reference: <https://docs.layerzero.network/v2/deployments/deployed-contracts>

use std::fmt;

/// LayerZero V2 endpoint identifier
///
/// # Example
///
/// ```rust
/// use rdat_oft::EndpointId;
///
/// let vana = EndpointId::Vana;
/// let raw: u32 = vana.into();
/// assert_eq!(raw, 30330);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u32)]
#[non_exhaustive]
pub enum EndpointId {
    /// Solana mainnet (EID: 30168)
    Solana = 30168,
    /// Base mainnet (EID: 30184)
    Base = 30184,
    /// Vana mainnet (EID: 30330)
    Vana = 30330,
}

/// Virtual machine family behind an endpoint.
///
/// Determines how a peer address for that endpoint is written down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainFamily {
    /// 20-byte hex addresses, left padded to 32 bytes
    Evm,
    /// 32-byte base58 public keys
    Solana,
}

impl EndpointId {
    /// Returns the numeric endpoint ID
    ///
    /// ```rust
    /// use rdat_oft::EndpointId;
    ///
    /// assert_eq!(EndpointId::Base.as_u32(), 30184);
    /// assert_eq!(EndpointId::Solana.as_u32(), 30168);
    /// ```
    #[inline]
    pub const fn as_u32(self) -> u32 {
        self as u32
    }

    /// Attempts to create an `EndpointId` from its numeric value
    ///
    /// ```rust
    /// use rdat_oft::EndpointId;
    ///
    /// assert_eq!(EndpointId::from_u32(30330), Some(EndpointId::Vana));
    /// assert_eq!(EndpointId::from_u32(1), None);
    /// ```
    #[inline]
    pub const fn from_u32(value: u32) -> Option<Self> {
        match value {
            30168 => Some(Self::Solana),
            30184 => Some(Self::Base),
            30330 => Some(Self::Vana),
            _ => None,
        }
    }

    /// Human readable chain name
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Solana => "Solana",
            Self::Base => "Base",
            Self::Vana => "Vana",
        }
    }

    #[inline]
    pub const fn family(self) -> ChainFamily {
        match self {
            Self::Solana => ChainFamily::Solana,
            Self::Base | Self::Vana => ChainFamily::Evm,
        }
    }
}

impl From<EndpointId> for u32 {
    #[inline]
    fn from(eid: EndpointId) -> Self {
        eid.as_u32()
    }
}

impl TryFrom<u32> for EndpointId {
    type Error = InvalidEndpointId;

    #[inline]
    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::from_u32(value).ok_or(InvalidEndpointId(value))
    }
}

impl fmt::Display for EndpointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.as_u32())
    }
}

/// Error returned when a `u32` is not one of the known endpoint IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidEndpointId(pub u32);

impl fmt::Display for InvalidEndpointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown LayerZero endpoint id: {}", self.0)
    }
}

impl std::error::Error for InvalidEndpointId {}

impl From<InvalidEndpointId> for crate::OftError {
    fn from(e: InvalidEndpointId) -> Self {
        crate::OftError::UnsupportedEndpoint(e.0)
    }
}
