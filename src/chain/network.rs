//! Network descriptors
//!
//! One descriptor per network the bridge is deployed to. A descriptor is
//! static; the RPC URL actually used is resolved from the environment at
//! startup (see [`crate::config`]).

use std::fmt;
use std::str::FromStr;

use alloy_chains::Chain;

use crate::error::OftError;
use crate::protocol::EndpointId;

/// Etherscan-compatible block explorer attached to a network
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExplorerConfig {
    /// Base URL of the verification API
    pub api_url: &'static str,
    pub browser_url: &'static str,
    /// Environment variable holding the API key
    pub api_key_env: &'static str,
}

/// Transactions the toolkit sends, grouped by how long they are waited on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxKind {
    Deploy,
    /// `setPeer`, `approve`, `send`
    Call,
}

/// Static description of a network
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkDescriptor {
    pub name: &'static str,
    pub chain_id: u64,
    /// `None` for local development chains
    pub eid: Option<EndpointId>,
    pub default_rpc_url: &'static str,
    /// Environment variable overriding the RPC URL
    pub rpc_env: &'static str,
    /// Live networks wait for more confirmations and get verified
    pub live: bool,
    pub explorer: Option<ExplorerConfig>,
}

impl NetworkDescriptor {
    pub fn chain(&self) -> Chain {
        Chain::from_id(self.chain_id)
    }

    /// Confirmations to wait for after each deployment transaction
    pub const fn required_confirmations(&self) -> u64 {
        if self.live {
            5
        } else {
            1
        }
    }

    /// Only deployments wait for the full depth; calls return on inclusion
    pub const fn confirmations_for(&self, kind: TxKind) -> u64 {
        match kind {
            TxKind::Deploy => self.required_confirmations(),
            TxKind::Call => 1,
        }
    }

    /// Browser link for an address, if the network has an explorer
    pub fn address_url(&self, address: impl fmt::Display) -> Option<String> {
        self.explorer
            .map(|explorer| format!("{}/address/{address}", explorer.browser_url))
    }
}

/// Networks known to this deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NetworkName {
    Vana,
    Base,
    Hardhat,
}

const VANA: NetworkDescriptor = NetworkDescriptor {
    name: "vana",
    chain_id: 1480,
    eid: Some(EndpointId::Vana),
    default_rpc_url: "https://rpc.vana.org",
    rpc_env: "VANA_RPC_URL",
    live: true,
    explorer: Some(ExplorerConfig {
        api_url: "https://api.vanascan.io/api",
        browser_url: "https://vanascan.io",
        api_key_env: "VANASCAN_API_KEY",
    }),
};

const BASE: NetworkDescriptor = NetworkDescriptor {
    name: "base",
    chain_id: 8453,
    eid: Some(EndpointId::Base),
    default_rpc_url: "https://mainnet.base.org",
    rpc_env: "BASE_RPC_URL",
    live: true,
    explorer: Some(ExplorerConfig {
        api_url: "https://api.basescan.org/api",
        browser_url: "https://basescan.org",
        api_key_env: "BASESCAN_API_KEY",
    }),
};

const HARDHAT: NetworkDescriptor = NetworkDescriptor {
    name: "hardhat",
    chain_id: 1337,
    eid: None,
    default_rpc_url: "http://127.0.0.1:8545",
    rpc_env: "HARDHAT_RPC_URL",
    live: false,
    explorer: None,
};

impl NetworkName {
    pub const fn descriptor(self) -> &'static NetworkDescriptor {
        match self {
            Self::Vana => &VANA,
            Self::Base => &BASE,
            Self::Hardhat => &HARDHAT,
        }
    }

    pub const fn as_str(self) -> &'static str {
        self.descriptor().name
    }
}

impl FromStr for NetworkName {
    type Err = OftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "vana" => Ok(Self::Vana),
            "base" => Ok(Self::Base),
            "hardhat" | "localhost" => Ok(Self::Hardhat),
            _ => Err(OftError::UnknownNetwork(s.to_string())),
        }
    }
}

impl fmt::Display for NetworkName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
