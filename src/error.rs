use alloy_primitives::{Address, U256};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OftError {
    #[error("Missing required configuration: {}", names.join(", "))]
    MissingConfig { names: Vec<String> },

    #[error("Invalid configuration for {name}: {reason}")]
    InvalidConfig { name: String, reason: String },

    #[error("Unsupported endpoint id: {0}")]
    UnsupportedEndpoint(u32),

    #[error("Unknown network: {0}")]
    UnknownNetwork(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Contract call failed: {0}")]
    ContractCall(String),

    #[error("Transaction failed: {reason}")]
    TransactionFailed { reason: String },

    #[error("Caller {caller} is not the owner of {contract}")]
    NotOwner { contract: Address, caller: Address },

    #[error("Insufficient balance: have {balance}, need {required}")]
    InsufficientBalance { balance: U256, required: U256 },

    #[error("Wiring incomplete: {failed} of {total} peer links not set")]
    WiringIncomplete { failed: usize, total: usize },

    #[error("Deployment of {contract} failed {failed} post-deploy check(s)")]
    DeploymentCheckFailed { contract: String, failed: usize },

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Artifact error: {0}")]
    Artifact(String),

    #[error("Explorer API error: {0}")]
    Explorer(String),

    #[error("Verification timed out after {attempts} status checks")]
    VerificationTimeout { attempts: u32 },

    #[error("RPC error: {0}")]
    Rpc(#[from] alloy_json_rpc::RpcError<alloy_transport::TransportErrorKind>),

    #[error("ABI encoding/decoding error: {0}")]
    Abi(#[from] alloy_sol_types::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Hex conversion error: {0}")]
    Hex(#[from] alloy_primitives::hex::FromHexError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, OftError>;
