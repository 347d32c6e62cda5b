//! Explorer source verification types
//!
//! Etherscan-compatible explorers (Vanascan, Basescan) answer every call with
//! a `{status, message, result}` envelope; `result` carries either the job id
//! or a human-readable status string.

use alloy_primitives::{hex, Address, Bytes};
use bon::Builder;
use serde::Deserialize;

use crate::error::{OftError, Result};

/// A contract to verify against its compiler input
#[derive(Builder, Debug, Clone, PartialEq, Eq)]
pub struct VerificationRequest {
    address: Address,
    /// Fully qualified name, e.g. `contracts/RdatOFT.sol:RdatOFT`
    #[builder(into)]
    contract_name: String,
    /// Full `solc` version, e.g. `v0.8.22+commit.4fc1097e`
    #[builder(into)]
    compiler_version: String,
    /// Standard-JSON compiler input, serialized
    #[builder(into)]
    source: String,
    #[builder(default)]
    constructor_args: Bytes,
}

impl VerificationRequest {
    pub fn address(&self) -> Address {
        self.address
    }

    pub fn contract_name(&self) -> &str {
        &self.contract_name
    }

    pub fn compiler_version(&self) -> &str {
        &self.compiler_version
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn constructor_args(&self) -> &Bytes {
        &self.constructor_args
    }

    /// Constructor arguments as explorers expect them: hex without `0x`
    pub fn constructor_args_hex(&self) -> String {
        hex::encode(&self.constructor_args)
    }
}

/// Raw explorer response envelope
#[derive(Debug, Deserialize)]
pub struct ExplorerResponse {
    pub status: String,
    #[serde(default)]
    pub message: String,
    pub result: String,
}

impl ExplorerResponse {
    pub fn is_ok(&self) -> bool {
        self.status == "1"
    }
}

/// Answer to a `verifysourcecode` submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Queued { guid: String },
    AlreadyVerified,
}

impl Submission {
    /// Interprets the envelope returned by `verifysourcecode`
    pub fn from_response(response: ExplorerResponse) -> Result<Self> {
        if response.is_ok() {
            return Ok(Self::Queued {
                guid: response.result,
            });
        }
        match VerificationStatus::from_result(&response.result) {
            VerificationStatus::AlreadyVerified => Ok(Self::AlreadyVerified),
            _ => Err(OftError::Explorer(format!(
                "{}: {}",
                response.message, response.result
            ))),
        }
    }
}

/// Status of a submitted verification job
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationStatus {
    Pending,
    Verified,
    AlreadyVerified,
    Failed(String),
}

impl VerificationStatus {
    /// Interprets the `result` string of `checkverifystatus` (or of a
    /// rejected `verifysourcecode` call)
    pub fn from_result(result: &str) -> Self {
        let lower = result.to_ascii_lowercase();
        if lower.contains("already verified") {
            Self::AlreadyVerified
        } else if lower.starts_with("pass") {
            Self::Verified
        } else if lower.contains("pending") || lower.contains("in queue") {
            Self::Pending
        } else {
            Self::Failed(result.to_string())
        }
    }
}

/// Result of the best-effort verification attached to a deployment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationOutcome {
    /// Not attempted: local network, missing API key or build info
    Skipped { reason: String },
    Verified,
    AlreadyVerified,
    Failed { reason: String },
}

impl VerificationOutcome {
    pub fn skipped(reason: impl Into<String>) -> Self {
        Self::Skipped {
            reason: reason.into(),
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
        }
    }
}
