//! Deployment records
//!
//! One JSON file per contract and network under
//! `<root>/<network>/<Contract>.json`. A record is what makes a second run of
//! a deploy command a no-op.

use std::fs;
use std::path::PathBuf;

use alloy_primitives::{Address, BlockNumber, Bytes, TxHash, B256};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRecord {
    pub address: Address,
    /// `None` when the contract was found already deployed at its CREATE2 address
    pub transaction_hash: Option<TxHash>,
    pub block_number: Option<BlockNumber>,
    pub deployer: Address,
    pub owner: Address,
    /// ABI-encoded constructor arguments
    pub args: Bytes,
    /// keccak256 of the full init code
    pub init_code_hash: B256,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salt: Option<B256>,
}

#[derive(Debug, Clone)]
pub struct DeploymentStore {
    root: PathBuf,
}

impl DeploymentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path(&self, network: &str, contract: &str) -> PathBuf {
        self.root.join(network).join(format!("{contract}.json"))
    }

    pub fn load(&self, network: &str, contract: &str) -> Result<Option<DeploymentRecord>> {
        let path = self.path(network, contract);
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&raw)?))
    }

    pub fn save(
        &self,
        network: &str,
        contract: &str,
        record: &DeploymentRecord,
    ) -> Result<PathBuf> {
        let path = self.path(network, contract);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(&path, serde_json::to_string_pretty(record)?)?;

        info!(
            network = network,
            contract = contract,
            address = %record.address,
            path = %path.display(),
            event = "deployment_record_saved"
        );
        Ok(path)
    }
}
