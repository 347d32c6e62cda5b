//! Compiled contract artifacts
//!
//! Contracts are compiled by Hardhat. Each contract has an artifact at
//! `<root>/contracts/<Name>.sol/<Name>.json` and a debug file next to it
//! pointing at the build info, whose `input` is the standard-JSON compiler
//! input explorers need for verification.

use std::fs;
use std::path::{Path, PathBuf};

use alloy_primitives::Bytes;
use serde::Deserialize;
use tracing::debug;

use crate::error::{OftError, Result};

/// The subset of a Hardhat artifact needed to deploy
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HardhatArtifact {
    pub contract_name: String,
    pub source_name: String,
    pub bytecode: Bytes,
}

impl HardhatArtifact {
    /// `source:Contract`, the name explorers expect
    pub fn fully_qualified_name(&self) -> String {
        format!("{}:{}", self.source_name, self.contract_name)
    }

    /// Creation bytecode followed by the encoded constructor arguments
    pub fn init_code(&self, constructor_args: &Bytes) -> Bytes {
        let mut code = Vec::with_capacity(self.bytecode.len() + constructor_args.len());
        code.extend_from_slice(&self.bytecode);
        code.extend_from_slice(constructor_args);
        code.into()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DebugFile {
    build_info: String,
}

/// Compiler run that produced an artifact
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildInfo {
    pub solc_long_version: String,
    pub input: serde_json::Value,
}

impl BuildInfo {
    /// Version string in the explorer's format, e.g. `v0.8.22+commit.4fc1097e`
    pub fn compiler_version(&self) -> String {
        format!("v{}", self.solc_long_version)
    }
}

/// Read access to an artifacts directory
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn artifact_path(&self, contract: &str) -> PathBuf {
        self.root
            .join("contracts")
            .join(format!("{contract}.sol"))
            .join(format!("{contract}.json"))
    }

    fn debug_path(&self, contract: &str) -> PathBuf {
        self.artifact_path(contract).with_extension("dbg.json")
    }

    pub fn load(&self, contract: &str) -> Result<HardhatArtifact> {
        let path = self.artifact_path(contract);
        let artifact: HardhatArtifact = read_json(&path)?;

        if artifact.bytecode.is_empty() {
            return Err(OftError::Artifact(format!(
                "{} has no creation bytecode (abstract contract or interface?)",
                path.display()
            )));
        }

        debug!(
            contract = contract,
            path = %path.display(),
            bytecode_len = artifact.bytecode.len(),
            event = "artifact_loaded"
        );
        Ok(artifact)
    }

    /// Build info of `contract`, resolved through its debug file
    pub fn build_info(&self, contract: &str) -> Result<BuildInfo> {
        let debug_path = self.debug_path(contract);
        let debug_file: DebugFile = read_json(&debug_path)?;
        let dir = debug_path
            .parent()
            .ok_or_else(|| OftError::Artifact(format!("{} has no parent", debug_path.display())))?;

        read_json(&dir.join(debug_file.build_info))
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path)
        .map_err(|e| OftError::Artifact(format!("cannot read {}: {e}", path.display())))?;
    serde_json::from_str(&raw)
        .map_err(|e| OftError::Artifact(format!("cannot parse {}: {e}", path.display())))
}
