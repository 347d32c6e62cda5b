//! Per-command configuration assembled from the environment

use std::path::PathBuf;

use alloy_primitives::{Address, B256};
use alloy_signer_local::PrivateKeySigner;
use url::Url;

use crate::chain::addresses::{COMMON_ENDPOINT_V2, VANA_ENDPOINT_V2};
use crate::chain::{NetworkDescriptor, NetworkName};
use crate::config::env::{
    parse_address, parse_flag, parse_private_key, parse_salt, parse_string, parse_url, present,
    EnvSource, ParseResult, Requirements,
};
use crate::error::Result;
use crate::protocol::{EndpointId, PeerAddress};

pub const DEFAULT_ARTIFACTS_DIR: &str = "./artifacts";
pub const DEFAULT_DEPLOYMENTS_DIR: &str = "./deployments";

/// RPC URL of `network`, from its override variable or the built-in default
fn rpc_url(req: &mut Requirements<'_>, network: &NetworkDescriptor) -> Option<Url> {
    req.with_default(network.rpc_env, network.default_rpc_url, parse_url)
}

fn parse_path(raw: &str) -> ParseResult<PathBuf> {
    Ok(PathBuf::from(raw))
}

fn parse_solana_peer(raw: &str) -> ParseResult<PeerAddress> {
    PeerAddress::parse_for(EndpointId::Solana, raw).map_err(|e| e.to_string())
}

/// Settings shared by both deployment commands
#[derive(Clone)]
pub struct DeploySettings {
    pub network: &'static NetworkDescriptor,
    pub rpc_url: Url,
    pub signer: PrivateKeySigner,
    pub artifacts_dir: PathBuf,
    pub deployments_dir: PathBuf,
    /// CREATE2 salt; plain creation when unset
    pub salt: Option<B256>,
    /// Explorer key for the target network, when one is configured
    pub explorer_api_key: Option<String>,
    pub report_gas: bool,
}

impl DeploySettings {
    fn collect(req: &mut Requirements<'_>, network: NetworkName) -> Option<Self> {
        let network = network.descriptor();
        let signer = req.required("DEPLOYER_PRIVATE_KEY", parse_private_key);
        let rpc_url = rpc_url(req, network);
        let artifacts_dir = req.with_default("ARTIFACTS_DIR", DEFAULT_ARTIFACTS_DIR, parse_path);
        let deployments_dir =
            req.with_default("DEPLOYMENTS_DIR", DEFAULT_DEPLOYMENTS_DIR, parse_path);
        let salt = req.optional("DEPLOY_SALT", parse_salt);
        let explorer_api_key = network
            .explorer
            .and_then(|explorer| req.optional(explorer.api_key_env, parse_string));
        let report_gas = req.optional("REPORT_GAS", parse_flag).unwrap_or(false);

        Some(Self {
            network,
            rpc_url: rpc_url?,
            signer: signer?,
            artifacts_dir: artifacts_dir?,
            deployments_dir: deployments_dir?,
            salt,
            explorer_api_key,
            report_gas,
        })
    }

    /// Multisig when configured, otherwise the deployer itself
    fn resolve_owner(&self, multisig: Option<Address>) -> Address {
        multisig.unwrap_or_else(|| self.signer.address())
    }
}

/// `deploy-adapter`: `RdatOFTAdapter(token, endpoint, owner)`
#[derive(Clone)]
pub struct DeployAdapterConfig {
    pub settings: DeploySettings,
    pub token: Address,
    pub endpoint: Address,
    pub owner: Address,
}

impl DeployAdapterConfig {
    pub fn from_env(env: &EnvSource, network: NetworkName) -> Result<Self> {
        let mut req = env.requirements();
        let settings = DeploySettings::collect(&mut req, network);
        let token = req.required("RDAT_TOKEN_ADDRESS", parse_address);
        let endpoint = req.required("VANA_ENDPOINT", parse_address);
        let multisig = req.optional("VANA_MULTISIG_ADDRESS", parse_address);
        req.finish()?;

        let settings = present(settings, "DEPLOYER_PRIVATE_KEY")?;
        Ok(Self {
            owner: settings.resolve_owner(multisig),
            token: present(token, "RDAT_TOKEN_ADDRESS")?,
            endpoint: present(endpoint, "VANA_ENDPOINT")?,
            settings,
        })
    }
}

/// `deploy-oft`: `RdatOFT("RDAT", "RDAT", endpoint, owner)`
#[derive(Clone)]
pub struct DeployOftConfig {
    pub settings: DeploySettings,
    pub endpoint: Address,
    pub owner: Address,
}

impl DeployOftConfig {
    pub fn from_env(env: &EnvSource, network: NetworkName) -> Result<Self> {
        let mut req = env.requirements();
        let settings = DeploySettings::collect(&mut req, network);
        let endpoint = req.required("BASE_ENDPOINT", parse_address);
        let multisig = req.optional("BASE_MULTISIG_ADDRESS", parse_address);
        req.finish()?;

        let settings = present(settings, "DEPLOYER_PRIVATE_KEY")?;
        Ok(Self {
            owner: settings.resolve_owner(multisig),
            endpoint: present(endpoint, "BASE_ENDPOINT")?,
            settings,
        })
    }
}

/// `wire`: peers between the Vana adapter, the Base OFT and optionally Solana
#[derive(Clone)]
pub struct WireConfig {
    pub signer: PrivateKeySigner,
    pub vana_rpc_url: Url,
    pub base_rpc_url: Url,
    pub vana_adapter: Address,
    pub base_oft: Address,
    pub solana_oft: Option<PeerAddress>,
    pub report_gas: bool,
}

impl WireConfig {
    pub fn from_env(env: &EnvSource) -> Result<Self> {
        let mut req = env.requirements();
        let signer = req.required("DEPLOYER_PRIVATE_KEY", parse_private_key);
        let vana_rpc_url = rpc_url(&mut req, NetworkName::Vana.descriptor());
        let base_rpc_url = rpc_url(&mut req, NetworkName::Base.descriptor());
        let vana_adapter = req.required("VANA_ADAPTER_ADDRESS", parse_address);
        let base_oft = req.required("BASE_OFT_ADDRESS", parse_address);
        let solana_oft = req.optional("SOLANA_OFT_ADDRESS", parse_solana_peer);
        let report_gas = req.optional("REPORT_GAS", parse_flag).unwrap_or(false);
        req.finish()?;

        Ok(Self {
            signer: present(signer, "DEPLOYER_PRIVATE_KEY")?,
            vana_rpc_url: present(vana_rpc_url, "VANA_RPC_URL")?,
            base_rpc_url: present(base_rpc_url, "BASE_RPC_URL")?,
            vana_adapter: present(vana_adapter, "VANA_ADAPTER_ADDRESS")?,
            base_oft: present(base_oft, "BASE_OFT_ADDRESS")?,
            solana_oft,
            report_gas,
        })
    }
}

/// `bridge-test`: a single Vana to Base transfer through the adapter
#[derive(Clone)]
pub struct BridgeTestConfig {
    pub signer: PrivateKeySigner,
    pub vana_rpc_url: Url,
    pub vana_adapter: Address,
    pub token: Address,
    pub report_gas: bool,
}

impl BridgeTestConfig {
    pub fn from_env(env: &EnvSource) -> Result<Self> {
        let mut req = env.requirements();
        let signer = req.required("DEPLOYER_PRIVATE_KEY", parse_private_key);
        let vana_rpc_url = rpc_url(&mut req, NetworkName::Vana.descriptor());
        let vana_adapter = req.required("VANA_ADAPTER_ADDRESS", parse_address);
        let token = req.required("RDAT_TOKEN_ADDRESS", parse_address);
        let report_gas = req.optional("REPORT_GAS", parse_flag).unwrap_or(false);
        req.finish()?;

        Ok(Self {
            signer: present(signer, "DEPLOYER_PRIVATE_KEY")?,
            vana_rpc_url: present(vana_rpc_url, "VANA_RPC_URL")?,
            vana_adapter: present(vana_adapter, "VANA_ADAPTER_ADDRESS")?,
            token: present(token, "RDAT_TOKEN_ADDRESS")?,
            report_gas,
        })
    }
}

/// `verify-endpoint`: read-only probe of candidate endpoint addresses on Vana
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    pub rpc_url: Url,
    pub candidates: Vec<Address>,
    pub expected_eid: EndpointId,
}

impl ProbeConfig {
    pub fn from_env(env: &EnvSource, candidates: Vec<Address>) -> Result<Self> {
        let mut req = env.requirements();
        let rpc_url = rpc_url(&mut req, NetworkName::Vana.descriptor());
        req.finish()?;

        let candidates = if candidates.is_empty() {
            vec![VANA_ENDPOINT_V2, COMMON_ENDPOINT_V2]
        } else {
            candidates
        };

        Ok(Self {
            rpc_url: present(rpc_url, "VANA_RPC_URL")?,
            candidates,
            expected_eid: EndpointId::Vana,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OftError;
    use rstest::rstest;

    const KEY: &str = "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";

    fn base_env() -> Vec<(&'static str, &'static str)> {
        vec![
            ("DEPLOYER_PRIVATE_KEY", KEY),
            ("RDAT_TOKEN_ADDRESS", "0x2c1cb46c1a4d9b5d6e1c1e5bc1f2ae4c3d5e6f70"),
            ("VANA_ENDPOINT", "0xcb566e3B6934Fa77258d68ea18E931fa75e1aaAa"),
            ("BASE_ENDPOINT", "0x1a44076050125825900e736c501f859c50fE728c"),
        ]
    }

    #[test]
    fn test_adapter_owner_defaults_to_deployer() {
        let env = EnvSource::from_pairs(base_env());
        let config = DeployAdapterConfig::from_env(&env, NetworkName::Vana).unwrap();

        assert_eq!(config.owner, config.settings.signer.address());
        assert_eq!(config.endpoint, VANA_ENDPOINT_V2);
        assert_eq!(config.settings.rpc_url.as_str(), "https://rpc.vana.org/");
        assert_eq!(config.settings.artifacts_dir, PathBuf::from("./artifacts"));
        assert!(config.settings.salt.is_none());
        assert!(!config.settings.report_gas);
    }

    #[rstest]
    #[case("true", true)]
    #[case("on", false)]
    #[case("yes", false)]
    fn test_report_gas_is_only_enabled_by_true(#[case] raw: &'static str, #[case] enabled: bool) {
        let mut pairs = base_env();
        pairs.push(("REPORT_GAS", raw));
        let env = EnvSource::from_pairs(pairs);

        let config = DeployOftConfig::from_env(&env, NetworkName::Base).unwrap();
        assert_eq!(config.settings.report_gas, enabled);
    }

    #[test]
    fn test_oft_owner_is_multisig_when_set() {
        let mut pairs = base_env();
        pairs.push(("BASE_MULTISIG_ADDRESS", "0x00000000000000000000000000000000000000aa"));
        pairs.push(("BASE_RPC_URL", "http://localhost:9545"));
        pairs.push(("BASESCAN_API_KEY", "key"));
        let env = EnvSource::from_pairs(pairs);

        let config = DeployOftConfig::from_env(&env, NetworkName::Base).unwrap();
        assert_eq!(config.owner, Address::with_last_byte(0xaa));
        assert_eq!(config.settings.rpc_url.as_str(), "http://localhost:9545/");
        assert_eq!(config.settings.explorer_api_key.as_deref(), Some("key"));
    }

    #[test]
    fn test_wire_reports_every_missing_variable() {
        let env = EnvSource::default();
        let err = WireConfig::from_env(&env).err().unwrap();
        insta::assert_snapshot!(
            err.to_string(),
            @"Missing required configuration: DEPLOYER_PRIVATE_KEY, VANA_ADAPTER_ADDRESS, BASE_OFT_ADDRESS"
        );
    }

    #[test]
    fn test_wire_accepts_base58_solana_peer() {
        let env = EnvSource::from_pairs([
            ("DEPLOYER_PRIVATE_KEY", KEY),
            ("VANA_ADAPTER_ADDRESS", "0xd546C45872eeA596155EAEAe9B8495f02ca4fc58"),
            ("BASE_OFT_ADDRESS", "0x00000000000000000000000000000000000000bb"),
            ("SOLANA_OFT_ADDRESS", "FkVGPvVoE3oYoz6EDuJ3ZP2D9aSgM5HHuxk3jf9ckU35"),
        ]);
        let config = WireConfig::from_env(&env).unwrap();
        let solana = config.solana_oft.unwrap();
        assert_eq!(
            solana.to_base58(),
            "FkVGPvVoE3oYoz6EDuJ3ZP2D9aSgM5HHuxk3jf9ckU35"
        );
    }

    #[test]
    fn test_bridge_test_rejects_bad_adapter() {
        let env = EnvSource::from_pairs([
            ("DEPLOYER_PRIVATE_KEY", KEY),
            ("VANA_ADAPTER_ADDRESS", "0x1234"),
            ("RDAT_TOKEN_ADDRESS", "0x2c1cb46c1a4d9b5d6e1c1e5bc1f2ae4c3d5e6f70"),
        ]);
        assert!(matches!(
            BridgeTestConfig::from_env(&env),
            Err(OftError::InvalidConfig { name, .. }) if name == "VANA_ADAPTER_ADDRESS"
        ));
    }

    #[test]
    fn test_probe_default_candidates() {
        let config = ProbeConfig::from_env(&EnvSource::default(), vec![]).unwrap();
        assert_eq!(config.candidates, vec![VANA_ENDPOINT_V2, COMMON_ENDPOINT_V2]);
        assert_eq!(config.expected_eid, EndpointId::Vana);
    }
}
