//! Declarative OApp wiring graph
//!
//! Describes the security stack (message libraries, ULN confirmations, DVNs)
//! and enforced executor options of every directed connection between the
//! bridge contracts. The graph serializes to the JSON shape consumed by the
//! LayerZero wiring tooling; `wiring-config` prints it.

use alloy_primitives::Bytes;
use serde::{Deserialize, Serialize};

use crate::chain::addresses::{SOLANA_RDAT_OFT_STORE, VANA_RDAT_ADAPTER};
use crate::protocol::{EndpointId, ExecutorOptionType, ExecutorOptions};

pub const SEND_LIBRARY: &str = "SendUln302";
pub const RECEIVE_LIBRARY: &str = "ReceiveUln302";
pub const MAX_MESSAGE_SIZE: u32 = 10_000;
pub const LAYERZERO_LABS_DVN: &str = "LayerZero Labs";

/// `SEND` message type
pub const MSG_TYPE_SEND: u16 = 1;
/// `SEND_AND_COMPOSE` message type
pub const MSG_TYPE_SEND_AND_CALL: u16 = 2;

/// Compute units for `lz_receive` on Solana
pub const SOLANA_LZ_RECEIVE_CU: u64 = 300_000;
/// Lamports to fund the recipient's SPL token account
pub const SPL_TOKEN_ACCOUNT_RENT: u64 = 2_039_280;

/// A contract in the graph, by deployment name or by address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OmniPoint {
    pub eid: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl OmniPoint {
    pub fn named(eid: EndpointId, contract_name: &str) -> Self {
        Self {
            eid: eid.as_u32(),
            contract_name: Some(contract_name.to_string()),
            address: None,
        }
    }

    pub fn at(eid: EndpointId, address: impl ToString) -> Self {
        Self {
            eid: eid.as_u32(),
            contract_name: None,
            address: Some(address.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UlnConfig {
    pub confirmations: u64,
    #[serde(rename = "requiredDVNs")]
    pub required_dvns: Vec<String>,
    #[serde(rename = "optionalDVNs")]
    pub optional_dvns: Vec<String>,
    #[serde(rename = "optionalDVNThreshold")]
    pub optional_dvn_threshold: u8,
}

impl UlnConfig {
    pub fn new(confirmations: u64, required_dvns: &[&str]) -> Self {
        Self {
            confirmations,
            required_dvns: required_dvns.iter().map(|d| d.to_string()).collect(),
            optional_dvns: Vec::new(),
            optional_dvn_threshold: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutorConfig {
    pub max_message_size: u32,
    /// Empty: resolved by the framework's default executor
    pub executor_address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendConfig {
    pub uln_config: UlnConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executor_config: Option<ExecutorConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiveConfig {
    pub uln_config: UlnConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiveLibraryConfig {
    pub receive_library: String,
    pub grace_period: u64,
}

/// Executor option enforced by the sending OApp for one message type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnforcedOption {
    pub msg_type: u16,
    pub option_type: ExecutorOptionType,
    /// Gas on EVM destinations, compute units on Solana
    pub gas: u64,
    pub value: u64,
}

impl EnforcedOption {
    pub const fn lz_receive(msg_type: u16, gas: u64, value: u64) -> Self {
        Self {
            msg_type,
            option_type: ExecutorOptionType::LzReceive,
            gas,
            value,
        }
    }

    fn append_to(&self, options: ExecutorOptions) -> ExecutorOptions {
        let gas = u128::from(self.gas);
        let value = u128::from(self.value);
        match self.option_type {
            ExecutorOptionType::LzReceive => options.lz_receive(gas, value),
            ExecutorOptionType::Compose => options.compose(0, gas, value),
            ExecutorOptionType::Ordered => options.ordered(),
            // a native drop needs a receiver, which the graph does not carry
            ExecutorOptionType::NativeDrop => options,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub send_library: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receive_library_config: Option<ReceiveLibraryConfig>,
    pub send_config: SendConfig,
    pub receive_config: ReceiveConfig,
    pub enforced_options: Vec<EnforcedOption>,
}

/// Directed connection `from -> to`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub from: OmniPoint,
    pub to: OmniPoint,
    pub config: ConnectionConfig,
}

impl Connection {
    /// Packed type-3 options per message type, in ascending message type order
    pub fn encoded_enforced_options(&self) -> Vec<(u16, Bytes)> {
        let mut msg_types: Vec<u16> = self
            .config
            .enforced_options
            .iter()
            .map(|o| o.msg_type)
            .collect();
        msg_types.sort_unstable();
        msg_types.dedup();

        msg_types
            .into_iter()
            .map(|msg_type| {
                let options = self
                    .config
                    .enforced_options
                    .iter()
                    .filter(|o| o.msg_type == msg_type)
                    .fold(ExecutorOptions::new(), |acc, o| o.append_to(acc));
                (msg_type, options.encode())
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractEntry {
    pub contract: OmniPoint,
}

/// Bidirectional pair, expanded by [`generate_connections`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairSpec {
    pub a: OmniPoint,
    pub b: OmniPoint,
    pub required_dvns: Vec<String>,
    /// `[a -> b, b -> a]` block confirmations
    pub confirmations: [u64; 2],
    /// `[options on a -> b, options on b -> a]`
    pub enforced_options: [Vec<EnforcedOption>; 2],
}

/// Expands each pair into its two directed connections.
///
/// On `a -> b` the send side waits `confirmations[0]` and the receive side
/// (messages coming back from `b`) `confirmations[1]`; `b -> a` mirrors it.
pub fn generate_connections(pairs: &[PairSpec]) -> Vec<Connection> {
    pairs
        .iter()
        .flat_map(|pair| {
            let dvns: Vec<&str> = pair.required_dvns.iter().map(String::as_str).collect();
            let [a_to_b, b_to_a] = pair.confirmations;
            [
                directed(&pair.a, &pair.b, [a_to_b, b_to_a], &dvns, &pair.enforced_options[0]),
                directed(&pair.b, &pair.a, [b_to_a, a_to_b], &dvns, &pair.enforced_options[1]),
            ]
        })
        .collect()
}

/// `from -> to` with `[send, receive]` confirmations
fn directed(
    from: &OmniPoint,
    to: &OmniPoint,
    [send, receive]: [u64; 2],
    dvns: &[&str],
    options: &[EnforcedOption],
) -> Connection {
    Connection {
        from: from.clone(),
        to: to.clone(),
        config: ConnectionConfig {
            send_library: None,
            receive_library_config: None,
            send_config: SendConfig {
                uln_config: UlnConfig::new(send, dvns),
                executor_config: None,
            },
            receive_config: ReceiveConfig {
                uln_config: UlnConfig::new(receive, dvns),
            },
            enforced_options: options.to_vec(),
        },
    }
}

/// Contracts plus directed connections
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAppGraph {
    pub contracts: Vec<ContractEntry>,
    pub connections: Vec<Connection>,
}

fn evm_enforced_options() -> Vec<EnforcedOption> {
    vec![
        EnforcedOption::lz_receive(MSG_TYPE_SEND, 200_000, 0),
        EnforcedOption::lz_receive(MSG_TYPE_SEND_AND_CALL, 300_000, 0),
    ]
}

fn evm_connection(from: &OmniPoint, to: &OmniPoint, send: u64, receive: u64) -> Connection {
    Connection {
        from: from.clone(),
        to: to.clone(),
        config: ConnectionConfig {
            send_library: Some(SEND_LIBRARY.to_string()),
            receive_library_config: Some(ReceiveLibraryConfig {
                receive_library: RECEIVE_LIBRARY.to_string(),
                grace_period: 0,
            }),
            send_config: SendConfig {
                uln_config: UlnConfig::new(send, &[]),
                executor_config: Some(ExecutorConfig {
                    max_message_size: MAX_MESSAGE_SIZE,
                    executor_address: String::new(),
                }),
            },
            receive_config: ReceiveConfig {
                uln_config: UlnConfig::new(receive, &[]),
            },
            enforced_options: evm_enforced_options(),
        },
    }
}

impl OAppGraph {
    /// Vana adapter and Base OFT, referenced by deployment name
    pub fn vana_base() -> Self {
        let vana = OmniPoint::named(EndpointId::Vana, "RdatOFTAdapter");
        let base = OmniPoint::named(EndpointId::Base, "RdatOFT");

        Self {
            contracts: vec![
                ContractEntry {
                    contract: vana.clone(),
                },
                ContractEntry {
                    contract: base.clone(),
                },
            ],
            connections: vec![
                evm_connection(&vana, &base, 15, 5),
                evm_connection(&base, &vana, 5, 15),
            ],
        }
    }

    /// Deployed Vana adapter and the Solana OFT store
    pub fn vana_solana() -> Self {
        let vana = OmniPoint::at(EndpointId::Vana, VANA_RDAT_ADAPTER);
        let solana = OmniPoint::at(EndpointId::Solana, SOLANA_RDAT_OFT_STORE);

        let pair = PairSpec {
            a: vana.clone(),
            b: solana.clone(),
            required_dvns: vec![LAYERZERO_LABS_DVN.to_string()],
            confirmations: [15, 32],
            enforced_options: [
                vec![EnforcedOption::lz_receive(
                    MSG_TYPE_SEND,
                    SOLANA_LZ_RECEIVE_CU,
                    SPL_TOKEN_ACCOUNT_RENT,
                )],
                vec![EnforcedOption::lz_receive(MSG_TYPE_SEND, 150_000, 0)],
            ],
        };

        Self {
            contracts: vec![
                ContractEntry { contract: vana },
                ContractEntry { contract: solana },
            ],
            connections: generate_connections(&[pair]),
        }
    }

    pub fn connection(&self, from: EndpointId, to: EndpointId) -> Option<&Connection> {
        self.connections
            .iter()
            .find(|c| c.from.eid == from.as_u32() && c.to.eid == to.as_u32())
    }
}
