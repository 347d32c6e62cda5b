// SPDX-FileCopyrightText: 2025 Vana Foundation
//
// SPDX-License-Identifier: Apache-2.0
//! Known contract addresses for the RDAT bridge
//!
//! Endpoint candidates on Vana, the deployed adapter and the Solana OFT store.

use alloy_primitives::{address, Address};

// LayerZero Endpoint Candidates (Vana)

/// Vana-specific LayerZero V2 endpoint. Has code on Vana mainnet.
///
/// <https://vanascan.io/address/0xcb566e3B6934Fa77258d68ea18E931fa75e1aaAa>
pub const VANA_ENDPOINT_V2: Address = address!("cb566e3B6934Fa77258d68ea18E931fa75e1aaAa");

/// The endpoint address shared by most LayerZero V2 EVM deployments.
///
/// <https://docs.layerzero.network/v2/deployments/deployed-contracts>
pub const COMMON_ENDPOINT_V2: Address = address!("1a44076050125825900e736c501f859c50fE728c");

// RDAT Deployments

/// `RdatOFTAdapter` on Vana mainnet
///
/// <https://vanascan.io/address/0xd546C45872eeA596155EAEAe9B8495f02ca4fc58>
pub const VANA_RDAT_ADAPTER: Address = address!("d546C45872eeA596155EAEAe9B8495f02ca4fc58");

/// OFT store account of the RDAT Solana OFT program (base58)
pub const SOLANA_RDAT_OFT_STORE: &str = "FkVGPvVoE3oYoz6EDuJ3ZP2D9aSgM5HHuxk3jf9ckU35";

// Deployment Tooling

/// Deterministic deployment proxy used for CREATE2 deployments.
///
/// Accepts `salt ++ init_code` as calldata and deploys at
/// `keccak256(0xff ++ proxy ++ salt ++ keccak256(init_code))[12..]`.
///
/// <https://github.com/Arachnid/deterministic-deployment-proxy>
pub const CREATE2_DEPLOYER: Address = address!("4e59b44847b379578588920cA78FbF26c0B4956C");
