//! Integration tests for the operational pipelines using fake implementations
//!
//! Deployments run against a `FakeChain` with real artifact and record files
//! in a temporary directory; wiring and transfers against `FakeOApp` and
//! `FakeToken`.

use std::fs;
use std::path::{Path, PathBuf};

use alloy_primitives::{keccak256, Address, B256, U256};
use rdat_oft::operations::{
    deploy_contract, run_bridge_test, wire_rdat, ArtifactStore, BridgeTestParams, CheckStatus,
    ContractKind, DeployOutcome, DeploymentPlan, DeploymentStore, LinkStatus, VerifyContext,
    ADAPTER_CONTRACT, ONE_RDAT,
};
use rdat_oft::testing::{
    FakeChain, FakeClock, FakeContractState, FakeOApp, FakeToken, FakeVerifier,
};
use rdat_oft::{
    adapter_constructor_args, oft_constructor_args, EndpointId, NetworkName, OftError,
    PeerAddress, PollingConfig, VerificationOutcome, VerificationStatus, COMMON_ENDPOINT_V2,
    CREATE2_DEPLOYER, VANA_ENDPOINT_V2,
};
use rstest::rstest;

const DEPLOYER: Address = Address::with_last_byte(0xd0);
const MULTISIG: Address = Address::with_last_byte(0xaa);
const TOKEN: Address = Address::with_last_byte(0x70);

struct Workspace {
    root: PathBuf,
}

impl Workspace {
    fn new(name: &str) -> Self {
        let root = std::env::temp_dir().join(format!("rdat-oft-it-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&root);
        let workspace = Self { root };
        workspace.write_adapter_artifact();
        workspace
    }

    fn write(&self, relative: &str, contents: &str) {
        let path = self.root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn write_adapter_artifact(&self) {
        self.write(
            "artifacts/contracts/RdatOFTAdapter.sol/RdatOFTAdapter.json",
            r#"{"contractName":"RdatOFTAdapter","sourceName":"contracts/RdatOFTAdapter.sol","bytecode":"0x608060405234801561001057600080fd5b50"}"#,
        );
        self.write(
            "artifacts/contracts/RdatOFTAdapter.sol/RdatOFTAdapter.dbg.json",
            r#"{"_format":"hh-sol-dbg-1","buildInfo":"../../build-info/f00d.json"}"#,
        );
        self.write(
            "artifacts/build-info/f00d.json",
            r#"{"solcLongVersion":"0.8.22+commit.4fc1097e","input":{"language":"Solidity","sources":{}}}"#,
        );
    }

    fn write_oft_artifact(&self) {
        self.write(
            "artifacts/contracts/RdatOFT.sol/RdatOFT.json",
            r#"{"contractName":"RdatOFT","sourceName":"contracts/RdatOFT.sol","bytecode":"0x6080604052348015600e575f80fd5b50"}"#,
        );
    }

    fn artifacts(&self) -> ArtifactStore {
        ArtifactStore::new(self.root.join("artifacts"))
    }

    fn records(&self) -> DeploymentStore {
        DeploymentStore::new(self.root.join("deployments"))
    }

    fn path(&self) -> &Path {
        &self.root
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}

/// A chain whose new contracts behave like an adapter wrapping `TOKEN`
fn adapter_chain() -> FakeChain {
    FakeChain::new(DEPLOYER).constructing(FakeContractState::adapter(DEPLOYER, TOKEN))
}

fn adapter_plan_owned_by(
    network: NetworkName,
    salt: Option<B256>,
    owner: Address,
) -> DeploymentPlan {
    DeploymentPlan::builder()
        .kind(ContractKind::Adapter { token: TOKEN })
        .network(network.descriptor())
        .constructor_args(adapter_constructor_args(TOKEN, VANA_ENDPOINT_V2, owner))
        .owner(owner)
        .maybe_salt(salt)
        .build()
}

fn adapter_plan(network: NetworkName, salt: Option<B256>) -> DeploymentPlan {
    adapter_plan_owned_by(network, salt, DEPLOYER)
}

fn oft_plan(owner: Address) -> DeploymentPlan {
    DeploymentPlan::builder()
        .kind(ContractKind::Oft)
        .network(NetworkName::Hardhat.descriptor())
        .constructor_args(oft_constructor_args(COMMON_ENDPOINT_V2, owner))
        .owner(owner)
        .build()
}

// ============================================================================
// Deployment
// ============================================================================

#[tokio::test]
async fn test_redeploy_with_live_record_is_noop() {
    let ws = Workspace::new("noop");
    let chain = adapter_chain();
    let plan = adapter_plan(NetworkName::Hardhat, None);

    let first = deploy_contract(&chain, &ws.artifacts(), &ws.records(), &plan, None)
        .await
        .unwrap();
    let second = deploy_contract(&chain, &ws.artifacts(), &ws.records(), &plan, None)
        .await
        .unwrap();

    assert!(matches!(first.outcome, DeployOutcome::Deployed { .. }));
    assert_eq!(
        second.outcome,
        DeployOutcome::Reused {
            address: first.outcome.address()
        }
    );
    assert!(second.checks.is_empty());
    assert_eq!(chain.deployments().len(), 1);
    assert!(ws
        .path()
        .join("deployments/hardhat/RdatOFTAdapter.json")
        .exists());
}

#[tokio::test]
async fn test_stale_record_triggers_fresh_deploy() {
    let ws = Workspace::new("stale");
    let chain = adapter_chain();
    let plan = adapter_plan(NetworkName::Hardhat, None);

    let first = deploy_contract(&chain, &ws.artifacts(), &ws.records(), &plan, None)
        .await
        .unwrap();
    chain.clear_code(first.outcome.address());

    let second = deploy_contract(&chain, &ws.artifacts(), &ws.records(), &plan, None)
        .await
        .unwrap();

    assert!(matches!(second.outcome, DeployOutcome::Deployed { .. }));
    assert_ne!(second.outcome.address(), first.outcome.address());
    let record = ws
        .records()
        .load("hardhat", ADAPTER_CONTRACT)
        .unwrap()
        .unwrap();
    assert_eq!(record.address, second.outcome.address());
}

#[tokio::test]
async fn test_create2_deploy_is_deterministic_and_reused() {
    let ws = Workspace::new("create2");
    let chain = adapter_chain();
    let salt = keccak256("rdat-v1");
    let plan = adapter_plan(NetworkName::Hardhat, Some(salt));

    let report = deploy_contract(&chain, &ws.artifacts(), &ws.records(), &plan, None)
        .await
        .unwrap();

    let artifact = ws.artifacts().load(ADAPTER_CONTRACT).unwrap();
    let args = adapter_constructor_args(TOKEN, VANA_ENDPOINT_V2, DEPLOYER);
    let expected = CREATE2_DEPLOYER.create2_from_code(salt.0, &artifact.init_code(&args));
    assert_eq!(report.outcome.address(), expected);

    // Same salt from a machine without the record
    let other = Workspace::new("create2-other");
    let again = deploy_contract(&chain, &other.artifacts(), &other.records(), &plan, None)
        .await
        .unwrap();
    assert_eq!(again.outcome, DeployOutcome::Reused { address: expected });
    let record = other
        .records()
        .load("hardhat", ADAPTER_CONTRACT)
        .unwrap()
        .unwrap();
    assert_eq!(record.transaction_hash, None);
    assert_eq!(record.salt, Some(salt));
}

#[tokio::test]
async fn test_reused_deployment_reports_recorded_owner_and_args() {
    let ws = Workspace::new("reuse-owner");
    let chain = adapter_chain();
    let verifier = FakeVerifier::already_verified();
    let clock = FakeClock::new();
    let ctx = || VerifyContext {
        verifier: &verifier,
        clock: &clock,
        polling: PollingConfig::default(),
    };

    let first_plan = adapter_plan(NetworkName::Vana, None);
    let first = deploy_contract(
        &chain,
        &ws.artifacts(),
        &ws.records(),
        &first_plan,
        Some(ctx()),
    )
    .await
    .unwrap();

    // the owner variable changed between runs
    let second_plan = adapter_plan_owned_by(NetworkName::Vana, None, MULTISIG);
    let second = deploy_contract(
        &chain,
        &ws.artifacts(),
        &ws.records(),
        &second_plan,
        Some(ctx()),
    )
    .await
    .unwrap();

    assert_eq!(
        second.outcome,
        DeployOutcome::Reused {
            address: first.outcome.address()
        }
    );
    assert_eq!(second.owner, DEPLOYER);

    let record = ws.records().load("vana", ADAPTER_CONTRACT).unwrap().unwrap();
    assert_eq!(record.owner, DEPLOYER);
    let submissions = verifier.submissions();
    assert_eq!(submissions.len(), 2);
    assert_eq!(submissions[1].address(), record.address);
    assert_eq!(submissions[1].constructor_args(), &record.args);
}

#[tokio::test]
async fn test_fresh_adapter_passes_deploy_checks() {
    let ws = Workspace::new("adapter-checks");
    let chain = adapter_chain();

    let report = deploy_contract(
        &chain,
        &ws.artifacts(),
        &ws.records(),
        &adapter_plan(NetworkName::Hardhat, None),
        None,
    )
    .await
    .unwrap();

    let properties: Vec<_> = report.checks.iter().map(|check| check.property).collect();
    assert_eq!(properties, vec!["owner()", "token()"]);
    assert!(report.checks_passed());
    assert!(report.into_result().is_ok());
}

#[tokio::test]
async fn test_adapter_wrapping_wrong_token_fails_checks() {
    let ws = Workspace::new("adapter-wrong-token");
    let other_token = Address::with_last_byte(0x71);
    let chain =
        FakeChain::new(DEPLOYER).constructing(FakeContractState::adapter(DEPLOYER, other_token));

    let report = deploy_contract(
        &chain,
        &ws.artifacts(),
        &ws.records(),
        &adapter_plan(NetworkName::Hardhat, None),
        None,
    )
    .await
    .unwrap();

    assert!(matches!(report.checks[1].status, CheckStatus::Mismatch { .. }));
    // the deployment itself is still recorded
    assert!(ws.records().load("hardhat", ADAPTER_CONTRACT).unwrap().is_some());
    assert!(matches!(
        report.into_result(),
        Err(OftError::DeploymentCheckFailed { failed: 1, .. })
    ));
}

#[tokio::test]
async fn test_fresh_oft_has_zero_supply_and_configured_owner() {
    let ws = Workspace::new("oft-checks");
    ws.write_oft_artifact();
    let chain = FakeChain::new(DEPLOYER).constructing(FakeContractState::oft(MULTISIG));

    let report = deploy_contract(
        &chain,
        &ws.artifacts(),
        &ws.records(),
        &oft_plan(MULTISIG),
        None,
    )
    .await
    .unwrap();

    let properties: Vec<_> = report.checks.iter().map(|check| check.property).collect();
    assert_eq!(properties, vec!["owner()", "totalSupply()"]);
    assert!(report.checks_passed());
    assert_eq!(report.owner, MULTISIG);
}

#[rstest]
#[case::owner_left_with_deployer(
    FakeContractState::oft(DEPLOYER),
    "owner()"
)]
#[case::supply_minted_at_construction(
    FakeContractState { total_supply: ONE_RDAT, ..FakeContractState::oft(MULTISIG) },
    "totalSupply()"
)]
#[tokio::test]
async fn test_oft_check_mismatch_is_reported(
    #[case] constructed: FakeContractState,
    #[case] failing: &str,
) {
    let ws = Workspace::new(&format!("oft-mismatch-{}", failing.trim_end_matches("()")));
    ws.write_oft_artifact();
    let chain = FakeChain::new(DEPLOYER).constructing(constructed);

    let report = deploy_contract(
        &chain,
        &ws.artifacts(),
        &ws.records(),
        &oft_plan(MULTISIG),
        None,
    )
    .await
    .unwrap();

    let failed: Vec<_> = report
        .checks
        .iter()
        .filter(|check| !check.passed())
        .map(|check| check.property)
        .collect();
    assert_eq!(failed, vec![failing]);
    assert!(report.into_result().is_err());
}

#[tokio::test]
async fn test_local_network_skips_verification() {
    let ws = Workspace::new("local-verify");
    let chain = adapter_chain();
    let verifier = FakeVerifier::queued(vec![VerificationStatus::Verified]);
    let clock = FakeClock::new();
    let ctx = VerifyContext {
        verifier: &verifier,
        clock: &clock,
        polling: PollingConfig::default(),
    };

    let report = deploy_contract(
        &chain,
        &ws.artifacts(),
        &ws.records(),
        &adapter_plan(NetworkName::Hardhat, None),
        Some(ctx),
    )
    .await
    .unwrap();

    assert!(matches!(report.verification, VerificationOutcome::Skipped { .. }));
    assert!(verifier.submissions().is_empty());
}

#[tokio::test]
async fn test_live_network_verifies_with_build_info() {
    let ws = Workspace::new("live-verify");
    let chain = adapter_chain();
    let verifier =
        FakeVerifier::queued(vec![VerificationStatus::Pending, VerificationStatus::Verified]);
    let clock = FakeClock::new();
    let ctx = VerifyContext {
        verifier: &verifier,
        clock: &clock,
        polling: PollingConfig::default(),
    };

    let report = deploy_contract(
        &chain,
        &ws.artifacts(),
        &ws.records(),
        &adapter_plan(NetworkName::Vana, None),
        Some(ctx),
    )
    .await
    .unwrap();

    assert_eq!(report.verification, VerificationOutcome::Verified);
    let submissions = verifier.submissions();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].address(), report.outcome.address());
    assert_eq!(
        submissions[0].contract_name(),
        "contracts/RdatOFTAdapter.sol:RdatOFTAdapter"
    );
    assert_eq!(submissions[0].compiler_version(), "v0.8.22+commit.4fc1097e");
}

#[tokio::test]
async fn test_verification_failure_does_not_fail_deploy() {
    let ws = Workspace::new("verify-fail");
    let chain = adapter_chain();
    let verifier = FakeVerifier::rejecting("Invalid API Key");
    let clock = FakeClock::new();
    let ctx = VerifyContext {
        verifier: &verifier,
        clock: &clock,
        polling: PollingConfig::default(),
    };

    let report = deploy_contract(
        &chain,
        &ws.artifacts(),
        &ws.records(),
        &adapter_plan(NetworkName::Base, None),
        Some(ctx),
    )
    .await
    .unwrap();

    assert!(matches!(report.outcome, DeployOutcome::Deployed { .. }));
    assert!(matches!(report.verification, VerificationOutcome::Failed { .. }));
}

#[tokio::test]
async fn test_missing_artifact_fails_before_any_transaction() {
    let ws = Workspace::new("no-artifact");
    let chain = FakeChain::new(DEPLOYER);

    let err = deploy_contract(
        &chain,
        &ws.artifacts(),
        &ws.records(),
        &oft_plan(DEPLOYER),
        None,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, OftError::Artifact(_)));
    assert!(chain.deployments().is_empty());
}

// ============================================================================
// Wiring
// ============================================================================

#[rstest]
#[case::adapter_first(false)]
#[case::oft_first(true)]
#[tokio::test]
async fn test_peers_symmetric_regardless_of_order(#[case] oft_prewired: bool) {
    let vana = FakeOApp::new(Address::with_last_byte(1), DEPLOYER);
    let base = FakeOApp::new(Address::with_last_byte(2), DEPLOYER);

    if oft_prewired {
        use rdat_oft::traits::PeerRegistry;
        base.set_peer(EndpointId::Vana, PeerAddress::from_evm(vana.address()))
            .await
            .unwrap();
    }

    let report = wire_rdat(DEPLOYER, &vana, &base, None).await;

    assert!(report.all_consistent());
    assert_eq!(
        vana.stored_peer(EndpointId::Base),
        PeerAddress::from_evm(base.address())
    );
    assert_eq!(
        base.stored_peer(EndpointId::Vana),
        PeerAddress::from_evm(vana.address())
    );
    assert_eq!(
        report.links[1].status == LinkStatus::AlreadySet,
        oft_prewired
    );
}

#[tokio::test]
async fn test_non_owner_cannot_wire() {
    let vana = FakeOApp::new(Address::with_last_byte(1), MULTISIG);
    let base = FakeOApp::new(Address::with_last_byte(2), MULTISIG);

    let report = wire_rdat(DEPLOYER, &vana, &base, None).await;

    assert!(matches!(
        report.links[0].status,
        LinkStatus::Failed(ref reason) if reason.contains("not the owner")
    ));
    assert_eq!(report.links[1].status, LinkStatus::NotAttempted);
    assert!(vana.set_peer_calls().is_empty());
    assert!(base.set_peer_calls().is_empty());
    assert!(matches!(
        report.into_result(),
        Err(OftError::WiringIncomplete { failed: 2, total: 2 })
    ));
}

// ============================================================================
// Bridge test
// ============================================================================

#[tokio::test]
async fn test_bridge_test_custom_amount() {
    let sender = DEPLOYER;
    let token = FakeToken::new(TOKEN);
    token.set_balance(sender, ONE_RDAT * U256::from(10u64));
    let adapter = FakeOApp::new(Address::with_last_byte(1), sender).with_fee(U256::from(1_000u64));
    let amount = ONE_RDAT * U256::from(5u64);

    let params = BridgeTestParams::builder()
        .sender(sender)
        .amount(amount)
        .build();
    let report = run_bridge_test(&token, &adapter, &params).await.unwrap();

    assert_eq!(report.balance_before, ONE_RDAT * U256::from(10u64));
    assert_eq!(token.approvals(), vec![(adapter.address(), amount)]);
    let sent = adapter.sent();
    assert_eq!(sent[0].param.amount_ld(), amount);
    assert_eq!(sent[0].param.min_amount_ld(), amount);
    assert_eq!(sent[0].param.to(), PeerAddress::from_evm(sender));
    assert_eq!(report.receipt.oft_sent.unwrap().destination(), Some(EndpointId::Base));
}

#[tokio::test]
async fn test_bridge_test_exact_balance_is_enough() {
    let token = FakeToken::new(TOKEN);
    token.set_balance(DEPLOYER, ONE_RDAT);
    let adapter = FakeOApp::new(Address::with_last_byte(1), DEPLOYER);

    let params = BridgeTestParams::builder().sender(DEPLOYER).build();
    assert!(run_bridge_test(&token, &adapter, &params).await.is_ok());
}
