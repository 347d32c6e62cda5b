//! Idempotent contract deployment
//!
//! A deployment is skipped when a record exists and code is still present at
//! the recorded address, or when a CREATE2 deployment already occupies its
//! deterministic address. A fresh deployment is read back (owner, token,
//! supply) before anything else. After a deployment (or a skip) on a live
//! network the source is verified on a best-effort basis.

use std::fmt;

use alloy_primitives::{keccak256, Address, Bytes, B256, U256};
use bon::Builder;
use serde_json::to_string as to_json;
use tracing::{info, warn, Instrument};

use crate::chain::addresses::CREATE2_DEPLOYER;
use crate::chain::NetworkDescriptor;
use crate::config::PollingConfig;
use crate::error::{OftError, Result};
use crate::operations::artifacts::ArtifactStore;
use crate::operations::records::{DeploymentRecord, DeploymentStore};
use crate::operations::verify::verify_best_effort;
use crate::protocol::ConfirmedTx;
use crate::spans;
use crate::traits::{Clock, ContractDeployer, DeploymentReader, SourceVerifier};
use crate::verification::{VerificationOutcome, VerificationRequest};

pub const ADAPTER_CONTRACT: &str = "RdatOFTAdapter";
pub const OFT_CONTRACT: &str = "RdatOFT";

/// Which bridge contract a plan deploys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractKind {
    /// `RdatOFTAdapter` locking the existing `token`
    Adapter { token: Address },
    /// `RdatOFT`, minting the bridged supply
    Oft,
}

impl ContractKind {
    pub const fn contract_name(self) -> &'static str {
        match self {
            Self::Adapter { .. } => ADAPTER_CONTRACT,
            Self::Oft => OFT_CONTRACT,
        }
    }
}

/// What to deploy, where, and with which arguments
#[derive(Builder, Debug, Clone)]
pub struct DeploymentPlan {
    kind: ContractKind,
    network: &'static NetworkDescriptor,
    constructor_args: Bytes,
    owner: Address,
    salt: Option<B256>,
}

impl DeploymentPlan {
    pub fn kind(&self) -> ContractKind {
        self.kind
    }

    pub fn contract(&self) -> &'static str {
        self.kind.contract_name()
    }

    pub fn network(&self) -> &'static NetworkDescriptor {
        self.network
    }

    pub fn owner(&self) -> Address {
        self.owner
    }
}

/// Explorer access used for the verification step
pub struct VerifyContext<'a> {
    pub verifier: &'a dyn SourceVerifier,
    pub clock: &'a dyn Clock,
    pub polling: PollingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployOutcome {
    /// Code already present; no transaction was sent
    Reused { address: Address },
    Deployed { address: Address, tx: ConfirmedTx },
}

impl DeployOutcome {
    pub fn address(&self) -> Address {
        match self {
            Self::Reused { address } | Self::Deployed { address, .. } => *address,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    Passed,
    Mismatch { expected: String, observed: String },
    /// The read itself failed
    Unreadable(String),
}

/// One read-back of a freshly deployed contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentCheck {
    pub property: &'static str,
    pub status: CheckStatus,
}

impl DeploymentCheck {
    fn compare<T: PartialEq + fmt::Display>(
        property: &'static str,
        expected: T,
        observed: Result<T>,
    ) -> Self {
        let status = match observed {
            Ok(value) if value == expected => CheckStatus::Passed,
            Ok(value) => CheckStatus::Mismatch {
                expected: expected.to_string(),
                observed: value.to_string(),
            },
            Err(e) => CheckStatus::Unreadable(e.to_string()),
        };
        Self { property, status }
    }

    pub fn passed(&self) -> bool {
        self.status == CheckStatus::Passed
    }
}

impl fmt::Display for DeploymentCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            CheckStatus::Passed => write!(f, "{}: ok", self.property),
            CheckStatus::Mismatch { expected, observed } => {
                write!(f, "{}: expected {expected}, found {observed}", self.property)
            }
            CheckStatus::Unreadable(reason) => {
                write!(f, "{}: unreadable ({reason})", self.property)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployReport {
    pub contract: &'static str,
    pub network: &'static str,
    /// Owner the deployed contract was constructed with
    pub owner: Address,
    pub outcome: DeployOutcome,
    /// Empty when the deployment was reused
    pub checks: Vec<DeploymentCheck>,
    pub verification: VerificationOutcome,
}

impl DeployReport {
    pub fn checks_passed(&self) -> bool {
        self.checks.iter().all(DeploymentCheck::passed)
    }

    /// Errors with [`OftError::DeploymentCheckFailed`] when any read-back
    /// did not match.
    pub fn into_result(self) -> Result<Self> {
        let failed = self.checks.iter().filter(|check| !check.passed()).count();
        if failed > 0 {
            return Err(OftError::DeploymentCheckFailed {
                contract: self.contract.to_string(),
                failed,
            });
        }
        Ok(self)
    }
}

/// Deploys `plan` unless an equivalent deployment already exists, records
/// the result, checks a fresh deployment and verifies the source.
pub async fn deploy_contract<D>(
    deployer: &D,
    artifacts: &ArtifactStore,
    records: &DeploymentStore,
    plan: &DeploymentPlan,
    verify: Option<VerifyContext<'_>>,
) -> Result<DeployReport>
where
    D: ContractDeployer + DeploymentReader + ?Sized,
{
    let span = spans::deploy_contract(plan.network.name, plan.contract(), &deployer.deployer());

    async move {
        let artifact = artifacts.load(plan.contract())?;
        let init_code = artifact.init_code(&plan.constructor_args);
        let init_code_hash = keccak256(&init_code);

        let existing = find_existing(deployer, records, plan, init_code_hash, &init_code).await?;
        let (outcome, record) = match existing {
            Some(record) => {
                warn_on_plan_drift(plan, &record);
                let outcome = DeployOutcome::Reused {
                    address: record.address,
                };
                (outcome, record)
            }
            None => {
                let deployed = match plan.salt {
                    Some(salt) => deployer.deploy_create2(salt, init_code).await?,
                    None => deployer.deploy(init_code).await?,
                };
                info!(
                    contract = plan.contract(),
                    network = plan.network.name,
                    address = %deployed.address,
                    tx_hash = %deployed.tx.tx_hash,
                    gas_used = deployed.tx.gas_used,
                    event = "contract_deployed"
                );

                let record = DeploymentRecord {
                    address: deployed.address,
                    transaction_hash: Some(deployed.tx.tx_hash),
                    block_number: deployed.tx.block_number,
                    deployer: deployer.deployer(),
                    owner: plan.owner,
                    args: plan.constructor_args.clone(),
                    init_code_hash,
                    salt: plan.salt,
                };
                records.save(plan.network.name, plan.contract(), &record)?;

                let outcome = DeployOutcome::Deployed {
                    address: deployed.address,
                    tx: deployed.tx,
                };
                (outcome, record)
            }
        };

        let checks = match &outcome {
            DeployOutcome::Deployed { address, .. } => {
                check_deployment(deployer, plan, *address).await
            }
            DeployOutcome::Reused { .. } => Vec::new(),
        };

        let verification = match verify {
            _ if !plan.network.live => VerificationOutcome::skipped("local network"),
            None => VerificationOutcome::skipped("no explorer API key"),
            Some(ctx) => verify_deployment(artifacts, plan.contract(), &record, ctx).await,
        };

        Ok(DeployReport {
            contract: plan.contract(),
            network: plan.network.name,
            owner: record.owner,
            outcome,
            checks,
            verification,
        })
    }
    .instrument(span)
    .await
}

/// Record of an existing deployment equivalent to `plan`, if any
async fn find_existing<D>(
    deployer: &D,
    records: &DeploymentStore,
    plan: &DeploymentPlan,
    init_code_hash: B256,
    init_code: &Bytes,
) -> Result<Option<DeploymentRecord>>
where
    D: ContractDeployer + ?Sized,
{
    if let Some(record) = records.load(plan.network.name, plan.contract())? {
        if deployer.code_at(record.address).await?.is_empty() {
            warn!(
                contract = plan.contract(),
                address = %record.address,
                event = "stale_deployment_record"
            );
        } else {
            if record.init_code_hash != init_code_hash {
                warn!(
                    contract = plan.contract(),
                    address = %record.address,
                    event = "deployed_code_differs_from_artifact"
                );
            }
            info!(
                contract = plan.contract(),
                address = %record.address,
                event = "deployment_reused"
            );
            return Ok(Some(record));
        }
    }

    if let Some(salt) = plan.salt {
        let predicted = CREATE2_DEPLOYER.create2_from_code(salt.0, init_code);
        if !deployer.code_at(predicted).await?.is_empty() {
            info!(
                contract = plan.contract(),
                address = %predicted,
                event = "create2_address_occupied"
            );
            let record = DeploymentRecord {
                address: predicted,
                transaction_hash: None,
                block_number: None,
                deployer: deployer.deployer(),
                owner: plan.owner,
                args: plan.constructor_args.clone(),
                init_code_hash,
                salt: Some(salt),
            };
            records.save(plan.network.name, plan.contract(), &record)?;
            return Ok(Some(record));
        }
    }

    Ok(None)
}

/// A reused deployment keeps what it was constructed with
fn warn_on_plan_drift(plan: &DeploymentPlan, record: &DeploymentRecord) {
    if record.owner != plan.owner {
        warn!(
            contract = plan.contract(),
            address = %record.address,
            recorded_owner = %record.owner,
            configured_owner = %plan.owner,
            event = "recorded_owner_differs"
        );
    }
    if record.args != plan.constructor_args {
        warn!(
            contract = plan.contract(),
            address = %record.address,
            event = "recorded_constructor_args_differ"
        );
    }
}

/// Reads back owner, wrapped token and supply of a fresh deployment
async fn check_deployment<R>(
    reader: &R,
    plan: &DeploymentPlan,
    address: Address,
) -> Vec<DeploymentCheck>
where
    R: DeploymentReader + ?Sized,
{
    let mut checks = vec![DeploymentCheck::compare(
        "owner()",
        plan.owner,
        reader.owner_of(address).await,
    )];
    checks.push(match plan.kind {
        ContractKind::Adapter { token } => {
            DeploymentCheck::compare("token()", token, reader.token_of(address).await)
        }
        ContractKind::Oft => DeploymentCheck::compare(
            "totalSupply()",
            U256::ZERO,
            reader.total_supply_of(address).await,
        ),
    });

    for check in checks.iter().filter(|check| !check.passed()) {
        warn!(
            contract = plan.contract(),
            address = %address,
            check = %check,
            event = "deployment_check_failed"
        );
    }
    checks
}

async fn verify_deployment(
    artifacts: &ArtifactStore,
    contract: &str,
    record: &DeploymentRecord,
    ctx: VerifyContext<'_>,
) -> VerificationOutcome {
    let request = match verification_request(artifacts, contract, record) {
        Ok(request) => request,
        Err(e) => {
            warn!(contract = contract, error = %e, event = "build_info_unavailable");
            return VerificationOutcome::skipped(format!("build info unavailable: {e}"));
        }
    };

    verify_best_effort(ctx.verifier, ctx.clock, ctx.polling, &request).await
}

/// Verification uses the recorded arguments, which match the deployed bytecode
fn verification_request(
    artifacts: &ArtifactStore,
    contract: &str,
    record: &DeploymentRecord,
) -> Result<VerificationRequest> {
    let artifact = artifacts.load(contract)?;
    let build_info = artifacts.build_info(contract)?;

    Ok(VerificationRequest::builder()
        .address(record.address)
        .contract_name(artifact.fully_qualified_name())
        .compiler_version(build_info.compiler_version())
        .source(to_json(&build_info.input)?)
        .constructor_args(record.args.clone())
        .build())
}
