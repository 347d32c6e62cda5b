//! `rdat-oft` operator CLI
//!
//! One subcommand per operational step of the RDAT bridge. Configuration comes
//! from the environment (a `.env` file is loaded first); see the config module
//! for the variables each command reads.

use std::process::ExitCode;

use alloy_primitives::{utils::parse_ether, Address, Bytes, U256};
use clap::{Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use rdat_oft::config::{
    BridgeTestConfig, DeployAdapterConfig, DeployOftConfig, DeploySettings, EnvSource,
    OAppGraph, ProbeConfig, WireConfig,
};
use rdat_oft::operations::{
    deploy_contract, probe_endpoints, run_bridge_test, wire_rdat, ArtifactStore,
    BridgeTestParams, ContractKind, DeployOutcome, DeploymentPlan, DeploymentStore,
    SolanaPeerConversion, VerifyContext,
};
use rdat_oft::providers::{AlloyChainClient, EtherscanVerifier, TokioClock};
use rdat_oft::traits::TokenLedger;
use rdat_oft::{
    adapter_constructor_args, oft_constructor_args, NetworkName, PollingConfig,
    Result, SOLANA_RDAT_OFT_STORE,
};

#[derive(Parser)]
#[command(name = "rdat-oft")]
#[command(about = "Deploy and operate the RDAT LayerZero OFT bridge", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Deploy RdatOFTAdapter on Vana
    DeployAdapter {
        #[arg(long, default_value = "vana")]
        network: NetworkName,
    },

    /// Deploy RdatOFT on Base
    DeployOft {
        #[arg(long, default_value = "base")]
        network: NetworkName,
    },

    /// Register the Vana adapter and Base OFT as each other's peers
    ///
    /// Also points the adapter at the Solana OFT when SOLANA_OFT_ADDRESS is set.
    Wire,

    /// Print the wiring graph as JSON for the LayerZero wiring tool
    WiringConfig {
        /// Print the Vana <-> Solana graph instead of Vana <-> Base
        #[arg(long)]
        solana: bool,
    },

    /// Send a test transfer from Vana to Base through the adapter
    BridgeTest {
        /// Amount in whole RDAT
        #[arg(long, value_parser = parse_amount)]
        amount: Option<U256>,
    },

    /// Probe candidate LayerZero endpoint addresses on Vana
    VerifyEndpoint {
        /// Addresses to probe; the known candidates when omitted
        candidates: Vec<Address>,
    },

    /// Convert a base58 Solana address to a bytes32 peer
    ConvertSolanaAddress {
        #[arg(default_value = SOLANA_RDAT_OFT_STORE)]
        address: String,
    },
}

fn parse_amount(raw: &str) -> std::result::Result<U256, String> {
    parse_ether(raw).map_err(|e| format!("invalid amount {raw}: {e}"))
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, event = "command_failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands) -> Result<()> {
    match command {
        Commands::DeployAdapter { network } => {
            let config = DeployAdapterConfig::from_env(&EnvSource::from_process(), network)?;
            let args = adapter_constructor_args(config.token, config.endpoint, config.owner);
            let kind = ContractKind::Adapter {
                token: config.token,
            };
            deploy(&config.settings, kind, args, config.owner).await
        }
        Commands::DeployOft { network } => {
            let config = DeployOftConfig::from_env(&EnvSource::from_process(), network)?;
            let args = oft_constructor_args(config.endpoint, config.owner);
            deploy(&config.settings, ContractKind::Oft, args, config.owner).await
        }
        Commands::Wire => wire(WireConfig::from_env(&EnvSource::from_process())?).await,
        Commands::WiringConfig { solana } => {
            let graph = if solana {
                OAppGraph::vana_solana()
            } else {
                OAppGraph::vana_base()
            };
            println!("{}", serde_json::to_string_pretty(&graph)?);
            Ok(())
        }
        Commands::BridgeTest { amount } => {
            bridge_test(BridgeTestConfig::from_env(&EnvSource::from_process())?, amount).await
        }
        Commands::VerifyEndpoint { candidates } => {
            verify_endpoint(ProbeConfig::from_env(&EnvSource::from_process(), candidates)?).await
        }
        Commands::ConvertSolanaAddress { address } => {
            println!("{}", SolanaPeerConversion::new(&address)?);
            Ok(())
        }
    }
}

async fn deploy(
    settings: &DeploySettings,
    kind: ContractKind,
    constructor_args: Bytes,
    owner: Address,
) -> Result<()> {
    let client = AlloyChainClient::connect(
        settings.network,
        settings.rpc_url.clone(),
        settings.signer.clone(),
        settings.report_gas,
    );

    let balance = client.native_balance().await?;
    if balance.is_zero() {
        warn!(
            deployer = %client.signer(),
            network = settings.network.name,
            event = "deployer_has_no_native_balance"
        );
    }

    let plan = DeploymentPlan::builder()
        .kind(kind)
        .network(settings.network)
        .constructor_args(constructor_args)
        .owner(owner)
        .maybe_salt(settings.salt)
        .build();
    let artifacts = ArtifactStore::new(&settings.artifacts_dir);
    let records = DeploymentStore::new(&settings.deployments_dir);

    let verifier = match (settings.network.explorer, &settings.explorer_api_key) {
        (Some(explorer), Some(key)) => {
            Some(EtherscanVerifier::for_explorer(&explorer, key.clone())?)
        }
        _ => None,
    };
    let clock = TokioClock::new();
    let verify = verifier.as_ref().map(|verifier| VerifyContext {
        verifier,
        clock: &clock,
        polling: PollingConfig::default(),
    });

    let report = deploy_contract(&client, &artifacts, &records, &plan, verify).await?;

    let contract = report.contract;
    let address = report.outcome.address();
    match &report.outcome {
        DeployOutcome::Reused { .. } => println!("{contract} already deployed at {address}"),
        DeployOutcome::Deployed { tx, .. } => {
            println!("{contract} deployed at {address} (tx {})", tx.tx_hash)
        }
    }
    println!("owner: {}", report.owner);
    if let Some(url) = settings.network.address_url(address) {
        println!("explorer: {url}");
    }
    for check in &report.checks {
        println!("check {check}");
    }
    println!("verification: {:?}", report.verification);
    report.into_result().map(|_| ())
}

async fn wire(config: WireConfig) -> Result<()> {
    let signer = config.signer.address();
    let vana = AlloyChainClient::connect(
        NetworkName::Vana.descriptor(),
        config.vana_rpc_url,
        config.signer.clone(),
        config.report_gas,
    );
    let base = AlloyChainClient::connect(
        NetworkName::Base.descriptor(),
        config.base_rpc_url,
        config.signer,
        config.report_gas,
    );

    let adapter = vana.oapp(config.vana_adapter);
    let oft = base.oapp(config.base_oft);
    let report = wire_rdat(signer, &adapter, &oft, config.solana_oft).await;

    for link in &report.links {
        println!("{link}");
    }
    if config.solana_oft.is_none() {
        info!(event = "solana_peer_skipped");
    }
    report.into_result().map(|_| ())
}

async fn bridge_test(config: BridgeTestConfig, amount: Option<U256>) -> Result<()> {
    let sender = config.signer.address();
    let client = AlloyChainClient::connect(
        NetworkName::Vana.descriptor(),
        config.vana_rpc_url,
        config.signer,
        config.report_gas,
    );
    let token = client.token(config.token);
    let adapter = client.oapp(config.vana_adapter);

    let params = BridgeTestParams::builder()
        .sender(sender)
        .maybe_amount(amount)
        .build();
    let report = run_bridge_test(&token, &adapter, &params).await?;

    println!("balance before: {}", report.balance_before);
    println!("approve tx: {}", report.approve_tx.tx_hash);
    println!("native fee: {}", report.fee.native_fee);
    println!("send tx: {}", report.receipt.tx.tx_hash);
    match &report.receipt.oft_sent {
        Some(sent) => {
            println!("guid: {}", sent.guid);
            println!("amount sent: {}", sent.amount_sent_ld);
            println!("amount received: {}", sent.amount_received_ld);
        }
        None => println!("no OFTSent event in receipt"),
    }
    println!("track: {}", report.scan_url);

    let remaining = token.balance_of(sender).await?;
    println!("balance after: {remaining}");
    Ok(())
}

async fn verify_endpoint(config: ProbeConfig) -> Result<()> {
    let network = NetworkName::Vana.descriptor();
    let client = AlloyChainClient::read_only(network, config.rpc_url);
    let reports =
        probe_endpoints(&client, network.name, &config.candidates, config.expected_eid).await;

    for report in &reports {
        print!("{report}");
    }
    Ok(())
}
