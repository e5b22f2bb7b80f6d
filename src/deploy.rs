//! Deployment assembly for the oracle, swap, and lottery trio.
//!
//! Mirrors how the pair goes live on a real ledger: the lottery is created
//! first, then the swap engine with its router references, and finally the
//! two are bound to each other by contract id. [`deploy`] performs the whole
//! sequence from a [`DeployConfig`] and returns the wired engines together
//! with a serializable [`DeploymentSummary`].
//!
//! [`verify_deployment`] re-checks a finished deployment the way an
//! operator would: every finding it returns is a broken wire.

use serde::{Deserialize, Serialize};

use crate::engine::{LotteryEngine, SwapEngine};
use crate::oracle::{AttestationVerifier, EntropyGateway, PriceFeedOracle};
use crate::types::asset::{AccountId, Asset, ContractId};
use crate::types::error::EngineError;
use crate::types::receipt::sha256_digest;
use tracing::info;

/// Render a numeric ledger entity id as a 20-byte hex address string.
///
/// # Example
///
/// ```
/// use pythswap_core::deploy::evm_address;
///
/// assert_eq!(
///     evm_address(1_234_567),
///     "0x000000000000000000000000000000000012d687"
/// );
/// ```
pub fn evm_address(id: u64) -> String {
    format!("0x{id:040x}")
}

/// Everything needed to stand up the system on one network.
#[derive(Debug, Clone)]
pub struct DeployConfig {
    /// Network label carried into the summary
    pub network: String,
    /// EVM chain id of the target ledger
    pub chain_id: u64,
    /// Account that owns all three deployed pieces
    pub deployer: AccountId,
    /// Entity id assigned to the swap engine
    pub swap_contract_id: ContractId,
    /// Entity id assigned to the lottery engine
    pub lottery_contract_id: ContractId,
    /// DEX router entity id, kept for reference reads
    pub swap_router: u64,
    /// DEX quoter entity id, kept for reference reads
    pub quoter: u64,
    /// Wrapped native token entity id
    pub native_token: u64,
    /// Key the price oracle's payload attestations are sealed with
    pub attestation_key: [u8; 32],
    /// Oracle fee per price update payload
    pub update_fee: u64,
    /// Account the entropy oracle calls back from
    pub entropy_oracle_account: AccountId,
    /// Randomness provider account
    pub entropy_provider: AccountId,
    /// Fee per randomness request
    pub entropy_fee: u64,
    /// Round length in seconds
    pub lottery_duration_secs: u64,
    /// Entrants required before a round may draw
    pub min_participants: usize,
}

impl DeployConfig {
    /// Hedera testnet defaults
    pub fn testnet() -> Self {
        Self {
            network: "hedera-testnet".to_string(),
            chain_id: 296,
            deployer: 1_001,
            // Lottery deploys first, so it takes the lower entity number
            lottery_contract_id: 5_100_100,
            swap_contract_id: 5_100_101,
            swap_router: 1_414_040,
            quoter: 1_390_002,
            native_token: 15_058,
            attestation_key: sha256_digest(b"pythswap testnet attestation key"),
            update_fee: 1,
            entropy_oracle_account: 4_374_000,
            entropy_provider: 4_374_001,
            entropy_fee: 10_000,
            lottery_duration_secs: 86_400,
            min_participants: 5,
        }
    }
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self::testnet()
    }
}

/// Contract addresses, keyed the way operators expect them in the summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployedContracts {
    pub swap: String,
    pub lottery: String,
}

/// Configuration echo recorded alongside the addresses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployedConfiguration {
    pub swap_router: String,
    pub quoter_v2: String,
    pub native_token: String,
    pub entropy_oracle: String,
    pub entropy_provider: String,
    pub update_fee: u64,
    pub entropy_fee: u64,
    pub lottery_duration: u64,
    pub min_participants: u64,
}

/// Record of one deployment, written to disk by operators as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentSummary {
    pub network: String,
    pub chain_id: u64,
    pub timestamp: u64,
    pub deployer: String,
    pub contracts: DeployedContracts,
    pub configuration: DeployedConfiguration,
}

impl DeploymentSummary {
    /// Pretty JSON rendering
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// The wired system ready to take traffic.
#[derive(Debug, Clone)]
pub struct Deployment {
    pub oracle: PriceFeedOracle,
    pub verifier: AttestationVerifier,
    pub swap: SwapEngine,
    pub lottery: LotteryEngine,
    pub summary: DeploymentSummary,
}

/// Stand up and cross-bind the oracle, lottery, and swap engine.
///
/// Deployment order matches production: lottery first, then the swap engine
/// pointing at its router references, then the bidirectional binding. The
/// deployer owns every piece.
pub fn deploy(config: &DeployConfig, now: u64) -> Result<Deployment, EngineError> {
    let oracle = PriceFeedOracle::with_default_assets(config.deployer, config.update_fee);
    let verifier = AttestationVerifier::new(config.attestation_key);

    let entropy = EntropyGateway::new(
        config.entropy_oracle_account,
        config.entropy_provider,
        config.entropy_fee,
    );
    let mut lottery = LotteryEngine::new(
        config.deployer,
        config.lottery_contract_id,
        entropy,
        config.lottery_duration_secs,
        config.min_participants,
        now,
    );

    let mut swap = SwapEngine::with_refs(
        config.deployer,
        config.swap_contract_id,
        &evm_address(config.swap_router),
        &evm_address(config.quoter),
        &evm_address(config.native_token),
    );

    lottery.set_swap_contract(config.deployer, config.swap_contract_id)?;
    swap.set_lottery_contract(config.deployer, config.lottery_contract_id)?;

    let summary = DeploymentSummary {
        network: config.network.clone(),
        chain_id: config.chain_id,
        timestamp: now,
        deployer: evm_address(config.deployer),
        contracts: DeployedContracts {
            swap: evm_address(config.swap_contract_id),
            lottery: evm_address(config.lottery_contract_id),
        },
        configuration: DeployedConfiguration {
            swap_router: evm_address(config.swap_router),
            quoter_v2: evm_address(config.quoter),
            native_token: evm_address(config.native_token),
            entropy_oracle: evm_address(config.entropy_oracle_account),
            entropy_provider: evm_address(config.entropy_provider),
            update_fee: config.update_fee,
            entropy_fee: config.entropy_fee,
            lottery_duration: config.lottery_duration_secs,
            min_participants: config.min_participants as u64,
        },
    };

    info!(
        network = %config.network,
        swap = %summary.contracts.swap,
        lottery = %summary.contracts.lottery,
        "deployment complete"
    );

    Ok(Deployment {
        oracle,
        verifier,
        swap,
        lottery,
        summary,
    })
}

/// Post-deployment health check.
///
/// Returns one finding per broken wire; an empty list means the system is
/// correctly assembled.
pub fn verify_deployment(deployment: &Deployment) -> Vec<String> {
    let mut findings = Vec::new();
    let swap = &deployment.swap;
    let lottery = &deployment.lottery;

    let info = swap.contract_info();
    if info.lottery_contract != Some(lottery.contract_id()) {
        findings.push(format!(
            "swap engine references lottery {:?}, expected {}",
            info.lottery_contract,
            lottery.contract_id()
        ));
    }
    if lottery.swap_contract() != Some(swap.contract_id()) {
        findings.push(format!(
            "lottery references swap {:?}, expected {}",
            lottery.swap_contract(),
            swap.contract_id()
        ));
    }

    if deployment.oracle.feed_count() < Asset::COUNT {
        findings.push(format!(
            "oracle registers {} feeds, expected {}",
            deployment.oracle.feed_count(),
            Asset::COUNT
        ));
    }
    for (asset, feed_id) in Asset::ALL.iter().zip(swap.all_price_ids()) {
        if feed_id == [0u8; 32] {
            findings.push(format!(
                "swap engine has no feed id for {}",
                asset.symbol()
            ));
        }
    }

    let round = lottery.current_round_snapshot();
    if !round.active {
        findings.push(format!("lottery round {} is not accepting entries", round.id));
    }

    findings
}

// ============================================================================
// Unit Tests
// ============================================================================
