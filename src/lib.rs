//! # PythSwap Core
//!
//! Oracle-priced swap engine with a fee-funded lottery, settled by verified
//! randomness.
//!
//! ## Architecture
//!
//! The system consists of:
//! - **Types**: Core data structures (Asset, PriceQuote, LotteryRound, receipts)
//! - **Oracle**: Attested price feed store and the entropy request gateway
//! - **Pool**: Reserve balances and the owner/prize fee ledger
//! - **Engine**: Swap execution and the lottery round state machine
//! - **Deploy**: Assembly and cross-binding of the whole system
//!
//! ## Design Principles
//!
//! 1. **Determinism**: All operations produce identical results for identical inputs
//! 2. **No Floating Point**: Amounts in smallest units, prices as fixed-point integers
//! 3. **Checks Before Effects**: Every operation validates fully before mutating
//! 4. **Explicit Time**: Callers pass `now`; nothing reads a clock
//!
//! ## Flow
//!
//! Swaps price against oracle quotes no older than the configured maximum
//! age, settle against pooled reserves, and split their fee between the
//! owner and the active lottery round's prize pool. Once a round's duration
//! and participant threshold are met, anyone may request a draw; the round
//! settles when the entropy oracle calls back with the matching sequence
//! number, paying the winner and opening the next round.

// ============================================================================
// Module declarations
// ============================================================================

/// Core data types: Asset, PriceQuote, LotteryRound, receipts
pub mod types;

/// Price feed oracle and entropy gateway
pub mod oracle;

/// Reserve pool and fee ledger
pub mod pool;

/// Swap execution and lottery lifecycle
pub mod engine;

/// Deployment assembly and verification
pub mod deploy;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use deploy::{deploy, DeployConfig, Deployment, DeploymentSummary};
pub use engine::{LotteryEngine, StatsReport, SwapEngine, SwapQuote};
pub use oracle::{AttestationVerifier, EntropyGateway, PriceFeedOracle, PriceUpdate};
pub use pool::{FeeLedger, ReservePool};
pub use types::{
    Asset, ContractStats, EngineError, LotteryRound, PriceQuote, RoundStatus, SettlementReceipt,
    SwapDirection, SwapParameters, SwapReceipt,
};
