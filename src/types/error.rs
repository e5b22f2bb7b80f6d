//! Engine error taxonomy.
//!
//! Every fallible operation returns `Result<_, EngineError>`. A failing check
//! always aborts its call before any state mutation, so an `Err` implies the
//! engine state is exactly as it was before the call.

use crate::types::Asset;
use thiserror::Error;

/// Errors produced by the swap engine, oracle gateways and lottery.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Asset or symbol has no registered price feed
    #[error("unsupported asset: {0}")]
    UnsupportedAsset(String),

    /// Quote publish time is older than the configured maximum age
    #[error("stale price for {symbol}: age {age_secs}s exceeds max {max_age_secs}s")]
    StalePrice {
        symbol: String,
        age_secs: u64,
        max_age_secs: u64,
    },

    /// A reserve or ledger balance cannot cover the requested amount
    #[error("insufficient liquidity in {asset:?}: requested {requested}, available {available}")]
    InsufficientLiquidity {
        asset: Asset,
        requested: u64,
        available: u64,
    },

    /// Executed output fell below the tolerated minimum
    #[error("slippage exceeded: amount out {amount_out} below minimum {min_out}")]
    SlippageExceeded { amount_out: u64, min_out: u64 },

    /// Swap amount not acceptable for execution
    #[error("invalid amount: {0}")]
    InvalidAmount(&'static str),

    /// Caller is not the owner or not the registered counterpart contract
    #[error("unauthorized caller {caller}")]
    Unauthorized { caller: u64 },

    /// Callback sequence number does not match any outstanding request
    #[error("invalid sequence number {sequence}")]
    InvalidSequence { sequence: u64 },

    /// Round cannot transition to Drawing at this time
    #[error("round {round_id} not ready to draw (now {now}, end time {end_time})")]
    RoundNotReady {
        round_id: u64,
        now: u64,
        end_time: u64,
    },

    /// Round has already been settled
    #[error("round {round_id} already settled")]
    AlreadySettled { round_id: u64 },

    /// Participant threshold not met
    #[error("round {round_id} has {participants} participants, needs {min_participants}")]
    InsufficientParticipants {
        round_id: u64,
        participants: usize,
        min_participants: usize,
    },

    /// Basis-point parameter outside 0..=10000
    #[error("basis points value {0} out of range (max 10000)")]
    InvalidBasisPoints(u32),

    /// Attached fee does not cover the oracle's required fee
    #[error("insufficient fee: required {required}, attached {attached}")]
    InsufficientFee { required: u64, attached: u64 },

    /// Oracle update payload failed to decode or verify
    #[error("invalid price update: {0}")]
    InvalidUpdate(String),

    /// Checked integer arithmetic overflowed
    #[error("amount overflow during {0}")]
    AmountOverflow(&'static str),
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EngineError::StalePrice {
            symbol: "ETH/USD".to_string(),
            age_secs: 61,
            max_age_secs: 60,
        };
        assert_eq!(
            err.to_string(),
            "stale price for ETH/USD: age 61s exceeds max 60s"
        );

        let err = EngineError::SlippageExceeded {
            amount_out: 97,
            min_out: 98,
        };
        assert_eq!(
            err.to_string(),
            "slippage exceeded: amount out 97 below minimum 98"
        );
    }

    #[test]
    fn test_error_equality() {
        let a = EngineError::InvalidSequence { sequence: 7 };
        let b = EngineError::InvalidSequence { sequence: 7 };
        let c = EngineError::InvalidSequence { sequence: 8 };
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_insufficient_liquidity_display() {
        let err = EngineError::InsufficientLiquidity {
            asset: Asset::Sol,
            requested: 100,
            available: 50,
        };
        let msg = err.to_string();
        assert!(msg.contains("Sol"));
        assert!(msg.contains("100"));
        assert!(msg.contains("50"));
    }
}
