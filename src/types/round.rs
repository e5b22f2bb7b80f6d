//! Lottery round state.
//!
//! ## Lifecycle
//!
//! A round moves `Open → Drawing → Settled` and `Settled` is terminal.
//! Exactly one round is active (Open or Drawing) at any time; settled rounds
//! are immutable history. Participants are recorded in entry order with
//! duplicates ignored, so a winner index always maps to a unique account.

use crate::types::asset::AccountId;
use std::collections::HashSet;

// ============================================================================
// RoundStatus enum
// ============================================================================

/// Round lifecycle state.
///
/// Represented as u8 in snapshots:
/// - Open = 0
/// - Drawing = 1
/// - Settled = 2
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RoundStatus {
    /// Accepting entries and prize credits
    #[default]
    Open,
    /// Randomness requested, awaiting the oracle callback
    Drawing,
    /// Winner paid; immutable history
    Settled,
}

impl RoundStatus {
    /// Convert to u8 for serialization
    pub fn to_u8(self) -> u8 {
        match self {
            RoundStatus::Open => 0,
            RoundStatus::Drawing => 1,
            RoundStatus::Settled => 2,
        }
    }

    /// Convert from u8 for deserialization
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(RoundStatus::Open),
            1 => Some(RoundStatus::Drawing),
            2 => Some(RoundStatus::Settled),
            _ => None,
        }
    }
}

// ============================================================================
// LotteryRound
// ============================================================================

/// One complete lottery cycle, from opening for entries through payout.
#[derive(Debug, Clone, Default)]
pub struct LotteryRound {
    /// Monotonically increasing round identifier (first round = 1)
    pub id: u64,

    /// Unix seconds when the round opened
    pub start_time: u64,

    /// Unix seconds after which the round may draw
    pub end_time: u64,

    /// Entrants in entry order, deduplicated
    participants: Vec<AccountId>,

    /// Dedup index over `participants`
    entered: HashSet<AccountId>,

    /// Accrued prize, native smallest units; fixed once Drawing starts
    pub prize_pool: u64,

    /// Lifecycle state
    pub status: RoundStatus,

    /// Winning account, present only once Settled
    pub winner: Option<AccountId>,

    /// Randomness request correlation id, set exactly once at Open→Drawing
    pub entropy_sequence: Option<u64>,

    /// Unix seconds when Drawing began
    pub drawing_since: Option<u64>,
}

impl LotteryRound {
    /// Create a fresh `Open` round
    pub fn new(id: u64, start_time: u64, end_time: u64) -> Self {
        Self {
            id,
            start_time,
            end_time,
            ..Default::default()
        }
    }

    /// Record an entrant; duplicate entries are ignored
    ///
    /// # Returns
    ///
    /// `true` if the account was newly added
    pub fn add_participant(&mut self, account: AccountId) -> bool {
        if !self.entered.insert(account) {
            return false;
        }
        self.participants.push(account);
        true
    }

    /// Entrants in entry order
    #[inline]
    pub fn participants(&self) -> &[AccountId] {
        &self.participants
    }

    /// Number of unique entrants
    #[inline]
    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    /// True while the round is Open or Drawing
    #[inline]
    pub fn is_active(&self) -> bool {
        self.status != RoundStatus::Settled
    }

    /// True once the round duration has elapsed
    #[inline]
    pub fn has_ended(&self, now: u64) -> bool {
        now >= self.end_time
    }

    /// True when the round sits in `Drawing` longer than `patience_secs`
    ///
    /// An unanswered randomness request cannot be cancelled; this is the
    /// observable signal that a round is wedged waiting for its callback.
    pub fn is_stale(&self, now: u64, patience_secs: u64) -> bool {
        match (self.status, self.drawing_since) {
            (RoundStatus::Drawing, Some(since)) => now.saturating_sub(since) > patience_secs,
            _ => false,
        }
    }

    /// Immutable snapshot of the round
    pub fn snapshot(&self) -> RoundSnapshot {
        RoundSnapshot {
            id: self.id,
            start_time: self.start_time,
            end_time: self.end_time,
            prize_pool: self.prize_pool,
            participant_count: self.participants.len() as u64,
            active: self.is_active(),
            winner: self.winner,
            entropy_sequence: self.entropy_sequence,
            status: self.status,
        }
    }
}

// ============================================================================
// RoundSnapshot
// ============================================================================

/// Read-only view of a round, as returned by lottery queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundSnapshot {
    pub id: u64,
    pub start_time: u64,
    pub end_time: u64,
    pub prize_pool: u64,
    pub participant_count: u64,
    pub active: bool,
    pub winner: Option<AccountId>,
    pub entropy_sequence: Option<u64>,
    pub status: RoundStatus,
}

// ============================================================================
// ContractStats
// ============================================================================

/// Monotonic lottery counters; never reset, never decremented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContractStats {
    /// Rounds settled so far
    pub total_lotteries: u64,

    /// Sum of all prizes paid, native smallest units
    pub total_prizes_distributed: u64,

    /// Identifier of the currently active round
    pub current_lottery_id: u64,
}

// ============================================================================
// Unit Tests
// ============================================================================
