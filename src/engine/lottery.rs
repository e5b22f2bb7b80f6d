//! Lottery round lifecycle and entropy-driven settlement.
//!
//! ## State Machine
//!
//! One round is live at any time, moving `Open → Drawing → Settled`:
//!
//! - **Open**: accepts entries and prize credits. A round past its end time
//!   that has not met the participant threshold stays Open and keeps
//!   accepting entries until it does.
//! - **Drawing**: entered by [`request_draw`](LotteryEngine::request_draw)
//!   once both the duration and the threshold are met. The randomness
//!   sequence number is written exactly once here. Entries and credits that
//!   arrive while Drawing queue for the next round.
//! - **Settled**: reached only by a verified oracle callback carrying the
//!   stored sequence number. The winner is `random mod participant_count`,
//!   the prize is released from the fee ledger, and the next round opens in
//!   the same call, seeded with anything queued while Drawing.
//!
//! An unanswered randomness request cannot be cancelled; the round stays
//! `Drawing` and [`is_current_round_stale`](LotteryEngine::is_current_round_stale)
//! reports the condition instead of masking it.

use crate::oracle::entropy::{winner_index, EntropyGateway, RandomValue};
use crate::pool::FeeLedger;
use crate::types::asset::{AccountId, Asset, ContractId};
use crate::types::error::EngineError;
use crate::types::receipt::{sha256_digest, SettlementReceipt, Transfer};
use crate::types::round::{ContractStats, LotteryRound, RoundSnapshot, RoundStatus};
use tracing::{debug, info};

/// Seconds a round may sit in `Drawing` before it is reported stale.
pub const STALE_DRAW_PATIENCE_SECS: u64 = 3_600;

/// Aggregate lottery counters plus current-round context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsReport {
    pub total_lotteries: u64,
    pub total_prizes_distributed: u64,
    pub current_lottery_id: u64,
    pub current_prize_pool: u64,
    pub duration_secs: u64,
    pub min_participants: u64,
}

impl StatsReport {
    /// Fields in wire order
    #[inline]
    pub fn as_tuple(&self) -> (u64, u64, u64, u64, u64, u64) {
        (
            self.total_lotteries,
            self.total_prizes_distributed,
            self.current_lottery_id,
            self.current_prize_pool,
            self.duration_secs,
            self.min_participants,
        )
    }
}

/// Round lifecycle owner.
#[derive(Debug, Clone)]
pub struct LotteryEngine {
    /// Account allowed to rebind the swap contract
    owner: AccountId,

    /// This engine's own contract identity
    contract_id: ContractId,

    /// Swap engine authorized to record entries and prize credits
    swap_contract: Option<ContractId>,

    /// Randomness request book
    entropy: EntropyGateway,

    /// Round length in seconds
    duration_secs: u64,

    /// Entrants required before a round may draw
    min_participants: usize,

    /// All rounds, oldest first; round id = index + 1, last entry is live
    rounds: Vec<LotteryRound>,

    /// Monotonic counters
    stats: ContractStats,

    /// Entries that arrived while Drawing, seeded into the next round
    pending_participants: Vec<AccountId>,

    /// Prize credits that arrived while Drawing, carried to the next round
    pending_carry: u64,
}

impl LotteryEngine {
    /// Create the engine and open round 1
    pub fn new(
        owner: AccountId,
        contract_id: ContractId,
        entropy: EntropyGateway,
        duration_secs: u64,
        min_participants: usize,
        now: u64,
    ) -> Self {
        let first = LotteryRound::new(1, now, now + duration_secs);
        Self {
            owner,
            contract_id,
            swap_contract: None,
            entropy,
            duration_secs,
            // Settlement reduces modulo the entrant count, so a round may
            // never draw empty
            min_participants: min_participants.max(1),
            rounds: vec![first],
            stats: ContractStats {
                total_lotteries: 0,
                total_prizes_distributed: 0,
                current_lottery_id: 1,
            },
            pending_participants: Vec::new(),
            pending_carry: 0,
        }
    }

    // ========================================================================
    // Entries
    // ========================================================================

    /// Explicit join call
    ///
    /// While the live round is Open the entry lands there; while it is
    /// Drawing the entry queues for the next round.
    ///
    /// # Returns
    ///
    /// `true` if the account was newly recorded
    pub fn enter(&mut self, caller: AccountId) -> bool {
        match self.current_round().status {
            RoundStatus::Open => self.current_round_mut().add_participant(caller),
            _ => self.queue_participant(caller),
        }
    }

    /// Entry plus prize credit routed from a swap (registered contract only)
    ///
    /// # Arguments
    ///
    /// * `calling_contract` - Identity of the swap engine making the call
    /// * `participant` - Swapping account entered into the round
    /// * `prize_credit` - Native units added to the prize pool
    /// * `now` - Unix seconds, recorded with the entry
    pub fn record_swap_entry(
        &mut self,
        calling_contract: ContractId,
        participant: AccountId,
        prize_credit: u64,
        now: u64,
    ) -> Result<(), EngineError> {
        if self.swap_contract != Some(calling_contract) {
            return Err(EngineError::Unauthorized {
                caller: calling_contract,
            });
        }

        let round = self.current_round();
        let round_id = round.id;
        if round.status == RoundStatus::Open {
            let pool = round
                .prize_pool
                .checked_add(prize_credit)
                .ok_or(EngineError::AmountOverflow("prize pool"))?;
            let round = self.current_round_mut();
            round.prize_pool = pool;
            round.add_participant(participant);
        } else {
            // Live round is locked; queue for the next one
            self.pending_carry = self
                .pending_carry
                .checked_add(prize_credit)
                .ok_or(EngineError::AmountOverflow("prize carry"))?;
            self.queue_participant(participant);
        }
        debug!(round_id, participant, prize_credit, at = now, "swap entry");
        Ok(())
    }

    fn queue_participant(&mut self, participant: AccountId) -> bool {
        if self.pending_participants.contains(&participant) {
            return false;
        }
        self.pending_participants.push(participant);
        true
    }

    // ========================================================================
    // Drawing
    // ========================================================================

    /// Move the live round from Open to Drawing and request randomness
    ///
    /// Callable by anyone once the round duration has elapsed and the
    /// participant threshold is met. The entropy fee is paid out of the fee
    /// ledger's owner balance.
    ///
    /// # Returns
    ///
    /// The randomness sequence number stored on the round
    pub fn request_draw(
        &mut self,
        caller: AccountId,
        fees: &mut FeeLedger,
        now: u64,
    ) -> Result<u64, EngineError> {
        let round = self.current_round();
        let round_id = round.id;
        if round.status != RoundStatus::Open || !round.has_ended(now) {
            return Err(EngineError::RoundNotReady {
                round_id,
                now,
                end_time: round.end_time,
            });
        }
        if round.participant_count() < self.min_participants {
            return Err(EngineError::InsufficientParticipants {
                round_id,
                participants: round.participant_count(),
                min_participants: self.min_participants,
            });
        }

        let fee = self.entropy.current_fee();
        fees.pay_entropy_fee(fee)?;
        let contribution = draw_contribution(caller, round_id, now);
        let sequence = self
            .entropy
            .request_randomness(self.contract_id, contribution, fee, now)?;

        let round = self.current_round_mut();
        round.status = RoundStatus::Drawing;
        round.entropy_sequence = Some(sequence);
        round.drawing_since = Some(now);

        info!(
            round_id,
            sequence,
            participants = self.current_round().participant_count(),
            prize = self.current_round().prize_pool,
            "draw requested"
        );
        Ok(sequence)
    }

    /// Settle the live round from a verified randomness callback
    ///
    /// Only the entropy oracle account may call this, and only with the
    /// sequence number stored at draw time. Settlement pays the winner,
    /// archives the round, and opens the next one seeded with anything
    /// queued while Drawing.
    pub fn handle_entropy_callback(
        &mut self,
        caller: AccountId,
        sequence: u64,
        random_value: RandomValue,
        fees: &mut FeeLedger,
        now: u64,
    ) -> Result<SettlementReceipt, EngineError> {
        if caller != self.entropy.oracle_account() {
            return Err(EngineError::Unauthorized { caller });
        }
        // A sequence that already settled a round is a replay
        if let Some(settled) = self
            .rounds
            .iter()
            .find(|r| r.status == RoundStatus::Settled && r.entropy_sequence == Some(sequence))
        {
            return Err(EngineError::AlreadySettled {
                round_id: settled.id,
            });
        }
        let round = self.current_round();
        if round.status != RoundStatus::Drawing || round.entropy_sequence != Some(sequence) {
            return Err(EngineError::InvalidSequence { sequence });
        }
        let prize = round.prize_pool;
        if fees.prize_reserve() < prize {
            return Err(EngineError::InsufficientLiquidity {
                asset: Asset::Hbar,
                requested: prize,
                available: fees.prize_reserve(),
            });
        }

        // Checks complete; consume the request and commit the settlement
        self.entropy.authorize_callback(caller, sequence)?;
        fees.pay_prize(prize)?;

        let round = self.current_round_mut();
        let index = winner_index(&random_value, round.participant_count());
        let winner = round.participants()[index];
        let round_id = round.id;
        let participant_count = round.participant_count() as u64;
        round.winner = Some(winner);
        round.status = RoundStatus::Settled;

        self.stats.total_lotteries = self.stats.total_lotteries.saturating_add(1);
        self.stats.total_prizes_distributed =
            self.stats.total_prizes_distributed.saturating_add(prize);
        self.open_next_round(now);

        info!(
            round_id,
            winner, prize, participant_count, sequence, "round settled"
        );
        Ok(SettlementReceipt {
            round_id,
            winner,
            prize,
            participant_count,
            sequence,
            timestamp: now,
            transfer: Transfer::new(winner, Asset::Hbar, prize),
        })
    }

    /// Open the successor round, seeded with queued entries and carry
    fn open_next_round(&mut self, now: u64) {
        let id = self.stats.current_lottery_id + 1;
        let mut round = LotteryRound::new(id, now, now + self.duration_secs);
        round.prize_pool = std::mem::take(&mut self.pending_carry);
        for participant in self.pending_participants.drain(..) {
            round.add_participant(participant);
        }
        self.stats.current_lottery_id = id;
        self.rounds.push(round);
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Snapshot of a round by id; `None` for ids never issued
    pub fn get_lottery(&self, round_id: u64) -> Option<RoundSnapshot> {
        let index = round_id.checked_sub(1)? as usize;
        self.rounds.get(index).map(LotteryRound::snapshot)
    }

    /// Snapshot of the live round
    pub fn current_round_snapshot(&self) -> RoundSnapshot {
        self.current_round().snapshot()
    }

    /// Entrants of a round in entry order
    pub fn participants(&self, round_id: u64) -> Option<&[AccountId]> {
        let index = round_id.checked_sub(1)? as usize;
        self.rounds.get(index).map(LotteryRound::participants)
    }

    /// Aggregate counters plus current-round context
    pub fn contract_stats(&self) -> StatsReport {
        StatsReport {
            total_lotteries: self.stats.total_lotteries,
            total_prizes_distributed: self.stats.total_prizes_distributed,
            current_lottery_id: self.stats.current_lottery_id,
            current_prize_pool: self.current_round().prize_pool,
            duration_secs: self.duration_secs,
            min_participants: self.min_participants as u64,
        }
    }

    /// Current entropy request fee, passed through from the gateway
    #[inline]
    pub fn get_entropy_fee(&self) -> u64 {
        self.entropy.current_fee()
    }

    /// True when the live round has waited in Drawing beyond the patience
    /// window. Surfaces an unanswered randomness request.
    pub fn is_current_round_stale(&self, now: u64) -> bool {
        self.current_round()
            .is_stale(now, STALE_DRAW_PATIENCE_SECS)
    }

    // ========================================================================
    // Wiring
    // ========================================================================

    /// Bind the swap engine allowed to record entries (owner only)
    pub fn set_swap_contract(
        &mut self,
        caller: AccountId,
        contract: ContractId,
    ) -> Result<(), EngineError> {
        if caller != self.owner {
            return Err(EngineError::Unauthorized { caller });
        }
        self.swap_contract = Some(contract);
        Ok(())
    }

    /// Registered swap engine, if bound
    #[inline]
    pub fn swap_contract(&self) -> Option<ContractId> {
        self.swap_contract
    }

    #[inline]
    pub fn owner(&self) -> AccountId {
        self.owner
    }

    #[inline]
    pub fn contract_id(&self) -> ContractId {
        self.contract_id
    }

    #[inline]
    pub fn duration_secs(&self) -> u64 {
        self.duration_secs
    }

    #[inline]
    pub fn min_participants(&self) -> usize {
        self.min_participants
    }

    /// Entropy gateway view
    #[inline]
    pub fn entropy(&self) -> &EntropyGateway {
        &self.entropy
    }

    /// Entropy gateway handle for fee administration
    #[inline]
    pub fn entropy_mut(&mut self) -> &mut EntropyGateway {
        &mut self.entropy
    }

    fn current_round(&self) -> &LotteryRound {
        // rounds is never empty: one round is pushed at construction and a
        // successor is pushed in the same call that settles the last
        &self.rounds[self.rounds.len() - 1]
    }

    fn current_round_mut(&mut self) -> &mut LotteryRound {
        let last = self.rounds.len() - 1;
        &mut self.rounds[last]
    }
}

/// Caller-salted contribution folded into the randomness request.
fn draw_contribution(caller: AccountId, round_id: u64, now: u64) -> [u8; 32] {
    let mut bytes = Vec::with_capacity(24);
    bytes.extend_from_slice(&caller.to_le_bytes());
    bytes.extend_from_slice(&round_id.to_le_bytes());
    bytes.extend_from_slice(&now.to_le_bytes());
    sha256_digest(&bytes)
}

// ============================================================================
// Unit Tests
// ============================================================================
