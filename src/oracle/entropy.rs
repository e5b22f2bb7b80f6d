//! Entropy gateway: randomness requests and callback authorization.
//!
//! ## Protocol
//!
//! A consumer pays the provider fee and receives a sequence number. The
//! entropy oracle later delivers a 32-byte random value for that sequence;
//! delivery is accepted exactly once, from the oracle account only. Replays
//! and made-up sequence numbers fail with `InvalidSequence` without touching
//! consumer state.

use crate::types::asset::{AccountId, ContractId};
use crate::types::error::EngineError;
use std::collections::BTreeMap;
use tracing::debug;

/// Raw 32-byte random value delivered by the entropy oracle.
pub type RandomValue = [u8; 32];

/// Low 128 bits of a random value, little-endian.
pub fn random_to_u128(value: &RandomValue) -> u128 {
    let mut low = [0u8; 16];
    low.copy_from_slice(&value[..16]);
    u128::from_le_bytes(low)
}

/// Random value whose low bits equal `n`. Test and scripting helper.
pub fn random_from_u64(n: u64) -> RandomValue {
    let mut value = [0u8; 32];
    value[..8].copy_from_slice(&n.to_le_bytes());
    value
}

/// Uniform-enough index into a participant list of `count` entries.
///
/// # Panics
///
/// Panics if `count` is zero; callers gate on a non-empty list first.
pub fn winner_index(value: &RandomValue, count: usize) -> usize {
    (random_to_u128(value) % count as u128) as usize
}

/// A randomness request awaiting delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    /// Contract that asked for randomness
    pub requester: ContractId,

    /// Caller-supplied random contribution folded in by the provider
    pub user_contribution: [u8; 32],

    /// When the request was made
    pub requested_at: u64,
}

/// Sequence-numbered randomness request book.
#[derive(Debug, Clone)]
pub struct EntropyGateway {
    /// Account allowed to deliver callbacks
    oracle_account: AccountId,

    /// Default randomness provider
    provider: AccountId,

    /// Fee per request, native smallest units
    fee: u64,

    /// Next sequence number to hand out
    next_sequence: u64,

    /// Outstanding requests by sequence number
    pending: BTreeMap<u64, PendingRequest>,

    /// Total fees received
    fees_collected: u64,
}

impl EntropyGateway {
    pub fn new(oracle_account: AccountId, provider: AccountId, fee: u64) -> Self {
        Self {
            oracle_account,
            provider,
            fee,
            next_sequence: 1,
            pending: BTreeMap::new(),
            fees_collected: 0,
        }
    }

    // ========================================================================
    // Requests
    // ========================================================================

    /// Request a random value, paying the provider fee
    ///
    /// # Returns
    ///
    /// Sequence number identifying the eventual callback
    pub fn request_randomness(
        &mut self,
        requester: ContractId,
        user_contribution: [u8; 32],
        attached_fee: u64,
        now: u64,
    ) -> Result<u64, EngineError> {
        if attached_fee < self.fee {
            return Err(EngineError::InsufficientFee {
                required: self.fee,
                attached: attached_fee,
            });
        }
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.fees_collected = self.fees_collected.saturating_add(attached_fee);
        self.pending.insert(
            sequence,
            PendingRequest {
                requester,
                user_contribution,
                requested_at: now,
            },
        );
        debug!(sequence, requester, fee = attached_fee, "randomness requested");
        Ok(sequence)
    }

    /// Validate and consume a callback delivery
    ///
    /// Checks the caller is the entropy oracle, then removes and returns the
    /// pending request. A second delivery for the same sequence, or a
    /// sequence that was never issued, fails with `InvalidSequence`.
    pub fn authorize_callback(
        &mut self,
        caller: AccountId,
        sequence: u64,
    ) -> Result<PendingRequest, EngineError> {
        if caller != self.oracle_account {
            return Err(EngineError::Unauthorized { caller });
        }
        self.pending
            .remove(&sequence)
            .ok_or(EngineError::InvalidSequence { sequence })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Current per-request fee
    #[inline]
    pub fn current_fee(&self) -> u64 {
        self.fee
    }

    /// Change the per-request fee (oracle account only)
    pub fn set_fee(&mut self, caller: AccountId, fee: u64) -> Result<(), EngineError> {
        if caller != self.oracle_account {
            return Err(EngineError::Unauthorized { caller });
        }
        self.fee = fee;
        Ok(())
    }

    /// Default randomness provider
    #[inline]
    pub fn provider(&self) -> AccountId {
        self.provider
    }

    /// Account allowed to deliver callbacks
    #[inline]
    pub fn oracle_account(&self) -> AccountId {
        self.oracle_account
    }

    /// Outstanding request count
    #[inline]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Whether a sequence number is awaiting delivery
    #[inline]
    pub fn is_pending(&self, sequence: u64) -> bool {
        self.pending.contains_key(&sequence)
    }

    /// Total fees received
    #[inline]
    pub fn fees_collected(&self) -> u64 {
        self.fees_collected
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
