//! Fee ledger: owner revenue and the lottery prize reserve.
//!
//! Swap fees are recognized in native smallest units and split by the
//! lottery share. The prize side accumulates in `prize_reserve`, which backs
//! every open-round prize pool; the rest sits in `owner_balance` until
//! withdrawn. Both balances are equity claims settled out of the native
//! reserve spread, so paying them never touches per-asset reserves directly.

use crate::types::error::EngineError;
use crate::types::params::{bps_share, validate_bps, DEFAULT_LOTTERY_SHARE_BPS};
use crate::types::Asset;

/// Split fee ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeLedger {
    /// Withdrawable owner revenue, native smallest units
    owner_balance: u64,

    /// Native units reserved for lottery prizes
    prize_reserve: u64,

    /// Share of each fee routed to prizes, basis points
    lottery_share_bps: u16,

    /// Lifetime fees recognized
    total_fees_collected: u64,

    /// Lifetime native units routed to prizes
    total_prize_funded: u64,
}

impl Default for FeeLedger {
    /// Empty ledger with the standard half-and-half split
    fn default() -> Self {
        Self {
            owner_balance: 0,
            prize_reserve: 0,
            lottery_share_bps: DEFAULT_LOTTERY_SHARE_BPS,
            total_fees_collected: 0,
            total_prize_funded: 0,
        }
    }
}

impl FeeLedger {
    pub fn new(lottery_share_bps: u16) -> Result<Self, EngineError> {
        Ok(Self {
            lottery_share_bps: validate_bps(lottery_share_bps)?,
            ..Default::default()
        })
    }

    // ========================================================================
    // Fee flow
    // ========================================================================

    /// Recognize a swap fee and split it
    ///
    /// # Returns
    ///
    /// The lottery cut, which the caller credits to the open round's pool
    pub fn credit(&mut self, fee: u64) -> Result<u64, EngineError> {
        let cut = bps_share(fee, self.lottery_share_bps);
        // Truncation leaves the odd unit with the owner
        let owner_part = fee - cut;

        // Validate every new balance before writing any of them
        let owner_balance = self
            .owner_balance
            .checked_add(owner_part)
            .ok_or(EngineError::AmountOverflow("owner balance"))?;
        let prize_reserve = self
            .prize_reserve
            .checked_add(cut)
            .ok_or(EngineError::AmountOverflow("prize reserve"))?;
        let total_fees_collected = self
            .total_fees_collected
            .checked_add(fee)
            .ok_or(EngineError::AmountOverflow("fee total"))?;
        let total_prize_funded = self
            .total_prize_funded
            .checked_add(cut)
            .ok_or(EngineError::AmountOverflow("prize total"))?;

        self.owner_balance = owner_balance;
        self.prize_reserve = prize_reserve;
        self.total_fees_collected = total_fees_collected;
        self.total_prize_funded = total_prize_funded;
        Ok(cut)
    }

    /// Release a settled prize from the reserve
    pub fn pay_prize(&mut self, amount: u64) -> Result<(), EngineError> {
        if self.prize_reserve < amount {
            return Err(EngineError::InsufficientLiquidity {
                asset: Asset::Hbar,
                requested: amount,
                available: self.prize_reserve,
            });
        }
        self.prize_reserve -= amount;
        Ok(())
    }

    /// Spend an entropy request fee out of owner revenue
    pub fn pay_entropy_fee(&mut self, fee: u64) -> Result<(), EngineError> {
        if self.owner_balance < fee {
            return Err(EngineError::InsufficientFee {
                required: fee,
                attached: self.owner_balance,
            });
        }
        self.owner_balance -= fee;
        Ok(())
    }

    /// Zero the owner balance and return what it held
    pub fn take_owner_balance(&mut self) -> u64 {
        std::mem::take(&mut self.owner_balance)
    }

    // ========================================================================
    // Governance and accessors
    // ========================================================================

    /// Change the prize share (applies to future fees only)
    pub fn set_lottery_share(&mut self, bps: u16) -> Result<(), EngineError> {
        self.lottery_share_bps = validate_bps(bps)?;
        Ok(())
    }

    #[inline]
    pub fn owner_balance(&self) -> u64 {
        self.owner_balance
    }

    #[inline]
    pub fn prize_reserve(&self) -> u64 {
        self.prize_reserve
    }

    #[inline]
    pub fn lottery_share_bps(&self) -> u16 {
        self.lottery_share_bps
    }

    #[inline]
    pub fn total_fees_collected(&self) -> u64 {
        self.total_fees_collected
    }

    #[inline]
    pub fn total_prize_funded(&self) -> u64 {
        self.total_prize_funded
    }

    /// Append ledger balances to a digest preimage
    pub fn write_digest_bytes(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.owner_balance.to_le_bytes());
        out.extend_from_slice(&self.prize_reserve.to_le_bytes());
        out.extend_from_slice(&(self.lottery_share_bps as u64).to_le_bytes());
        out.extend_from_slice(&self.total_fees_collected.to_le_bytes());
        out.extend_from_slice(&self.total_prize_funded.to_le_bytes());
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
