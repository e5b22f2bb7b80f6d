//! Per-asset reserve accounting.
//!
//! Reserves are plain u64 balances in smallest units, indexed by asset. Every
//! movement is checked: credits reject on overflow, debits reject when the
//! reserve cannot cover the request. Nothing in this module clamps.
//!
//! ## Example
//!
//! ```
//! use pythswap_core::pool::ReservePool;
//! use pythswap_core::types::Asset;
//!
//! let mut pool = ReservePool::new();
//! pool.credit(Asset::Hbar, 1_000).unwrap();
//! pool.debit(Asset::Hbar, 400).unwrap();
//! assert_eq!(pool.get(Asset::Hbar), 600);
//! assert!(pool.debit(Asset::Hbar, 601).is_err());
//! ```

use crate::types::asset::Asset;
use crate::types::error::EngineError;

/// Reserve balances for every supported asset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReservePool {
    balances: [u64; Asset::COUNT],
}

impl ReservePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current balance for an asset
    #[inline]
    pub fn get(&self, asset: Asset) -> u64 {
        self.balances[asset.index()]
    }

    /// Add to a reserve
    pub fn credit(&mut self, asset: Asset, amount: u64) -> Result<(), EngineError> {
        let slot = &mut self.balances[asset.index()];
        *slot = slot
            .checked_add(amount)
            .ok_or(EngineError::AmountOverflow("reserve credit"))?;
        Ok(())
    }

    /// Remove from a reserve
    ///
    /// # Returns
    ///
    /// * `Err(InsufficientLiquidity)` - Balance cannot cover `amount`
    pub fn debit(&mut self, asset: Asset, amount: u64) -> Result<(), EngineError> {
        let slot = &mut self.balances[asset.index()];
        if *slot < amount {
            return Err(EngineError::InsufficientLiquidity {
                asset,
                requested: amount,
                available: *slot,
            });
        }
        *slot -= amount;
        Ok(())
    }

    /// Point-in-time copy of every balance
    pub fn snapshot(&self) -> ReserveSnapshot {
        ReserveSnapshot {
            eth: self.get(Asset::Eth),
            sol: self.get(Asset::Sol),
            btc: self.get(Asset::Btc),
            hbar: self.get(Asset::Hbar),
        }
    }

    /// Append every balance to a digest preimage, asset order
    pub fn write_digest_bytes(&self, out: &mut Vec<u8>) {
        for balance in &self.balances {
            out.extend_from_slice(&balance.to_le_bytes());
        }
    }
}

/// Reserve balances at a point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReserveSnapshot {
    pub eth: u64,
    pub sol: u64,
    pub btc: u64,
    pub hbar: u64,
}

impl ReserveSnapshot {
    /// Balances in asset order
    #[inline]
    pub fn as_tuple(&self) -> (u64, u64, u64, u64) {
        (self.eth, self.sol, self.btc, self.hbar)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
