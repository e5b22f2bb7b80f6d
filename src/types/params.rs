//! Swap parameter set and basis-point math.
//!
//! Parameters are owner-mutable and shared by every swap until changed.
//! Basis-point helpers truncate toward zero, so split-and-retain never mints
//! value: the dust from both truncations stays with the pool.

use crate::types::error::EngineError;

/// Basis-point denominator: 10000 bps = 100%.
pub const BPS_SCALE: u64 = 10_000;

/// Default maximum accepted quote age, seconds.
pub const DEFAULT_MAX_PRICE_AGE_SECS: u64 = 60;

/// Default slippage tolerance, basis points (3%).
pub const DEFAULT_SLIPPAGE_TOLERANCE_BPS: u16 = 300;

/// Default swap fee, basis points (0.3%).
pub const DEFAULT_SWAP_FEE_BPS: u16 = 30;

/// Default share of each fee forwarded to the lottery prize pool (50%).
pub const DEFAULT_LOTTERY_SHARE_BPS: u16 = 5_000;

// ============================================================================
// SwapParameters
// ============================================================================

/// Global pricing parameters applied to every swap.
///
/// # Example
///
/// ```
/// use pythswap_core::types::SwapParameters;
///
/// let params = SwapParameters::default();
/// assert_eq!(params.as_tuple(), (60, 300, 30));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapParameters {
    /// Maximum accepted quote age in seconds
    pub max_price_age_secs: u64,

    /// Tolerated execution shortfall versus the gross quote, bps
    pub slippage_tolerance_bps: u16,

    /// Fee retained from every swap, bps
    pub swap_fee_bps: u16,
}

impl Default for SwapParameters {
    fn default() -> Self {
        Self {
            max_price_age_secs: DEFAULT_MAX_PRICE_AGE_SECS,
            slippage_tolerance_bps: DEFAULT_SLIPPAGE_TOLERANCE_BPS,
            swap_fee_bps: DEFAULT_SWAP_FEE_BPS,
        }
    }
}

impl SwapParameters {
    /// Create a validated parameter set
    ///
    /// # Returns
    ///
    /// * `Err(InvalidBasisPoints)` - If either bps value exceeds 10000
    pub fn new(
        max_price_age_secs: u64,
        slippage_tolerance_bps: u16,
        swap_fee_bps: u16,
    ) -> Result<Self, EngineError> {
        Ok(Self {
            max_price_age_secs,
            slippage_tolerance_bps: validate_bps(slippage_tolerance_bps)?,
            swap_fee_bps: validate_bps(swap_fee_bps)?,
        })
    }

    /// Parameters as `(max_price_age_secs, slippage_bps, fee_bps)`
    #[inline]
    pub fn as_tuple(&self) -> (u64, u16, u16) {
        (
            self.max_price_age_secs,
            self.slippage_tolerance_bps,
            self.swap_fee_bps,
        )
    }
}

// ============================================================================
// Basis-point helpers
// ============================================================================

/// Reject basis-point values above 10000
pub fn validate_bps(value: u16) -> Result<u16, EngineError> {
    if u64::from(value) > BPS_SCALE {
        return Err(EngineError::InvalidBasisPoints(u32::from(value)));
    }
    Ok(value)
}

/// `amount × bps / 10000`, truncated toward zero
///
/// # Example
///
/// ```
/// use pythswap_core::types::bps_share;
///
/// assert_eq!(bps_share(10_000, 30), 30);
/// assert_eq!(bps_share(999, 30), 2); // 2.997 truncates down
/// ```
#[inline]
pub fn bps_share(amount: u64, bps: u16) -> u64 {
    let scaled = (amount as u128) * (bps as u128) / (BPS_SCALE as u128);
    scaled as u64
}

/// `amount × (10000 − bps) / 10000`, truncated toward zero
///
/// # Example
///
/// ```
/// use pythswap_core::types::bps_retain;
///
/// assert_eq!(bps_retain(10_000, 30), 9_970);
/// assert_eq!(bps_retain(10_000, 0), 10_000);
/// assert_eq!(bps_retain(10_000, 10_000), 0);
/// ```
#[inline]
pub fn bps_retain(amount: u64, bps: u16) -> u64 {
    let kept = BPS_SCALE.saturating_sub(u64::from(bps));
    let scaled = (amount as u128) * (kept as u128) / (BPS_SCALE as u128);
    scaled as u64
}

// ============================================================================
// Unit Tests
// ============================================================================
