//! Price quotes and integer conversion math.
//!
//! ## Overview
//!
//! The oracle network publishes prices as an integer mantissa plus a signed
//! base-10 exponent: the effective USD value of one whole asset is
//! `price × 10^expo`. Quotes are never stored as floats; all conversion math
//! runs on checked u128 integer arithmetic with truncation toward zero, so a
//! rounding step never favors the caller.
//!
//! ## Staleness
//!
//! A quote is usable only while `now − publish_time` is within the configured
//! maximum age. A quote published "in the future" (clock skew between oracle
//! and host) counts as age 0.
//!
//! ## Examples
//!
//! ```
//! use pythswap_core::types::PriceQuote;
//!
//! // $1140.00, published at t=1000
//! let quote = PriceQuote::new(114_000_000_000, -8, 1000);
//! assert_eq!(quote.age(1060), 60);
//! assert!(!quote.is_stale(1060, 60)); // exactly max age: still usable
//! assert!(quote.is_stale(1061, 60)); // one second past: stale
//! ```

use crate::types::error::EngineError;
use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// Decimal places used for normalized price comparisons.
pub const PRICE_DECIMALS: u32 = 18;

// ============================================================================
// PriceQuote
// ============================================================================

/// A single oracle price reading.
///
/// Effective USD value of one whole asset = `price × 10^expo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PriceQuote {
    /// Integer price mantissa (always non-negative for supported feeds)
    pub price: u64,

    /// Signed base-10 exponent, typically -8
    pub expo: i32,

    /// Unix seconds when the oracle published this reading
    pub publish_time: u64,
}

impl PriceQuote {
    /// Create a new quote
    pub fn new(price: u64, expo: i32, publish_time: u64) -> Self {
        Self {
            price,
            expo,
            publish_time,
        }
    }

    /// Age of the quote in seconds; future publish times count as 0
    #[inline]
    pub fn age(&self, now: u64) -> u64 {
        now.saturating_sub(self.publish_time)
    }

    /// True if the quote is older than `max_age_secs` at `now`
    #[inline]
    pub fn is_stale(&self, now: u64, max_age_secs: u64) -> bool {
        self.age(now) > max_age_secs
    }

    /// Price scaled to 18 decimals: `price × 10^(18 + expo)`
    ///
    /// # Returns
    ///
    /// * `Ok(u128)` - The normalized price
    /// * `Err(AmountOverflow)` - If the scaling overflows u128
    ///
    /// # Example
    ///
    /// ```
    /// use pythswap_core::types::PriceQuote;
    ///
    /// let quote = PriceQuote::new(114_000_000_000, -8, 0);
    /// assert_eq!(quote.normalized_18().unwrap(), 1_140 * 10u128.pow(18));
    /// ```
    pub fn normalized_18(&self) -> Result<u128, EngineError> {
        let shift = PRICE_DECIMALS as i64 + self.expo as i64;
        let mantissa = self.price as u128;
        if shift >= 0 {
            let factor = 10u128
                .checked_pow(shift as u32)
                .ok_or(EngineError::AmountOverflow("price normalization"))?;
            mantissa
                .checked_mul(factor)
                .ok_or(EngineError::AmountOverflow("price normalization"))
        } else {
            let factor = 10u128
                .checked_pow((-shift) as u32)
                .ok_or(EngineError::AmountOverflow("price normalization"))?;
            Ok(mantissa / factor)
        }
    }

    /// Effective USD value as a Decimal, for display and cross-checks
    ///
    /// Returns `None` when the exponent falls outside what Decimal can
    /// represent (28 fractional digits).
    pub fn value_decimal(&self) -> Option<Decimal> {
        if self.expo <= 0 {
            let scale = (-self.expo) as u32;
            if scale > 28 {
                return None;
            }
            Decimal::try_from_i128_with_scale(self.price as i128, scale).ok()
        } else {
            let mut value = Decimal::from(self.price);
            for _ in 0..self.expo {
                value = value.checked_mul(Decimal::from(10u64))?;
            }
            Some(value)
        }
    }
}

// ============================================================================
// Amount conversion
// ============================================================================

/// Convert an amount of one asset into another at the given quotes.
///
/// Both amounts are 8-decimal smallest units, so the decimal scale cancels:
/// `out = amount_in × from_price18 / to_price18`, truncated toward zero.
///
/// # Arguments
///
/// * `amount_in` - Input amount, smallest units
/// * `from` - Quote for the input asset
/// * `to` - Quote for the output asset
///
/// # Returns
///
/// * `Ok(u64)` - Output amount, smallest units
/// * `Err(AmountOverflow)` - On u128 overflow, a zero output price, or an
///   output that no longer fits in u64
///
/// # Example
///
/// ```
/// use pythswap_core::types::{convert_amount, PriceQuote};
///
/// let hbar = PriceQuote::new(10_000_000, -8, 0); // $0.10
/// let eth = PriceQuote::new(400_000_000_000, -8, 0); // $4000
/// // 40000 units of HBAR buy exactly 1 unit of ETH
/// assert_eq!(convert_amount(40_000, &hbar, &eth).unwrap(), 1);
/// ```
pub fn convert_amount(
    amount_in: u64,
    from: &PriceQuote,
    to: &PriceQuote,
) -> Result<u64, EngineError> {
    let from_18 = from.normalized_18()?;
    let to_18 = to.normalized_18()?;

    let value = (amount_in as u128)
        .checked_mul(from_18)
        .ok_or(EngineError::AmountOverflow("amount valuation"))?;
    let out = value
        .checked_div(to_18)
        .ok_or(EngineError::AmountOverflow("zero output price"))?;

    u64::try_from(out).map_err(|_| EngineError::AmountOverflow("output amount"))
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_age_and_staleness_boundary() {
        let quote = PriceQuote::new(1, -8, 1_000);
        assert_eq!(quote.age(1_000), 0);
        assert_eq!(quote.age(1_060), 60);
        assert!(!quote.is_stale(1_060, 60)); // exactly max age is usable
        assert!(quote.is_stale(1_061, 60)); // one second beyond is not
    }

    #[test]
    fn test_future_publish_time_is_fresh() {
        let quote = PriceQuote::new(1, -8, 2_000);
        assert_eq!(quote.age(1_000), 0);
        assert!(!quote.is_stale(1_000, 0));
    }

    #[test]
    fn test_normalized_18_typical_expo() {
        // $1140.00 with expo -8
        let quote = PriceQuote::new(114_000_000_000, -8, 0);
        assert_eq!(quote.normalized_18().unwrap(), 1_140 * 10u128.pow(18));

        // $0.10 with expo -8
        let quote = PriceQuote::new(10_000_000, -8, 0);
        assert_eq!(quote.normalized_18().unwrap(), 10u128.pow(17));
    }

    #[test]
    fn test_normalized_18_extreme_expo() {
        // expo -20: mantissa digits beyond 18 decimals truncate
        let quote = PriceQuote::new(123, -20, 0);
        assert_eq!(quote.normalized_18().unwrap(), 1);

        // large positive expo overflows
        let quote = PriceQuote::new(u64::MAX, 30, 0);
        assert!(matches!(
            quote.normalized_18(),
            Err(EngineError::AmountOverflow(_))
        ));
    }

    #[test]
    fn test_value_decimal_matches_normalized() {
        let quote = PriceQuote::new(114_000_000_000, -8, 0);
        let decimal = quote.value_decimal().unwrap();
        assert_eq!(decimal, Decimal::from(1140));

        let tiny = PriceQuote::new(5, -8, 0);
        assert_eq!(tiny.value_decimal().unwrap().to_string(), "0.00000005");
    }

    #[test]
    fn test_convert_amount_basic() {
        let hbar = PriceQuote::new(10_000_000, -8, 0); // $0.10
        let eth = PriceQuote::new(400_000_000_000, -8, 0); // $4000

        // 40000x price ratio
        assert_eq!(convert_amount(40_000, &hbar, &eth).unwrap(), 1);
        assert_eq!(
            convert_amount(4_000_000_000_000, &hbar, &eth).unwrap(),
            100_000_000
        );
        // Reverse direction
        assert_eq!(convert_amount(1, &eth, &hbar).unwrap(), 40_000);
    }

    #[test]
    fn test_convert_amount_truncates_toward_zero() {
        let hbar = PriceQuote::new(10_000_000, -8, 0); // $0.10
        let eth = PriceQuote::new(400_000_000_000, -8, 0); // $4000

        // 39999 units of HBAR are worth 0.999975 ETH units: truncates to 0
        assert_eq!(convert_amount(39_999, &hbar, &eth).unwrap(), 0);
        assert_eq!(convert_amount(79_999, &hbar, &eth).unwrap(), 1);
    }

    #[test]
    fn test_convert_amount_mixed_expo() {
        // Same effective prices expressed at different exponents
        let a = PriceQuote::new(2_000_000, -6, 0); // $2
        let b = PriceQuote::new(400, -2, 0); // $4
        assert_eq!(convert_amount(10, &a, &b).unwrap(), 5);
    }

    #[test]
    fn test_convert_amount_zero_price_rejected() {
        let good = PriceQuote::new(100, -8, 0);
        let zero = PriceQuote::new(0, -8, 0);
        assert!(matches!(
            convert_amount(10, &good, &zero),
            Err(EngineError::AmountOverflow(_))
        ));
    }

    #[test]
    fn test_convert_amount_overflow_rejected() {
        let huge = PriceQuote::new(u64::MAX, 0, 0);
        let tiny = PriceQuote::new(1, -8, 0);
        assert!(matches!(
            convert_amount(u64::MAX, &huge, &tiny),
            Err(EngineError::AmountOverflow(_))
        ));
    }

    #[test]
    fn test_convert_agrees_with_decimal_reference() {
        // Integer path must agree with an independent Decimal computation
        let from = PriceQuote::new(19_901_234, -8, 0);
        let to = PriceQuote::new(113_456_789_012, -8, 0);
        let amount_in: u64 = 123_456_789;

        let expected = {
            let value = Decimal::from(amount_in) * from.value_decimal().unwrap();
            let out = value / to.value_decimal().unwrap();
            out.trunc().to_u64().unwrap()
        };
        assert_eq!(convert_amount(amount_in, &from, &to).unwrap(), expected);
    }
}
