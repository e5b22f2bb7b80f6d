//! Core data types for the swap and lottery engine.
//!
//! ## Types
//!
//! - [`Asset`]: the tracked asset set and its oracle feed ids
//! - [`PriceQuote`]: one oracle price reading, plus conversion math
//! - [`SwapParameters`]: owner-mutable pricing bounds
//! - [`LotteryRound`] / [`RoundStatus`]: round lifecycle state
//! - [`SwapReceipt`] / [`SettlementReceipt`]: value-movement records
//! - [`EngineError`]: the error taxonomy shared by every component
//!
//! ## Integer Arithmetic
//!
//! All amounts are `u64` smallest units of 8-decimal assets; all conversion
//! math is checked u128 with truncation toward zero. No floating point.

pub mod asset;
pub mod error;
pub mod params;
pub mod quote;
pub mod receipt;
pub mod round;

// Re-export all types at module level
pub use asset::{
    feed_id_from_hex, feed_id_to_hex, AccountId, Asset, ContractId, FeedId, BTC_USD_FEED_ID,
    ETH_USD_FEED_ID, HBAR_USD_FEED_ID, SOL_USD_FEED_ID, ZERO_FEED_ID,
};
pub use error::EngineError;
pub use params::{
    bps_retain, bps_share, validate_bps, SwapParameters, BPS_SCALE, DEFAULT_LOTTERY_SHARE_BPS,
    DEFAULT_MAX_PRICE_AGE_SECS, DEFAULT_SLIPPAGE_TOLERANCE_BPS, DEFAULT_SWAP_FEE_BPS,
};
pub use quote::{convert_amount, PriceQuote, PRICE_DECIMALS};
pub use receipt::{sha256_digest, SettlementReceipt, SwapDirection, SwapReceipt, Transfer};
pub use round::{ContractStats, LotteryRound, RoundSnapshot, RoundStatus};
