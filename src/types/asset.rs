//! Asset identifiers and oracle feed ids.
//!
//! ## Overview
//!
//! The engine trades a fixed set of assets against the native ledger asset
//! (HBAR). Each asset carries a 32-byte price-feed identifier assigned by the
//! oracle network and a display symbol used by the registry.
//!
//! ## Units
//!
//! All amounts everywhere in the engine are u64 smallest units of 8-decimal
//! assets (the native tinybar convention), matching the 10^8 fixed-point
//! scale used by the quote math.
//!
//! ## Example
//!
//! ```
//! use pythswap_core::types::Asset;
//!
//! assert_eq!(Asset::Btc.to_u8(), 2);
//! assert_eq!(Asset::from_u8(3), Some(Asset::Hbar));
//! assert_eq!(Asset::Eth.symbol(), "ETH/USD");
//! assert!(Asset::Hbar.is_native());
//! ```

/// Caller / participant account identifier.
pub type AccountId = u64;

/// Deployed engine instance identifier, used for cross-contract binding.
pub type ContractId = u64;

/// Opaque 32-byte price-feed identifier assigned by the oracle network.
pub type FeedId = [u8; 32];

/// Sentinel returned when a symbol has no registered feed.
pub const ZERO_FEED_ID: FeedId = [0u8; 32];

// ============================================================================
// Asset enum
// ============================================================================

/// Tradable asset.
///
/// Represented as u8 in serialized forms and reserve indexing:
/// - Eth = 0
/// - Sol = 1
/// - Btc = 2
/// - Hbar = 3 (native ledger asset)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Asset {
    /// Wrapped Ether
    #[default]
    Eth,
    /// Wrapped Solana
    Sol,
    /// Wrapped Bitcoin
    Btc,
    /// The native ledger asset
    Hbar,
}

impl Asset {
    /// Number of tracked assets.
    pub const COUNT: usize = 4;

    /// All assets in index order.
    pub const ALL: [Asset; Asset::COUNT] = [Asset::Eth, Asset::Sol, Asset::Btc, Asset::Hbar];

    /// Convert to u8 for serialization and indexing
    pub fn to_u8(self) -> u8 {
        match self {
            Asset::Eth => 0,
            Asset::Sol => 1,
            Asset::Btc => 2,
            Asset::Hbar => 3,
        }
    }

    /// Convert from u8 for deserialization
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Asset::Eth),
            1 => Some(Asset::Sol),
            2 => Some(Asset::Btc),
            3 => Some(Asset::Hbar),
            _ => None,
        }
    }

    /// Reserve-array index for this asset
    #[inline]
    pub fn index(self) -> usize {
        self.to_u8() as usize
    }

    /// Oracle registry symbol for this asset
    pub fn symbol(self) -> &'static str {
        match self {
            Asset::Eth => "ETH/USD",
            Asset::Sol => "SOL/USD",
            Asset::Btc => "BTC/USD",
            Asset::Hbar => "HBAR/USD",
        }
    }

    /// Look up an asset by its registry symbol
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Asset::ALL.iter().copied().find(|a| a.symbol() == symbol)
    }

    /// True for the native ledger asset
    #[inline]
    pub fn is_native(self) -> bool {
        matches!(self, Asset::Hbar)
    }

    /// Default oracle feed id for this asset
    pub fn default_feed_id(self) -> FeedId {
        match self {
            Asset::Eth => ETH_USD_FEED_ID,
            Asset::Sol => SOL_USD_FEED_ID,
            Asset::Btc => BTC_USD_FEED_ID,
            Asset::Hbar => HBAR_USD_FEED_ID,
        }
    }
}

// ============================================================================
// Default feed ids
// ============================================================================

/// ETH/USD: 0xff61491a931112ddf1bd8147cd1b641375f79f5825126d665480874634fd0ace
pub const ETH_USD_FEED_ID: FeedId = [
    0xff, 0x61, 0x49, 0x1a, 0x93, 0x11, 0x12, 0xdd, 0xf1, 0xbd, 0x81, 0x47, 0xcd, 0x1b, 0x64,
    0x13, 0x75, 0xf7, 0x9f, 0x58, 0x25, 0x12, 0x6d, 0x66, 0x54, 0x80, 0x87, 0x46, 0x34, 0xfd,
    0x0a, 0xce,
];

/// SOL/USD: 0xef0d8b6fda2ceba41da15d4095d1da392a0d2f8ed0c6c7bc0f4cfac8c280b56d
pub const SOL_USD_FEED_ID: FeedId = [
    0xef, 0x0d, 0x8b, 0x6f, 0xda, 0x2c, 0xeb, 0xa4, 0x1d, 0xa1, 0x5d, 0x40, 0x95, 0xd1, 0xda,
    0x39, 0x2a, 0x0d, 0x2f, 0x8e, 0xd0, 0xc6, 0xc7, 0xbc, 0x0f, 0x4c, 0xfa, 0xc8, 0xc2, 0x80,
    0xb5, 0x6d,
];

/// BTC/USD: 0xf9c0172ba10dfa4d19088d94f5bf61d3b54d5bd7483a322a982e1373ee8ea31b
pub const BTC_USD_FEED_ID: FeedId = [
    0xf9, 0xc0, 0x17, 0x2b, 0xa1, 0x0d, 0xfa, 0x4d, 0x19, 0x08, 0x8d, 0x94, 0xf5, 0xbf, 0x61,
    0xd3, 0xb5, 0x4d, 0x5b, 0xd7, 0x48, 0x3a, 0x32, 0x2a, 0x98, 0x2e, 0x13, 0x73, 0xee, 0x8e,
    0xa3, 0x1b,
];

/// HBAR/USD placeholder id (no canonical feed published yet)
pub const HBAR_USD_FEED_ID: FeedId = [
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x01,
];

// ============================================================================
// Feed id helpers
// ============================================================================

/// Parse a feed id from a hex string, with or without a `0x` prefix
///
/// # Returns
///
/// * `Some(FeedId)` - 32 decoded bytes
/// * `None` - If the string is not exactly 64 hex digits
///
/// # Example
///
/// ```
/// use pythswap_core::types::{feed_id_from_hex, ETH_USD_FEED_ID};
///
/// let id = feed_id_from_hex(
///     "0xff61491a931112ddf1bd8147cd1b641375f79f5825126d665480874634fd0ace",
/// );
/// assert_eq!(id, Some(ETH_USD_FEED_ID));
/// ```
pub fn feed_id_from_hex(s: &str) -> Option<FeedId> {
    let raw = s.strip_prefix("0x").unwrap_or(s);
    let bytes = hex::decode(raw).ok()?;
    let mut id = ZERO_FEED_ID;
    if bytes.len() != id.len() {
        return None;
    }
    id.copy_from_slice(&bytes);
    Some(id)
}

/// Render a feed id as a `0x`-prefixed lowercase hex string
pub fn feed_id_to_hex(id: &FeedId) -> String {
    format!("0x{}", hex::encode(id))
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_conversion() {
        assert_eq!(Asset::Eth.to_u8(), 0);
        assert_eq!(Asset::Sol.to_u8(), 1);
        assert_eq!(Asset::Btc.to_u8(), 2);
        assert_eq!(Asset::Hbar.to_u8(), 3);
        assert_eq!(Asset::from_u8(0), Some(Asset::Eth));
        assert_eq!(Asset::from_u8(3), Some(Asset::Hbar));
        assert_eq!(Asset::from_u8(4), None);
    }

    #[test]
    fn test_asset_roundtrip_all() {
        for asset in Asset::ALL {
            assert_eq!(Asset::from_u8(asset.to_u8()), Some(asset));
            assert_eq!(Asset::from_symbol(asset.symbol()), Some(asset));
        }
    }

    #[test]
    fn test_native_flag() {
        assert!(Asset::Hbar.is_native());
        assert!(!Asset::Eth.is_native());
        assert!(!Asset::Sol.is_native());
        assert!(!Asset::Btc.is_native());
    }

    #[test]
    fn test_symbol_lookup_unknown() {
        assert_eq!(Asset::from_symbol("DOGE/USD"), None);
        assert_eq!(Asset::from_symbol(""), None);
    }

    #[test]
    fn test_feed_id_hex_roundtrip() {
        for asset in Asset::ALL {
            let id = asset.default_feed_id();
            let hex_str = feed_id_to_hex(&id);
            assert_eq!(feed_id_from_hex(&hex_str), Some(id));
        }
    }

    #[test]
    fn test_feed_id_from_hex_rejects_bad_input() {
        assert_eq!(feed_id_from_hex("0x1234"), None); // too short
        assert_eq!(feed_id_from_hex("zz"), None); // not hex
        let too_long = format!("0x{}", "ab".repeat(33));
        assert_eq!(feed_id_from_hex(&too_long), None);
    }

    #[test]
    fn test_default_feed_ids_distinct() {
        let ids = [
            ETH_USD_FEED_ID,
            SOL_USD_FEED_ID,
            BTC_USD_FEED_ID,
            HBAR_USD_FEED_ID,
        ];
        for i in 0..ids.len() {
            for j in (i + 1)..ids.len() {
                assert_ne!(ids[i], ids[j]);
            }
        }
        assert_ne!(ETH_USD_FEED_ID, ZERO_FEED_ID);
    }
}
