//! Price feed gateway: symbol registry and quote store.
//!
//! ## Architecture
//!
//! The gateway keeps three indexes, following the registry-plus-index layout
//! used across the engine:
//!
//! - `symbols`: registration-ordered symbol list (public listing order)
//! - `feeds`: symbol → feed id
//! - `quotes`: feed id → latest accepted quote
//!
//! Quotes enter only through [`update_price_feeds`](PriceFeedOracle::update_price_feeds),
//! which decodes and verifies every payload before applying any of them: a
//! single bad payload aborts the whole batch with no partial ingestion.
//! Within an accepted batch, last-write-wins by publish time per feed, so an
//! out-of-order replay can never roll a price back.

use crate::oracle::update::{PriceUpdate, UpdateVerifier};
use crate::types::asset::{feed_id_to_hex, AccountId, Asset, FeedId, ZERO_FEED_ID};
use crate::types::error::EngineError;
use crate::types::quote::{convert_amount, PriceQuote};
use std::collections::HashMap;
use tracing::{debug, info};

/// Oracle price-feed registry and quote store.
#[derive(Debug, Clone, Default)]
pub struct PriceFeedOracle {
    /// Account allowed to mutate the registry
    owner: AccountId,

    /// Symbols in registration order
    symbols: Vec<String>,

    /// Symbol → feed id
    feeds: HashMap<String, FeedId>,

    /// Feed id → display symbol, for diagnostics on the raw-id read path
    labels: HashMap<FeedId, String>,

    /// Feed id → latest accepted quote
    quotes: HashMap<FeedId, PriceQuote>,

    /// Required fee per update payload, native smallest units
    fee_per_update: u64,

    /// Total fees received by the gateway
    fees_collected: u64,
}

impl PriceFeedOracle {
    // ========================================================================
    // Construction
    // ========================================================================

    /// Create an empty gateway
    pub fn new(owner: AccountId, fee_per_update: u64) -> Self {
        Self {
            owner,
            fee_per_update,
            ..Default::default()
        }
    }

    /// Create a gateway with the four default feeds registered
    pub fn with_default_assets(owner: AccountId, fee_per_update: u64) -> Self {
        let mut oracle = Self::new(owner, fee_per_update);
        for asset in Asset::ALL {
            oracle.register(asset.symbol().to_string(), asset.default_feed_id());
        }
        oracle
    }

    fn register(&mut self, symbol: String, feed_id: FeedId) {
        if !self.feeds.contains_key(&symbol) {
            self.symbols.push(symbol.clone());
        }
        self.labels.insert(feed_id, symbol.clone());
        self.feeds.insert(symbol, feed_id);
    }

    // ========================================================================
    // Registry
    // ========================================================================

    /// Register a symbol → feed id mapping (owner only)
    ///
    /// Re-registering an existing symbol replaces its feed id in place.
    pub fn add_asset(
        &mut self,
        caller: AccountId,
        symbol: &str,
        feed_id: FeedId,
    ) -> Result<(), EngineError> {
        self.ensure_owner(caller)?;
        self.register(symbol.to_string(), feed_id);
        debug!(symbol, feed = %feed_id_to_hex(&feed_id), "asset registered");
        Ok(())
    }

    /// Registered symbols in registration order
    #[inline]
    pub fn supported_assets(&self) -> &[String] {
        &self.symbols
    }

    /// Feed id for a symbol; the zero sentinel when unregistered
    #[inline]
    pub fn price_id(&self, symbol: &str) -> FeedId {
        self.feeds.get(symbol).copied().unwrap_or(ZERO_FEED_ID)
    }

    /// Number of registered feeds
    #[inline]
    pub fn feed_count(&self) -> usize {
        self.feeds.len()
    }

    // ========================================================================
    // Quote reads
    // ========================================================================

    /// Latest quote for a symbol, regardless of age
    ///
    /// # Returns
    ///
    /// * `Err(UnsupportedAsset)` - No feed registered for the symbol
    /// * `Err(StalePrice)` - Feed registered but no quote ingested yet
    pub fn get_price(&self, symbol: &str) -> Result<PriceQuote, EngineError> {
        let feed_id = self
            .feeds
            .get(symbol)
            .ok_or_else(|| EngineError::UnsupportedAsset(symbol.to_string()))?;
        self.quotes
            .get(feed_id)
            .copied()
            .ok_or_else(|| EngineError::StalePrice {
                symbol: symbol.to_string(),
                age_secs: u64::MAX,
                max_age_secs: 0,
            })
    }

    /// Latest quote for a symbol, bounded by age
    pub fn get_price_no_older_than(
        &self,
        symbol: &str,
        max_age_secs: u64,
        now: u64,
    ) -> Result<PriceQuote, EngineError> {
        let quote = self.get_price(symbol)?;
        if quote.is_stale(now, max_age_secs) {
            return Err(EngineError::StalePrice {
                symbol: symbol.to_string(),
                age_secs: quote.age(now),
                max_age_secs,
            });
        }
        Ok(quote)
    }

    /// Latest quote by raw feed id, regardless of age
    #[inline]
    pub fn quote_by_id(&self, feed_id: &FeedId) -> Option<&PriceQuote> {
        self.quotes.get(feed_id)
    }

    /// Latest quote by raw feed id, bounded by age
    ///
    /// This is the swap engine's hot read path: engines store feed ids, not
    /// symbols.
    pub fn quote_by_id_no_older_than(
        &self,
        feed_id: &FeedId,
        max_age_secs: u64,
        now: u64,
    ) -> Result<PriceQuote, EngineError> {
        let label = || {
            self.labels
                .get(feed_id)
                .cloned()
                .unwrap_or_else(|| feed_id_to_hex(feed_id))
        };
        let quote = self
            .quotes
            .get(feed_id)
            .copied()
            .ok_or_else(|| EngineError::StalePrice {
                symbol: label(),
                age_secs: u64::MAX,
                max_age_secs,
            })?;
        if quote.is_stale(now, max_age_secs) {
            return Err(EngineError::StalePrice {
                symbol: label(),
                age_secs: quote.age(now),
                max_age_secs,
            });
        }
        Ok(quote)
    }

    /// Price scaled to 18 decimals, as external reporting expects
    pub fn get_price_formatted(&self, symbol: &str) -> Result<u128, EngineError> {
        self.get_price(symbol)?.normalized_18()
    }

    /// Convert an asset amount into native-asset smallest units
    pub fn calculate_hbar_value(&self, symbol: &str, amount: u64) -> Result<u64, EngineError> {
        let asset_quote = self.get_price(symbol)?;
        let native_quote = self.get_price(Asset::Hbar.symbol())?;
        convert_amount(amount, &asset_quote, &native_quote)
    }

    // ========================================================================
    // Ingestion
    // ========================================================================

    /// Required fee for a batch of `count` payloads
    pub fn update_fee(&self, count: usize) -> Result<u64, EngineError> {
        self.fee_per_update
            .checked_mul(count as u64)
            .ok_or(EngineError::AmountOverflow("update fee"))
    }

    /// Ingest a batch of framed oracle payloads
    ///
    /// Decodes and verifies every payload before applying any of them; a
    /// single failure aborts the call with no partial ingestion. Within an
    /// accepted batch, a payload older than the stored quote for the same
    /// feed is skipped.
    ///
    /// # Arguments
    ///
    /// * `verifier` - Trusted payload verifier
    /// * `payloads` - SSZ-framed update blobs
    /// * `attached_fee` - Fee attached by the caller
    ///
    /// # Returns
    ///
    /// Number of quotes actually applied
    pub fn update_price_feeds<V: UpdateVerifier>(
        &mut self,
        verifier: &V,
        payloads: &[Vec<u8>],
        attached_fee: u64,
    ) -> Result<u64, EngineError> {
        let required = self.update_fee(payloads.len())?;
        if attached_fee < required {
            return Err(EngineError::InsufficientFee {
                required,
                attached: attached_fee,
            });
        }

        // Decode and verify everything before touching the quote store
        let mut updates = Vec::with_capacity(payloads.len());
        for payload in payloads {
            let update = PriceUpdate::decode(payload)?;
            verifier.verify(&update)?;
            updates.push(update);
        }

        self.fees_collected = self.fees_collected.saturating_add(attached_fee);

        let mut applied = 0u64;
        for update in updates {
            let quote = update.quote();
            let fresher = self
                .quotes
                .get(&update.feed_id)
                .map_or(true, |stored| quote.publish_time > stored.publish_time);
            if fresher {
                debug!(
                    feed = %feed_id_to_hex(&update.feed_id),
                    price = quote.price,
                    expo = quote.expo,
                    publish_time = quote.publish_time,
                    "quote applied"
                );
                self.quotes.insert(update.feed_id, quote);
                applied += 1;
            }
        }
        info!(
            batch = payloads.len(),
            applied, fee = attached_fee, "price feeds updated"
        );
        Ok(applied)
    }

    // ========================================================================
    // Governance
    // ========================================================================

    /// Change the per-payload update fee (owner only)
    pub fn set_update_fee(&mut self, caller: AccountId, fee: u64) -> Result<(), EngineError> {
        self.ensure_owner(caller)?;
        self.fee_per_update = fee;
        Ok(())
    }

    /// Total fees received by the gateway
    #[inline]
    pub fn fees_collected(&self) -> u64 {
        self.fees_collected
    }

    fn ensure_owner(&self, caller: AccountId) -> Result<(), EngineError> {
        if caller != self.owner {
            return Err(EngineError::Unauthorized { caller });
        }
        Ok(())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::update::AttestationVerifier;
    use crate::types::{ETH_USD_FEED_ID, HBAR_USD_FEED_ID};

    const OWNER: AccountId = 1;

    fn verifier() -> AttestationVerifier {
        AttestationVerifier::new([7u8; 32])
    }

    fn oracle_with_quotes(now: u64) -> PriceFeedOracle {
        let mut oracle = PriceFeedOracle::with_default_assets(OWNER, 1);
        let v = verifier();
        let payloads = vec![
            v.seal(ETH_USD_FEED_ID, 400_000_000_000, -8, now).encode().unwrap(),
            v.seal(HBAR_USD_FEED_ID, 10_000_000, -8, now).encode().unwrap(),
        ];
        oracle.update_price_feeds(&v, &payloads, 2).unwrap();
        oracle
    }

    #[test]
    fn test_default_registry() {
        let oracle = PriceFeedOracle::with_default_assets(OWNER, 1);
        assert_eq!(
            oracle.supported_assets(),
            &["ETH/USD", "SOL/USD", "BTC/USD", "HBAR/USD"]
        );
        assert_eq!(oracle.feed_count(), 4);
        assert_eq!(oracle.price_id("ETH/USD"), ETH_USD_FEED_ID);
    }

    #[test]
    fn test_price_id_zero_sentinel() {
        let oracle = PriceFeedOracle::with_default_assets(OWNER, 1);
        assert_eq!(oracle.price_id("DOGE/USD"), ZERO_FEED_ID);
        assert_eq!(oracle.price_id(""), ZERO_FEED_ID);
    }

    #[test]
    fn test_add_asset_owner_gate() {
        let mut oracle = PriceFeedOracle::with_default_assets(OWNER, 1);
        let err = oracle.add_asset(99, "DOGE/USD", [1u8; 32]);
        assert_eq!(err, Err(EngineError::Unauthorized { caller: 99 }));
        assert_eq!(oracle.price_id("DOGE/USD"), ZERO_FEED_ID);

        oracle.add_asset(OWNER, "DOGE/USD", [1u8; 32]).unwrap();
        assert_eq!(oracle.price_id("DOGE/USD"), [1u8; 32]);
        assert_eq!(oracle.supported_assets().last().unwrap(), "DOGE/USD");
    }

    #[test]
    fn test_add_asset_replaces_in_place() {
        let mut oracle = PriceFeedOracle::with_default_assets(OWNER, 1);
        oracle.add_asset(OWNER, "ETH/USD", [9u8; 32]).unwrap();
        assert_eq!(oracle.price_id("ETH/USD"), [9u8; 32]);
        // Listing order unchanged, no duplicate entry
        assert_eq!(oracle.supported_assets().len(), 4);
        assert_eq!(oracle.supported_assets()[0], "ETH/USD");
    }

    #[test]
    fn test_get_price_paths() {
        let oracle = oracle_with_quotes(1_000);

        let quote = oracle.get_price("ETH/USD").unwrap();
        assert_eq!(quote.price, 400_000_000_000);

        // Unregistered symbol
        assert!(matches!(
            oracle.get_price("DOGE/USD"),
            Err(EngineError::UnsupportedAsset(_))
        ));

        // Registered but never ingested
        assert!(matches!(
            oracle.get_price("SOL/USD"),
            Err(EngineError::StalePrice { .. })
        ));
    }

    #[test]
    fn test_staleness_boundary() {
        let oracle = oracle_with_quotes(1_000);

        // Exactly max age: usable
        assert!(oracle
            .get_price_no_older_than("ETH/USD", 60, 1_060)
            .is_ok());
        // One second past: stale
        let err = oracle.get_price_no_older_than("ETH/USD", 60, 1_061);
        assert!(matches!(
            err,
            Err(EngineError::StalePrice {
                age_secs: 61,
                max_age_secs: 60,
                ..
            })
        ));
    }

    #[test]
    fn test_quote_by_id_paths() {
        let oracle = oracle_with_quotes(1_000);
        assert!(oracle.quote_by_id(&ETH_USD_FEED_ID).is_some());
        assert!(oracle
            .quote_by_id_no_older_than(&ETH_USD_FEED_ID, 60, 1_030)
            .is_ok());
        assert!(matches!(
            oracle.quote_by_id_no_older_than(&[5u8; 32], 60, 1_030),
            Err(EngineError::StalePrice { .. })
        ));
    }

    #[test]
    fn test_update_fee_enforced() {
        let mut oracle = PriceFeedOracle::with_default_assets(OWNER, 10);
        let v = verifier();
        let payloads = vec![
            v.seal(ETH_USD_FEED_ID, 1, -8, 0).encode().unwrap(),
            v.seal(HBAR_USD_FEED_ID, 1, -8, 0).encode().unwrap(),
        ];
        let err = oracle.update_price_feeds(&v, &payloads, 19);
        assert_eq!(
            err,
            Err(EngineError::InsufficientFee {
                required: 20,
                attached: 19
            })
        );
        assert_eq!(oracle.fees_collected(), 0);

        assert_eq!(oracle.update_price_feeds(&v, &payloads, 20).unwrap(), 2);
        assert_eq!(oracle.fees_collected(), 20);
    }

    #[test]
    fn test_bad_payload_aborts_whole_batch() {
        let mut oracle = PriceFeedOracle::with_default_assets(OWNER, 0);
        let v = verifier();
        let mut tampered = v.seal(HBAR_USD_FEED_ID, 10_000_000, -8, 500);
        tampered.price = 999;
        let payloads = vec![
            v.seal(ETH_USD_FEED_ID, 400_000_000_000, -8, 500).encode().unwrap(),
            tampered.encode().unwrap(),
        ];

        let err = oracle.update_price_feeds(&v, &payloads, 0);
        assert!(matches!(err, Err(EngineError::InvalidUpdate(_))));

        // The valid first payload must not have been applied
        assert!(oracle.quote_by_id(&ETH_USD_FEED_ID).is_none());
        assert_eq!(oracle.fees_collected(), 0);
    }

    #[test]
    fn test_older_update_skipped() {
        let mut oracle = oracle_with_quotes(1_000);
        let v = verifier();

        let stale = vec![v.seal(ETH_USD_FEED_ID, 1, -8, 900).encode().unwrap()];
        assert_eq!(oracle.update_price_feeds(&v, &stale, 1).unwrap(), 0);
        assert_eq!(oracle.get_price("ETH/USD").unwrap().price, 400_000_000_000);

        let fresh = vec![v.seal(ETH_USD_FEED_ID, 1, -8, 1_100).encode().unwrap()];
        assert_eq!(oracle.update_price_feeds(&v, &fresh, 1).unwrap(), 1);
        assert_eq!(oracle.get_price("ETH/USD").unwrap().price, 1);
    }

    #[test]
    fn test_price_formatted() {
        let oracle = oracle_with_quotes(1_000);
        assert_eq!(
            oracle.get_price_formatted("ETH/USD").unwrap(),
            4_000 * 10u128.pow(18)
        );
    }

    #[test]
    fn test_calculate_hbar_value() {
        let oracle = oracle_with_quotes(1_000);
        // 1 ETH unit at $4000 buys 40000 HBAR units at $0.10
        assert_eq!(oracle.calculate_hbar_value("ETH/USD", 1).unwrap(), 40_000);
        assert!(matches!(
            oracle.calculate_hbar_value("DOGE/USD", 1),
            Err(EngineError::UnsupportedAsset(_))
        ));
    }

    #[test]
    fn test_set_update_fee_owner_gate() {
        let mut oracle = PriceFeedOracle::with_default_assets(OWNER, 1);
        assert!(oracle.set_update_fee(2, 5).is_err());
        oracle.set_update_fee(OWNER, 5).unwrap();
        assert_eq!(oracle.update_fee(3).unwrap(), 15);
    }
}
