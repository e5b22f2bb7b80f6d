//! Oracle-priced swap execution against the reserve pool.
//!
//! ## Pricing
//!
//! Every swap is priced from two oracle quotes at call time: the input
//! asset's and the output asset's. The gross conversion is
//! `amount_in * from_price / to_price` in 18-decimal fixed point, truncated
//! toward zero. The net output applies the swap fee:
//! `gross * (10000 - fee_bps) / 10000`, again truncated, so rounding never
//! favors the caller.
//!
//! ## Accounting
//!
//! Reserves move by exactly the swap legs: the input asset reserve grows by
//! `amount_in`, the output asset reserve shrinks by the net output. The fee
//! is recognized in native units on the ledger as an equity claim against
//! the retained spread; paying it out never touches per-asset reserves.
//!
//! Every state-changing operation orders all checks before the first
//! mutation, and builds transfer records only after state is committed.
//!
//! ## Example
//!
//! ```
//! use pythswap_core::engine::SwapEngine;
//! use pythswap_core::oracle::{AttestationVerifier, PriceFeedOracle};
//! use pythswap_core::types::{Asset, ETH_USD_FEED_ID, HBAR_USD_FEED_ID};
//!
//! let verifier = AttestationVerifier::new([1u8; 32]);
//! let mut oracle = PriceFeedOracle::with_default_assets(1, 0);
//! let payloads = vec![
//!     verifier.seal(HBAR_USD_FEED_ID, 10_000_000, -8, 1_000).encode().unwrap(),
//!     verifier.seal(ETH_USD_FEED_ID, 400_000_000_000, -8, 1_000).encode().unwrap(),
//! ];
//! oracle.update_price_feeds(&verifier, &payloads, 0).unwrap();
//!
//! let engine = SwapEngine::new(1, 77);
//!
//! // 0.4 HBAR at $0.10 buys 0.00001 ETH at $4000, minus the 0.3% fee
//! let quote = engine
//!     .calculate_swap_output(&oracle, Asset::Hbar, Asset::Eth, 40_000_000, 1_030)
//!     .unwrap();
//! assert_eq!(quote.amount_out, 997);
//! ```

use crate::engine::lottery::LotteryEngine;
use crate::oracle::PriceFeedOracle;
use crate::pool::{FeeLedger, ReservePool, ReserveSnapshot};
use crate::types::asset::{AccountId, Asset, ContractId, FeedId};
use crate::types::error::EngineError;
use crate::types::params::{bps_retain, bps_share, validate_bps, SwapParameters};
use crate::types::quote::{convert_amount, PriceQuote};
use crate::types::receipt::{sha256_digest, SwapDirection, SwapReceipt, Transfer};
use tracing::info;

/// Output of [`SwapEngine::calculate_swap_output`]: the net amount and the
/// 18-decimal prices it was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapQuote {
    /// Net output after the swap fee, smallest units
    pub amount_out: u64,

    /// Input asset price, scaled to 18 decimals
    pub from_price_18: u128,

    /// Output asset price, scaled to 18 decimals
    pub to_price_18: u128,
}

impl SwapQuote {
    /// Fields in wire order
    #[inline]
    pub fn as_tuple(&self) -> (u64, u128, u128) {
        (self.amount_out, self.from_price_18, self.to_price_18)
    }
}

/// External references and wiring of a deployed engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractInfo {
    pub swap_router: String,
    pub quoter: String,
    pub native_token: String,
    pub owner: AccountId,
    pub prize_pool: Option<ContractId>,
    pub lottery_contract: Option<ContractId>,
}

/// Oracle-priced swap engine.
#[derive(Debug, Clone)]
pub struct SwapEngine {
    /// Account allowed to manage parameters, liquidity, and withdrawal
    owner: AccountId,

    /// This engine's own contract identity, reported to the lottery
    contract_id: ContractId,

    /// Staleness, slippage, and fee settings shared by all swaps
    params: SwapParameters,

    /// Feed id per asset, indexed by asset order
    price_ids: [FeedId; Asset::COUNT],

    /// Per-asset balances backing swaps
    reserves: ReservePool,

    /// Owner revenue and prize reserve
    fees: FeeLedger,

    /// Lottery engine authorized to receive entries and prize credits
    lottery_contract: Option<ContractId>,

    /// External router reference, informational
    swap_router: String,

    /// External quoter reference, informational
    quoter: String,

    /// Wrapped native token reference, informational
    native_token: String,

    /// Lifetime successful swaps
    total_swaps: u64,

    /// Lifetime native-leg volume, smallest units
    total_volume_native: u64,
}

impl SwapEngine {
    // ========================================================================
    // Construction
    // ========================================================================

    /// Create an engine with default parameters and default feed ids
    pub fn new(owner: AccountId, contract_id: ContractId) -> Self {
        let mut price_ids = [[0u8; 32]; Asset::COUNT];
        for asset in Asset::ALL {
            price_ids[asset.index()] = asset.default_feed_id();
        }
        Self {
            owner,
            contract_id,
            params: SwapParameters::default(),
            price_ids,
            reserves: ReservePool::new(),
            fees: FeeLedger::default(),
            lottery_contract: None,
            swap_router: String::new(),
            quoter: String::new(),
            native_token: String::new(),
            total_swaps: 0,
            total_volume_native: 0,
        }
    }

    /// Create an engine carrying external integration references
    pub fn with_refs(
        owner: AccountId,
        contract_id: ContractId,
        swap_router: &str,
        quoter: &str,
        native_token: &str,
    ) -> Self {
        let mut engine = Self::new(owner, contract_id);
        engine.swap_router = swap_router.to_string();
        engine.quoter = quoter.to_string();
        engine.native_token = native_token.to_string();
        engine
    }

    // ========================================================================
    // Quoting
    // ========================================================================

    /// Net swap output for a pair at current prices. Pure, no state change.
    ///
    /// # Arguments
    ///
    /// * `oracle` - Quote source
    /// * `from` - Input asset
    /// * `to` - Output asset
    /// * `amount_in` - Input amount, smallest units
    /// * `now` - Unix seconds used for the staleness bound
    ///
    /// # Returns
    ///
    /// * `Err(StalePrice)` - Either quote is missing or older than allowed
    pub fn calculate_swap_output(
        &self,
        oracle: &PriceFeedOracle,
        from: Asset,
        to: Asset,
        amount_in: u64,
        now: u64,
    ) -> Result<SwapQuote, EngineError> {
        let (gross, from_quote, to_quote) = self.convert(oracle, from, to, amount_in, now)?;
        Ok(SwapQuote {
            amount_out: bps_retain(gross, self.params.swap_fee_bps),
            from_price_18: from_quote.normalized_18()?,
            to_price_18: to_quote.normalized_18()?,
        })
    }

    /// Gross conversion plus the quotes it came from
    fn convert(
        &self,
        oracle: &PriceFeedOracle,
        from: Asset,
        to: Asset,
        amount_in: u64,
        now: u64,
    ) -> Result<(u64, PriceQuote, PriceQuote), EngineError> {
        let from_quote = self.bounded_quote(oracle, from, now)?;
        let to_quote = self.bounded_quote(oracle, to, now)?;
        let gross = convert_amount(amount_in, &from_quote, &to_quote)?;
        Ok((gross, from_quote, to_quote))
    }

    /// Quote for an asset, bounded by the configured max price age
    fn bounded_quote(
        &self,
        oracle: &PriceFeedOracle,
        asset: Asset,
        now: u64,
    ) -> Result<PriceQuote, EngineError> {
        oracle.quote_by_id_no_older_than(
            &self.price_ids[asset.index()],
            self.params.max_price_age_secs,
            now,
        )
    }

    // ========================================================================
    // Swap Execution
    // ========================================================================

    /// Swap attached native value for `to` units
    ///
    /// The minimum acceptable output is derived from the slippage tolerance
    /// applied to the call-time quote; there is no caller-supplied floor on
    /// this leg.
    ///
    /// # Arguments
    ///
    /// * `oracle` - Quote source
    /// * `lottery` - Lottery wired via [`set_lottery_contract`](Self::set_lottery_contract),
    ///   credited with the fee cut and the caller's entry
    /// * `caller` - Swapping account, paid the output transfer
    /// * `to` - Output asset, must not be the native asset
    /// * `amount_in` - Attached native value, smallest units
    /// * `now` - Unix seconds
    pub fn swap_hbar_for_asset(
        &mut self,
        oracle: &PriceFeedOracle,
        lottery: Option<&mut LotteryEngine>,
        caller: AccountId,
        to: Asset,
        amount_in: u64,
        now: u64,
    ) -> Result<SwapReceipt, EngineError> {
        if to.is_native() {
            return Err(EngineError::UnsupportedAsset(to.symbol().to_string()));
        }
        if amount_in == 0 {
            return Err(EngineError::InvalidAmount("zero amount"));
        }
        let lottery = self.check_lottery_wiring(lottery)?;

        let (gross, from_quote, to_quote) = self.convert(oracle, Asset::Hbar, to, amount_in, now)?;
        let amount_out = bps_retain(gross, self.params.swap_fee_bps);
        let min_out = bps_retain(gross, self.params.slippage_tolerance_bps);
        if amount_out < min_out {
            return Err(EngineError::SlippageExceeded {
                amount_out,
                min_out,
            });
        }

        let available = self.reserves.get(to);
        if available < amount_out {
            return Err(EngineError::InsufficientLiquidity {
                asset: to,
                requested: amount_out,
                available,
            });
        }
        if self.reserves.get(Asset::Hbar).checked_add(amount_in).is_none() {
            return Err(EngineError::AmountOverflow("reserve credit"));
        }

        // Checks done; commit state before building the outbound transfer
        let fee_native = bps_share(amount_in, self.params.swap_fee_bps);
        let lottery_cut = self.fees.credit(fee_native)?;
        self.reserves.credit(Asset::Hbar, amount_in)?;
        self.reserves.debit(to, amount_out)?;
        if let Some(lottery) = lottery {
            lottery.record_swap_entry(self.contract_id, caller, lottery_cut, now)?;
        }
        self.total_swaps += 1;
        self.total_volume_native = self.total_volume_native.saturating_add(amount_in);

        info!(
            caller,
            asset = to.symbol(),
            amount_in,
            amount_out,
            fee_native,
            "native-to-asset swap"
        );
        Ok(SwapReceipt {
            direction: SwapDirection::NativeToAsset,
            caller,
            asset: to,
            amount_in,
            amount_out,
            fee_native,
            lottery_cut,
            from_price_18: from_quote.normalized_18()?,
            to_price_18: to_quote.normalized_18()?,
            timestamp: now,
            transfer: Transfer::new(caller, to, amount_out),
        })
    }

    /// Swap `from` units for native value
    ///
    /// Honors both the caller's floor and the slippage-tolerance floor on
    /// the call-time quote, whichever binds first.
    pub fn swap_asset_for_hbar(
        &mut self,
        oracle: &PriceFeedOracle,
        lottery: Option<&mut LotteryEngine>,
        caller: AccountId,
        from: Asset,
        amount_in: u64,
        min_hbar_out: u64,
        now: u64,
    ) -> Result<SwapReceipt, EngineError> {
        if from.is_native() {
            return Err(EngineError::UnsupportedAsset(from.symbol().to_string()));
        }
        if amount_in == 0 {
            return Err(EngineError::InvalidAmount("zero amount"));
        }
        let lottery = self.check_lottery_wiring(lottery)?;

        let (gross, from_quote, to_quote) =
            self.convert(oracle, from, Asset::Hbar, amount_in, now)?;
        let amount_out = bps_retain(gross, self.params.swap_fee_bps);
        let slippage_floor = bps_retain(gross, self.params.slippage_tolerance_bps);
        if amount_out < slippage_floor {
            return Err(EngineError::SlippageExceeded {
                amount_out,
                min_out: slippage_floor,
            });
        }
        if amount_out < min_hbar_out {
            return Err(EngineError::SlippageExceeded {
                amount_out,
                min_out: min_hbar_out,
            });
        }

        let available = self.reserves.get(Asset::Hbar);
        if available < amount_out {
            return Err(EngineError::InsufficientLiquidity {
                asset: Asset::Hbar,
                requested: amount_out,
                available,
            });
        }
        if self.reserves.get(from).checked_add(amount_in).is_none() {
            return Err(EngineError::AmountOverflow("reserve credit"));
        }

        // Fee is the exact spread between gross and net on the native leg
        let fee_native = gross - amount_out;
        let lottery_cut = self.fees.credit(fee_native)?;
        self.reserves.credit(from, amount_in)?;
        self.reserves.debit(Asset::Hbar, amount_out)?;
        if let Some(lottery) = lottery {
            lottery.record_swap_entry(self.contract_id, caller, lottery_cut, now)?;
        }
        self.total_swaps += 1;
        self.total_volume_native = self.total_volume_native.saturating_add(gross);

        info!(
            caller,
            asset = from.symbol(),
            amount_in,
            amount_out,
            fee_native,
            "asset-to-native swap"
        );
        Ok(SwapReceipt {
            direction: SwapDirection::AssetToNative,
            caller,
            asset: from,
            amount_in,
            amount_out,
            fee_native,
            lottery_cut,
            from_price_18: from_quote.normalized_18()?,
            to_price_18: to_quote.normalized_18()?,
            timestamp: now,
            transfer: Transfer::new(caller, Asset::Hbar, amount_out),
        })
    }

    /// Require the lottery argument to match the configured wiring
    fn check_lottery_wiring<'a>(
        &self,
        lottery: Option<&'a mut LotteryEngine>,
    ) -> Result<Option<&'a mut LotteryEngine>, EngineError> {
        match (self.lottery_contract, lottery) {
            (None, _) => Ok(None),
            (Some(_), Some(lottery)) => {
                if lottery.swap_contract() != Some(self.contract_id) {
                    return Err(EngineError::Unauthorized {
                        caller: self.contract_id,
                    });
                }
                Ok(Some(lottery))
            }
            (Some(_), None) => Err(EngineError::Unauthorized {
                caller: self.contract_id,
            }),
        }
    }

    // ========================================================================
    // Liquidity
    // ========================================================================

    /// Top up the native reserve (owner only)
    pub fn add_hbar_liquidity(&mut self, caller: AccountId, amount: u64) -> Result<(), EngineError> {
        self.ensure_owner(caller)?;
        self.reserves.credit(Asset::Hbar, amount)
    }

    /// Top up a tracked asset reserve (owner only)
    pub fn add_asset_liquidity(
        &mut self,
        caller: AccountId,
        asset: Asset,
        amount: u64,
    ) -> Result<(), EngineError> {
        self.ensure_owner(caller)?;
        if asset.is_native() {
            return Err(EngineError::UnsupportedAsset(asset.symbol().to_string()));
        }
        self.reserves.credit(asset, amount)
    }

    // ========================================================================
    // Governance
    // ========================================================================

    /// Change the quote staleness bound (owner only)
    pub fn update_max_price_age(&mut self, caller: AccountId, secs: u64) -> Result<(), EngineError> {
        self.ensure_owner(caller)?;
        self.params.max_price_age_secs = secs;
        Ok(())
    }

    /// Change the slippage tolerance (owner only)
    pub fn update_slippage_tolerance(
        &mut self,
        caller: AccountId,
        bps: u16,
    ) -> Result<(), EngineError> {
        self.ensure_owner(caller)?;
        self.params.slippage_tolerance_bps = validate_bps(bps)?;
        Ok(())
    }

    /// Change the swap fee (owner only)
    pub fn update_swap_fee(&mut self, caller: AccountId, bps: u16) -> Result<(), EngineError> {
        self.ensure_owner(caller)?;
        self.params.swap_fee_bps = validate_bps(bps)?;
        Ok(())
    }

    /// Repoint one asset's price feed (owner only)
    pub fn update_price_id(
        &mut self,
        caller: AccountId,
        asset: Asset,
        feed_id: FeedId,
    ) -> Result<(), EngineError> {
        self.ensure_owner(caller)?;
        self.price_ids[asset.index()] = feed_id;
        Ok(())
    }

    /// Bind the lottery engine authorized for entries and credits (owner only)
    pub fn set_lottery_contract(
        &mut self,
        caller: AccountId,
        contract: ContractId,
    ) -> Result<(), EngineError> {
        self.ensure_owner(caller)?;
        self.lottery_contract = Some(contract);
        Ok(())
    }

    /// Change the prize share of future fees (owner only)
    pub fn update_lottery_share(&mut self, caller: AccountId, bps: u16) -> Result<(), EngineError> {
        self.ensure_owner(caller)?;
        self.fees.set_lottery_share(bps)
    }

    /// Withdraw accumulated owner revenue (owner only)
    ///
    /// The balance is zeroed before the transfer record is built, so a
    /// repeated call moves nothing.
    pub fn withdraw(&mut self, caller: AccountId) -> Result<Transfer, EngineError> {
        self.ensure_owner(caller)?;
        let amount = self.fees.take_owner_balance();
        info!(amount, "owner withdrawal");
        Ok(Transfer::new(self.owner, Asset::Hbar, amount))
    }

    fn ensure_owner(&self, caller: AccountId) -> Result<(), EngineError> {
        if caller != self.owner {
            return Err(EngineError::Unauthorized { caller });
        }
        Ok(())
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Latest quote for an asset, regardless of age
    pub fn get_asset_price(
        &self,
        oracle: &PriceFeedOracle,
        asset: Asset,
    ) -> Result<PriceQuote, EngineError> {
        oracle
            .quote_by_id(&self.price_ids[asset.index()])
            .copied()
            .ok_or_else(|| EngineError::StalePrice {
                symbol: asset.symbol().to_string(),
                age_secs: u64::MAX,
                max_age_secs: 0,
            })
    }

    /// Reserve balance for one asset
    #[inline]
    pub fn get_reserve(&self, asset: Asset) -> u64 {
        self.reserves.get(asset)
    }

    /// All reserve balances
    #[inline]
    pub fn all_reserves(&self) -> ReserveSnapshot {
        self.reserves.snapshot()
    }

    /// Feed ids in asset order
    #[inline]
    pub fn all_price_ids(&self) -> [FeedId; Asset::COUNT] {
        self.price_ids
    }

    /// Current (max price age, slippage bps, fee bps)
    #[inline]
    pub fn swap_parameters(&self) -> (u64, u16, u16) {
        self.params.as_tuple()
    }

    /// Wiring and external references
    pub fn contract_info(&self) -> ContractInfo {
        ContractInfo {
            swap_router: self.swap_router.clone(),
            quoter: self.quoter.clone(),
            native_token: self.native_token.clone(),
            owner: self.owner,
            prize_pool: self.lottery_contract,
            lottery_contract: self.lottery_contract,
        }
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
    pub fn lottery_contract(&self) -> Option<ContractId> {
        self.lottery_contract
    }

    /// Fee ledger view
    #[inline]
    pub fn fees(&self) -> &FeeLedger {
        &self.fees
    }

    /// Fee ledger handle for lottery settlement
    #[inline]
    pub fn fees_mut(&mut self) -> &mut FeeLedger {
        &mut self.fees
    }

    #[inline]
    pub fn total_swaps(&self) -> u64 {
        self.total_swaps
    }

    #[inline]
    pub fn total_volume_native(&self) -> u64 {
        self.total_volume_native
    }

    // ========================================================================
    // State Root
    // ========================================================================

    /// SHA-256 digest over parameters, feed ids, reserves, the fee ledger,
    /// and activity counters. Equal states hash equal.
    pub fn state_root(&self) -> [u8; 32] {
        let mut bytes = Vec::with_capacity(256);
        let (age, slippage, fee) = self.params.as_tuple();
        bytes.extend_from_slice(&age.to_le_bytes());
        bytes.extend_from_slice(&(slippage as u64).to_le_bytes());
        bytes.extend_from_slice(&(fee as u64).to_le_bytes());
        for feed_id in &self.price_ids {
            bytes.extend_from_slice(feed_id);
        }
        self.reserves.write_digest_bytes(&mut bytes);
        self.fees.write_digest_bytes(&mut bytes);
        bytes.extend_from_slice(&self.total_swaps.to_le_bytes());
        bytes.extend_from_slice(&self.total_volume_native.to_le_bytes());
        sha256_digest(&bytes)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::{AttestationVerifier, EntropyGateway};
    use crate::types::{BTC_USD_FEED_ID, ETH_USD_FEED_ID, HBAR_USD_FEED_ID, SOL_USD_FEED_ID};

    const OWNER: AccountId = 1;
    const TRADER: AccountId = 42;
    const SWAP_ID: ContractId = 77;
    const LOTTERY_ID: ContractId = 78;
    const ENTROPY_ORACLE: AccountId = 50;

    // ETH $4000, SOL $200, BTC $100000, HBAR $0.10, all expo -8
    fn oracle(publish_time: u64) -> PriceFeedOracle {
        let verifier = AttestationVerifier::new([7u8; 32]);
        let mut oracle = PriceFeedOracle::with_default_assets(OWNER, 0);
        let payloads = vec![
            verifier
                .seal(ETH_USD_FEED_ID, 400_000_000_000, -8, publish_time)
                .encode()
                .unwrap(),
            verifier
                .seal(SOL_USD_FEED_ID, 20_000_000_000, -8, publish_time)
                .encode()
                .unwrap(),
            verifier
                .seal(BTC_USD_FEED_ID, 10_000_000_000_000, -8, publish_time)
                .encode()
                .unwrap(),
            verifier
                .seal(HBAR_USD_FEED_ID, 10_000_000, -8, publish_time)
                .encode()
                .unwrap(),
        ];
        oracle.update_price_feeds(&verifier, &payloads, 0).unwrap();
        oracle
    }

    fn funded_engine() -> SwapEngine {
        let mut engine = SwapEngine::new(OWNER, SWAP_ID);
        engine.add_hbar_liquidity(OWNER, 10_000_000_000).unwrap();
        engine.add_asset_liquidity(OWNER, Asset::Eth, 1_000_000_000).unwrap();
        engine.add_asset_liquidity(OWNER, Asset::Sol, 1_000_000_000).unwrap();
        engine
    }

    fn wired_pair(now: u64) -> (SwapEngine, LotteryEngine) {
        let mut engine = funded_engine();
        let entropy = EntropyGateway::new(ENTROPY_ORACLE, 51, 100);
        let mut lottery = LotteryEngine::new(OWNER, LOTTERY_ID, entropy, 3_600, 5, now);
        lottery.set_swap_contract(OWNER, SWAP_ID).unwrap();
        engine.set_lottery_contract(OWNER, LOTTERY_ID).unwrap();
        (engine, lottery)
    }

    #[test]
    fn test_calculate_swap_output() {
        let engine = funded_engine();
        let oracle = oracle(1_000);

        // 0.4 HBAR = $0.04 = 1000 ETH units gross, 997 after 0.3% fee
        let quote = engine
            .calculate_swap_output(&oracle, Asset::Hbar, Asset::Eth, 40_000_000, 1_030)
            .unwrap();
        assert_eq!(quote.amount_out, 997);
        assert_eq!(quote.from_price_18, 100_000_000_000_000_000);
        assert_eq!(quote.to_price_18, 4_000 * 10u128.pow(18));
    }

    #[test]
    fn test_calculate_monotonic_in_amount() {
        let engine = funded_engine();
        let oracle = oracle(1_000);

        let mut last = 0;
        for amount_in in [1_000u64, 40_000, 400_000, 40_000_000, 4_000_000_000] {
            let out = engine
                .calculate_swap_output(&oracle, Asset::Hbar, Asset::Eth, amount_in, 1_000)
                .unwrap()
                .amount_out;
            assert!(out >= last);
            last = out;
        }
    }

    #[test]
    fn test_calculate_decreasing_in_fee() {
        let mut engine = funded_engine();
        let oracle = oracle(1_000);

        let mut last = u64::MAX;
        for fee_bps in [0u16, 30, 100, 1_000] {
            engine.update_swap_fee(OWNER, fee_bps).unwrap();
            let out = engine
                .calculate_swap_output(&oracle, Asset::Hbar, Asset::Eth, 4_000_000_000, 1_000)
                .unwrap()
                .amount_out;
            assert!(out < last);
            last = out;
        }
    }

    #[test]
    fn test_calculate_truncates_toward_zero() {
        let engine = funded_engine();
        let oracle = oracle(1_000);

        // 39999 tinybar is worth just under one ETH unit
        let quote = engine
            .calculate_swap_output(&oracle, Asset::Hbar, Asset::Eth, 39_999, 1_000)
            .unwrap();
        assert_eq!(quote.amount_out, 0);
    }

    #[test]
    fn test_swap_hbar_for_asset_flow() {
        let (mut engine, mut lottery) = wired_pair(1_000);
        let oracle = oracle(1_000);
        let before = engine.all_reserves();

        let receipt = engine
            .swap_hbar_for_asset(&oracle, Some(&mut lottery), TRADER, Asset::Eth, 40_000_000, 1_030)
            .unwrap();

        assert_eq!(receipt.direction, SwapDirection::NativeToAsset);
        assert_eq!(receipt.amount_out, 997);
        assert_eq!(receipt.fee_native, 120_000);
        assert_eq!(receipt.lottery_cut, 60_000);
        assert_eq!(receipt.transfer, Transfer::new(TRADER, Asset::Eth, 997));

        // Reserve conservation: +amount_in native, -amount_out counterpart
        let after = engine.all_reserves();
        assert_eq!(after.hbar, before.hbar + 40_000_000);
        assert_eq!(after.eth, before.eth - 997);
        assert_eq!(after.sol, before.sol);
        assert_eq!(after.btc, before.btc);

        // Fee split and lottery entry
        assert_eq!(engine.fees().owner_balance(), 60_000);
        assert_eq!(engine.fees().prize_reserve(), 60_000);
        let round = lottery.current_round_snapshot();
        assert_eq!(round.prize_pool, 60_000);
        assert_eq!(round.participant_count, 1);
        assert_eq!(engine.total_swaps(), 1);
        assert_eq!(engine.total_volume_native(), 40_000_000);
    }

    #[test]
    fn test_swap_asset_for_hbar_flow() {
        let (mut engine, mut lottery) = wired_pair(1_000);
        let oracle = oracle(1_000);

        // 1000 ETH units = $0.04 = 0.4 HBAR gross
        let receipt = engine
            .swap_asset_for_hbar(
                &oracle,
                Some(&mut lottery),
                TRADER,
                Asset::Eth,
                1_000,
                0,
                1_030,
            )
            .unwrap();

        assert_eq!(receipt.direction, SwapDirection::AssetToNative);
        assert_eq!(receipt.amount_out, 39_880_000);
        assert_eq!(receipt.fee_native, 120_000);
        assert_eq!(receipt.transfer, Transfer::new(TRADER, Asset::Hbar, 39_880_000));

        let reserves = engine.all_reserves();
        assert_eq!(reserves.eth, 1_000_000_000 + 1_000);
        assert_eq!(reserves.hbar, 10_000_000_000 - 39_880_000);
        assert_eq!(engine.total_volume_native(), 40_000_000);
    }

    #[test]
    fn test_round_trip_never_gains() {
        let (mut engine, mut lottery) = wired_pair(1_000);
        let oracle = oracle(1_000);

        let start = 40_000_000u64;
        let eth_out = engine
            .swap_hbar_for_asset(&oracle, Some(&mut lottery), TRADER, Asset::Eth, start, 1_000)
            .unwrap()
            .amount_out;
        let back = engine
            .swap_asset_for_hbar(&oracle, Some(&mut lottery), TRADER, Asset::Eth, eth_out, 0, 1_000)
            .unwrap()
            .amount_out;
        assert!(back <= start);
    }

    #[test]
    fn test_swap_rejects_native_target_and_zero_amount() {
        let (mut engine, mut lottery) = wired_pair(1_000);
        let oracle = oracle(1_000);

        assert!(matches!(
            engine.swap_hbar_for_asset(
                &oracle,
                Some(&mut lottery),
                TRADER,
                Asset::Hbar,
                1_000,
                1_000
            ),
            Err(EngineError::UnsupportedAsset(_))
        ));
        assert!(matches!(
            engine.swap_hbar_for_asset(&oracle, Some(&mut lottery), TRADER, Asset::Eth, 0, 1_000),
            Err(EngineError::InvalidAmount(_))
        ));
        assert!(matches!(
            engine.swap_asset_for_hbar(
                &oracle,
                Some(&mut lottery),
                TRADER,
                Asset::Hbar,
                1_000,
                0,
                1_000
            ),
            Err(EngineError::UnsupportedAsset(_))
        ));
        assert_eq!(engine.total_swaps(), 0);
    }

    #[test]
    fn test_staleness_boundary_on_execution() {
        let (mut engine, mut lottery) = wired_pair(1_000);
        let oracle = oracle(1_000);

        // Exactly 60s old succeeds
        engine
            .swap_hbar_for_asset(&oracle, Some(&mut lottery), TRADER, Asset::Eth, 40_000_000, 1_060)
            .unwrap();

        // 61s old fails and changes nothing further
        let before = engine.state_root();
        let err = engine.swap_hbar_for_asset(
            &oracle,
            Some(&mut lottery),
            TRADER,
            Asset::Eth,
            40_000_000,
            1_061,
        );
        assert!(matches!(
            err,
            Err(EngineError::StalePrice {
                age_secs: 61,
                max_age_secs: 60,
                ..
            })
        ));
        assert_eq!(engine.state_root(), before);
    }

    #[test]
    fn test_insufficient_liquidity() {
        let (mut engine, mut lottery) = wired_pair(1_000);
        let oracle = oracle(1_000);
        let before = engine.all_reserves();

        // BTC reserve was never funded
        let err = engine.swap_hbar_for_asset(
            &oracle,
            Some(&mut lottery),
            TRADER,
            Asset::Btc,
            4_000_000_000_000,
            1_000,
        );
        assert!(matches!(
            err,
            Err(EngineError::InsufficientLiquidity {
                asset: Asset::Btc,
                available: 0,
                ..
            })
        ));
        assert_eq!(engine.all_reserves(), before);
    }

    #[test]
    fn test_slippage_exceeded_when_fee_outruns_tolerance() {
        let (mut engine, mut lottery) = wired_pair(1_000);
        let oracle = oracle(1_000);

        // 5% fee against a 3% tolerance can never clear the floor
        engine.update_swap_fee(OWNER, 500).unwrap();
        let err = engine.swap_hbar_for_asset(
            &oracle,
            Some(&mut lottery),
            TRADER,
            Asset::Eth,
            40_000_000,
            1_000,
        );
        assert_eq!(
            err,
            Err(EngineError::SlippageExceeded {
                amount_out: 950,
                min_out: 970
            })
        );
    }

    #[test]
    fn test_caller_min_out_enforced() {
        let (mut engine, mut lottery) = wired_pair(1_000);
        let oracle = oracle(1_000);

        let err = engine.swap_asset_for_hbar(
            &oracle,
            Some(&mut lottery),
            TRADER,
            Asset::Eth,
            1_000,
            39_880_001,
            1_000,
        );
        assert_eq!(
            err,
            Err(EngineError::SlippageExceeded {
                amount_out: 39_880_000,
                min_out: 39_880_001
            })
        );
    }

    #[test]
    fn test_unwired_lottery_is_rejected() {
        let (mut engine, _lottery) = wired_pair(1_000);
        let oracle = oracle(1_000);

        // Engine expects a lottery but none was passed
        let err =
            engine.swap_hbar_for_asset(&oracle, None, TRADER, Asset::Eth, 40_000_000, 1_000);
        assert_eq!(err, Err(EngineError::Unauthorized { caller: SWAP_ID }));

        // A lottery bound to a different engine is rejected too
        let entropy = EntropyGateway::new(ENTROPY_ORACLE, 51, 100);
        let mut other = LotteryEngine::new(OWNER, 99, entropy, 3_600, 5, 1_000);
        other.set_swap_contract(OWNER, 12_345).unwrap();
        let err = engine.swap_hbar_for_asset(
            &oracle,
            Some(&mut other),
            TRADER,
            Asset::Eth,
            40_000_000,
            1_000,
        );
        assert_eq!(err, Err(EngineError::Unauthorized { caller: SWAP_ID }));
    }

    #[test]
    fn test_swap_without_lottery_binding() {
        let mut engine = funded_engine();
        let oracle = oracle(1_000);

        // No lottery configured: fees still split, prize side just accrues
        let receipt = engine
            .swap_hbar_for_asset(&oracle, None, TRADER, Asset::Eth, 40_000_000, 1_000)
            .unwrap();
        assert_eq!(receipt.lottery_cut, 60_000);
        assert_eq!(engine.fees().prize_reserve(), 60_000);
    }

    #[test]
    fn test_liquidity_gates() {
        let mut engine = SwapEngine::new(OWNER, SWAP_ID);
        assert!(engine.add_hbar_liquidity(TRADER, 1).is_err());
        assert!(engine.add_asset_liquidity(TRADER, Asset::Eth, 1).is_err());
        assert!(matches!(
            engine.add_asset_liquidity(OWNER, Asset::Hbar, 1),
            Err(EngineError::UnsupportedAsset(_))
        ));
        assert_eq!(engine.get_reserve(Asset::Hbar), 0);
    }

    #[test]
    fn test_setters_owner_gate_leave_params_unchanged() {
        let mut engine = funded_engine();
        let before = engine.swap_parameters();

        assert!(engine.update_max_price_age(TRADER, 120).is_err());
        assert!(engine.update_slippage_tolerance(TRADER, 500).is_err());
        assert!(engine.update_swap_fee(TRADER, 50).is_err());
        assert!(engine.set_lottery_contract(TRADER, 9).is_err());
        assert_eq!(engine.swap_parameters(), before);
        assert_eq!(engine.lottery_contract(), None);

        engine.update_max_price_age(OWNER, 120).unwrap();
        engine.update_slippage_tolerance(OWNER, 500).unwrap();
        engine.update_swap_fee(OWNER, 50).unwrap();
        assert_eq!(engine.swap_parameters(), (120, 500, 50));
    }

    #[test]
    fn test_setters_reject_out_of_range_bps() {
        let mut engine = funded_engine();
        assert!(matches!(
            engine.update_swap_fee(OWNER, 10_001),
            Err(EngineError::InvalidBasisPoints(10_001))
        ));
        assert!(matches!(
            engine.update_slippage_tolerance(OWNER, 10_001),
            Err(EngineError::InvalidBasisPoints(10_001))
        ));
        assert_eq!(engine.swap_parameters(), (60, 300, 30));
    }

    #[test]
    fn test_update_price_id() {
        let mut engine = funded_engine();
        let new_id = [9u8; 32];
        engine.update_price_id(OWNER, Asset::Eth, new_id).unwrap();
        assert_eq!(engine.all_price_ids()[0], new_id);
        assert_eq!(engine.all_price_ids()[3], HBAR_USD_FEED_ID);
    }

    #[test]
    fn test_withdraw_pays_once() {
        let mut engine = funded_engine();
        let oracle = oracle(1_000);
        engine
            .swap_hbar_for_asset(&oracle, None, TRADER, Asset::Eth, 40_000_000, 1_000)
            .unwrap();

        assert!(engine.withdraw(TRADER).is_err());
        let first = engine.withdraw(OWNER).unwrap();
        assert_eq!(first, Transfer::new(OWNER, Asset::Hbar, 60_000));

        let second = engine.withdraw(OWNER).unwrap();
        assert_eq!(second.amount, 0);
    }

    #[test]
    fn test_state_root_tracks_state() {
        let mut a = funded_engine();
        let b = funded_engine();
        assert_eq!(a.state_root(), b.state_root());

        let oracle = oracle(1_000);
        a.swap_hbar_for_asset(&oracle, None, TRADER, Asset::Eth, 40_000_000, 1_000)
            .unwrap();
        assert_ne!(a.state_root(), b.state_root());
    }

    #[test]
    fn test_contract_info() {
        let mut engine =
            SwapEngine::with_refs(OWNER, SWAP_ID, "0.0.1414040", "0.0.1390002", "0.0.1456986");
        engine.set_lottery_contract(OWNER, LOTTERY_ID).unwrap();
        let info = engine.contract_info();
        assert_eq!(info.swap_router, "0.0.1414040");
        assert_eq!(info.owner, OWNER);
        assert_eq!(info.lottery_contract, Some(LOTTERY_ID));
        assert_eq!(info.prize_pool, Some(LOTTERY_ID));
    }
}
