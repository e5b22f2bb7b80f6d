//! Execution engines: oracle-priced swaps and the lottery they feed.
//!
//! [`SwapEngine`] prices swaps off the oracle's attested quotes, settles
//! them against pooled reserves, and routes the fee split. [`LotteryEngine`]
//! runs the prize rounds those fees fund, settling each one from a verified
//! randomness callback.
//!
//! The two engines are bound to each other by contract id after
//! construction; a swap only records a lottery entry when both sides agree
//! on the pairing.
//!
//! ## Example
//!
//! ```
//! use pythswap_core::engine::{LotteryEngine, SwapEngine};
//! use pythswap_core::oracle::EntropyGateway;
//!
//! let owner = 1;
//! let mut swap = SwapEngine::new(owner, 77);
//! let entropy = EntropyGateway::new(50, 51, 100);
//! let mut lottery = LotteryEngine::new(owner, 78, entropy, 3_600, 5, 1_000);
//!
//! swap.set_lottery_contract(owner, 78).unwrap();
//! lottery.set_swap_contract(owner, 77).unwrap();
//! assert_eq!(lottery.swap_contract(), Some(77));
//! ```

pub mod lottery;
pub mod swap;

pub use lottery::{LotteryEngine, StatsReport, STALE_DRAW_PATIENCE_SECS};
pub use swap::{ContractInfo, SwapEngine, SwapQuote};
