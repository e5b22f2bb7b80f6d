//! Oracle integrations: price feeds and entropy.
//!
//! Two gateways live here. [`PriceFeedOracle`] ingests verified price
//! payloads and serves staleness-bounded quotes; [`EntropyGateway`] issues
//! randomness request sequence numbers and authorizes one-shot callbacks.

pub mod entropy;
pub mod price_feed;
pub mod update;

pub use entropy::{
    random_from_u64, random_to_u128, winner_index, EntropyGateway, PendingRequest, RandomValue,
};
pub use price_feed::PriceFeedOracle;
pub use update::{AttestationVerifier, PriceUpdate, UpdateVerifier};
