//! Oracle price-update payloads.
//!
//! ## Wire Format
//!
//! The oracle network delivers price updates as opaque byte blobs. Each blob
//! is an SSZ-encoded [`PriceUpdate`]: deterministic, byte-exact framing, so a
//! payload hashes and verifies identically everywhere.
//!
//! ## Attestation
//!
//! Real oracle payloads carry network signatures that this engine treats as
//! an opaque trusted dependency. Verification sits behind the
//! [`UpdateVerifier`] trait; the default [`AttestationVerifier`] checks a
//! keyed SHA-256 attestation over the payload fields, which is enough to
//! exercise the accept/reject paths end to end.

use crate::types::error::EngineError;
use crate::types::quote::PriceQuote;
use crate::types::receipt::sha256_digest;
use crate::types::FeedId;
use ssz_rs::prelude::*;

// ============================================================================
// PriceUpdate payload
// ============================================================================

/// One framed price update from the oracle network.
///
/// ## SSZ Layout
///
/// Fixed-size container, 84 bytes total:
/// feed_id (32) + price (8) + expo_raw (4) + publish_time (8) +
/// attestation (32).
///
/// ## Example
///
/// ```
/// use pythswap_core::oracle::PriceUpdate;
/// use pythswap_core::types::ETH_USD_FEED_ID;
///
/// let update = PriceUpdate::new(ETH_USD_FEED_ID, 400_000_000_000, -8, 1_000);
/// assert_eq!(update.expo(), -8);
/// assert_eq!(update.quote().price, 400_000_000_000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct PriceUpdate {
    /// Target price feed
    pub feed_id: [u8; 32],

    /// Integer price mantissa
    pub price: u64,

    /// Signed exponent as two's-complement u32
    /// Stored as u32 for SSZ compatibility
    pub expo_raw: u32,

    /// Unix seconds the oracle published this reading
    pub publish_time: u64,

    /// Keyed digest over the fields above
    pub attestation: [u8; 32],
}

impl PriceUpdate {
    /// Create an unattested update (attestation zeroed)
    pub fn new(feed_id: FeedId, price: u64, expo: i32, publish_time: u64) -> Self {
        Self {
            feed_id,
            price,
            expo_raw: expo as u32,
            publish_time,
            attestation: [0u8; 32],
        }
    }

    /// Signed exponent
    #[inline]
    pub fn expo(&self) -> i32 {
        self.expo_raw as i32
    }

    /// The quote this update carries
    pub fn quote(&self) -> PriceQuote {
        PriceQuote::new(self.price, self.expo(), self.publish_time)
    }

    /// Field bytes covered by the attestation
    pub fn signing_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(52);
        bytes.extend_from_slice(&self.feed_id);
        bytes.extend_from_slice(&self.price.to_le_bytes());
        bytes.extend_from_slice(&self.expo_raw.to_le_bytes());
        bytes.extend_from_slice(&self.publish_time.to_le_bytes());
        bytes
    }

    /// SSZ-encode this update into a wire blob
    pub fn encode(&self) -> Result<Vec<u8>, EngineError> {
        ssz_rs::serialize(self).map_err(|e| EngineError::InvalidUpdate(e.to_string()))
    }

    /// Decode a wire blob
    pub fn decode(bytes: &[u8]) -> Result<Self, EngineError> {
        ssz_rs::deserialize(bytes).map_err(|e| EngineError::InvalidUpdate(e.to_string()))
    }
}

// ============================================================================
// UpdateVerifier
// ============================================================================

/// Accepts or rejects decoded oracle payloads.
///
/// The engine only depends on this seam; swapping in a different oracle
/// network means swapping in a different implementation.
pub trait UpdateVerifier {
    /// Return `Ok` only for an authentic, well-formed update
    fn verify(&self, update: &PriceUpdate) -> Result<(), EngineError>;
}

/// Keyed SHA-256 attestation check.
#[derive(Debug, Clone)]
pub struct AttestationVerifier {
    key: [u8; 32],
}

impl AttestationVerifier {
    /// Create a verifier for the given attestation key
    pub fn new(key: [u8; 32]) -> Self {
        Self { key }
    }

    /// Compute the attestation for the given fields
    fn attestation_for(&self, update: &PriceUpdate) -> [u8; 32] {
        let mut bytes = Vec::with_capacity(84);
        bytes.extend_from_slice(&self.key);
        bytes.extend_from_slice(&update.signing_bytes());
        sha256_digest(&bytes)
    }

    /// Produce a fully attested update, as the oracle network side would
    pub fn seal(&self, feed_id: FeedId, price: u64, expo: i32, publish_time: u64) -> PriceUpdate {
        let mut update = PriceUpdate::new(feed_id, price, expo, publish_time);
        update.attestation = self.attestation_for(&update);
        update
    }
}

impl UpdateVerifier for AttestationVerifier {
    fn verify(&self, update: &PriceUpdate) -> Result<(), EngineError> {
        if update.price == 0 {
            return Err(EngineError::InvalidUpdate("zero price mantissa".into()));
        }
        if update.attestation != self.attestation_for(update) {
            return Err(EngineError::InvalidUpdate("attestation mismatch".into()));
        }
        Ok(())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
