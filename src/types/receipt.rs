//! Swap and settlement receipts.
//!
//! ## Purpose
//!
//! Every state-changing operation that moves value returns a receipt. The
//! receipt carries the outbound transfer as data: the engine commits all
//! ledger mutations first and only then constructs the receipt, so the
//! transfer a caller acts on can never precede the state it reflects.
//!
//! ## Digests
//!
//! Receipts expose a SHA-256 digest over their field encoding, usable as a
//! compact audit reference without revealing the full receipt.

use crate::types::asset::{AccountId, Asset};
use sha2::{Digest, Sha256};

/// SHA-256 of `data` as a 32-byte array.
pub fn sha256_digest(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();

    let mut hash = [0u8; 32];
    hash.copy_from_slice(&result);
    hash
}

// ============================================================================
// Transfer
// ============================================================================

/// An outbound value movement owed to an account.
///
/// The engine never pushes value mid-operation; it records the transfer here
/// after all ledgers are final and the host performs the actual movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transfer {
    /// Receiving account
    pub to: AccountId,

    /// Asset being moved
    pub asset: Asset,

    /// Amount in smallest units
    pub amount: u64,
}

impl Transfer {
    /// Create a new transfer record
    pub fn new(to: AccountId, asset: Asset, amount: u64) -> Self {
        Self { to, asset, amount }
    }

    /// True when the transfer moves the native ledger asset
    #[inline]
    pub fn is_native(&self) -> bool {
        self.asset.is_native()
    }
}

// ============================================================================
// SwapDirection enum
// ============================================================================

/// Which leg of the pair is the native asset.
///
/// Represented as u8 in digests:
/// - NativeToAsset = 0
/// - AssetToNative = 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwapDirection {
    /// Caller attaches native value, receives the counterpart asset
    NativeToAsset,
    /// Caller supplies the counterpart asset, receives native value
    AssetToNative,
}

impl SwapDirection {
    /// Convert to u8 for serialization
    pub fn to_u8(self) -> u8 {
        match self {
            SwapDirection::NativeToAsset => 0,
            SwapDirection::AssetToNative => 1,
        }
    }

    /// Convert from u8 for deserialization
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(SwapDirection::NativeToAsset),
            1 => Some(SwapDirection::AssetToNative),
            _ => None,
        }
    }
}

// ============================================================================
// SwapReceipt
// ============================================================================

/// Record of one executed swap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapReceipt {
    /// Swap direction
    pub direction: SwapDirection,

    /// Account that requested the swap
    pub caller: AccountId,

    /// The non-native asset of the pair
    pub asset: Asset,

    /// Input amount, smallest units
    pub amount_in: u64,

    /// Output amount after fee, smallest units
    pub amount_out: u64,

    /// Fee recognized on the native leg, smallest units
    pub fee_native: u64,

    /// Portion of the fee forwarded to the lottery prize pool
    pub lottery_cut: u64,

    /// Input-asset price, 18-decimal scaled
    pub from_price_18: u128,

    /// Output-asset price, 18-decimal scaled
    pub to_price_18: u128,

    /// Unix seconds of execution
    pub timestamp: u64,

    /// Outbound transfer owed to the caller
    pub transfer: Transfer,
}

impl SwapReceipt {
    /// Deterministic field encoding used for the digest
    fn digest_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(96);
        bytes.push(self.direction.to_u8());
        bytes.extend_from_slice(&self.caller.to_le_bytes());
        bytes.push(self.asset.to_u8());
        bytes.extend_from_slice(&self.amount_in.to_le_bytes());
        bytes.extend_from_slice(&self.amount_out.to_le_bytes());
        bytes.extend_from_slice(&self.fee_native.to_le_bytes());
        bytes.extend_from_slice(&self.lottery_cut.to_le_bytes());
        bytes.extend_from_slice(&self.from_price_18.to_le_bytes());
        bytes.extend_from_slice(&self.to_price_18.to_le_bytes());
        bytes.extend_from_slice(&self.timestamp.to_le_bytes());
        bytes
    }

    /// SHA-256 digest of the receipt
    pub fn digest(&self) -> [u8; 32] {
        sha256_digest(&self.digest_bytes())
    }

    /// Digest as a hex string
    pub fn digest_hex(&self) -> String {
        hex::encode(self.digest())
    }
}

// ============================================================================
// SettlementReceipt
// ============================================================================

/// Record of one settled lottery round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementReceipt {
    /// Settled round identifier
    pub round_id: u64,

    /// Winning account
    pub winner: AccountId,

    /// Prize paid, native smallest units
    pub prize: u64,

    /// Unique entrants at draw time
    pub participant_count: u64,

    /// Randomness request correlation id that settled the round
    pub sequence: u64,

    /// Unix seconds of settlement
    pub timestamp: u64,

    /// Outbound prize transfer owed to the winner
    pub transfer: Transfer,
}

impl SettlementReceipt {
    /// SHA-256 digest of the settlement
    pub fn digest(&self) -> [u8; 32] {
        let mut bytes = Vec::with_capacity(48);
        bytes.extend_from_slice(&self.round_id.to_le_bytes());
        bytes.extend_from_slice(&self.winner.to_le_bytes());
        bytes.extend_from_slice(&self.prize.to_le_bytes());
        bytes.extend_from_slice(&self.participant_count.to_le_bytes());
        bytes.extend_from_slice(&self.sequence.to_le_bytes());
        bytes.extend_from_slice(&self.timestamp.to_le_bytes());
        sha256_digest(&bytes)
    }

    /// Digest as a hex string
    pub fn digest_hex(&self) -> String {
        hex::encode(self.digest())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
