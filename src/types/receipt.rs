//! Receipts returned by settlement and withdrawal.
//!
//! A [`SettlementReceipt`] summarizes one phase of an event's settlement and
//! carries the ledger state root taken right after the phase committed.

use alloy_primitives::{Address, U256};

use crate::ledger::SessionPhase;
use crate::types::{EventId, OrderId};

/// Summary of an `event_start` or `event_end` call.
///
/// ## State Root
///
/// The 32-byte state root is a SHA-256 hash over the SSZ encoding of every
/// order in the ledger. Two ledgers that processed the same calls report the
/// same root.
///
/// ## Example
///
/// ```
/// use alloy_primitives::U256;
/// use binary_book::ledger::SessionPhase;
/// use binary_book::types::SettlementReceipt;
///
/// let receipt = SettlementReceipt {
///     event_id: 1,
///     phase: SessionPhase::Aggregated,
///     orders: 0,
///     white_token_amount: U256::ZERO,
///     black_token_amount: U256::ZERO,
///     collateral: U256::ZERO,
///     white_price: None,
///     black_price: None,
///     state_root: [0u8; 32],
/// };
/// assert!(receipt.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementReceipt {
    pub event_id: EventId,

    /// Phase the session is in after the call
    pub phase: SessionPhase,

    /// Orders aggregated (start) or executed (end)
    pub orders: u64,

    /// White tokens bought (start) or sold (end)
    pub white_token_amount: U256,

    /// Black tokens bought (start) or sold (end)
    pub black_token_amount: U256,

    /// Collateral paid to (start) or received from (end) the exchange
    pub collateral: U256,

    /// Executing price used for white orders (end only)
    pub white_price: Option<U256>,

    /// Executing price used for black orders (end only)
    pub black_price: Option<U256>,

    /// Ledger state root after the call
    pub state_root: [u8; 32],
}

impl SettlementReceipt {
    /// Get the state root as a hex string
    pub fn state_root_hex(&self) -> String {
        hex::encode(self.state_root)
    }

    /// Check if no orders took part in this phase
    pub fn is_empty(&self) -> bool {
        self.orders == 0
    }
}

/// Result of a successful `withdraw_collateral` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Withdrawal {
    pub orderer: Address,

    /// Orders paid out by this call
    pub order_ids: Vec<OrderId>,

    /// Settled value before the fee
    pub gross: U256,

    /// Fee withheld and added to the collected fee
    pub fee: U256,

    /// Amount transferred to the orderer
    pub net: U256,
}

// ============================================================================
// Unit Tests
// ============================================================================
