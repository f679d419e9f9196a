//! Exchange fill records.
//!
//! A [`Trade`] is one bounded buy or sell of outcome tokens executed against
//! the exchange. The ledger issues at most two trades per event phase (one
//! per side); the in-memory exchange keeps them for inspection.

use alloy_primitives::U256;

use crate::types::fixed::{self, ArithmeticError};
use crate::types::Outcome;

/// Buy or sell of outcome tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TradeDirection {
    Buy,
    Sell,
}

/// A single executed exchange trade.
///
/// ## Price Bounds
///
/// `bound` is the caller's limit: the highest acceptable price for a buy,
/// the lowest for a sell. `price` is the price the trade filled at.
///
/// ## Example
///
/// ```
/// use binary_book::types::{fixed, Outcome, Trade, TradeDirection};
///
/// let trade = Trade::new(
///     1,                      // trade id
///     Outcome::White,         // side
///     TradeDirection::Buy,    // direction
///     fixed::whole(500),      // quantity
///     fixed::whole(2),        // fill price
///     fixed::whole(10),       // max acceptable price
/// );
/// assert_eq!(trade.notional().unwrap(), fixed::whole(1000));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trade {
    /// Sequence number assigned by the exchange
    pub id: u64,
    pub outcome: Outcome,
    pub direction: TradeDirection,
    /// Outcome-token quantity (fixed-point)
    pub quantity: U256,
    /// Fill price (fixed-point)
    pub price: U256,
    /// Caller-specified price bound (fixed-point)
    pub bound: U256,
}

impl Trade {
    pub fn new(
        id: u64,
        outcome: Outcome,
        direction: TradeDirection,
        quantity: U256,
        price: U256,
        bound: U256,
    ) -> Self {
        Self {
            id,
            outcome,
            direction,
            quantity,
            price,
            bound,
        }
    }

    /// Collateral value of the trade: `quantity * price`.
    pub fn notional(&self) -> Result<U256, ArithmeticError> {
        fixed::mul(self.quantity, self.price)
    }

    /// Whether the fill price respected the caller's bound.
    pub fn within_bound(&self) -> bool {
        match self.direction {
            TradeDirection::Buy => self.price <= self.bound,
            TradeDirection::Sell => self.price >= self.bound,
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
