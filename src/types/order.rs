//! Order types for the binary event ledger.
//!
//! ## Lifecycle
//!
//! ```text
//! create ──► Pending ──► cancel ──► Canceled
//!               │
//!               └──── event end ──► Executed ──► withdraw ──► Withdrawn
//! ```
//!
//! The status is derived from three flags (`is_pending`, `is_executed`,
//! `is_withdrawn`). Transitions only ever move forward; no flag is reset.
//!
//! ## Fixed-Point Representation
//!
//! `amount` is collateral in the token's native unit. Both prices are
//! fixed-point values scaled by 10^18 (see [`crate::types::fixed`]).

use alloy_primitives::{Address, U256};

use crate::types::fixed::{self, ArithmeticError};

/// Order identifier. Equal to the order's position in the ledger.
pub type OrderId = u64;

/// Event identifier chosen by the event coordinator.
pub type EventId = u64;

// ============================================================================
// Outcome enum
// ============================================================================

/// The side of a binary event an order backs.
///
/// Represented as u8 for SSZ compatibility:
/// - White = 0
/// - Black = 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Outcome {
    #[default]
    White,
    Black,
}

impl Outcome {
    /// Map the `is_white` flag onto a side.
    pub fn from_is_white(is_white: bool) -> Self {
        if is_white {
            Outcome::White
        } else {
            Outcome::Black
        }
    }

    pub fn is_white(self) -> bool {
        matches!(self, Outcome::White)
    }

    /// Convert to u8 for serialization
    pub fn to_u8(self) -> u8 {
        match self {
            Outcome::White => 0,
            Outcome::Black => 1,
        }
    }

    /// Convert from u8 for deserialization
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Outcome::White),
            1 => Some(Outcome::Black),
            _ => None,
        }
    }

    /// Returns the other side
    pub fn opposite(self) -> Self {
        match self {
            Outcome::White => Outcome::Black,
            Outcome::Black => Outcome::White,
        }
    }
}

// ============================================================================
// OrderStatus enum
// ============================================================================

/// Status view over an order's flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    /// Collateral locked, waiting for the event.
    Pending,
    /// Canceled by the orderer; collateral returned.
    Canceled,
    /// Priced out at event end; collateral claimable.
    Executed,
    /// Settled value paid out to the orderer.
    Withdrawn,
}

impl OrderStatus {
    /// No further transition is possible.
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Canceled | OrderStatus::Withdrawn)
    }
}

// ============================================================================
// Order struct
// ============================================================================

/// One collateral deposit backing one side of one event.
///
/// `orderer`, `amount`, `outcome`, `event_id` and `placing_price` never change
/// after creation. `executing_price` is zero until the event is settled and
/// is written exactly once.
///
/// ## Example
///
/// ```
/// use alloy_primitives::Address;
/// use binary_book::types::{fixed, Order, OrderStatus, Outcome};
///
/// let order = Order::new(
///     0,                          // id
///     Address::repeat_byte(0x11), // orderer
///     fixed::whole(1000),         // amount
///     Outcome::White,             // side
///     7,                          // event id
///     fixed::whole(2),            // placing price
/// );
/// assert_eq!(order.status(), OrderStatus::Pending);
/// assert_eq!(order.token_amount().unwrap(), fixed::whole(500));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub id: OrderId,
    pub orderer: Address,
    pub amount: U256,
    pub outcome: Outcome,
    pub event_id: EventId,
    pub is_pending: bool,
    pub is_executed: bool,
    /// Set once the settled value has been paid out.
    pub is_withdrawn: bool,
    pub placing_price: U256,
    pub executing_price: U256,
}

impl Order {
    /// Create a new pending order
    pub fn new(
        id: OrderId,
        orderer: Address,
        amount: U256,
        outcome: Outcome,
        event_id: EventId,
        placing_price: U256,
    ) -> Self {
        Self {
            id,
            orderer,
            amount,
            outcome,
            event_id,
            is_pending: true,
            is_executed: false,
            is_withdrawn: false,
            placing_price,
            executing_price: U256::ZERO,
        }
    }

    pub fn is_white(&self) -> bool {
        self.outcome.is_white()
    }

    pub fn status(&self) -> OrderStatus {
        match (self.is_pending, self.is_executed, self.is_withdrawn) {
            (true, _, _) => OrderStatus::Pending,
            (false, false, _) => OrderStatus::Canceled,
            (false, true, false) => OrderStatus::Executed,
            (false, true, true) => OrderStatus::Withdrawn,
        }
    }

    /// Executed and not yet paid out.
    pub fn is_claimable(&self) -> bool {
        self.status() == OrderStatus::Executed
    }

    /// Outcome tokens implied at placing time: `amount / placing_price`.
    pub fn token_amount(&self) -> Result<U256, ArithmeticError> {
        fixed::div(self.amount, self.placing_price)
    }

    /// Token amount valued at the executing price.
    ///
    /// Zero for orders that have not been executed.
    pub fn settled_value(&self) -> Result<U256, ArithmeticError> {
        if !self.is_executed {
            return Ok(U256::ZERO);
        }
        fixed::mul(self.token_amount()?, self.executing_price)
    }

    pub(crate) fn cancel(&mut self) {
        debug_assert!(self.is_pending);
        self.is_pending = false;
    }

    pub(crate) fn execute(&mut self, executing_price: U256) {
        debug_assert!(self.is_pending && !self.is_executed);
        self.executing_price = executing_price;
        self.is_executed = true;
        self.is_pending = false;
    }

    pub(crate) fn mark_withdrawn(&mut self) {
        debug_assert!(self.is_claimable());
        self.is_withdrawn = true;
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
