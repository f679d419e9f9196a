//! Ledger error taxonomy.
//!
//! Every failure is a synchronous rejection: the ledger's state is exactly as
//! it was before the call. Collaborator and arithmetic faults are wrapped
//! transparently.

use alloy_primitives::{Address, U256};
use thiserror::Error;

use crate::port::{ExchangeError, TokenError};
use crate::types::fixed::ArithmeticError;
use crate::types::{EventId, OrderId};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("insufficient balance: {owner} holds {available}, order needs {required}")]
    InsufficientBalance {
        owner: Address,
        available: U256,
        required: U256,
    },

    #[error("order {0} not found")]
    OrderNotFound(OrderId),

    #[error("order {0} is not pending")]
    OrderNotPending(OrderId),

    #[error("{caller} does not own order {order_id}")]
    NotOrderOwner { order_id: OrderId, caller: Address },

    #[error("ledger custody holds {available}, needs {required}")]
    InsufficientLedgerBalance { available: U256, required: U256 },

    #[error("{0} is not authorized")]
    Unauthorized(Address),

    #[error("address must not be zero")]
    NullAddress,

    #[error("order amount must be greater than zero")]
    InvalidAmount,

    #[error("price {price} is not above the minimum {min_price}")]
    PriceBelowMinimum { price: U256, min_price: U256 },

    #[error("fee rate {0} exceeds 100%")]
    InvalidFeeRate(U256),

    #[error("invalid price bounds: min {min_price} must be below max {max_price}")]
    InvalidPriceBounds { min_price: U256, max_price: U256 },

    #[error("event {0} has already started settlement")]
    EventAlreadyStarted(EventId),

    #[error("event {0} has no aggregated settlement in progress")]
    EventNotStarted(EventId),

    #[error("nothing to withdraw")]
    NothingToWithdraw,

    #[error("{sessions} settlement session(s) still hold exchange positions")]
    SettlementInFlight { sessions: usize },

    #[error("order state encoding failed: {0}")]
    StateEncoding(String),

    #[error(transparent)]
    Arithmetic(#[from] ArithmeticError),

    #[error("collateral transfer failed: {0}")]
    Collateral(#[from] TokenError),

    #[error("exchange call failed: {0}")]
    Exchange(#[from] ExchangeError),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
