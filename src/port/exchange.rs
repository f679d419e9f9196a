//! Exchange port: outcome-token pricing and execution.

use alloy_primitives::{Address, U256};
use thiserror::Error;

use crate::port::{CollateralToken, TokenError};
use crate::types::Outcome;

/// Reasons the exchange refuses a call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExchangeError {
    #[error("exchange is halted")]
    Halted,

    #[error("price {price} is outside the bound {bound}")]
    PriceOutOfBounds { price: U256, bound: U256 },

    #[error("position holds {available}, sell needs {required}")]
    InsufficientPosition { available: U256, required: U256 },

    #[error("exchange unavailable: {0}")]
    Unavailable(String),

    #[error("collateral settlement failed: {0}")]
    Settlement(#[from] TokenError),
}

/// Pricing and execution service for white/black outcome tokens.
///
/// Prices and quantities are fixed-point values (scale 10^18). Buys fail if
/// the price is above `max_price`, sells if it is below `min_price`.
///
/// ## Settlement
///
/// Every trade settles in collateral against `account`: a buy debits it by
/// `quantity * price`, a sell credits it by the same. `account` hands the
/// exchange its collateral handle for the duration of the call. Each method
/// returns the collateral that moved.
pub trait Exchange {
    /// Identity of the exchange, used for change notifications.
    fn address(&self) -> Address;

    fn current_white_price(&self) -> Result<U256, ExchangeError>;

    fn current_black_price(&self) -> Result<U256, ExchangeError>;

    fn buy_white<C: CollateralToken>(
        &mut self,
        collateral: &mut C,
        account: Address,
        max_price: U256,
        quantity: U256,
    ) -> Result<U256, ExchangeError>;

    fn buy_black<C: CollateralToken>(
        &mut self,
        collateral: &mut C,
        account: Address,
        max_price: U256,
        quantity: U256,
    ) -> Result<U256, ExchangeError>;

    fn sell_white<C: CollateralToken>(
        &mut self,
        collateral: &mut C,
        account: Address,
        min_price: U256,
        quantity: U256,
    ) -> Result<U256, ExchangeError>;

    fn sell_black<C: CollateralToken>(
        &mut self,
        collateral: &mut C,
        account: Address,
        min_price: U256,
        quantity: U256,
    ) -> Result<U256, ExchangeError>;

    /// Current price of `outcome`.
    fn current_price(&self, outcome: Outcome) -> Result<U256, ExchangeError> {
        match outcome {
            Outcome::White => self.current_white_price(),
            Outcome::Black => self.current_black_price(),
        }
    }

    /// Bounded buy of `quantity` tokens of `outcome`; returns the collateral paid.
    fn buy<C: CollateralToken>(
        &mut self,
        collateral: &mut C,
        account: Address,
        outcome: Outcome,
        max_price: U256,
        quantity: U256,
    ) -> Result<U256, ExchangeError> {
        match outcome {
            Outcome::White => self.buy_white(collateral, account, max_price, quantity),
            Outcome::Black => self.buy_black(collateral, account, max_price, quantity),
        }
    }

    /// Bounded sell of `quantity` tokens of `outcome`; returns the collateral received.
    fn sell<C: CollateralToken>(
        &mut self,
        collateral: &mut C,
        account: Address,
        outcome: Outcome,
        min_price: U256,
        quantity: U256,
    ) -> Result<U256, ExchangeError> {
        match outcome {
            Outcome::White => self.sell_white(collateral, account, min_price, quantity),
            Outcome::Black => self.sell_black(collateral, account, min_price, quantity),
        }
    }
}
