//! Collateral token port.

use alloy_primitives::{Address, U256};
use thiserror::Error;

/// Reasons a collateral transfer is refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("{owner} holds {available}, transfer needs {required}")]
    InsufficientBalance {
        owner: Address,
        available: U256,
        required: U256,
    },

    #[error("{spender} may move {available} for {owner}, transfer needs {required}")]
    InsufficientAllowance {
        owner: Address,
        spender: Address,
        available: U256,
        required: U256,
    },

    #[error("transfer rejected: {0}")]
    Rejected(String),
}

/// A fungible collateral token.
///
/// `caller` / `spender` name the identity issuing the call, the way a token
/// contract sees its message sender.
pub trait CollateralToken {
    /// Balance held by `owner`.
    fn balance_of(&self, owner: Address) -> U256;

    /// Move `amount` from `caller` to `to`.
    fn transfer(&mut self, caller: Address, to: Address, amount: U256) -> Result<(), TokenError>;

    /// Move `amount` from `from` to `to` on `from`'s allowance to `spender`.
    fn transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), TokenError>;
}
