//! Collateral token kept in hash maps.

use std::collections::HashMap;

use alloy_primitives::{Address, U256};

use crate::port::{CollateralToken, TokenError};

/// Balances and allowances held in memory.
///
/// Every transfer checks all of its preconditions before touching a balance,
/// so a refused transfer changes nothing.
#[derive(Debug, Clone, Default)]
pub struct MemoryToken {
    balances: HashMap<Address, U256>,
    allowances: HashMap<(Address, Address), U256>,
    total_supply: U256,
    /// When set, every transfer is refused
    rejecting: bool,
}

impl MemoryToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `amount` new tokens to `to`.
    pub fn mint(&mut self, to: Address, amount: U256) {
        *self.balances.entry(to).or_default() += amount;
        self.total_supply += amount;
    }

    /// Let `spender` move up to `amount` of `owner`'s tokens.
    pub fn approve(&mut self, owner: Address, spender: Address, amount: U256) {
        self.allowances.insert((owner, spender), amount);
    }

    pub fn allowance(&self, owner: Address, spender: Address) -> U256 {
        self.allowances
            .get(&(owner, spender))
            .copied()
            .unwrap_or_default()
    }

    pub fn total_supply(&self) -> U256 {
        self.total_supply
    }

    /// Refuse (or accept again) all transfers.
    pub fn set_rejecting(&mut self, rejecting: bool) {
        self.rejecting = rejecting;
    }

    fn move_balance(&mut self, from: Address, to: Address, amount: U256) -> Result<(), TokenError> {
        if self.rejecting {
            return Err(TokenError::Rejected("token is rejecting transfers".into()));
        }
        let available = self.balance_of(from);
        if available < amount {
            return Err(TokenError::InsufficientBalance {
                owner: from,
                available,
                required: amount,
            });
        }
        self.balances.insert(from, available - amount);
        *self.balances.entry(to).or_default() += amount;
        Ok(())
    }
}

impl CollateralToken for MemoryToken {
    fn balance_of(&self, owner: Address) -> U256 {
        self.balances.get(&owner).copied().unwrap_or_default()
    }

    fn transfer(&mut self, caller: Address, to: Address, amount: U256) -> Result<(), TokenError> {
        self.move_balance(caller, to, amount)
    }

    fn transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), TokenError> {
        let allowed = self.allowance(from, spender);
        if allowed < amount {
            return Err(TokenError::InsufficientAllowance {
                owner: from,
                spender,
                available: allowed,
                required: amount,
            });
        }
        self.move_balance(from, to, amount)?;
        self.allowances.insert((from, spender), allowed - amount);
        Ok(())
    }
}
