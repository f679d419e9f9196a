//! Single-administrator access control.

use alloy_primitives::Address;

use crate::error::{LedgerError, Result};

/// Tracks the one address allowed to reconfigure the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessControl {
    admin: Address,
}

impl AccessControl {
    pub fn new(admin: Address) -> Result<Self> {
        if admin.is_zero() {
            return Err(LedgerError::NullAddress);
        }
        Ok(Self { admin })
    }

    pub fn admin(&self) -> Address {
        self.admin
    }

    pub fn ensure_admin(&self, caller: Address) -> Result<()> {
        if caller != self.admin {
            return Err(LedgerError::Unauthorized(caller));
        }
        Ok(())
    }

    /// Hand the admin role to `new_admin`; returns the previous admin.
    pub fn transfer(&mut self, caller: Address, new_admin: Address) -> Result<Address> {
        self.ensure_admin(caller)?;
        if new_admin.is_zero() {
            return Err(LedgerError::NullAddress);
        }
        Ok(std::mem::replace(&mut self.admin, new_admin))
    }
}
