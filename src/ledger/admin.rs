//! Administrative operations.
//!
//! All of these are gated on the administrator. Authorization is checked
//! before any argument.

use alloy_primitives::{Address, U256};
use tracing::{info, warn};

use crate::error::{LedgerError, Result};
use crate::ledger::OrderLedger;
use crate::port::{CollateralToken, Exchange};
use crate::types::fixed::{self, SCALE};
use crate::types::LedgerEvent;

impl<C: CollateralToken, X: Exchange> OrderLedger<C, X> {
    /// Hand the administrator role to `new_admin`.
    pub fn transfer_admin(&mut self, caller: Address, new_admin: Address) -> Result<()> {
        let previous = self.access.transfer(caller, new_admin)?;
        info!(previous = %previous, current = %new_admin, "admin transferred");
        self.emit(LedgerEvent::AdminTransferred {
            previous,
            current: new_admin,
        });
        Ok(())
    }

    /// Replace the exchange collaborator; returns the previous one.
    ///
    /// Refused while any event sits between `event_start` and `event_end`:
    /// its positions live on the current exchange and must be sold there.
    pub fn set_exchange(&mut self, caller: Address, exchange: X) -> Result<X> {
        self.access.ensure_admin(caller)?;
        let current = exchange.address();
        if current.is_zero() {
            return Err(LedgerError::NullAddress);
        }
        let sessions = self.sessions.in_flight();
        if sessions > 0 {
            warn!(sessions, "exchange change refused while settlement is in flight");
            return Err(LedgerError::SettlementInFlight { sessions });
        }
        let old = std::mem::replace(&mut self.exchange, exchange);
        let previous = old.address();
        info!(previous = %previous, current = %current, "exchange changed");
        self.emit(LedgerEvent::ExchangeChanged { previous, current });
        Ok(old)
    }

    /// Change the identity allowed to drive event start/end.
    pub fn set_coordinator(&mut self, caller: Address, coordinator: Address) -> Result<()> {
        self.access.ensure_admin(caller)?;
        if coordinator.is_zero() {
            return Err(LedgerError::NullAddress);
        }
        let previous = std::mem::replace(&mut self.coordinator, coordinator);
        info!(previous = %previous, current = %coordinator, "coordinator changed");
        self.emit(LedgerEvent::CoordinatorChanged {
            previous,
            current: coordinator,
        });
        Ok(())
    }

    pub fn set_fee_recipient(&mut self, caller: Address, recipient: Address) -> Result<()> {
        self.access.ensure_admin(caller)?;
        if recipient.is_zero() {
            return Err(LedgerError::NullAddress);
        }
        let previous = std::mem::replace(&mut self.fee_recipient, recipient);
        info!(previous = %previous, current = %recipient, "fee recipient changed");
        self.emit(LedgerEvent::FeeRecipientChanged {
            previous,
            current: recipient,
        });
        Ok(())
    }

    /// Sweep the collected fee to the fee recipient; returns the amount.
    pub fn withdraw_fee(&mut self, caller: Address) -> Result<U256> {
        self.access.ensure_admin(caller)?;
        let amount = self.collected_fee;
        if amount.is_zero() {
            return Err(LedgerError::NothingToWithdraw);
        }

        // The fee is part of the reservation, so custody must cover all of it.
        let required = self.reserved_collateral()?;
        let custody = self.custody_balance();
        if custody < required {
            warn!(custody = %custody, required = %required, "custody cannot cover fee sweep");
            return Err(LedgerError::InsufficientLedgerBalance {
                available: custody,
                required,
            });
        }

        let recipient = self.fee_recipient;
        self.collateral.transfer(self.address, recipient, amount)?;
        self.collected_fee = U256::ZERO;

        info!(recipient = %recipient, amount = %amount, "fee withdrawn");
        self.emit(LedgerEvent::FeeWithdrawn { recipient, amount });
        Ok(amount)
    }

    /// Change the fee rate for withdrawals processed from now on.
    ///
    /// `fee_rate` is fixed-point; anything above 1.0 is rejected.
    pub fn set_fee_rate(&mut self, caller: Address, fee_rate: U256) -> Result<()> {
        self.access.ensure_admin(caller)?;
        if fee_rate > SCALE {
            return Err(LedgerError::InvalidFeeRate(fee_rate));
        }
        let previous = std::mem::replace(&mut self.fee_rate, fee_rate);
        info!(
            previous = %fixed::from_fixed_trimmed(previous),
            current = %fixed::from_fixed_trimmed(fee_rate),
            "fee rate changed"
        );
        self.emit(LedgerEvent::FeeRateChanged {
            previous,
            current: fee_rate,
        });
        Ok(())
    }
}
