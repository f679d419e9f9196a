//! The order ledger: custody, order lifecycle and withdrawals.
//!
//! ## Atomicity
//!
//! Every operation checks and stages everything it can before its first
//! external call, and writes ledger state only after the last external call
//! has succeeded. An error therefore leaves the ledger exactly as it was.
//!
//! ## Conservation
//!
//! Custody must always cover the reserved collateral:
//!
//! - deposits of pending orders whose event has not started
//! - settled value of executed orders not yet withdrawn
//! - the collected, unswept fee
//!
//! Deposits of a started event sit with the exchange as positions until
//! `event_end` sells them back into custody. Refunds, payouts, fee sweeps and
//! aggregated buys are refused with [`LedgerError::InsufficientLedgerBalance`]
//! when they would break that.
//!
//! ## Notifications
//!
//! Notifications are kept in a log bounded by
//! [`LedgerSettings::event_log_capacity`]; once it is full the oldest entry
//! is dropped for each new one. Callers that need every notification drain
//! the log with [`OrderLedger::take_events`].
//!
//! ## Example
//!
//! ```
//! use alloy_primitives::Address;
//! use binary_book::config::LedgerSettings;
//! use binary_book::memory::{MemoryExchange, MemoryToken};
//! use binary_book::types::{fixed, Outcome};
//! use binary_book::OrderLedger;
//!
//! let custody = Address::repeat_byte(0x0F);
//! let alice = Address::repeat_byte(0x01);
//! let settings = LedgerSettings::new(
//!     custody,
//!     Address::repeat_byte(0xAD),
//!     Address::repeat_byte(0xCC),
//!     Address::repeat_byte(0xFE),
//! );
//!
//! let mut token = MemoryToken::new();
//! token.mint(alice, fixed::whole(100));
//! token.approve(alice, custody, fixed::whole(100));
//! let exchange = MemoryExchange::new(Address::repeat_byte(0xEE), fixed::whole(2), fixed::whole(2));
//!
//! let mut ledger = OrderLedger::new(settings, token, exchange).unwrap();
//! let id = ledger.create_order(alice, fixed::whole(100), Outcome::White, 1).unwrap();
//! assert_eq!(ledger.order(id).unwrap().placing_price, fixed::whole(2));
//!
//! ledger.cancel_order(alice, id).unwrap();
//! assert_eq!(ledger.pending_collateral(), alloy_primitives::U256::ZERO);
//! ```

use std::collections::VecDeque;

use alloy_primitives::{Address, U256};
use tracing::{debug, info, trace, warn};

use crate::config::LedgerSettings;
use crate::error::{LedgerError, Result};
use crate::ledger::{AccessControl, OrderBook, SessionRegistry, SettlementSession};
use crate::port::{CollateralToken, Exchange};
use crate::types::fixed::{self, SCALE};
use crate::types::{EventId, LedgerEvent, Order, OrderId, Outcome, Withdrawal};

/// Collateral-backed order ledger over a token `C` and an exchange `X`.
#[derive(Debug)]
pub struct OrderLedger<C, X> {
    /// The ledger's own custody address
    pub(crate) address: Address,
    pub(crate) access: AccessControl,
    pub(crate) coordinator: Address,
    pub(crate) fee_recipient: Address,

    pub(crate) max_price: U256,
    pub(crate) min_price: U256,
    pub(crate) fee_rate: U256,

    /// Fees withheld from withdrawals and not yet swept
    pub(crate) collected_fee: U256,
    /// Sum of `amount` over pending orders
    pub(crate) pending_collateral: U256,
    /// Settled value of executed orders not yet withdrawn
    pub(crate) outstanding_claims: U256,

    pub(crate) book: OrderBook,
    pub(crate) sessions: SessionRegistry,

    pub(crate) collateral: C,
    pub(crate) exchange: X,

    events: VecDeque<LedgerEvent>,
    event_log_capacity: usize,
    dropped_events: u64,
}

impl<C: CollateralToken, X: Exchange> OrderLedger<C, X> {
    pub fn new(settings: LedgerSettings, collateral: C, exchange: X) -> Result<Self> {
        for address in [settings.custody, settings.coordinator, settings.fee_recipient, exchange.address()] {
            if address.is_zero() {
                return Err(LedgerError::NullAddress);
            }
        }
        if settings.min_price >= settings.max_price {
            return Err(LedgerError::InvalidPriceBounds {
                min_price: settings.min_price,
                max_price: settings.max_price,
            });
        }
        if settings.fee_rate > SCALE {
            return Err(LedgerError::InvalidFeeRate(settings.fee_rate));
        }

        Ok(Self {
            address: settings.custody,
            access: AccessControl::new(settings.admin)?,
            coordinator: settings.coordinator,
            fee_recipient: settings.fee_recipient,
            max_price: settings.max_price,
            min_price: settings.min_price,
            fee_rate: settings.fee_rate,
            collected_fee: U256::ZERO,
            pending_collateral: U256::ZERO,
            outstanding_claims: U256::ZERO,
            book: OrderBook::new(),
            sessions: SessionRegistry::new(),
            collateral,
            exchange,
            events: VecDeque::new(),
            event_log_capacity: settings.event_log_capacity,
            dropped_events: 0,
        })
    }

    // ========================================================================
    // Orders
    // ========================================================================

    /// Lock `amount` collateral from `caller` behind `outcome` of `event_id`.
    ///
    /// The side's current exchange price becomes the order's placing price.
    pub fn create_order(
        &mut self,
        caller: Address,
        amount: U256,
        outcome: Outcome,
        event_id: EventId,
    ) -> Result<OrderId> {
        if amount.is_zero() {
            return Err(LedgerError::InvalidAmount);
        }
        if self.sessions.contains(event_id) {
            return Err(LedgerError::EventAlreadyStarted(event_id));
        }

        let available = self.collateral.balance_of(caller);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                owner: caller,
                available,
                required: amount,
            });
        }

        let price = self.exchange.current_price(outcome)?;
        if price <= self.min_price {
            return Err(LedgerError::PriceBelowMinimum {
                price,
                min_price: self.min_price,
            });
        }
        let pending = fixed::add(self.pending_collateral, amount)?;

        self.collateral
            .transfer_from(self.address, caller, self.address, amount)?;

        let order_id = self.book.insert(caller, amount, outcome, event_id, price);
        self.pending_collateral = pending;

        info!(
            order_id,
            event_id,
            orderer = %caller,
            amount = %amount,
            side = ?outcome,
            price = %fixed::from_fixed_trimmed(price),
            "order created"
        );
        self.emit(LedgerEvent::OrderCreated {
            order_id,
            count: self.book.order_count(),
        });
        Ok(order_id)
    }

    /// Return a pending order's collateral to its orderer.
    ///
    /// Orders whose event has already been aggregated can no longer be
    /// canceled.
    pub fn cancel_order(&mut self, caller: Address, order_id: OrderId) -> Result<()> {
        let order = self.order(order_id)?;
        if !order.is_pending {
            return Err(LedgerError::OrderNotPending(order_id));
        }
        if order.orderer != caller {
            return Err(LedgerError::NotOrderOwner { order_id, caller });
        }
        if self.sessions.contains(order.event_id) {
            return Err(LedgerError::EventAlreadyStarted(order.event_id));
        }

        let amount = order.amount;
        // The refund leaves: the rest of the reservation must still be backed.
        let required = self.reserved_collateral()?;
        let custody = self.custody_balance();
        if custody < required {
            warn!(order_id, custody = %custody, required = %required, "custody cannot cover refund");
            return Err(LedgerError::InsufficientLedgerBalance {
                available: custody,
                required,
            });
        }
        let pending = fixed::sub(self.pending_collateral, amount)?;

        self.collateral.transfer(self.address, caller, amount)?;

        if let Some(order) = self.book.get_mut(order_id) {
            order.cancel();
        }
        self.pending_collateral = pending;

        info!(order_id, orderer = %caller, amount = %amount, "order canceled");
        self.emit(LedgerEvent::OrderCanceled { order_id });
        Ok(())
    }

    /// Pay out every executed, unpaid order of `caller`, minus the fee.
    ///
    /// Each order is paid once. A call with nothing to pay fails with
    /// [`LedgerError::NothingToWithdraw`].
    pub fn withdraw_collateral(&mut self, caller: Address) -> Result<Withdrawal> {
        let mut order_ids = Vec::new();
        let mut gross = U256::ZERO;
        for order in self.book.claimable_for(caller) {
            gross = fixed::add(gross, order.settled_value()?)?;
            order_ids.push(order.id);
        }
        if order_ids.is_empty() {
            return Err(LedgerError::NothingToWithdraw);
        }

        let fee = fixed::mul(gross, self.fee_rate)?;
        let net = fixed::sub(gross, fee)?;
        let collected_fee = fixed::add(self.collected_fee, fee)?;
        let outstanding = fixed::sub(self.outstanding_claims, gross)?;

        // `net` leaves and `fee` stays reserved, so custody must cover the
        // reservation as it stands now.
        let required = self.reserved_collateral()?;
        let custody = self.custody_balance();
        if custody < required {
            warn!(orderer = %caller, custody = %custody, required = %required, "custody cannot cover withdrawal");
            return Err(LedgerError::InsufficientLedgerBalance {
                available: custody,
                required,
            });
        }

        if !net.is_zero() {
            self.collateral.transfer(self.address, caller, net)?;
        }

        for &order_id in &order_ids {
            if let Some(order) = self.book.get_mut(order_id) {
                order.mark_withdrawn();
            }
        }
        self.collected_fee = collected_fee;
        self.outstanding_claims = outstanding;

        info!(
            orderer = %caller,
            orders = order_ids.len(),
            gross = %fixed::from_fixed_trimmed(gross),
            fee = %fixed::from_fixed_trimmed(fee),
            "collateral withdrawn"
        );
        self.emit(LedgerEvent::CollateralWithdrawn {
            orderer: caller,
            amount: net,
        });
        Ok(Withdrawal {
            orderer: caller,
            order_ids,
            gross,
            fee,
            net,
        })
    }

    // ========================================================================
    // Read surface
    // ========================================================================

    pub fn order(&self, order_id: OrderId) -> Result<&Order> {
        self.book
            .get(order_id)
            .ok_or(LedgerError::OrderNotFound(order_id))
    }

    /// Number of orders ever created
    pub fn order_count(&self) -> u64 {
        self.book.order_count()
    }

    pub fn book(&self) -> &OrderBook {
        &self.book
    }

    pub fn session(&self, event_id: EventId) -> Option<&SettlementSession> {
        self.sessions.get(event_id)
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    /// Gross settled value `orderer` could withdraw right now (before fee)
    pub fn withdrawable(&self, orderer: Address) -> Result<U256> {
        let mut total = U256::ZERO;
        for order in self.book.claimable_for(orderer) {
            total = fixed::add(total, order.settled_value()?)?;
        }
        Ok(total)
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn admin(&self) -> Address {
        self.access.admin()
    }

    pub fn coordinator(&self) -> Address {
        self.coordinator
    }

    pub fn fee_recipient(&self) -> Address {
        self.fee_recipient
    }

    pub fn exchange_address(&self) -> Address {
        self.exchange.address()
    }

    pub fn max_price(&self) -> U256 {
        self.max_price
    }

    pub fn min_price(&self) -> U256 {
        self.min_price
    }

    pub fn fee_rate(&self) -> U256 {
        self.fee_rate
    }

    pub fn collected_fee(&self) -> U256 {
        self.collected_fee
    }

    /// Collateral locked in pending orders
    pub fn pending_collateral(&self) -> U256 {
        self.pending_collateral
    }

    /// Settled value owed to orderers and not yet withdrawn
    pub fn outstanding_claims(&self) -> U256 {
        self.outstanding_claims
    }

    /// Collateral custody must hold: pending deposits of unstarted events,
    /// outstanding claims and the collected fee.
    pub fn reserved_collateral(&self) -> Result<U256> {
        let unstarted = fixed::sub(self.pending_collateral, self.sessions.committed_deposits())?;
        Ok(fixed::add(fixed::add(unstarted, self.outstanding_claims)?, self.collected_fee)?)
    }

    /// Collateral currently held at the custody address
    pub fn custody_balance(&self) -> U256 {
        self.collateral.balance_of(self.address)
    }

    /// SHA-256 state root over every order
    pub fn state_root(&self) -> Result<[u8; 32]> {
        self.book.state_root()
    }

    pub fn collateral(&self) -> &C {
        &self.collateral
    }

    pub fn collateral_mut(&mut self) -> &mut C {
        &mut self.collateral
    }

    pub fn exchange(&self) -> &X {
        &self.exchange
    }

    pub fn exchange_mut(&mut self) -> &mut X {
        &mut self.exchange
    }

    // ========================================================================
    // Notifications
    // ========================================================================

    /// Retained notifications, oldest first
    pub fn events(&self) -> &VecDeque<LedgerEvent> {
        &self.events
    }

    /// Drain the notification log
    pub fn take_events(&mut self) -> Vec<LedgerEvent> {
        self.events.drain(..).collect()
    }

    /// Notifications dropped because the log was full
    pub fn dropped_events(&self) -> u64 {
        self.dropped_events
    }

    pub(crate) fn emit(&mut self, event: LedgerEvent) {
        debug!(event = event.name(), ?event, "notification");
        if self.events.len() >= self.event_log_capacity.max(1) {
            if let Some(oldest) = self.events.pop_front() {
                self.dropped_events += 1;
                trace!(event = oldest.name(), dropped = self.dropped_events, "notification log full");
            }
        }
        self.events.push_back(event);
    }
}
