//! `event_start` / `event_end`.
//!
//! Each phase trades one or two sides on the exchange. When the second side
//! fails after the first went through, the first trade is reversed before
//! the error is returned, so no position is left behind for a session that
//! never changed phase.

use std::collections::HashMap;

use alloy_primitives::{Address, U256};
use tracing::{error, info, warn};

use crate::error::{LedgerError, Result};
use crate::ledger::{OrderLedger, SessionPhase, SettlementSession};
use crate::port::{CollateralToken, Exchange};
use crate::types::fixed;
use crate::types::{EventId, LedgerEvent, OrderId, Outcome, SettlementReceipt, TradeDirection};

impl<C: CollateralToken, X: Exchange> OrderLedger<C, X> {
    /// Aggregate the pending orders of `event_id` and buy the implied
    /// outcome-token positions with custody collateral.
    ///
    /// Orders stay pending. The event is closed to new orders and
    /// cancellations from here on.
    pub fn event_start(&mut self, caller: Address, event_id: EventId) -> Result<SettlementReceipt> {
        self.ensure_coordinator(caller)?;
        if self.sessions.contains(event_id) {
            return Err(LedgerError::EventAlreadyStarted(event_id));
        }

        let mut order_ids: Vec<OrderId> = Vec::new();
        let mut white = U256::ZERO;
        let mut black = U256::ZERO;
        let mut deposits = U256::ZERO;
        for order in self.book.pending_for_event(event_id) {
            let tokens = order.token_amount()?;
            match order.outcome {
                Outcome::White => white = fixed::add(white, tokens)?,
                Outcome::Black => black = fixed::add(black, tokens)?,
            }
            deposits = fixed::add(deposits, order.amount)?;
            order_ids.push(order.id);
        }

        // The buys may spend the event's deposits plus any unreserved
        // surplus, never collateral reserved for others.
        let cost = fixed::add(
            self.trade_value(Outcome::White, white)?,
            self.trade_value(Outcome::Black, black)?,
        )?;
        let reserved = fixed::sub(self.reserved_collateral()?, deposits)?;
        let required = fixed::add(reserved, cost)?;
        let custody = self.custody_balance();
        if custody < required {
            warn!(event_id, custody = %custody, required = %required, "custody cannot fund aggregated buys");
            return Err(LedgerError::InsufficientLedgerBalance {
                available: custody,
                required,
            });
        }
        // Aggregation executes nothing, so the root is already final.
        let state_root = self.state_root()?;

        // Zero-sized sides are not traded.
        let mut collateral = U256::ZERO;
        if !white.is_zero() {
            collateral = self
                .exchange
                .buy_white(&mut self.collateral, self.address, self.max_price, white)?;
        }
        if !black.is_zero() {
            match self
                .exchange
                .buy_black(&mut self.collateral, self.address, self.max_price, black)
            {
                Ok(paid) => collateral = collateral.saturating_add(paid),
                Err(err) => {
                    if !white.is_zero() {
                        self.unwind(event_id, Outcome::White, TradeDirection::Buy, white);
                    }
                    return Err(err.into());
                }
            }
        }

        let orders = order_ids.len() as u64;
        self.sessions.open(SettlementSession::aggregated(
            event_id, order_ids, white, black, deposits, collateral,
        ));

        info!(
            event_id,
            orders,
            white = %fixed::from_fixed_trimmed(white),
            black = %fixed::from_fixed_trimmed(black),
            paid = %fixed::from_fixed_trimmed(collateral),
            "event started"
        );
        self.emit(LedgerEvent::EventStarted {
            event_id,
            orders,
            white_token_amount: white,
            black_token_amount: black,
        });
        Ok(SettlementReceipt {
            event_id,
            phase: SessionPhase::Aggregated,
            orders,
            white_token_amount: white,
            black_token_amount: black,
            collateral,
            white_price: None,
            black_price: None,
            state_root,
        })
    }

    /// Price out the aggregated orders of `event_id`, sell the positions back
    /// into custody and drain the session totals.
    ///
    /// Every aggregated order gets the side's current price as its executing
    /// price and is marked executed. Its settled value becomes an outstanding
    /// claim until withdrawn.
    pub fn event_end(&mut self, caller: Address, event_id: EventId) -> Result<SettlementReceipt> {
        self.ensure_coordinator(caller)?;
        let session = self
            .sessions
            .aggregated(event_id)
            .ok_or(LedgerError::EventNotStarted(event_id))?;
        let white = session.white_token_amount();
        let black = session.black_token_amount();

        let mut white_price = None;
        let mut black_price = None;
        let mut staged: Vec<(OrderId, U256)> = Vec::with_capacity(session.order_ids().len());
        let mut released = U256::ZERO;
        let mut claims = U256::ZERO;
        for &order_id in session.order_ids() {
            let order = self
                .book
                .get(order_id)
                .ok_or(LedgerError::OrderNotFound(order_id))?;
            if !order.is_pending {
                continue;
            }
            // One price read per side.
            let slot = match order.outcome {
                Outcome::White => &mut white_price,
                Outcome::Black => &mut black_price,
            };
            let price = match *slot {
                Some(price) => price,
                None => {
                    let price = self.exchange.current_price(order.outcome)?;
                    *slot = Some(price);
                    price
                }
            };
            released = fixed::add(released, order.amount)?;
            claims = fixed::add(claims, fixed::mul(order.token_amount()?, price)?)?;
            staged.push((order_id, price));
        }
        let pending = fixed::sub(self.pending_collateral, released)?;
        let outstanding = fixed::add(self.outstanding_claims, claims)?;
        let executions: HashMap<OrderId, U256> = staged.iter().copied().collect();
        let state_root = self.book.projected_state_root(&executions)?;

        let mut collateral = U256::ZERO;
        if !white.is_zero() {
            collateral = self
                .exchange
                .sell_white(&mut self.collateral, self.address, self.min_price, white)?;
        }
        if !black.is_zero() {
            match self
                .exchange
                .sell_black(&mut self.collateral, self.address, self.min_price, black)
            {
                Ok(received) => collateral = collateral.saturating_add(received),
                Err(err) => {
                    if !white.is_zero() {
                        self.unwind(event_id, Outcome::White, TradeDirection::Sell, white);
                    }
                    return Err(err.into());
                }
            }
        }
        if collateral < claims {
            warn!(
                event_id,
                received = %collateral,
                claims = %claims,
                "sale proceeds below settled value"
            );
        }

        for &(order_id, price) in &staged {
            if let Some(order) = self.book.get_mut(order_id) {
                order.execute(price);
            }
        }
        self.pending_collateral = pending;
        self.outstanding_claims = outstanding;
        if let Some(session) = self.sessions.get_mut(event_id) {
            session.settle();
        }

        let orders = staged.len() as u64;
        info!(
            event_id,
            orders,
            white = %fixed::from_fixed_trimmed(white),
            black = %fixed::from_fixed_trimmed(black),
            received = %fixed::from_fixed_trimmed(collateral),
            "event settled"
        );
        self.emit(LedgerEvent::EventSettled { event_id, orders });
        Ok(SettlementReceipt {
            event_id,
            phase: SessionPhase::Settled,
            orders,
            white_token_amount: white,
            black_token_amount: black,
            collateral,
            white_price,
            black_price,
            state_root,
        })
    }

    fn ensure_coordinator(&self, caller: Address) -> Result<()> {
        if caller != self.coordinator {
            return Err(LedgerError::Unauthorized(caller));
        }
        Ok(())
    }

    /// Collateral `quantity` tokens of `outcome` trade for right now.
    fn trade_value(&self, outcome: Outcome, quantity: U256) -> Result<U256> {
        if quantity.is_zero() {
            return Ok(U256::ZERO);
        }
        let price = self.exchange.current_price(outcome)?;
        Ok(fixed::mul(quantity, price)?)
    }

    /// Reverse a `direction` trade of `quantity` tokens that already went
    /// through, after a later trade of the same phase failed.
    fn unwind(&mut self, event_id: EventId, outcome: Outcome, direction: TradeDirection, quantity: U256) {
        let result = match direction {
            TradeDirection::Buy => self.exchange.sell(
                &mut self.collateral,
                self.address,
                outcome,
                self.min_price,
                quantity,
            ),
            TradeDirection::Sell => self.exchange.buy(
                &mut self.collateral,
                self.address,
                outcome,
                self.max_price,
                quantity,
            ),
        };
        match result {
            Ok(value) => warn!(
                event_id,
                side = ?outcome,
                reversed = ?direction,
                quantity = %quantity,
                value = %value,
                "trade unwound"
            ),
            Err(err) => error!(
                event_id,
                side = ?outcome,
                reversed = ?direction,
                quantity = %quantity,
                %err,
                "trade unwind failed; exchange position is stranded"
            ),
        }
    }
}
