//! Per-event settlement sessions.
//!
//! Each event gets its own [`SettlementSession`], keyed by event id, holding
//! the aggregated token totals between `event_start` and `event_end`. Two
//! events can therefore be in flight at once without commingling totals.
//!
//! ```text
//! (none) ── event_start ──► Aggregated ── event_end ──► Settled
//! ```
//!
//! A settled session is kept forever so the event can never be started again.

use std::collections::HashMap;

use alloy_primitives::U256;

use crate::types::{EventId, OrderId, Outcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionPhase {
    /// Pending orders aggregated and positions bought.
    Aggregated,
    /// Orders executed, positions sold, totals drained to zero.
    Settled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementSession {
    event_id: EventId,
    phase: SessionPhase,
    /// Orders that took part in the aggregation, in creation order
    order_ids: Vec<OrderId>,
    white_token_amount: U256,
    black_token_amount: U256,
    /// Deposits of the aggregated orders
    deposits: U256,
    /// Collateral paid to the exchange for the positions
    collateral: U256,
}

impl SettlementSession {
    /// A session that has just aggregated `order_ids`.
    pub fn aggregated(
        event_id: EventId,
        order_ids: Vec<OrderId>,
        white_token_amount: U256,
        black_token_amount: U256,
        deposits: U256,
        collateral: U256,
    ) -> Self {
        Self {
            event_id,
            phase: SessionPhase::Aggregated,
            order_ids,
            white_token_amount,
            black_token_amount,
            deposits,
            collateral,
        }
    }

    pub fn event_id(&self) -> EventId {
        self.event_id
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn order_ids(&self) -> &[OrderId] {
        &self.order_ids
    }

    pub fn white_token_amount(&self) -> U256 {
        self.white_token_amount
    }

    pub fn black_token_amount(&self) -> U256 {
        self.black_token_amount
    }

    /// Sum of the aggregated orders' amounts
    pub fn deposits(&self) -> U256 {
        self.deposits
    }

    /// Collateral the exchange took for the positions
    pub fn collateral(&self) -> U256 {
        self.collateral
    }

    /// Aggregated total for one side
    pub fn token_amount(&self, outcome: Outcome) -> U256 {
        match outcome {
            Outcome::White => self.white_token_amount,
            Outcome::Black => self.black_token_amount,
        }
    }

    /// Drain the totals and close the session.
    pub(crate) fn settle(&mut self) {
        self.white_token_amount = U256::ZERO;
        self.black_token_amount = U256::ZERO;
        self.deposits = U256::ZERO;
        self.collateral = U256::ZERO;
        self.phase = SessionPhase::Settled;
    }
}

/// All sessions, keyed by event id.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: HashMap<EventId, SettlementSession>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `event_id` has been started (and possibly settled).
    pub fn contains(&self, event_id: EventId) -> bool {
        self.sessions.contains_key(&event_id)
    }

    pub fn get(&self, event_id: EventId) -> Option<&SettlementSession> {
        self.sessions.get(&event_id)
    }

    /// The session of `event_id` if it is waiting for `event_end`.
    pub fn aggregated(&self, event_id: EventId) -> Option<&SettlementSession> {
        self.get(event_id)
            .filter(|session| session.phase == SessionPhase::Aggregated)
    }

    pub(crate) fn get_mut(&mut self, event_id: EventId) -> Option<&mut SettlementSession> {
        self.sessions.get_mut(&event_id)
    }

    /// Register a newly aggregated session.
    ///
    /// Callers check [`contains`](Self::contains) first. An event that
    /// already has a session keeps it.
    pub(crate) fn open(&mut self, session: SettlementSession) {
        self.sessions.entry(session.event_id).or_insert(session);
    }

    /// Sum of deposits over sessions still waiting for `event_end`
    pub fn committed_deposits(&self) -> U256 {
        self.sessions
            .values()
            .filter(|session| session.phase == SessionPhase::Aggregated)
            .fold(U256::ZERO, |total, session| total.saturating_add(session.deposits))
    }

    /// Sessions still waiting for `event_end`
    pub fn in_flight(&self) -> usize {
        self.sessions
            .values()
            .filter(|session| session.phase == SessionPhase::Aggregated)
            .count()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
