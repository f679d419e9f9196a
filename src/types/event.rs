//! Notifications emitted by the ledger for external observers.
//!
//! The ledger never reads these back. They are appended to an in-memory log
//! (see `OrderLedger::events`) and mirrored to `tracing` at debug level.

use alloy_primitives::{Address, U256};

use crate::types::{EventId, OrderId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerEvent {
    /// A new order was appended; `count` is the running order count.
    OrderCreated { order_id: OrderId, count: u64 },

    OrderCanceled { order_id: OrderId },

    /// Pending orders of an event were aggregated and positions bought.
    EventStarted {
        event_id: EventId,
        orders: u64,
        white_token_amount: U256,
        black_token_amount: U256,
    },

    /// Aggregated orders were priced out and positions sold.
    EventSettled { event_id: EventId, orders: u64 },

    CollateralWithdrawn { orderer: Address, amount: U256 },

    FeeWithdrawn { recipient: Address, amount: U256 },

    FeeRateChanged { previous: U256, current: U256 },

    AdminTransferred { previous: Address, current: Address },

    ExchangeChanged { previous: Address, current: Address },

    CoordinatorChanged { previous: Address, current: Address },

    FeeRecipientChanged { previous: Address, current: Address },
}

impl LedgerEvent {
    /// Short name for log lines
    pub fn name(&self) -> &'static str {
        match self {
            LedgerEvent::OrderCreated { .. } => "order_created",
            LedgerEvent::OrderCanceled { .. } => "order_canceled",
            LedgerEvent::EventStarted { .. } => "event_started",
            LedgerEvent::EventSettled { .. } => "event_settled",
            LedgerEvent::CollateralWithdrawn { .. } => "collateral_withdrawn",
            LedgerEvent::FeeWithdrawn { .. } => "fee_withdrawn",
            LedgerEvent::FeeRateChanged { .. } => "fee_rate_changed",
            LedgerEvent::AdminTransferred { .. } => "admin_transferred",
            LedgerEvent::ExchangeChanged { .. } => "exchange_changed",
            LedgerEvent::CoordinatorChanged { .. } => "coordinator_changed",
            LedgerEvent::FeeRecipientChanged { .. } => "fee_recipient_changed",
        }
    }
}
