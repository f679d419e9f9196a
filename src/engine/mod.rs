//! Settlement driver for the binary event ledger.
//!
//! ## Design Principles
//!
//! 1. **Batching**: all pending orders of an event share one buy per side at
//!    start and one sell per side at end
//! 2. **Fixed-Point Math**: token amounts are `amount / placing_price`, no
//!    floating point anywhere
//! 3. **Per-Event Sessions**: totals live in the event's own session, so
//!    events never commingle
//! 4. **Atomic Phases**: ledger state is written only after every exchange
//!    call of the phase succeeded
//!
//! ## Settlement Rules
//!
//! - Only the coordinator may call `event_start` / `event_end`
//! - `event_start` aggregates pending orders and buys, bounded by `max_price`,
//!   paying from custody; the buys may not dip into reserved collateral
//! - `event_end` prices each aggregated order at the side's current price,
//!   sells, bounded by `min_price`, and drains the session totals; the
//!   proceeds return to custody and back the new outstanding claims
//!
//! ## Example
//!
//! ```
//! use alloy_primitives::Address;
//! use binary_book::config::LedgerSettings;
//! use binary_book::memory::{MemoryExchange, MemoryToken};
//! use binary_book::types::{fixed, OrderStatus, Outcome};
//! use binary_book::OrderLedger;
//!
//! let custody = Address::repeat_byte(0x0F);
//! let coordinator = Address::repeat_byte(0xCC);
//! let alice = Address::repeat_byte(0x01);
//! let settings = LedgerSettings::new(custody, Address::repeat_byte(0xAD), coordinator, Address::repeat_byte(0xFE));
//!
//! let mut token = MemoryToken::new();
//! token.mint(alice, fixed::whole(1000));
//! token.approve(alice, custody, fixed::whole(1000));
//! let exchange = MemoryExchange::new(Address::repeat_byte(0xEE), fixed::whole(2), fixed::whole(2));
//! let mut ledger = OrderLedger::new(settings, token, exchange).unwrap();
//!
//! let id = ledger.create_order(alice, fixed::whole(1000), Outcome::White, 1).unwrap();
//! let start = ledger.event_start(coordinator, 1).unwrap();
//! assert_eq!(start.white_token_amount, fixed::whole(500));
//!
//! assert_eq!(ledger.custody_balance(), alloy_primitives::U256::ZERO);
//!
//! let end = ledger.event_end(coordinator, 1).unwrap();
//! assert_eq!(end.orders, 1);
//! assert_eq!(end.collateral, fixed::whole(1000));
//! assert_eq!(ledger.outstanding_claims(), fixed::whole(1000));
//! assert_eq!(ledger.order(id).unwrap().status(), OrderStatus::Executed);
//! ```

pub mod settlement;
