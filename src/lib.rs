//! # Binary Book
//!
//! Collateral-backed order book for binary-outcome ("white"/"black") event
//! betting, settled through an external exchange.
//!
//! ## Architecture
//!
//! - **Types**: Core data structures (Order, Trade, receipts, notifications)
//! - **Ledger**: Order arena, settlement sessions, custody and administration
//! - **Engine**: Two-phase event settlement (start → aggregate & buy,
//!   end → price & sell)
//! - **Port**: Traits for the collateral token and the exchange
//! - **Memory**: Deterministic in-memory collaborators
//!
//! ## Lifecycle
//!
//! 1. `create_order` locks collateral and records the side's price
//! 2. `cancel_order` refunds a pending order (before its event starts)
//! 3. `event_start` aggregates pending orders and buys positions with custody
//!    collateral
//! 4. `event_end` prices every aggregated order and sells positions back into
//!    custody
//! 5. `withdraw_collateral` pays out settled value minus the fee
//!
//! ## Design Principles
//!
//! 1. **Determinism**: All operations produce identical results for identical inputs
//! 2. **No Floating Point**: All math uses fixed-point arithmetic (10^18 scaling)
//! 3. **Atomic Calls**: A failed call leaves the ledger unchanged
//! 4. **Synchronous Execution**: Every call runs to completion before the next

// ============================================================================
// Module declarations
// ============================================================================

/// Core data types: Order, Trade, receipts, fixed-point math
pub mod types;

/// Order ledger: arena, sessions, access control, custody
pub mod ledger;

/// Settlement driver: event start/end
pub mod engine;

/// Collaborator traits: collateral token, exchange
pub mod port;

/// In-memory collaborators for tests and demos
pub mod memory;

/// TOML configuration and resolved settings
pub mod config;

/// Error taxonomy
pub mod error;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use config::{ConfigError, LedgerConfig, LedgerSettings};
pub use error::{LedgerError, Result};
pub use ledger::{OrderBook, OrderLedger, SessionPhase, SettlementSession};
pub use port::{CollateralToken, Exchange};
pub use types::{EventId, LedgerEvent, Order, OrderId, OrderStatus, Outcome, SettlementReceipt, Withdrawal};
