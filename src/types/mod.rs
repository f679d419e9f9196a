//! Core data types for the binary event ledger
//!
//! ## Types
//!
//! - [`Order`]: A collateral deposit backing one side of an event
//! - [`Outcome`]: White or Black
//! - [`OrderStatus`]: Pending, Canceled, Executed or Withdrawn
//! - [`OrderRecord`]: SSZ snapshot of an order for state roots
//! - [`Trade`]: A bounded buy or sell executed against the exchange
//! - [`SettlementReceipt`] / [`Withdrawal`]: Results of settlement calls
//! - [`LedgerEvent`]: Notifications for external observers
//!
//! ## Fixed-Point Arithmetic
//!
//! All prices and settled values are `U256` scaled by 10^18.
//! Example: 2.5 is stored as 2_500_000_000_000_000_000

mod event;
mod order;
mod receipt;
mod record;
mod trade;
pub mod fixed;

// Re-export all types at module level
pub use event::LedgerEvent;
pub use order::{EventId, Order, OrderId, OrderStatus, Outcome};
pub use receipt::{SettlementReceipt, Withdrawal};
pub use record::OrderRecord;
pub use trade::{Trade, TradeDirection};
