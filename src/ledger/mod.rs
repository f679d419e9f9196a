//! Order ledger: the core state machine.
//!
//! ## Architecture
//!
//! - [`OrderBook`]: slab arena of orders with event and orderer indexes
//! - [`SessionRegistry`]: per-event settlement sessions
//! - [`AccessControl`]: the single administrator
//! - [`OrderLedger`]: custody, order lifecycle, withdrawals, administration
//!
//! Settlement (`event_start` / `event_end`) lives in [`crate::engine`].
//!
//! ## Complexity
//!
//! | Operation | Complexity |
//! |-----------|------------|
//! | Create order | O(1) |
//! | Cancel order | O(1) |
//! | Event start / end | O(orders of the event) |
//! | Withdraw | O(orders of the caller) |

pub mod access;
pub mod book;
pub mod session;
mod admin;
mod state;

pub use access::AccessControl;
pub use book::OrderBook;
pub use session::{SessionPhase, SessionRegistry, SettlementSession};
pub use state::OrderLedger;
