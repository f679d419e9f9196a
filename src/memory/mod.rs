//! In-memory collaborators.
//!
//! Deterministic implementations of the [`crate::port`] traits, used by the
//! tests, the benchmarks and the demo binary.
//!
//! ## Example
//!
//! ```
//! use alloy_primitives::Address;
//! use binary_book::memory::{MemoryExchange, MemoryToken};
//! use binary_book::port::{CollateralToken, Exchange};
//! use binary_book::types::fixed;
//!
//! let alice = Address::repeat_byte(0x01);
//! let mut token = MemoryToken::new();
//! token.mint(alice, fixed::whole(100));
//! assert_eq!(token.balance_of(alice), fixed::whole(100));
//!
//! let exchange = MemoryExchange::new(Address::repeat_byte(0xEE), fixed::whole(2), fixed::whole(3));
//! assert_eq!(exchange.current_white_price().unwrap(), fixed::whole(2));
//! ```

mod exchange;
mod token;

pub use exchange::MemoryExchange;
pub use token::MemoryToken;
