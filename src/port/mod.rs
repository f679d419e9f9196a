//! Ports for the ledger's external collaborators.
//!
//! The ledger talks to the outside world through two traits:
//!
//! - [`CollateralToken`]: custody and movement of the collateral token
//! - [`Exchange`]: outcome-token prices and bounded buy/sell execution
//!
//! Both are expected to be all-or-nothing: a call either fully succeeds or
//! returns an error with no effect. The in-memory implementations in
//! [`crate::memory`] honor that contract.

pub mod collateral;
pub mod exchange;

pub use collateral::{CollateralToken, TokenError};
pub use exchange::{Exchange, ExchangeError};
