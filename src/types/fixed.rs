//! Fixed-point arithmetic for prices and collateral values.
//!
//! ## Overview
//!
//! Every price and settled value in the ledger is a `U256` scaled by
//! [`SCALE`] (10^18). One whole unit is `SCALE`; a price of 2.5 is stored as
//! `2_500_000_000_000_000_000`.
//!
//! ## Why Fixed-Point?
//!
//! Every participant must compute identical payouts. Integer math gives the
//! same answer on every machine; floating point does not.
//!
//! ## Rounding
//!
//! [`mul`] and [`div`] round toward zero. Intermediate products are checked,
//! so nothing wraps silently.
//!
//! ## Examples
//!
//! ```
//! use binary_book::types::fixed::{self, to_fixed, from_fixed_trimmed};
//!
//! let price = to_fixed("2").unwrap();
//! let tokens = fixed::div(to_fixed("1000").unwrap(), price).unwrap();
//! assert_eq!(from_fixed_trimmed(tokens), "500");
//! ```

use alloy_primitives::U256;
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use thiserror::Error;

/// Number of decimal places carried by a fixed-point value.
pub const DECIMALS: u32 = 18;

/// Scaling factor for fixed-point arithmetic: 10^18
pub const SCALE: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

/// Arithmetic faults. Any of these aborts the enclosing operation.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticError {
    #[error("arithmetic overflow")]
    Overflow,

    #[error("arithmetic underflow")]
    Underflow,

    #[error("division by zero")]
    DivisionByZero,
}

// ============================================================================
// Arithmetic Functions
// ============================================================================

/// Multiply two fixed-point values: `a * b / SCALE`, rounded down.
///
/// # Example
///
/// ```
/// use binary_book::types::fixed::{mul, to_fixed};
///
/// // 500 * 2.5 = 1250
/// let a = to_fixed("500").unwrap();
/// let b = to_fixed("2.5").unwrap();
/// assert_eq!(mul(a, b), Ok(to_fixed("1250").unwrap()));
/// ```
pub fn mul(a: U256, b: U256) -> Result<U256, ArithmeticError> {
    let product = a.checked_mul(b).ok_or(ArithmeticError::Overflow)?;
    Ok(product / SCALE)
}

/// Divide two fixed-point values: `a * SCALE / b`, rounded down.
///
/// # Example
///
/// ```
/// use binary_book::types::fixed::{div, to_fixed, ArithmeticError};
/// use alloy_primitives::U256;
///
/// let a = to_fixed("100").unwrap();
/// let b = to_fixed("2").unwrap();
/// assert_eq!(div(a, b), Ok(to_fixed("50").unwrap()));
/// assert_eq!(div(a, U256::ZERO), Err(ArithmeticError::DivisionByZero));
/// ```
pub fn div(a: U256, b: U256) -> Result<U256, ArithmeticError> {
    if b.is_zero() {
        return Err(ArithmeticError::DivisionByZero);
    }
    let scaled = a.checked_mul(SCALE).ok_or(ArithmeticError::Overflow)?;
    Ok(scaled / b)
}

/// Checked addition.
pub fn add(a: U256, b: U256) -> Result<U256, ArithmeticError> {
    a.checked_add(b).ok_or(ArithmeticError::Overflow)
}

/// Checked subtraction. Fails instead of wrapping below zero.
pub fn sub(a: U256, b: U256) -> Result<U256, ArithmeticError> {
    a.checked_sub(b).ok_or(ArithmeticError::Underflow)
}

/// A whole number of units as a fixed-point value.
pub fn whole(units: u64) -> U256 {
    U256::from(units) * SCALE
}

// ============================================================================
// Conversion Functions
// ============================================================================

/// Convert a decimal string to fixed-point
///
/// Digits past the 18th decimal place are truncated.
///
/// # Example
///
/// ```
/// use binary_book::types::fixed::{to_fixed, SCALE};
/// use alloy_primitives::U256;
///
/// assert_eq!(to_fixed("1"), Some(SCALE));
/// assert_eq!(to_fixed("0.0001"), Some(U256::from(100_000_000_000_000u64)));
/// assert_eq!(to_fixed("-1"), None);
/// ```
pub fn to_fixed(s: &str) -> Option<U256> {
    let decimal = Decimal::from_str(s).ok()?;
    decimal_to_fixed(decimal)
}

/// Convert a Decimal to fixed-point
///
/// Returns `None` for negative values.
pub fn decimal_to_fixed(d: Decimal) -> Option<U256> {
    if d.is_sign_negative() && !d.is_zero() {
        return None;
    }

    let mantissa = U256::from(d.mantissa().unsigned_abs());
    let scale = d.scale();
    if scale <= DECIMALS {
        mantissa.checked_mul(pow10(DECIMALS - scale))
    } else {
        Some(mantissa / pow10(scale - DECIMALS))
    }
}

/// Convert fixed-point to a string with all 18 decimal places
///
/// # Example
///
/// ```
/// use binary_book::types::fixed::{from_fixed, SCALE};
///
/// assert_eq!(from_fixed(SCALE), "1.000000000000000000");
/// ```
pub fn from_fixed(value: U256) -> String {
    let whole = value / SCALE;
    // The remainder is below 10^18 and fits in the low limb.
    let frac = (value % SCALE).as_limbs()[0];
    format!("{}.{:018}", whole, frac)
}

/// Convert fixed-point to a human-readable string (trailing zeros trimmed)
///
/// # Example
///
/// ```
/// use binary_book::types::fixed::{from_fixed_trimmed, to_fixed};
///
/// assert_eq!(from_fixed_trimmed(to_fixed("1249.875").unwrap()), "1249.875");
/// assert_eq!(from_fixed_trimmed(to_fixed("3").unwrap()), "3");
/// ```
pub fn from_fixed_trimmed(value: U256) -> String {
    let s = from_fixed(value);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn pow10(exp: u32) -> U256 {
    U256::from(10u64).pow(U256::from(exp))
}

// ============================================================================
// Unit Tests
// ============================================================================
