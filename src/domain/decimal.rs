//! Lossless decimal numeric type backed by rust_decimal.
//!
//! Amounts and balances are persisted as canonical strings and parsed back
//! without ever passing through a float.

use rust_decimal::Decimal as RustDecimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lossless decimal numeric type for ledger arithmetic.
///
/// Serializes to a JSON number (not a string).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Decimal(#[serde(with = "rust_decimal::serde::float")] RustDecimal);

impl Decimal {
    /// Create a Decimal from a RustDecimal.
    pub fn new(value: RustDecimal) -> Self {
        Decimal(value)
    }

    /// Parse a Decimal from a string losslessly.
    ///
    /// `NaN`, `inf` and anything else that is not a finite decimal is rejected.
    ///
    /// # Errors
    /// Returns an error if the string is not a valid decimal number.
    pub fn from_str_canonical(s: &str) -> Result<Self, rust_decimal::Error> {
        let trimmed = s.trim();
        RustDecimal::from_str(trimmed)
            .or_else(|_| RustDecimal::from_scientific(trimmed))
            .map(Decimal)
    }

    /// Format the Decimal as a canonical string (no exponent, no trailing zeros).
    pub fn to_canonical_string(&self) -> String {
        let normalized = self.0.normalize();
        format!("{}", normalized)
    }

    /// Get the underlying RustDecimal.
    pub fn inner(&self) -> RustDecimal {
        self.0
    }

    /// The additive identity (0).
    pub fn zero() -> Self {
        Decimal(RustDecimal::ZERO)
    }

    /// Returns true if the value is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the value is < 0.
    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.0.is_sign_negative()
    }

    /// Absolute value.
    pub fn abs(&self) -> Self {
        Decimal(self.0.abs())
    }

    /// Sum, or `None` when it falls outside the representable range.
    pub fn checked_add(&self, other: Decimal) -> Option<Self> {
        self.0.checked_add(other.0).map(Decimal)
    }

    /// Difference, or `None` when it falls outside the representable range.
    pub fn checked_sub(&self, other: Decimal) -> Option<Self> {
        self.0.checked_sub(other.0).map(Decimal)
    }

    /// Absolute difference between two values, `None` on overflow.
    pub fn abs_diff(&self, other: Decimal) -> Option<Self> {
        self.checked_sub(other).map(|diff| diff.abs())
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_canonical_string())
    }
}

impl FromStr for Decimal {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_canonical(s)
    }
}

impl From<RustDecimal> for Decimal {
    fn from(value: RustDecimal) -> Self {
        Decimal(value)
    }
}

impl From<Decimal> for RustDecimal {
    fn from(value: Decimal) -> Self {
        value.0
    }
}
