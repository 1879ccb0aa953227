use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;

/// An unsigned money magnitude, rounded to cents.
///
/// Direction (money in vs. money out) is never encoded here; it travels
/// separately as a [`crate::TransactionKind`] or [`crate::Sign`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(Decimal);

impl Money {
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::from(cents.unsigned_abs()) / Decimal::from(100))
    }

    /// `None` when the magnitude does not fit in whole cents as an `i64`.
    pub fn to_cents(self) -> Option<i64> {
        self.0.checked_mul(Decimal::ONE_HUNDRED)?.to_i64()
    }

    /// Takes the absolute value of `decimal` and rounds it to two places.
    pub fn from_decimal(decimal: Decimal) -> Self {
        Money(decimal.abs().round_dp(2))
    }

    pub fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    pub fn as_decimal(self) -> Decimal {
        self.0
    }

    /// Plain two-place rendering without a currency symbol, e.g. `1030.27`.
    /// This is the form synthesizers write into a Parsed Document's amount field.
    pub fn to_plain_string(self) -> String {
        format!("{:.2}", self.0)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

/// Saturates at the largest representable magnitude.
impl Add for Money {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Money(self.0.saturating_add(rhs.0))
    }
}
