//! Money and tax rates.
//!
//! Amounts are whole cents so that totals are exact. Arithmetic saturates at
//! `u64::MAX` cents rather than overflowing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;

/// Non-negative amount of money in cents
///
/// Serialized as a bare integer of cents.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    /// Zero
    pub const ZERO: Self = Self(0);

    /// Creates a `Money` value from cents
    #[must_use]
    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Creates a `Money` value from whole dollars (saturating)
    #[must_use]
    pub const fn from_dollars(dollars: u64) -> Self {
        Self(dollars.saturating_mul(100))
    }

    /// Returns the amount in cents
    #[must_use]
    pub const fn cents(&self) -> u64 {
        self.0
    }

    /// Checks if the amount is zero
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Adds two amounts, saturating at the maximum
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Multiplies by a quantity, saturating at the maximum
    #[must_use]
    pub const fn saturating_mul(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(quantity as u64))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Self::saturating_add)
    }
}

/// Sales tax rate in basis points (1/100 of a percent)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaxRate(u32);

impl TaxRate {
    /// 8%
    pub const DEFAULT: Self = Self(800);

    /// Creates a rate from basis points (`800` = 8%)
    #[must_use]
    pub const fn from_basis_points(bps: u32) -> Self {
        Self(bps)
    }

    /// The rate in basis points
    #[must_use]
    pub const fn basis_points(&self) -> u32 {
        self.0
    }

    /// Tax owed on `amount`, rounded half-up to the cent
    #[must_use]
    pub fn tax_on(&self, amount: Money) -> Money {
        let scaled = u128::from(amount.cents()) * u128::from(self.0) + 5_000;
        Money::from_cents(u64::try_from(scaled / 10_000).unwrap_or(u64::MAX))
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for TaxRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}%", self.0 / 100, self.0 % 100)
    }
}
