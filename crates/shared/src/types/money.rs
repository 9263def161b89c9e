//! Money in integer minor currency units.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Balances and trade amounts are whole minor units (`i64`); fractional
//! intermediate values (accrued interest) are `rust_decimal::Decimal` and are
//! brought back to minor units through an explicit [`RoundingPolicy`].

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by money arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    /// Integer overflow in minor-unit arithmetic.
    #[error("Money arithmetic overflow")]
    Overflow,

    /// A decimal value cannot be represented in minor units.
    #[error("Amount {0} is out of range for minor units")]
    OutOfRange(Decimal),
}

/// A monetary amount in the smallest currency unit.
///
/// Single-currency by construction: the ledger never mixes currencies.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Zero minor units.
    pub const ZERO: Self = Self(0);

    /// Creates an amount from minor units.
    #[must_use]
    pub const fn new(minor_units: i64) -> Self {
        Self(minor_units)
    }

    /// Returns the raw minor-unit value.
    #[must_use]
    pub const fn minor_units(self) -> i64 {
        self.0
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns true if the amount is strictly positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Returns true if the amount is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Adds two amounts, failing on overflow.
    pub fn checked_add(self, other: Self) -> Result<Self, MoneyError> {
        self.0.checked_add(other.0).map(Self).ok_or(MoneyError::Overflow)
    }

    /// Subtracts `other`, failing on overflow. The result may be negative.
    pub fn checked_sub(self, other: Self) -> Result<Self, MoneyError> {
        self.0.checked_sub(other.0).map(Self).ok_or(MoneyError::Overflow)
    }

    /// Returns the amount as a decimal.
    #[must_use]
    pub fn to_decimal(self) -> Decimal {
        Decimal::from(self.0)
    }

    /// Reduces a decimal amount to whole minor units using `policy`.
    pub fn from_decimal(value: Decimal, policy: RoundingPolicy) -> Result<Self, MoneyError> {
        policy
            .round(value)
            .to_i64()
            .map(Self)
            .ok_or(MoneyError::OutOfRange(value))
    }
}

impl From<Money> for Decimal {
    fn from(value: Money) -> Self {
        value.to_decimal()
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a fractional amount is reduced to whole minor units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingPolicy {
    /// Round toward positive infinity (18924.35 -> 18925).
    #[default]
    Ceiling,
    /// Drop the fraction (18924.99 -> 18924).
    Truncate,
    /// Round half away from zero (18924.5 -> 18925).
    HalfUp,
    /// Banker's Rounding (18924.5 -> 18924, 18925.5 -> 18926).
    HalfEven,
}

impl RoundingPolicy {
    /// Rounds `value` to zero decimal places.
    #[must_use]
    pub fn round(self, value: Decimal) -> Decimal {
        let strategy = match self {
            Self::Ceiling => RoundingStrategy::ToPositiveInfinity,
            Self::Truncate => RoundingStrategy::ToZero,
            Self::HalfUp => RoundingStrategy::MidpointAwayFromZero,
            Self::HalfEven => RoundingStrategy::MidpointNearestEven,
        };
        value.round_dp_with_strategy(0, strategy)
    }
}

impl std::fmt::Display for RoundingPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ceiling => write!(f, "ceiling"),
            Self::Truncate => write!(f, "truncate"),
            Self::HalfUp => write!(f, "half_up"),
            Self::HalfEven => write!(f, "half_even"),
        }
    }
}

impl std::str::FromStr for RoundingPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ceiling" => Ok(Self::Ceiling),
            "truncate" => Ok(Self::Truncate),
            "half_up" => Ok(Self::HalfUp),
            "half_even" => Ok(Self::HalfEven),
            _ => Err(format!("Unknown rounding policy: {s}")),
        }
    }
}
