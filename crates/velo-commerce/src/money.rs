//! Money type for representing monetary values.
//!
//! Amounts are exact decimals (`rust_decimal`), so sums and tax products never
//! drift. Rounding to the currency's minor unit happens only for display.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul, Sub};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    EUR,
    USD,
    GBP,
}

impl Currency {
    /// Get the currency code (e.g., "EUR").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::EUR => "EUR",
            Currency::USD => "USD",
            Currency::GBP => "GBP",
        }
    }

    /// Get the currency symbol (e.g., "€").
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::EUR => "\u{20ac}",
            Currency::USD => "$",
            Currency::GBP => "\u{00a3}",
        }
    }

    /// Get the number of decimal places for this currency.
    pub fn decimal_places(&self) -> u32 {
        2
    }

    /// Parse a currency code string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_uppercase().as_str() {
            "EUR" => Some(Currency::EUR),
            "USD" => Some(Currency::USD),
            "GBP" => Some(Currency::GBP),
            _ => None,
        }
    }

    /// Format an amount in this currency (e.g., "€49.99").
    pub fn format(&self, money: Money) -> String {
        let places = self.decimal_places() as usize;
        format!(
            "{}{:.places$}",
            self.symbol(),
            money.rounded(self.decimal_places()).amount()
        )
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A monetary amount in the store currency.
///
/// The store trades in a single currency (see `PricingPolicy::currency`), so
/// the amount carries no currency tag of its own.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Create a Money value from a decimal amount in major units.
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a Money value from minor units.
    ///
    /// ```
    /// use velo_commerce::money::Money;
    /// let price = Money::from_cents(4999);
    /// assert_eq!(price.amount().to_string(), "49.99");
    /// ```
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// A zero amount.
    pub const fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// The decimal amount in major units.
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Check if this is positive.
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Check if this is negative.
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Multiply by a quantity. Saturates instead of overflowing.
    pub fn multiply(&self, factor: i64) -> Money {
        Money(
            self.0
                .checked_mul(Decimal::from(factor))
                .unwrap_or(Decimal::MAX),
        )
    }

    /// Multiply by a decimal rate (e.g., a tax rate of `0.21`).
    pub fn multiply_rate(&self, rate: Decimal) -> Money {
        Money(self.0.checked_mul(rate).unwrap_or(Decimal::MAX))
    }

    /// Calculate a percentage of this amount.
    pub fn percentage(&self, percent: Decimal) -> Money {
        self.multiply_rate(percent / Decimal::ONE_HUNDRED)
    }

    /// Round half away from zero to `places` decimals.
    pub fn rounded(&self, places: u32) -> Money {
        Money(
            self.0
                .round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Format as a display string without symbol (e.g., "49.99").
    pub fn display_amount(&self) -> String {
        format!("{:.2}", self.rounded(2).0)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money(self.0.checked_add(other.0).unwrap_or(Decimal::MAX))
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        Money(self.0.checked_sub(other.0).unwrap_or(Decimal::MIN))
    }
}

impl Mul<i64> for Money {
    type Output = Money;

    fn mul(self, factor: i64) -> Money {
        self.multiply(factor)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Money(amount)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_amount())
    }
}
