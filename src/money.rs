//! Exact monetary amounts.
//!
//! Amounts are kept as a whole number of cents so that sums never pass through
//! binary floating point. [rust_decimal::Decimal] is used at the edges for
//! parsing and formatting.

use std::{fmt::Display, ops::Add};

use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The number of fractional digits an amount is stored with.
pub const AMOUNT_SCALE: u32 = 2;

/// The largest magnitude, in cents, of a single transaction amount.
///
/// Matches a `decimal(10, 2)` column: 99,999,999.99.
pub const MAX_AMOUNT_CENTS: i64 = 9_999_999_999;

/// Reasons a decimal cannot be used as an [Amount].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AmountError {
    /// The value has more than two significant fractional digits.
    #[error("amount {0} has more than two decimal places")]
    TooPrecise(Decimal),

    /// The value does not fit in a `decimal(10, 2)` column.
    #[error("amount {0} is outside the range -99999999.99 to 99999999.99")]
    OutOfRange(Decimal),
}

/// A signed amount of money with exactly two fractional digits.
///
/// Positive values are income and negative values are expenses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount {
    cents: i64,
}

impl Amount {
    /// The zero amount.
    pub const ZERO: Amount = Amount { cents: 0 };

    /// Create an amount from a decimal value.
    ///
    /// Trailing zeros are ignored, so `4.500` is accepted as `4.50`.
    ///
    /// # Errors
    /// Returns an [AmountError] if `value` has more than two significant
    /// fractional digits or its magnitude exceeds [MAX_AMOUNT_CENTS].
    pub fn new(value: Decimal) -> Result<Self, AmountError> {
        let normalized = value.normalize();

        if normalized.scale() > AMOUNT_SCALE {
            return Err(AmountError::TooPrecise(value));
        }

        let mut scaled = normalized;
        scaled.rescale(AMOUNT_SCALE);

        let cents = i64::try_from(scaled.mantissa())
            .ok()
            .filter(|cents| cents.abs() <= MAX_AMOUNT_CENTS)
            .ok_or(AmountError::OutOfRange(value))?;

        Ok(Self { cents })
    }

    /// Create an amount from a whole number of cents.
    ///
    /// No range check is applied since sums of many amounts may legitimately
    /// exceed the limit for a single transaction.
    pub const fn from_cents(cents: i64) -> Self {
        Self { cents }
    }

    /// The amount as a whole number of cents.
    pub const fn cents(self) -> i64 {
        self.cents
    }

    /// The amount as a decimal with two fractional digits.
    pub fn as_decimal(self) -> Decimal {
        Decimal::new(self.cents, AMOUNT_SCALE)
    }

    /// Whether this amount counts as income, i.e., it is zero or positive.
    pub const fn is_income(self) -> bool {
        self.cents >= 0
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Self) -> Self::Output {
        Amount::from_cents(self.cents + rhs.cents)
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_decimal())
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = AmountError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Amount::new(value)
    }
}

// Amounts are sent as strings so clients never see a rounded float.
impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = <Decimal as Deserialize>::deserialize(deserializer)?;

        Amount::new(value).map_err(serde::de::Error::custom)
    }
}

impl ToSql for Amount {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.cents))
    }
}

impl FromSql for Amount {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        i64::column_result(value).map(Amount::from_cents)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::{Amount, AmountError};

    #[test]
    fn keeps_two_decimal_places_exactly() {
        let amount = Amount::new(dec!(-4.50)).unwrap();

        assert_eq!(amount.cents(), -450);
        assert_eq!(amount.as_decimal(), dec!(-4.50));
        assert_eq!(amount.to_string(), "-4.50");
    }

    #[test]
    fn ignores_trailing_zeros() {
        let amount = Amount::new(dec!(12.3000)).unwrap();

        assert_eq!(amount.cents(), 1230);
        assert_eq!(amount.to_string(), "12.30");
    }

    #[test]
    fn whole_numbers_are_formatted_with_cents() {
        assert_eq!(Amount::new(dec!(150)).unwrap().to_string(), "150.00");
        assert_eq!(Amount::ZERO.to_string(), "0.00");
    }

    #[test]
    fn rejects_more_than_two_decimal_places() {
        assert_eq!(
            Amount::new(dec!(0.001)),
            Err(AmountError::TooPrecise(dec!(0.001)))
        );
    }

    #[test]
    fn rejects_amounts_that_do_not_fit_the_column() {
        assert!(Amount::new(dec!(99999999.99)).is_ok());
        assert_eq!(
            Amount::new(dec!(-100000000.00)),
            Err(AmountError::OutOfRange(dec!(-100000000.00)))
        );
    }

    #[test]
    fn zero_is_income() {
        assert!(Amount::ZERO.is_income());
        assert!(!Amount::from_cents(-1).is_income());
    }

    #[test]
    fn deserializes_from_number_and_string() {
        let from_number: Amount = serde_json::from_str("-4.5").unwrap();
        let from_string: Amount = serde_json::from_str("\"-4.50\"").unwrap();

        assert_eq!(from_number, Amount::from_cents(-450));
        assert_eq!(from_string, Amount::from_cents(-450));
    }

    #[test]
    fn serializes_as_string() {
        let json = serde_json::to_string(&Amount::from_cents(1999)).unwrap();

        assert_eq!(json, "\"19.99\"");
    }
}
