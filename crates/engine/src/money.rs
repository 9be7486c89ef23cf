use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Signed money amount represented as **integer paisa** (1/100 of a rupee).
///
/// Use this type for **all** monetary values in the ledger (entry amounts,
/// totals, net balance) to avoid floating-point drift.
///
/// Entry amounts are always positive; only derived values such as the net
/// balance can go negative.
///
/// # Examples
///
/// ```rust
/// use khata_engine::Money;
///
/// let amount = Money::new(1_234_50);
/// assert_eq!(amount.paisa(), 123450);
/// assert_eq!(amount.to_string(), "Rs. 1,234.50");
/// ```
///
/// Parsing from user input (accepts `.` or `,` as decimal separator; rejects >
/// 2 decimals):
///
/// ```rust
/// use khata_engine::Money;
///
/// assert_eq!("500".parse::<Money>().unwrap().paisa(), 50000);
/// assert_eq!("10,5".parse::<Money>().unwrap().paisa(), 1050);
/// assert!("12.345".parse::<Money>().is_err());
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Largest amount a single entry may carry: one trillion rupees.
    ///
    /// Keeps every entry exactly representable as an `f64` rupee value in
    /// storage.
    pub const MAX_ENTRY: Money = Money(100_000_000_000_000);

    /// Creates a new amount from integer paisa.
    #[must_use]
    pub const fn new(paisa: i64) -> Self {
        Self(paisa)
    }

    /// Creates a new amount from whole rupees.
    ///
    /// Saturates at the `i64` bounds.
    #[must_use]
    pub const fn rupees(rupees: i64) -> Self {
        Self(rupees.saturating_mul(100))
    }

    /// Returns the raw value in paisa.
    #[must_use]
    pub const fn paisa(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    /// Saturating addition, used for totals over arbitrary many entries.
    #[must_use]
    pub const fn saturating_add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }

    /// Saturating subtraction.
    #[must_use]
    pub const fn saturating_sub(self, rhs: Money) -> Money {
        Money(self.0.saturating_sub(rhs.0))
    }

    /// Checked subtraction (returns `None` on overflow).
    #[must_use]
    pub fn checked_sub(self, rhs: Money) -> Option<Money> {
        self.0.checked_sub(rhs.0).map(Money)
    }
}

/// Formats like the ledger screens: `Rs. 1,234` or `Rs. 1,234.50`, with a
/// leading `-` for negative values.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let rupees = group_thousands(abs / 100);
        let paisa = abs % 100;
        if paisa == 0 {
            write!(f, "{sign}Rs. {rupees}")
        } else {
            write!(f, "{sign}Rs. {rupees}.{paisa:02}")
        }
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Money> for i64 {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Self::Output {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Self::Output {
        Money(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Self::Output {
        Money(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Money::saturating_add)
    }
}

/// Serde helpers storing a [`Money`] as a rupee number (`500`, `10.5`),
/// the shape of the `amount` field in stored ledgers.
pub(crate) mod rupees {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    use super::Money;

    pub(crate) fn serialize<S: Serializer>(value: &Money, serializer: S) -> Result<S::Ok, S::Error> {
        let paisa = value.paisa();
        if paisa % 100 == 0 {
            serializer.serialize_i64(paisa / 100)
        } else {
            serializer.serialize_f64(paisa as f64 / 100.0)
        }
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
        let rupees = f64::deserialize(deserializer)?;
        let paisa = (rupees * 100.0).round();
        let limit = Money::MAX_ENTRY.paisa() as f64;
        if !paisa.is_finite() || paisa.abs() > limit {
            return Err(D::Error::custom(format!("amount out of range: {rupees}")));
        }
        Ok(Money::new(paisa as i64))
    }
}

impl FromStr for Money {
    type Err = EngineError;

    /// Parses a decimal rupee string into paisa.
    ///
    /// Accepts `.` or `,` as decimal separator and an optional leading `+`/`-`.
    /// Thousands separators are not accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let empty = || EngineError::Validation("empty amount".to_string());
        let invalid = || EngineError::Validation(format!("invalid amount: {}", s.trim()));
        let overflow = || EngineError::Validation("amount too large".to_string());

        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(empty());
        }

        let (negative, rest) = match trimmed.strip_prefix('-') {
            Some(stripped) => (true, stripped),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };

        let rest = rest.trim();
        if rest.is_empty() {
            return Err(empty());
        }

        let rest = rest.replace(',', ".");
        let (rupees_str, paisa_str) = match rest.split_once('.') {
            Some((rupees, paisa)) => (rupees, Some(paisa)),
            None => (rest.as_str(), None),
        };

        if rupees_str.is_empty() || !rupees_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let rupees: i64 = rupees_str.parse().map_err(|_| overflow())?;

        let paisa: i64 = match paisa_str {
            None | Some("") => 0,
            Some(frac) => {
                if !frac.chars().all(|c| c.is_ascii_digit()) {
                    return Err(invalid());
                }
                match frac.len() {
                    1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
                    2 => frac.parse::<i64>().map_err(|_| invalid())?,
                    _ => return Err(EngineError::Validation("too many decimals".to_string())),
                }
            }
        };

        let total = rupees
            .checked_mul(100)
            .and_then(|v| v.checked_add(paisa))
            .filter(|v| *v <= Money::MAX_ENTRY.0)
            .ok_or_else(overflow)?;

        Ok(Money(if negative { -total } else { total }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_rupees() {
        assert_eq!(Money::new(0).to_string(), "Rs. 0");
        assert_eq!(Money::new(5).to_string(), "Rs. 0.05");
        assert_eq!(Money::rupees(500).to_string(), "Rs. 500");
        assert_eq!(Money::new(1_234_50).to_string(), "Rs. 1,234.50");
        assert_eq!(Money::rupees(1_000_000).to_string(), "Rs. 1,000,000");
        assert_eq!(Money::rupees(-300).to_string(), "-Rs. 300");
    }

    #[test]
    fn parse_accepts_dot_or_comma() {
        assert_eq!("10".parse::<Money>().unwrap().paisa(), 1000);
        assert_eq!("10.5".parse::<Money>().unwrap().paisa(), 1050);
        assert_eq!("10,50".parse::<Money>().unwrap().paisa(), 1050);
        assert_eq!("-0.01".parse::<Money>().unwrap().paisa(), -1);
        assert_eq!("+1.00".parse::<Money>().unwrap().paisa(), 100);
        assert_eq!("  2.30 ".parse::<Money>().unwrap().paisa(), 230);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("12.345".parse::<Money>().is_err());
        assert!("".parse::<Money>().is_err());
        assert!("-".parse::<Money>().is_err());
        assert!("1,000.00".parse::<Money>().is_err());
        assert!("abc".parse::<Money>().is_err());
    }

    #[test]
    fn parse_rejects_amounts_above_entry_cap() {
        assert_eq!("1000000000000".parse::<Money>().unwrap(), Money::MAX_ENTRY);
        assert!("1000000000000.01".parse::<Money>().is_err());
        assert!("50000000000000000".parse::<Money>().is_err());
    }

    #[test]
    fn sums_saturate_instead_of_overflowing() {
        let huge = Money::new(i64::MAX - 1);
        let total: Money = [huge, huge, Money::rupees(5)].into_iter().sum();
        assert_eq!(total, Money::new(i64::MAX));
        assert_eq!(Money::rupees(i64::MAX), Money::new(i64::MAX));
        assert_eq!(Money::new(i64::MIN).saturating_sub(huge), Money::new(i64::MIN));
    }

    #[test]
    fn sums_and_negates() {
        let total: Money = [Money::rupees(5), Money::rupees(7)].into_iter().sum();
        assert_eq!(total, Money::rupees(12));
        assert_eq!(-total, Money::rupees(-12));
        assert!((Money::rupees(1) - Money::rupees(2)).is_negative());
    }
}
