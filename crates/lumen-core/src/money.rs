//! Currency amounts in integer minor units.
//!
//! [`Money`] wraps a count of US cents. Arithmetic is checked or saturating;
//! nothing in the engine ever touches floating point for currency.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::CENTS_PER_DOLLAR;
use crate::error::MoneyError;

/// An amount of US currency, stored as whole cents.
///
/// Serializes as a bare integer cent count.
///
/// # Examples
///
/// ```
/// use lumen_core::Money;
///
/// let price: Money = "$10.05".parse().unwrap();
/// assert_eq!(price.cents(), 1005);
/// assert_eq!(price.to_string(), "$10.05");
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Whole dollars. Saturates at `u64::MAX` cents.
    pub const fn from_dollars(dollars: u64) -> Self {
        Self(dollars.saturating_mul(CENTS_PER_DOLLAR))
    }

    pub const fn cents(self) -> u64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    pub fn checked_mul(self, factor: u64) -> Option<Money> {
        self.0.checked_mul(factor).map(Money)
    }

    pub fn saturating_sub(self, other: Money) -> Money {
        Money(self.0.saturating_sub(other.0))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "${}.{:02}",
            self.0 / CENTS_PER_DOLLAR,
            self.0 % CENTS_PER_DOLLAR
        )
    }
}

impl FromStr for Money {
    type Err = MoneyError;

    /// Parse `"10"`, `"10.5"`, `"10.05"` or `"$10.05"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let body = trimmed.strip_prefix('$').unwrap_or(trimmed);
        if body.is_empty() {
            return Err(MoneyError::Empty);
        }

        let (whole, frac) = match body.split_once('.') {
            Some((w, f)) => (w, f),
            None => (body, ""),
        };

        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if whole.is_empty() || !all_digits(whole) || !all_digits(frac) {
            return Err(MoneyError::InvalidAmount(s.to_string()));
        }
        if body.contains('.') && frac.is_empty() {
            return Err(MoneyError::InvalidAmount(s.to_string()));
        }
        if frac.len() > 2 {
            return Err(MoneyError::TooPrecise(s.to_string()));
        }

        let dollars: u64 = whole
            .parse()
            .map_err(|_| MoneyError::Overflow(s.to_string()))?;
        let cents: u64 = match frac.len() {
            0 => 0,
            // "10.5" means fifty cents.
            1 => frac.parse::<u64>().unwrap_or(0) * 10,
            _ => frac.parse::<u64>().unwrap_or(0),
        };

        dollars
            .checked_mul(CENTS_PER_DOLLAR)
            .and_then(|c| c.checked_add(cents))
            .map(Money)
            .ok_or_else(|| MoneyError::Overflow(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn display_pads_cents() {
        assert_eq!(Money::from_cents(5).to_string(), "$0.05");
        assert_eq!(Money::from_cents(450).to_string(), "$4.50");
        assert_eq!(Money::from_dollars(15).to_string(), "$15.00");
    }

    #[test]
    fn parse_forms() {
        assert_eq!("10".parse::<Money>().unwrap(), Money::from_cents(1000));
        assert_eq!("10.5".parse::<Money>().unwrap(), Money::from_cents(1050));
        assert_eq!("10.05".parse::<Money>().unwrap(), Money::from_cents(1005));
        assert_eq!("$0.99".parse::<Money>().unwrap(), Money::from_cents(99));
        assert_eq!(" 3.00 ".parse::<Money>().unwrap(), Money::from_cents(300));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!("".parse::<Money>(), Err(MoneyError::Empty));
        assert_eq!("$".parse::<Money>(), Err(MoneyError::Empty));
        assert!(matches!("-1".parse::<Money>(), Err(MoneyError::InvalidAmount(_))));
        assert!(matches!("1.".parse::<Money>(), Err(MoneyError::InvalidAmount(_))));
        assert!(matches!(".50".parse::<Money>(), Err(MoneyError::InvalidAmount(_))));
        assert!(matches!("1.2.3".parse::<Money>(), Err(MoneyError::InvalidAmount(_))));
        assert!(matches!("abc".parse::<Money>(), Err(MoneyError::InvalidAmount(_))));
        assert!(matches!("1.005".parse::<Money>(), Err(MoneyError::TooPrecise(_))));
    }

    #[test]
    fn parse_overflow() {
        assert!(matches!(
            "999999999999999999999".parse::<Money>(),
            Err(MoneyError::Overflow(_))
        ));
        assert!(matches!(
            "184467440737095516.15".parse::<Money>(),
            Ok(Money(u64::MAX))
        ));
        assert!(matches!(
            "184467440737095516.16".parse::<Money>(),
            Err(MoneyError::Overflow(_))
        ));
    }

    #[test]
    fn checked_arithmetic() {
        let a = Money::from_cents(u64::MAX);
        assert_eq!(a.checked_add(Money::from_cents(1)), None);
        assert_eq!(a.checked_mul(2), None);
        assert_eq!(Money::from_cents(5).saturating_sub(Money::from_cents(9)), Money::ZERO);
        assert!(Money::ZERO.is_zero());
    }

    #[test]
    fn serializes_as_cents() {
        let json = serde_json::to_string(&Money::from_cents(1005)).unwrap();
        assert_eq!(json, "1005");
        let back: Money = serde_json::from_str("450").unwrap();
        assert_eq!(back, Money::from_cents(450));
    }

    proptest! {
        #[test]
        fn display_parses_back(cents in 0u64..=u64::MAX) {
            let m = Money::from_cents(cents);
            prop_assert_eq!(m.to_string().parse::<Money>().unwrap(), m);
        }
    }
}
