//! Fixed-point resource quantities.
//!
//! A [`Quantity`] stores its value in milli-units so CPU fractions
//! (`100m`) and byte counts (`4Gi`) share one exact integer representation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;

const MILLI: i64 = 1000;

/// Suffixes ordered from largest to smallest for formatting.
const BINARY_SUFFIXES: [(&str, i64); 4] = [
    ("Ti", 1 << 40),
    ("Gi", 1 << 30),
    ("Mi", 1 << 20),
    ("Ki", 1 << 10),
];

const DECIMAL_SUFFIXES: [(&str, i64); 4] = [
    ("T", 1_000_000_000_000),
    ("G", 1_000_000_000),
    ("M", 1_000_000),
    ("k", 1_000),
];

/// A resource amount in milli-units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quantity(i64);

impl Quantity {
    pub const ZERO: Quantity = Quantity(0);

    pub const fn from_milli(milli: i64) -> Self {
        Self(milli)
    }

    pub const fn from_units(units: i64) -> Self {
        Self(units.saturating_mul(MILLI))
    }

    pub const fn from_gib(gib: i64) -> Self {
        Self::from_units(gib.saturating_mul(1 << 30))
    }

    /// `None` when `gib` does not fit in milli-units.
    pub fn checked_from_gib(gib: u64) -> Option<Self> {
        i64::try_from(gib)
            .ok()?
            .checked_mul(1 << 30)?
            .checked_mul(MILLI)
            .map(Self)
    }

    pub const fn from_mib(mib: i64) -> Self {
        Self::from_units(mib.saturating_mul(1 << 20))
    }

    pub const fn milli(self) -> i64 {
        self.0
    }

    /// Whole units, rounded up.
    pub fn value(self) -> i64 {
        self.0.div_euclid(MILLI) + i64::from(self.0.rem_euclid(MILLI) != 0)
    }

    pub fn as_f64(self) -> f64 {
        self.0 as f64 / MILLI as f64
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub const fn saturating_add(self, other: Quantity) -> Quantity {
        Quantity(self.0.saturating_add(other.0))
    }

    pub const fn saturating_sub(self, other: Quantity) -> Quantity {
        Quantity(self.0.saturating_sub(other.0))
    }
}

impl FromStr for Quantity {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::InvalidQuantity(s.to_string());
        let text = s.trim();
        let split = text
            .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-' || c == '+'))
            .unwrap_or(text.len());
        let (number, suffix) = text.split_at(split);

        // Scale to milli-units for the suffix.
        let scale: i128 = match suffix {
            "" => i128::from(MILLI),
            "m" => 1,
            other => BINARY_SUFFIXES
                .iter()
                .chain(DECIMAL_SUFFIXES.iter())
                .find(|(name, _)| *name == other)
                .map(|(_, factor)| i128::from(*factor) * i128::from(MILLI))
                .ok_or_else(invalid)?,
        };

        let (negative, digits) = match number.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, number.strip_prefix('+').unwrap_or(number)),
        };
        let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }

        let whole: i128 = if whole.is_empty() { 0 } else { whole.parse().map_err(|_| invalid())? };
        let mut milli = whole.checked_mul(scale).ok_or_else(invalid)?;
        let fraction = fraction.trim_end_matches('0');
        if !fraction.is_empty() {
            if fraction.len() > 18 {
                return Err(invalid());
            }
            let numerator: i128 = fraction.parse().map_err(|_| invalid())?;
            let denominator = 10i128.pow(fraction.len() as u32);
            let scaled = numerator.checked_mul(scale).ok_or_else(invalid)?;
            // Finer than one milli-unit.
            if scaled % denominator != 0 {
                return Err(invalid());
            }
            milli = milli.checked_add(scaled / denominator).ok_or_else(invalid)?;
        }
        if negative {
            milli = -milli;
        }

        i64::try_from(milli).map(Quantity).map_err(|_| invalid())
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % MILLI != 0 {
            return write!(f, "{}m", self.0);
        }
        let units = self.0 / MILLI;
        if units != 0 {
            for (suffix, factor) in BINARY_SUFFIXES {
                if units % factor == 0 {
                    return write!(f, "{}{suffix}", units / factor);
                }
            }
        }
        write!(f, "{units}")
    }
}

impl Serialize for Quantity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Units(i64),
            Text(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Units(units) => Ok(Quantity::from_units(units)),
            Repr::Text(text) => text.parse().map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(s: &str) -> Quantity {
        s.parse().unwrap()
    }

    #[test]
    fn parses_plain_and_milli() {
        assert_eq!(q("4"), Quantity::from_units(4));
        assert_eq!(q("100m"), Quantity::from_milli(100));
        assert_eq!(q("1.5"), Quantity::from_milli(1500));
        assert_eq!(q("0.1"), Quantity::from_milli(100));
    }

    #[test]
    fn parses_binary_and_decimal_suffixes() {
        assert_eq!(q("4Gi"), Quantity::from_gib(4));
        assert_eq!(q("10Mi"), Quantity::from_mib(10));
        assert_eq!(q("1Ki"), Quantity::from_units(1024));
        assert_eq!(q("2k"), Quantity::from_units(2000));
        assert_eq!(q("1.5Gi"), Quantity::from_units(3 * (1 << 29)));
    }

    #[test]
    fn parses_negative_values() {
        assert_eq!(q("-1"), Quantity::from_units(-1));
        assert!(q("-250m").is_negative());
    }

    #[test]
    fn rejects_garbage() {
        assert!("".parse::<Quantity>().is_err());
        assert!("abc".parse::<Quantity>().is_err());
        assert!("4Xi".parse::<Quantity>().is_err());
        assert!("1.2.3".parse::<Quantity>().is_err());
        assert!("99999999999Ti".parse::<Quantity>().is_err());
    }

    #[test]
    fn rejects_sub_milli_precision() {
        assert!("0.5m".parse::<Quantity>().is_err());
        assert!("0.0001".parse::<Quantity>().is_err());
        assert!("1.0005".parse::<Quantity>().is_err());
        assert!("0.1234567890123456789".parse::<Quantity>().is_err());

        assert_eq!(q("0.001").milli(), 1);
        assert_eq!(q("2.500"), Quantity::from_milli(2500));
        assert_eq!(q("1.0m"), Quantity::from_milli(1));
        assert_eq!(q("0.5Ki"), Quantity::from_units(512));
    }

    #[test]
    fn checked_from_gib_detects_overflow() {
        assert_eq!(Quantity::checked_from_gib(4), Some(Quantity::from_gib(4)));
        assert_eq!(
            Quantity::checked_from_gib(8).map(Quantity::milli),
            Some(8 * (1 << 30) * 1000)
        );
        assert_eq!(Quantity::checked_from_gib(u64::from(u32::MAX) * u64::from(u32::MAX)), None);
        assert_eq!(Quantity::checked_from_gib(u64::MAX), None);
    }

    #[test]
    fn value_rounds_up() {
        assert_eq!(q("100m").value(), 1);
        assert_eq!(q("4").value(), 4);
        assert_eq!(q("4001m").value(), 5);
        assert_eq!(Quantity::ZERO.value(), 0);
    }

    #[test]
    fn display_picks_exact_suffix() {
        assert_eq!(q("4Gi").to_string(), "4Gi");
        assert_eq!(q("10Mi").to_string(), "10Mi");
        assert_eq!(q("100m").to_string(), "100m");
        assert_eq!(q("5").to_string(), "5");
        assert_eq!(Quantity::ZERO.to_string(), "0");
    }

    #[test]
    fn deserializes_from_string_or_integer() {
        let from_text: Quantity = serde_json::from_str("\"8Gi\"").unwrap();
        let from_int: Quantity = serde_json::from_str("3").unwrap();
        assert_eq!(from_text, Quantity::from_gib(8));
        assert_eq!(from_int, Quantity::from_units(3));
        assert_eq!(serde_json::to_string(&from_text).unwrap(), "\"8Gi\"");
    }

    proptest::proptest! {
        #[test]
        fn display_parses_back(milli in -1_000_000_000_000i64..1_000_000_000_000) {
            let quantity = Quantity::from_milli(milli);
            proptest::prop_assert_eq!(quantity.to_string().parse::<Quantity>(), Ok(quantity));
        }
    }
}
