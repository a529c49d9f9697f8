//! Line item quantity with a floor of one.

use core::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Quantity of a cart line.
///
/// A quantity is never below one: every constructor clamps, and so does
/// deserialization of persisted cart data.
///
/// ```
/// use bazaar_core::Quantity;
///
/// assert_eq!(Quantity::clamped(0).get(), 1);
/// assert_eq!(Quantity::clamped(-4).get(), 1);
/// assert_eq!(Quantity::parse_input("3 boxes").get(), 3);
/// assert_eq!(Quantity::parse_input("lots").get(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Quantity(u32);

impl Quantity {
    /// The smallest allowed quantity.
    pub const ONE: Self = Self(1);

    /// Create a quantity, clamping zero up to one.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        if value == 0 { Self::ONE } else { Self(value) }
    }

    /// Create a quantity from any signed value, clamping into `1..=u32::MAX`.
    #[must_use]
    pub fn clamped(value: i64) -> Self {
        let value = value.clamp(1, i64::from(u32::MAX));
        Self(u32::try_from(value).unwrap_or(u32::MAX))
    }

    /// Parse raw form input the way a number field submits it.
    ///
    /// Leading whitespace and an optional sign are accepted, then the leading
    /// run of digits is read. Anything without leading digits becomes one.
    #[must_use]
    pub fn parse_input(raw: &str) -> Self {
        let trimmed = raw.trim_start();
        let (negative, rest) = match trimmed.as_bytes().first() {
            Some(b'-') => (true, trimmed.get(1..).unwrap_or_default()),
            Some(b'+') => (false, trimmed.get(1..).unwrap_or_default()),
            _ => (false, trimmed),
        };

        let digits_end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        let digits = rest.get(..digits_end).unwrap_or_default();

        if digits.is_empty() || negative {
            return Self::ONE;
        }

        // Overlong digit runs saturate rather than failing.
        digits
            .parse::<i64>()
            .map_or(Self(u32::MAX), Self::clamped)
    }

    /// Apply a signed delta, clamping the result to at least one.
    #[must_use]
    pub fn offset(self, delta: i64) -> Self {
        Self::clamped(i64::from(self.0).saturating_add(delta))
    }

    /// The quantity as a plain integer.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Older data may hold fractional, negative, or null quantities.
        let raw = Option::<f64>::deserialize(deserializer)?;
        #[allow(clippy::cast_possible_truncation)]
        let value = raw.filter(|v| v.is_finite()).map_or(1, |v| v.trunc() as i64);
        Ok(Self::clamped(value))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clamps_zero() {
        assert_eq!(Quantity::new(0), Quantity::ONE);
        assert_eq!(Quantity::new(5).get(), 5);
    }

    #[test]
    fn test_offset_never_drops_below_one() {
        let q = Quantity::new(2);
        assert_eq!(q.offset(-1).get(), 1);
        assert_eq!(q.offset(-10).get(), 1);
        assert_eq!(q.offset(3).get(), 5);
        assert_eq!(Quantity::new(u32::MAX).offset(1).get(), u32::MAX);
    }

    #[test]
    fn test_parse_input() {
        assert_eq!(Quantity::parse_input("4").get(), 4);
        assert_eq!(Quantity::parse_input("  12abc").get(), 12);
        assert_eq!(Quantity::parse_input("+2").get(), 2);
        assert_eq!(Quantity::parse_input("0").get(), 1);
        assert_eq!(Quantity::parse_input("-7").get(), 1);
        assert_eq!(Quantity::parse_input("").get(), 1);
        assert_eq!(Quantity::parse_input("abc").get(), 1);
        assert_eq!(Quantity::parse_input("2.9").get(), 2);
        assert_eq!(Quantity::parse_input("99999999999999999999999").get(), u32::MAX);
    }

    #[test]
    fn test_deserialize_clamps() {
        let q: Quantity = serde_json::from_str("0").unwrap();
        assert_eq!(q.get(), 1);
        let q: Quantity = serde_json::from_str("-3").unwrap();
        assert_eq!(q.get(), 1);
        let q: Quantity = serde_json::from_str("null").unwrap();
        assert_eq!(q.get(), 1);
        let q: Quantity = serde_json::from_str("3.7").unwrap();
        assert_eq!(q.get(), 3);
    }
}
