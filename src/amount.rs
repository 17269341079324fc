use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::iter::Sum;
use std::ops::{Add, Sub};

/// A fixed-point coin quantity.
/// The value is signed so that malformed transaction outputs with negative
/// amounts can be represented and rejected by validation, rather than being
/// unrepresentable.
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Debug, Hash, Serialize, Deserialize)]
pub struct Amount(i64);

impl Amount {
    pub const fn new(amount: i64) -> Self {
        Amount(amount)
    }

    pub fn zero() -> Self {
        Self::new(0)
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }
}

/// Arithmetic saturates at the i64 bounds. Amounts flow through validation
/// before any transaction is accepted, so sums over hostile transactions must
/// neither panic nor wrap: outputs summing past the maximum saturate there and
/// then fail the conservation check against any smaller input total.
impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Amount {
    type Output = Amount;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl Sum<Amount> for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        let mut sum = Self::zero();
        for el in iter {
            sum = sum.add(el);
        }
        sum
    }
}

impl From<i64> for Amount {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl From<i32> for Amount {
    fn from(value: i32) -> Self {
        Self(value as i64)
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} EPC", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addition_saturates_instead_of_wrapping() {
        let sum = Amount::new(i64::MAX) + Amount::new(i64::MAX);
        assert_eq!(sum, Amount::new(i64::MAX));
        assert!(!sum.is_negative());
    }

    #[test]
    fn subtraction_saturates_instead_of_wrapping() {
        let difference = Amount::new(i64::MIN) - Amount::new(1);
        assert_eq!(difference, Amount::new(i64::MIN));
    }

    #[test]
    fn sum_over_maximal_amounts_saturates() {
        let total: Amount = [Amount::new(i64::MAX), Amount::new(1), Amount::new(i64::MAX)]
            .into_iter()
            .sum();
        assert_eq!(total, Amount::new(i64::MAX));
    }
}
