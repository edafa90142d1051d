use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
};

use serde::{Deserialize, Serialize};
use sqlx::Type;
use thiserror::Error;

use crate::op;

pub const NAIRA_CURRENCY_CODE: &str = "NGN";
pub const NAIRA_CURRENCY_CODE_LOWER: &str = "ngn";

/// The number of kobo in one naira.
pub const KOBO_PER_NAIRA: i64 = 100;

//--------------------------------------       Kobo        -----------------------------------------------------------
/// A monetary amount in kobo, the minor unit of the naira.
///
/// All balances and transaction amounts in the wallet system are integer kobo. The payment gateway speaks kobo on the
/// wire as well, so no scaling happens at the HTTP boundary.
#[derive(Debug, Clone, Copy, Default, Type, Ord, PartialOrd, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct Kobo(i64);

op!(binary Kobo, Add, add);
op!(binary Kobo, Sub, sub);
op!(inplace Kobo, AddAssign, add_assign);
op!(inplace Kobo, SubAssign, sub_assign);
op!(unary Kobo, Neg, neg);

impl Sum for Kobo {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented in kobo: {0}")]
pub struct KoboConversionError(String);

impl From<i64> for Kobo {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl PartialEq for Kobo {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for Kobo {}

impl TryFrom<u64> for Kobo {
    type Error = KoboConversionError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        if value > i64::MAX as u64 {
            Err(KoboConversionError(format!("Value {value} is too large to convert to Kobo")))
        } else {
            #[allow(clippy::cast_possible_wrap)]
            Ok(Self(value as i64))
        }
    }
}

impl Display for Kobo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let naira = self.0 as f64 / KOBO_PER_NAIRA as f64;
        write!(f, "₦{naira:0.2}")
    }
}

impl Kobo {
    pub fn value(&self) -> i64 {
        self.0
    }

    pub const fn from_naira(naira: i64) -> Self {
        Self(naira * KOBO_PER_NAIRA)
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn arithmetic() {
        let a = Kobo::from(1_500);
        let b = Kobo::from(500);
        assert_eq!(a + b, Kobo::from(2_000));
        assert_eq!(a - b, Kobo::from(1_000));
        assert_eq!(-b, Kobo::from(-500));
        let mut c = a;
        c -= b;
        assert_eq!(c, Kobo::from(1_000));
    }

    #[test]
    fn naira_conversion() {
        assert_eq!(Kobo::from_naira(100), Kobo::from(10_000));
        assert_eq!(Kobo::from_naira(100).to_string(), "₦100.00");
        assert_eq!(Kobo::from(2_550).to_string(), "₦25.50");
    }

    #[test]
    fn sums() {
        let total: Kobo = [100, 200, 300].into_iter().map(Kobo::from).sum();
        assert_eq!(total, Kobo::from(600));
    }
}
