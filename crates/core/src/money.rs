//! Money value object: integer amounts in the smallest currency unit (cents).
//!
//! All monetary arithmetic in the engine goes through this type. Fractional
//! results (VAT, proportional allocation) are computed in `i128` and rounded
//! half away from zero to whole cents exactly once.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

use crate::vat::VatRate;

/// Largest quantity accepted on a line or hamper component.
pub const MAX_QUANTITY: i64 = 1_000_000;

/// Monetary amount in cents. Signed so that deltas and losses are representable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Largest price accepted on a product, hamper or line (1,000,000,000.00).
    pub const MAX_PRICE: Money = Money::from_units(1_000_000_000);

    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Whole currency units, e.g. `Money::from_units(150)` is 150.00.
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Money(units * 100)
    }

    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub const fn checked_add(self, rhs: Money) -> Option<Money> {
        match self.0.checked_add(rhs.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    pub const fn checked_mul(self, qty: i64) -> Option<Money> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// `self · qty`, clamped at the `i64` bounds. For figures derived from
    /// stored data, where an error has nowhere to go.
    pub const fn saturating_mul(self, qty: i64) -> Money {
        Money(self.0.saturating_mul(qty))
    }

    pub const fn saturating_add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }

    /// VAT owed on this amount at `rate`, rounded to cents.
    pub fn vat_at(&self, rate: VatRate) -> Money {
        Money(round_div(self.0 as i128 * rate.bps() as i128, 10_000) as i64)
    }

    /// `self · part / whole`, rounded to cents. `whole` must be positive.
    pub fn prorate(&self, part: i64, whole: i64) -> Money {
        debug_assert!(whole > 0, "prorate requires a positive denominator");
        Money(round_div(self.0 as i128 * part as i128, whole as i128) as i64)
    }
}

/// Integer division rounding half away from zero. `den` must be positive.
pub fn round_div(num: i128, den: i128) -> i128 {
    let half = den / 2;
    if num >= 0 {
        num.saturating_add(half) / den
    } else {
        -(num.saturating_neg().saturating_add(half) / den)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
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

    fn sub(self, rhs: Money) -> Money {
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

    fn neg(self) -> Money {
        Money(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_two_decimals() {
        assert_eq!(Money::from_cents(1099).to_string(), "10.99");
        assert_eq!(Money::from_cents(5).to_string(), "0.05");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
    }

    #[test]
    fn vat_rounds_half_up() {
        // 13.64 at 21% = 2.8644 -> 2.86
        assert_eq!(Money::from_cents(1364).vat_at(VatRate::General).cents(), 286);
        // 0.50 at 21% = 0.105 -> 0.11
        assert_eq!(Money::from_cents(50).vat_at(VatRate::General).cents(), 11);
        assert_eq!(Money::from_cents(1000).vat_at(VatRate::Exempt).cents(), 0);
    }

    #[test]
    fn prorate_rounds_to_cents() {
        // 150.00 * 100/110 = 136.3636..
        assert_eq!(Money::from_units(150).prorate(10_000, 11_000).cents(), 13_636);
        // 150.00 * 10/110 = 13.6363..
        assert_eq!(Money::from_units(150).prorate(1_000, 11_000).cents(), 1_364);
    }

    #[test]
    fn round_div_is_symmetric_around_zero() {
        assert_eq!(round_div(5, 10), 1);
        assert_eq!(round_div(-5, 10), -1);
        assert_eq!(round_div(4, 10), 0);
        assert_eq!(round_div(-4, 10), 0);
    }

    #[test]
    fn sum_and_arithmetic() {
        let total: Money = [Money::from_cents(100), Money::from_cents(250)].iter().sum();
        assert_eq!(total, Money::from_cents(350));
        assert_eq!(total.checked_mul(3), Some(Money::from_cents(1050)));
        assert_eq!((total - Money::from_cents(400)).cents(), -50);
    }

    #[test]
    fn checked_ops_report_overflow() {
        let big = Money::from_cents(i64::MAX / 2 + 1);
        assert_eq!(big.checked_mul(2), None);
        assert_eq!(big.checked_add(big), None);
        assert_eq!(Money::from_cents(7).checked_add(Money::from_cents(3)), Some(Money::from_cents(10)));
        assert_eq!(big.saturating_mul(4), Money::from_cents(i64::MAX));
        assert_eq!(Money::from_cents(-1).saturating_mul(i64::MAX).cents(), -i64::MAX);
    }

    #[test]
    fn bounded_line_totals_fit_in_cents() {
        assert!(Money::MAX_PRICE.checked_mul(MAX_QUANTITY).is_some());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig { cases: 256, .. ProptestConfig::default() })]

            #[test]
            fn round_div_lands_within_half_a_unit(num in -1_000_000_000_000i64..1_000_000_000_000, den in 1i64..100_000) {
                let (num, den) = (num as i128, den as i128);
                let q = round_div(num, den);
                prop_assert!((num - q * den).abs() * 2 <= den);
            }

            #[test]
            fn checked_mul_matches_wide_product(cents in any::<i64>(), qty in any::<i64>()) {
                let wide = cents as i128 * qty as i128;
                let fits = wide >= i64::MIN as i128 && wide <= i64::MAX as i128;
                match Money::from_cents(cents).checked_mul(qty) {
                    Some(m) => prop_assert!(fits && m.cents() as i128 == wide),
                    None => prop_assert!(!fits),
                }
            }
        }
    }
}
