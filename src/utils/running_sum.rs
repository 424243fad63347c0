use core::ops::{AddAssign, SubAssign};

use num_traits::Float;

use crate::Kbn;

/// Compensated running sum that follows IEEE-754 for non-finite operands
///
/// Finite operands go into a Kahan-Babuska-Neumaier accumulator. Infinite and
/// NaN operands are only counted, so an infinity entering and later leaving
/// the window leaves the compensated part untouched. A plain side sum of the
/// finite operands reports the direction of an overflow.
#[derive(Debug, Clone)]
pub struct RunningSum<T> {
    finite: Kbn<T>,
    plain: T,
    pos_inf: usize,
    neg_inf: usize,
    nan: usize,
}

impl<T: Float> Default for RunningSum<T> {
    fn default() -> Self {
        Self {
            finite: Kbn::new(),
            plain: T::zero(),
            pos_inf: 0,
            neg_inf: 0,
            nan: 0,
        }
    }
}

impl<T: Float> RunningSum<T> {
    /// Returns the sum as plain floating point addition would report it
    #[inline]
    pub fn total(&self) -> T {
        if self.nan > 0 || (self.pos_inf > 0 && self.neg_inf > 0) {
            return T::nan();
        }
        if self.pos_inf > 0 {
            return T::infinity();
        }
        if self.neg_inf > 0 {
            return T::neg_infinity();
        }
        let total = self.finite.total();
        if total.is_finite() { total } else { self.plain }
    }

    /// Returns the compensated sum of the finite operands only
    #[inline]
    pub fn finite_total(&self) -> T {
        self.finite.total()
    }

    /// Returns true if the finite operands overflowed and the compensated
    /// part can no longer be updated
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        !self.finite.total().is_finite()
    }
}

impl<T: Float> AddAssign<T> for RunningSum<T> {
    #[inline]
    fn add_assign(&mut self, value: T) {
        if value.is_nan() {
            self.nan += 1;
        } else if value == T::infinity() {
            self.pos_inf += 1;
        } else if value == T::neg_infinity() {
            self.neg_inf += 1;
        } else {
            self.finite += value;
            self.plain = self.plain + value;
        }
    }
}

impl<T: Float> SubAssign<T> for RunningSum<T> {
    #[inline]
    fn sub_assign(&mut self, value: T) {
        if value.is_nan() {
            self.nan -= 1;
        } else if value == T::infinity() {
            self.pos_inf -= 1;
        } else if value == T::neg_infinity() {
            self.neg_inf -= 1;
        } else {
            self.finite -= value;
            self.plain = self.plain - value;
        }
    }
}
