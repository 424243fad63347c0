use num_traits::Float;

use crate::{
    Result,
    helper::{Missing, cast},
    window::{Accumulator, Output, Params, drive},
};

/// Running product of the present values, divided out on removal
#[derive(Debug, Clone)]
struct ProductAccumulator<T> {
    geometric: bool,
    n: usize,
    product: T,
}

impl<T: Float> ProductAccumulator<T> {
    fn new(geometric: bool) -> Self {
        Self {
            geometric,
            n: 0,
            product: T::one(),
        }
    }
}

impl<T: Float> Accumulator<T> for ProductAccumulator<T> {
    type Output = T;

    #[inline]
    fn on_enter(&mut self, item: T) {
        if item.is_present() {
            self.n += 1;
            self.product = self.product * item;
        }
    }

    #[inline]
    fn on_leave(&mut self, item: T) {
        if item.is_present() {
            self.n -= 1;
            self.product = self.product / item;
        }
    }

    #[inline]
    fn count(&self) -> usize {
        self.n
    }

    fn emit(&mut self, _window: &[T]) -> T {
        if !self.geometric {
            return self.product;
        }
        match self.n {
            0 => T::nan(),
            n => self.product.powf(cast::<T>(n).recip()),
        }
    }

    // A zero leaving a zero product gives 0/0
    fn is_degenerate(&self) -> bool {
        self.product.is_nan()
    }

    fn recompute(&mut self, retained: &[T]) {
        self.n = 0;
        self.product = T::one();
        for &v in retained {
            self.on_enter(v);
        }
    }
}

/// Rolling product of the present values in each window
///
/// With `min_periods == 0` a window of only missing values yields 1.
///
/// # Examples
///
/// ```
/// # use ta_rolling::moments;
/// let input = [1.0_f64, 2.0, 0.0, 4.0, 5.0];
/// let mut out = [0.0_f64; 5];
/// moments::prod(&input, &mut out[..], 2, 1).unwrap();
///
/// assert_eq!(&out[1..], &[2.0, 0.0, 0.0, 20.0]);
/// ```
pub fn prod<T, O>(arr: &[T], out: &mut O, window: usize, min_periods: usize) -> Result<()>
where
    T: Float + Default,
    O: Output<T> + ?Sized,
{
    let params = Params::new(window, min_periods);
    drive(arr, out, params, T::nan(), ProductAccumulator::new(false))
}

/// Rolling geometric mean, `prod^(1/n)` over the present values
///
/// A negative product with an even count has no real root and yields NaN.
pub fn prod_mean<T, O>(arr: &[T], out: &mut O, window: usize, min_periods: usize) -> Result<()>
where
    T: Float + Default,
    O: Output<T> + ?Sized,
{
    let params = Params::new(window, min_periods);
    drive(arr, out, params, T::nan(), ProductAccumulator::new(true))
}
