use num_traits::Float;

use crate::{
    RunningSum,
    helper::{Missing, cast, lit},
};

/// Unadjusted skewness below this magnitude is reported as exactly zero
const SKEW_SNAP: f64 = 1e-10;

/// Running power sums over the present values of a window.
///
/// Keeps `Σx`, `Σx²`, ... up to the requested order, each in a compensated
/// [`RunningSum`] so that long runs of add/remove pairs do not drift. Missing
/// values are never accumulated; infinite powers are counted on the side.
#[derive(Debug, Clone)]
pub(crate) struct PowerSums<T> {
    /// Highest power tracked, between 1 and 4
    order: usize,
    /// Number of present values accumulated
    n: usize,
    /// `sums[k]` holds the sum of the (k + 1)-th powers
    sums: [RunningSum<T>; 4],
}

impl<T: Float + Default> PowerSums<T> {
    /// Creates empty sums tracking powers `1..=order`
    pub fn new(order: usize) -> Self {
        Self {
            order: order.clamp(1, 4),
            n: 0,
            sums: Default::default(),
        }
    }

    /// Resets the sums
    #[inline]
    fn reset_sums(&mut self) {
        self.n = 0;
        self.sums = Default::default();
    }

    /// Adds a value if it is present
    #[inline]
    pub fn add(&mut self, value: T) {
        if value.is_missing() {
            return;
        }
        self.n += 1;
        let mut power = value;
        for sum in self.sums.iter_mut().take(self.order) {
            *sum += power;
            power = power * value;
        }
    }

    /// Removes a previously added value if it is present
    #[inline]
    pub fn remove(&mut self, value: T) {
        if value.is_missing() {
            return;
        }
        self.n -= 1;
        let mut power = value;
        for sum in self.sums.iter_mut().take(self.order) {
            *sum -= power;
            power = power * value;
        }
    }

    /// Rebuilds the sums from `values`, skipping missing ones
    pub fn recompute(&mut self, values: &[T]) {
        self.reset_sums();
        for &v in values {
            self.add(v);
        }
    }

    /// Returns true if any tracked sum overflowed
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.sums
            .iter()
            .take(self.order)
            .any(RunningSum::is_degenerate)
    }

    /// Returns the number of present values
    #[inline]
    pub const fn count(&self) -> usize {
        self.n
    }

    /// Returns the sum of the `k`-th powers
    #[inline]
    pub fn total(&self, k: usize) -> T {
        self.sums[k - 1].total()
    }

    /// Returns the arithmetic mean, NaN for an empty window
    #[inline]
    pub fn mean(&self) -> T {
        if self.n == 0 {
            return T::nan();
        }
        self.total(1) / cast(self.n)
    }

    /// Returns the population variance `E[x²] − E[x]²`
    #[inline]
    pub fn variance(&self) -> T {
        if self.n == 0 {
            return T::nan();
        }
        let mean = self.mean();
        self.total(2) / cast(self.n) - mean * mean
    }

    /// Returns the unbiased sample variance
    #[inline]
    pub fn sample_variance(&self) -> T {
        let n: T = cast(self.n);
        self.variance() * n / (n - T::one())
    }
}

/// Sum of `(x − center)^k` over the present values of `window`
#[inline]
pub(crate) fn central_sum<T: Float>(window: &[T], center: T, k: i32) -> T {
    window
        .iter()
        .filter(|v| v.is_present())
        .fold(T::zero(), |acc, &v| acc + (v - center).powi(k))
}

/// Bias-corrected sample skewness from the population moments `m2`, `m3`
///
/// A window without spread has no defined skewness and gives NaN.
pub(crate) fn adjusted_skew<T: Float>(n: usize, m2: T, m3: T) -> T {
    if m2 <= T::zero() {
        return T::nan();
    }
    let mut g1 = m3 / (m2 * m2.sqrt());
    if g1.abs() < lit(SKEW_SNAP) {
        g1 = T::zero();
    }
    let n: T = cast(n);
    g1 * (n * (n - T::one())).sqrt() / (n - lit(2.0))
}
