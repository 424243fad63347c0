use num_traits::Float;

use super::sums::{PowerSums, adjusted_skew, central_sum};
use crate::{
    Result,
    helper::{cast, lit},
    window::{Accumulator, Output, Params, drive, fill_all},
};

/// Statistics derived from running power sums of one sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Moment {
    Sum,
    Mean,
    Var,
    Std,
    Stable,
    MeanStdNorm,
    Skew,
    Kurt,
}

impl Moment {
    /// Highest power sum the statistic reads incrementally
    const fn order(self) -> usize {
        match self {
            Moment::Sum | Moment::Mean => 1,
            _ => 2,
        }
    }

    /// Smallest present count for which the formula is defined
    const fn floor(self) -> usize {
        match self {
            Moment::Sum | Moment::Mean => 0,
            Moment::Var | Moment::Std | Moment::Stable | Moment::MeanStdNorm => 2,
            Moment::Skew => 3,
            Moment::Kurt => 4,
        }
    }
}

/// Accumulator for the single-sequence moment statistics
#[derive(Debug, Clone)]
struct MomentAccumulator<T> {
    stat: Moment,
    sums: PowerSums<T>,
}

impl<T: Float + Default> MomentAccumulator<T> {
    fn new(stat: Moment) -> Self {
        Self {
            stat,
            sums: PowerSums::new(stat.order()),
        }
    }

    fn skew(&self, window: &[T]) -> T {
        let n = self.sums.count();
        let m3 = central_sum(window, self.sums.mean(), 3) / cast(n);
        adjusted_skew(n, self.sums.variance(), m3)
    }

    fn kurt(&self, window: &[T]) -> T {
        let n: T = cast(self.sums.count());
        let mean = self.sums.mean();
        let var = self.sums.variance();
        let central = if var > T::zero() {
            central_sum(window, mean, 4) / (var * var)
        } else {
            T::zero()
        };

        let _1 = T::one();
        let _2 = lit::<T>(2.0);
        let _3 = lit::<T>(3.0);
        ((n * n - _1) * central / n - _3 * (n - _1) * (n - _1)) / ((n - _2) * (n - _3))
    }
}

impl<T: Float + Default> Accumulator<T> for MomentAccumulator<T> {
    type Output = T;

    #[inline]
    fn on_enter(&mut self, item: T) {
        self.sums.add(item);
    }

    #[inline]
    fn on_leave(&mut self, item: T) {
        self.sums.remove(item);
    }

    #[inline]
    fn count(&self) -> usize {
        self.sums.count()
    }

    fn emit(&mut self, window: &[T]) -> T {
        match self.stat {
            Moment::Sum => self.sums.total(1),
            Moment::Mean => self.sums.mean(),
            Moment::Var => self.sums.sample_variance(),
            Moment::Std => self.sums.sample_variance().sqrt(),
            Moment::Stable => {
                let var = self.sums.variance();
                if var > T::zero() {
                    self.sums.mean() / var.sqrt()
                } else {
                    T::nan()
                }
            }
            Moment::MeanStdNorm => {
                let mean = self.sums.mean();
                let var = self.sums.variance();
                match window.last() {
                    Some(&newest) if var > T::zero() => (newest - mean) / var.sqrt(),
                    _ => mean,
                }
            }
            Moment::Skew => self.skew(window),
            Moment::Kurt => self.kurt(window),
        }
    }

    fn is_degenerate(&self) -> bool {
        self.sums.is_degenerate()
    }

    fn recompute(&mut self, retained: &[T]) {
        self.sums.recompute(retained);
    }
}

fn run<T, O>(stat: Moment, arr: &[T], out: &mut O, window: usize, min_periods: usize) -> Result<()>
where
    T: Float + Default,
    O: Output<T> + ?Sized,
{
    if window == 1 && matches!(stat, Moment::Var | Moment::Std) {
        return fill_all(arr.len(), out, T::zero());
    }
    let params = Params::new(window, min_periods).with_floor(stat.floor());
    drive(arr, out, params, T::nan(), MomentAccumulator::new(stat))
}

/// Rolling sum of the present values in each window
///
/// With `min_periods == 0` a window of only missing values sums to 0.
///
/// # Arguments
///
/// * `arr` - The input sequence, NaN marking missing values
/// * `out` - The destination, same length as `arr`
/// * `window` - The window size
/// * `min_periods` - The minimum number of present values
///
/// # Returns
///
/// * `Result<()>` - An error only if `out` has the wrong length
///
/// # Examples
///
/// ```
/// # use ta_rolling::moments;
/// let input = [1.0_f64, 2.0, 3.0, 4.0, 5.0];
/// let mut out = [0.0_f64; 5];
/// moments::sum(&input, &mut out[..], 3, 1).unwrap();
///
/// assert!(out[0].is_nan() && out[1].is_nan());
/// assert_eq!(&out[2..], &[6.0, 9.0, 12.0]);
/// ```
pub fn sum<T, O>(arr: &[T], out: &mut O, window: usize, min_periods: usize) -> Result<()>
where
    T: Float + Default,
    O: Output<T> + ?Sized,
{
    run(Moment::Sum, arr, out, window, min_periods)
}

/// Rolling arithmetic mean of the present values in each window
///
/// The divisor is the number of present values, not the window size.
///
/// # Examples
///
/// ```
/// # use ta_rolling::moments;
/// let input = [1.0_f64, f64::NAN, 3.0, 4.0, 5.0];
/// let mut out = [0.0_f64; 5];
/// moments::sma(&input, &mut out[..], 3, 2).unwrap();
///
/// assert_eq!(out[2], 2.0);
/// assert_eq!(out[3], 3.5);
/// assert_eq!(out[4], 4.0);
/// ```
pub fn sma<T, O>(arr: &[T], out: &mut O, window: usize, min_periods: usize) -> Result<()>
where
    T: Float + Default,
    O: Output<T> + ?Sized,
{
    run(Moment::Mean, arr, out, window, min_periods)
}

/// Rolling unbiased sample variance
///
/// Needs at least two present values. A window of size 1 writes 0 everywhere.
pub fn var<T, O>(arr: &[T], out: &mut O, window: usize, min_periods: usize) -> Result<()>
where
    T: Float + Default,
    O: Output<T> + ?Sized,
{
    run(Moment::Var, arr, out, window, min_periods)
}

/// Rolling unbiased sample standard deviation
///
/// `sqrt(variance * n / (n - 1))` with the population variance of the present
/// values. Needs at least two present values; a window of size 1 writes 0
/// everywhere.
///
/// # Examples
///
/// ```
/// # use ta_rolling::moments;
/// # use assert_approx_eq::assert_approx_eq;
/// let input = [25.4_f64, 26.2, 26.0, 26.1, 25.8];
/// let mut out = [0.0_f64; 5];
/// moments::std(&input, &mut out[..], 3, 1).unwrap();
///
/// assert_approx_eq!(out[2], 0.4163, 0.0001);
/// assert_approx_eq!(out[3], 0.1, 0.0001);
/// assert_approx_eq!(out[4], 0.1528, 0.0001);
/// ```
pub fn std<T, O>(arr: &[T], out: &mut O, window: usize, min_periods: usize) -> Result<()>
where
    T: Float + Default,
    O: Output<T> + ?Sized,
{
    run(Moment::Std, arr, out, window, min_periods)
}

/// Rolling bias-corrected skewness
///
/// The third central moment is re-scanned over the window on every step.
/// Unadjusted values within 1e-10 of zero are reported as 0. Needs at least
/// three present values and a positive variance.
pub fn skew<T, O>(arr: &[T], out: &mut O, window: usize, min_periods: usize) -> Result<()>
where
    T: Float + Default,
    O: Output<T> + ?Sized,
{
    run(Moment::Skew, arr, out, window, min_periods)
}

/// Rolling bias-corrected excess kurtosis
///
/// `[(n²−1)·m4/σ⁴ − 3(n−1)²] / ((n−2)(n−3))`, with the fourth central moment
/// re-scanned every step. A window with zero variance contributes a central
/// term of 0. Needs at least four present values.
pub fn kurt<T, O>(arr: &[T], out: &mut O, window: usize, min_periods: usize) -> Result<()>
where
    T: Float + Default,
    O: Output<T> + ?Sized,
{
    run(Moment::Kurt, arr, out, window, min_periods)
}

/// Rolling signal stability, the window mean over its population deviation
///
/// NaN when the window variance is not positive.
pub fn stable<T, O>(arr: &[T], out: &mut O, window: usize, min_periods: usize) -> Result<()>
where
    T: Float + Default,
    O: Output<T> + ?Sized,
{
    run(Moment::Stable, arr, out, window, min_periods)
}

/// Z-score of the newest value against its own window
///
/// Uses the population deviation. When the variance is not positive the window
/// mean is written instead.
#[doc(alias = "zscore")]
pub fn meanstdnorm<T, O>(arr: &[T], out: &mut O, window: usize, min_periods: usize) -> Result<()>
where
    T: Float + Default,
    O: Output<T> + ?Sized,
{
    run(Moment::MeanStdNorm, arr, out, window, min_periods)
}
