use num_traits::Float;

use super::sums::PowerSums;
use crate::{
    Error, Result,
    helper::{Missing, Pair, cast, zip_pairs},
    window::{Accumulator, Output, Params, drive},
};

/// Minimum number of present pairs for either statistic
const PAIRED_FLOOR: usize = 3;

/// Running sums of both sides of the pairs present in the window
#[derive(Debug, Clone)]
struct PairedAccumulator<T> {
    correlate: bool,
    x: PowerSums<T>,
    y: PowerSums<T>,
}

impl<T: Float + Default> PairedAccumulator<T> {
    fn new(correlate: bool) -> Self {
        let order = if correlate { 2 } else { 1 };
        Self {
            correlate,
            x: PowerSums::new(order),
            y: PowerSums::new(order),
        }
    }

    /// Sum of the co-deviations from the window means
    fn cross(&self, window: &[Pair<T>]) -> T {
        let (mx, my) = (self.x.mean(), self.y.mean());
        window
            .iter()
            .filter(|p| p.is_present())
            .fold(T::zero(), |acc, p| acc + (p.0 - mx) * (p.1 - my))
    }
}

impl<T: Float + Default> Accumulator<Pair<T>> for PairedAccumulator<T> {
    type Output = T;

    #[inline]
    fn on_enter(&mut self, item: Pair<T>) {
        if item.is_present() {
            self.x.add(item.0);
            self.y.add(item.1);
        }
    }

    #[inline]
    fn on_leave(&mut self, item: Pair<T>) {
        if item.is_present() {
            self.x.remove(item.0);
            self.y.remove(item.1);
        }
    }

    #[inline]
    fn count(&self) -> usize {
        self.x.count()
    }

    fn emit(&mut self, window: &[Pair<T>]) -> T {
        let n: T = cast(self.count());
        let cross = self.cross(window);
        if !self.correlate {
            return cross / (n - T::one());
        }

        let (vx, vy) = (self.x.variance(), self.y.variance());
        if vx == T::zero() || vy == T::zero() {
            return T::nan();
        }
        cross / (vx * vy).sqrt() / n
    }

    fn is_degenerate(&self) -> bool {
        self.x.is_degenerate() || self.y.is_degenerate()
    }

    fn recompute(&mut self, retained: &[Pair<T>]) {
        self.x.recompute(&[]);
        self.y.recompute(&[]);
        for &p in retained {
            self.on_enter(p);
        }
    }
}

fn run<T, O>(a: &[T], b: &[T], out: &mut O, params: Params, correlate: bool) -> Result<()>
where
    T: Float + Default,
    O: Output<T> + ?Sized,
{
    if b.len() != a.len() {
        return Err(Error::LengthMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }
    let pairs = zip_pairs(a, b);
    drive(
        &pairs,
        out,
        params.with_floor(PAIRED_FLOOR),
        T::nan(),
        PairedAccumulator::new(correlate),
    )
}

/// Rolling sample covariance of two aligned sequences
///
/// A position takes part only when both sequences are present there, and the
/// gate counts such positions. Needs at least three of them.
///
/// # Arguments
///
/// * `a` - The first sequence
/// * `b` - The second sequence, same length as `a`
/// * `out` - The destination, same length as `a`
/// * `window` - The window size
/// * `min_periods` - The minimum number of present pairs
///
/// # Returns
///
/// * `Result<()>` - An error if `b` or `out` differs in length from `a`
///
/// # Examples
///
/// ```
/// # use ta_rolling::moments;
/// # use assert_approx_eq::assert_approx_eq;
/// let x = [1.0_f64, 2.0, 3.0, 4.0];
/// let y = [2.0_f64, 4.0, 6.0, 8.0];
/// let mut out = [0.0_f64; 4];
/// moments::cov(&x, &y, &mut out[..], 3, 1).unwrap();
///
/// assert_approx_eq!(out[2], 2.0, 1e-12);
/// assert_approx_eq!(out[3], 2.0, 1e-12);
/// ```
pub fn cov<T, O>(a: &[T], b: &[T], out: &mut O, window: usize, min_periods: usize) -> Result<()>
where
    T: Float + Default,
    O: Output<T> + ?Sized,
{
    run(a, b, out, Params::new(window, min_periods), false)
}

/// Rolling Pearson correlation of two aligned sequences
///
/// Uses population variances. NaN when either sequence is constant over the
/// present pairs of the window.
pub fn corr<T, O>(a: &[T], b: &[T], out: &mut O, window: usize, min_periods: usize) -> Result<()>
where
    T: Float + Default,
    O: Output<T> + ?Sized,
{
    run(a, b, out, Params::new(window, min_periods), true)
}
