//! Weighted moving averages.
//!
//! [`ema`] applies caller-supplied weights to each full window and is O(W)
//! per step; [`ema_weights`] builds the conventional exponential weights for
//! it. [`wma`] keeps a linearly weighted running sum and updates it in O(1).

use alloc::vec::Vec;

use num_traits::Float;

use crate::{
    Error, Result, RunningSum,
    helper::{Missing, cast, lit},
    window::{Accumulator, Output, Params, drive},
};

/// Applies fixed weights, oldest to newest, to each window
#[derive(Debug, Clone)]
struct ExplicitWeights<'w, T> {
    weights: &'w [T],
    n: usize,
}

impl<T: Float> Accumulator<T> for ExplicitWeights<'_, T> {
    type Output = T;

    #[inline]
    fn on_enter(&mut self, item: T) {
        self.n += item.is_present() as usize;
    }

    #[inline]
    fn on_leave(&mut self, item: T) {
        self.n -= item.is_present() as usize;
    }

    #[inline]
    fn count(&self) -> usize {
        self.n
    }

    fn emit(&mut self, window: &[T]) -> T {
        if self.n == 0 {
            return T::nan();
        }
        let (total, used) = window
            .iter()
            .zip(self.weights)
            .filter(|(v, _)| v.is_present())
            .fold((T::zero(), T::zero()), |(total, used), (&v, &w)| {
                (total + v * w, used + w)
            });

        // Renormalise only when part of the window is missing
        if self.n < window.len() {
            total / used
        } else {
            total
        }
    }
}

/// Rolling exponentially weighted average with explicit weights
///
/// Each full window is combined with `weights`, ordered oldest to newest.
/// When some values are missing the result is divided by the sum of the
/// weights actually used. A complete window applies the weights as given
/// without normalising them, so pass weights summing to 1 (such as those of
/// [`ema_weights`]) to get an average.
///
/// # Arguments
///
/// * `arr` - The input sequence, NaN marking missing values
/// * `weights` - One weight per window slot, `weights.len() == window`
/// * `out` - The destination, same length as `arr`
/// * `window` - The window size
/// * `min_periods` - The minimum number of present values
///
/// # Returns
///
/// * `Result<()>` - An error if `weights` or `out` has the wrong length
///
/// # Examples
///
/// ```
/// # use ta_rolling::weighted;
/// # use assert_approx_eq::assert_approx_eq;
/// let input = [1.0_f64, 2.0, 3.0, f64::NAN];
/// let weights = [0.2_f64, 0.3, 0.5];
/// let mut out = [0.0_f64; 4];
/// weighted::ema(&input, &weights, &mut out[..], 3, 1).unwrap();
///
/// assert_approx_eq!(out[2], 2.3, 1e-12);
/// // (2.0 * 0.2 + 3.0 * 0.3) / 0.5
/// assert_approx_eq!(out[3], 2.6, 1e-12);
/// ```
pub fn ema<T, O>(
    arr: &[T],
    weights: &[T],
    out: &mut O,
    window: usize,
    min_periods: usize,
) -> Result<()>
where
    T: Float,
    O: Output<T> + ?Sized,
{
    if weights.len() != window {
        return Err(Error::WeightLength {
            expected: window,
            actual: weights.len(),
        });
    }
    let acc = ExplicitWeights { weights, n: 0 };
    drive(arr, out, Params::new(window, min_periods), T::nan(), acc)
}

/// Normalised exponential weights for [`ema`], oldest to newest
///
/// Uses the span convention `alpha = 2 / window`: slot `j` gets a weight
/// proportional to `(1 − alpha)^(window − 1 − j)`, and the weights sum to 1.
///
/// # Examples
///
/// ```
/// # use ta_rolling::weighted;
/// # use assert_approx_eq::assert_approx_eq;
/// let w: Vec<f64> = weighted::ema_weights(4);
/// assert_approx_eq!(w.iter().sum::<f64>(), 1.0, 1e-12);
/// assert!(w.windows(2).all(|p| p[0] < p[1]));
/// ```
pub fn ema_weights<T: Float>(window: usize) -> Vec<T> {
    if window == 0 {
        return Vec::new();
    }
    let alpha = lit::<T>(2.0) / cast(window);
    let decay = T::one() - alpha;

    let mut weights: Vec<T> = (0..window)
        .map(|j| decay.powi((window - 1 - j) as i32))
        .collect();
    let total = weights.iter().fold(T::zero(), |acc, &w| acc + w);
    weights.iter_mut().for_each(|w| *w = *w / total);
    weights
}

/// Linearly weighted running sums
///
/// The slot at offset `k` from the window start carries weight `k + 1`. Only
/// finite values enter the weighted sum; an infinity in the window decides
/// the result on its own through `sum`.
#[derive(Debug, Clone)]
struct LinearWeights<T> {
    window: usize,
    entered: usize,
    n: usize,
    sum: RunningSum<T>,
    weighted: RunningSum<T>,
}

impl<T: Float + Default> LinearWeights<T> {
    fn new(window: usize) -> Self {
        Self {
            window,
            entered: 0,
            n: 0,
            sum: Default::default(),
            weighted: Default::default(),
        }
    }
}

impl<T: Float + Default> Accumulator<T> for LinearWeights<T> {
    type Output = T;

    #[inline]
    fn on_enter(&mut self, item: T) {
        self.entered += 1;
        if item.is_missing() {
            return;
        }
        self.n += 1;
        self.sum += item;
        if item.is_finite() {
            self.weighted += item * cast(self.entered.min(self.window));
        }
    }

    // Every remaining slot moves one step closer to the trailing edge
    #[inline]
    fn on_leave(&mut self, item: T) {
        self.weighted -= self.sum.finite_total();
        if item.is_present() {
            self.n -= 1;
            self.sum -= item;
        }
    }

    #[inline]
    fn count(&self) -> usize {
        self.n
    }

    fn emit(&mut self, _window: &[T]) -> T {
        if self.n == 0 {
            return T::nan();
        }
        // positive weights keep the sign of an infinite sum
        let total = self.sum.total();
        if !total.is_finite() {
            return total;
        }
        let n: T = cast(self.n);
        self.weighted.total() / (n * (n + T::one()) / lit(2.0))
    }

    fn is_degenerate(&self) -> bool {
        self.sum.is_degenerate() || !self.weighted.total().is_finite()
    }

    fn recompute(&mut self, retained: &[T]) {
        self.n = 0;
        self.sum = Default::default();
        self.weighted = Default::default();
        for (k, &v) in retained.iter().enumerate() {
            if v.is_present() {
                self.n += 1;
                self.sum += v;
                if v.is_finite() {
                    self.weighted += v * cast(k + 1);
                }
            }
        }
    }
}

/// Rolling linearly weighted moving average
///
/// The newest slot has weight `window`, the oldest weight 1. The weighted sum
/// of the present values is divided by `n(n + 1) / 2` where `n` is the number
/// of present values.
///
/// # Examples
///
/// ```
/// # use ta_rolling::weighted;
/// let input = [1.0_f64, 2.0, 3.0, 4.0];
/// let mut out = [0.0_f64; 4];
/// weighted::wma(&input, &mut out[..], 3, 1).unwrap();
///
/// // (1 + 4 + 9) / 6 and (2 + 6 + 12) / 6
/// assert_eq!(out[2], 14.0 / 6.0);
/// assert_eq!(out[3], 20.0 / 6.0);
/// ```
pub fn wma<T, O>(arr: &[T], out: &mut O, window: usize, min_periods: usize) -> Result<()>
where
    T: Float + Default,
    O: Output<T> + ?Sized,
{
    let params = Params::new(window, min_periods);
    drive(arr, out, params, T::nan(), LinearWeights::new(window))
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;

    use super::*;

    /// Direct weighted average of each full window
    fn naive_wma(input: &[f64], window: usize) -> Vec<f64> {
        (0..input.len())
            .map(|end| {
                if end + 1 < window {
                    return f64::NAN;
                }
                let slots = &input[end + 1 - window..=end];
                let n = slots.iter().filter(|v| !v.is_nan()).count() as f64;
                let total: f64 = slots
                    .iter()
                    .enumerate()
                    .filter(|(_, v)| !v.is_nan())
                    .map(|(k, v)| v * (k + 1) as f64)
                    .sum();
                total / (n * (n + 1.0) / 2.0)
            })
            .collect()
    }

    #[test]
    fn wma_matches_direct_weighting() {
        let input = [25.4_f64, 26.2, 26.0, 26.1, 25.8, 25.9, 26.3, 26.2, 26.5];
        let mut out = [0.0_f64; 9];
        wma(&input, &mut out[..], 4, 1).unwrap();
        let expected = naive_wma(&input, 4);
        for i in 3..9 {
            assert_approx_eq!(out[i], expected[i], 1e-9);
        }
    }

    #[test]
    fn wma_shifts_weights_past_missing_values() {
        let input = [1.0_f64, f64::NAN, 3.0, 4.0, 5.0, f64::NAN, 7.0];
        let mut out = [0.0_f64; 7];
        wma(&input, &mut out[..], 3, 1).unwrap();
        let expected = naive_wma(&input, 3);
        for i in 2..7 {
            assert_approx_eq!(out[i], expected[i], 1e-9);
        }
    }

    #[test]
    fn wma_recovers_after_infinity_leaves() {
        let input = [1.0_f64, f64::INFINITY, 2.0, 3.0, 4.0, 5.0];
        let mut out = [0.0_f64; 6];
        wma(&input, &mut out[..], 2, 1).unwrap();
        assert_eq!(out[1], f64::INFINITY);
        assert_eq!(out[2], f64::INFINITY);
        assert_eq!(out[3], 8.0 / 3.0);
        assert_eq!(out[4], 11.0 / 3.0);
        assert_eq!(out[5], 14.0 / 3.0);
    }

    #[test]
    fn wma_of_opposite_infinities_is_nan() {
        let input = [f64::INFINITY, f64::NEG_INFINITY, 1.0];
        let mut out = [0.0_f64; 3];
        wma(&input, &mut out[..], 2, 1).unwrap();
        assert!(out[1].is_nan());
        assert_eq!(out[2], f64::NEG_INFINITY);
    }

    #[test]
    fn ema_rejects_wrong_weight_length() {
        let mut out = [0.0_f64; 3];
        let err = ema(&[1.0, 2.0, 3.0], &[0.5, 0.5], &mut out[..], 3, 1);
        assert_eq!(
            err,
            Err(Error::WeightLength {
                expected: 3,
                actual: 2
            })
        );
    }

    #[test]
    fn ema_applies_full_window_weights_as_given() {
        let input = [1.0_f64, 2.0, f64::NAN];
        let mut out = [0.0_f64; 3];
        ema(&input, &[1.0, 1.0], &mut out[..], 2, 1).unwrap();
        assert_eq!(out[1], 3.0);
        // renormalised over the single present value
        assert_eq!(out[2], 2.0);
    }

    #[test]
    fn ema_of_all_missing_window_is_nan() {
        let input = [f64::NAN, f64::NAN];
        let mut out = [0.0_f64; 2];
        ema(&input, &[0.5, 0.5], &mut out[..], 2, 0).unwrap();
        assert!(out[1].is_nan());
    }

    #[test]
    fn ema_weights_follow_span_convention() {
        let w: Vec<f64> = ema_weights(3);
        // alpha = 2/3, raw weights 1/9, 1/3, 1
        let raw = [1.0 / 9.0, 1.0 / 3.0, 1.0];
        let total: f64 = raw.iter().sum();
        for (got, r) in w.iter().zip(raw) {
            assert_approx_eq!(*got, r / total, 1e-12);
        }
        assert!(ema_weights::<f64>(0).is_empty());
    }
}
