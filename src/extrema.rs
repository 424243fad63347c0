//! Rolling extrema tracked by a single pivot per ordering.
//!
//! Each kernel keeps only the current extremum and its position. An entering
//! value that ties or beats the pivot replaces it, so among equal extrema the
//! most recent one wins. When the pivot's position slides out of the window
//! the pivot is marked expired and the window is re-scanned at the next
//! emission. On monotone input this degrades
//! to O(W) per step; on typical market data expiry is rare.

use core::marker::PhantomData;

use num_traits::Float;

use crate::{
    Result,
    helper::{Missing, cast},
    window::{Accumulator, Output, Params, drive},
};

/// Ordering under which a pivot is kept
trait OrderPolicy<T> {
    /// Returns true if `candidate` should replace `pivot`
    fn should_replace(pivot: &T, candidate: &T) -> bool;
}

/// Order policy for minimum
#[derive(Debug, Clone)]
struct Min;

/// Order policy for maximum
#[derive(Debug, Clone)]
struct Max;

impl<T: PartialOrd> OrderPolicy<T> for Min {
    #[inline]
    fn should_replace(pivot: &T, candidate: &T) -> bool {
        candidate <= pivot
    }
}

impl<T: PartialOrd> OrderPolicy<T> for Max {
    #[inline]
    fn should_replace(pivot: &T, candidate: &T) -> bool {
        candidate >= pivot
    }
}

/// State of the tracked extremum
#[derive(Debug, Clone, Copy, PartialEq)]
enum PivotState<T> {
    /// No present value has been seen since the last re-scan
    Empty,
    /// The extremum and its absolute input position
    Valid { value: T, index: usize },
    /// The extremum left the window; the next read re-scans
    Expired,
}

/// Extremum of the present values in a sliding window
#[derive(Debug, Clone)]
struct Pivot<T, P> {
    state: PivotState<T>,
    _order: PhantomData<P>,
}

impl<T, P> Pivot<T, P>
where
    T: Float,
    P: OrderPolicy<T>,
{
    fn new() -> Self {
        Self {
            state: PivotState::Empty,
            _order: PhantomData,
        }
    }

    /// Offers the value entering at `index`
    #[inline]
    fn enter(&mut self, value: T, index: usize) {
        if value.is_missing() {
            return;
        }
        match self.state {
            PivotState::Empty => self.state = PivotState::Valid { value, index },
            PivotState::Valid { value: pivot, .. } if P::should_replace(&pivot, &value) => {
                self.state = PivotState::Valid { value, index }
            }
            _ => {}
        }
    }

    /// Notes that the value at `index` left the window
    #[inline]
    fn leave(&mut self, index: usize) {
        if matches!(self.state, PivotState::Valid { index: i, .. } if i == index) {
            self.state = PivotState::Expired;
        }
    }

    /// Returns the extremum of `window`, whose first item sits at `start`
    fn resolve(&mut self, window: &[T], start: usize) -> Option<(T, usize)> {
        if self.state == PivotState::Expired {
            self.state = PivotState::Empty;
            for (offset, &value) in window.iter().enumerate() {
                self.enter(value, start + offset);
            }
        }
        match self.state {
            PivotState::Valid { value, index } => Some((value, index)),
            _ => None,
        }
    }
}

/// Positions of the window edges and the present count
#[derive(Debug, Clone, Default)]
struct Cursor {
    entered: usize,
    left: usize,
    n: usize,
}

impl Cursor {
    /// Absolute position of the first item of a window ending at the newest
    #[inline]
    fn start(&self, len: usize) -> usize {
        self.entered - len
    }
}

/// What a single-pivot kernel reports
#[derive(Debug, Clone, Copy)]
enum Report {
    Value,
    Position,
}

#[derive(Debug, Clone)]
struct ExtremumAccumulator<T, P> {
    report: Report,
    cursor: Cursor,
    pivot: Pivot<T, P>,
}

impl<T, P> ExtremumAccumulator<T, P>
where
    T: Float,
    P: OrderPolicy<T>,
{
    fn new(report: Report) -> Self {
        Self {
            report,
            cursor: Cursor::default(),
            pivot: Pivot::new(),
        }
    }
}

impl<T, P> Accumulator<T> for ExtremumAccumulator<T, P>
where
    T: Float,
    P: OrderPolicy<T>,
{
    type Output = T;

    #[inline]
    fn on_enter(&mut self, item: T) {
        self.pivot.enter(item, self.cursor.entered);
        self.cursor.entered += 1;
        self.cursor.n += item.is_present() as usize;
    }

    #[inline]
    fn on_leave(&mut self, item: T) {
        self.pivot.leave(self.cursor.left);
        self.cursor.left += 1;
        self.cursor.n -= item.is_present() as usize;
    }

    #[inline]
    fn count(&self) -> usize {
        self.cursor.n
    }

    fn emit(&mut self, window: &[T]) -> T {
        let start = self.cursor.start(window.len());
        match (self.pivot.resolve(window, start), self.report) {
            (Some((value, _)), Report::Value) => value,
            (Some((_, index)), Report::Position) => cast::<T>(index - start) + T::one(),
            (None, _) => T::nan(),
        }
    }
}

/// Tracks both extrema for the min-max normalisation
#[derive(Debug, Clone)]
struct SpanAccumulator<T> {
    cursor: Cursor,
    max: Pivot<T, Max>,
    min: Pivot<T, Min>,
}

impl<T: Float> Accumulator<T> for SpanAccumulator<T> {
    type Output = T;

    #[inline]
    fn on_enter(&mut self, item: T) {
        self.max.enter(item, self.cursor.entered);
        self.min.enter(item, self.cursor.entered);
        self.cursor.entered += 1;
        self.cursor.n += item.is_present() as usize;
    }

    #[inline]
    fn on_leave(&mut self, item: T) {
        self.max.leave(self.cursor.left);
        self.min.leave(self.cursor.left);
        self.cursor.left += 1;
        self.cursor.n -= item.is_present() as usize;
    }

    #[inline]
    fn count(&self) -> usize {
        self.cursor.n
    }

    fn emit(&mut self, window: &[T]) -> T {
        let start = self.cursor.start(window.len());
        let max = self.max.resolve(window, start);
        let min = self.min.resolve(window, start);
        match (max, min, window.last()) {
            (Some((hi, _)), Some((lo, _)), Some(&newest)) => (newest - lo) / (hi - lo),
            _ => T::nan(),
        }
    }
}

fn run<T, P, O>(arr: &[T], out: &mut O, window: usize, min_periods: usize, report: Report) -> Result<()>
where
    T: Float,
    P: OrderPolicy<T>,
    O: Output<T> + ?Sized,
{
    let params = Params::new(window, min_periods);
    drive(arr, out, params, T::nan(), ExtremumAccumulator::<T, P>::new(report))
}

/// Rolling maximum of the present values
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
/// # use ta_rolling::extrema;
/// let input = [25.4_f64, 26.2, 26.0, 26.1, 25.8, 25.9, 26.3, 26.2, 26.5];
/// let mut out = [0.0_f64; 9];
/// extrema::max(&input, &mut out[..], 3, 1).unwrap();
///
/// assert_eq!(&out[2..], &[26.2, 26.2, 26.1, 26.1, 26.3, 26.3, 26.5]);
/// ```
pub fn max<T, O>(arr: &[T], out: &mut O, window: usize, min_periods: usize) -> Result<()>
where
    T: Float,
    O: Output<T> + ?Sized,
{
    run::<T, Max, O>(arr, out, window, min_periods, Report::Value)
}

/// Rolling minimum of the present values
///
/// # Examples
///
/// ```
/// # use ta_rolling::extrema;
/// let input = [25.4_f64, 26.2, 26.0, 26.1, 25.8, 25.9, 26.3, 26.2, 26.5];
/// let mut out = [0.0_f64; 9];
/// extrema::min(&input, &mut out[..], 3, 1).unwrap();
///
/// assert_eq!(&out[2..], &[25.4, 26.0, 25.8, 25.8, 25.8, 25.9, 26.2]);
/// ```
pub fn min<T, O>(arr: &[T], out: &mut O, window: usize, min_periods: usize) -> Result<()>
where
    T: Float,
    O: Output<T> + ?Sized,
{
    run::<T, Min, O>(arr, out, window, min_periods, Report::Value)
}

/// 1-based position of the rolling maximum inside its window
///
/// Position 1 is the oldest slot. Among equal maxima the most recent one is
/// reported.
pub fn argmax<T, O>(arr: &[T], out: &mut O, window: usize, min_periods: usize) -> Result<()>
where
    T: Float,
    O: Output<T> + ?Sized,
{
    run::<T, Max, O>(arr, out, window, min_periods, Report::Position)
}

/// 1-based position of the rolling minimum inside its window
pub fn argmin<T, O>(arr: &[T], out: &mut O, window: usize, min_periods: usize) -> Result<()>
where
    T: Float,
    O: Output<T> + ?Sized,
{
    run::<T, Min, O>(arr, out, window, min_periods, Report::Position)
}

/// Newest value rescaled into the window's `[min, max]` range
///
/// A flat window divides by zero and yields NaN or an infinity; a missing
/// newest value yields NaN.
pub fn minmaxnorm<T, O>(arr: &[T], out: &mut O, window: usize, min_periods: usize) -> Result<()>
where
    T: Float,
    O: Output<T> + ?Sized,
{
    let acc = SpanAccumulator {
        cursor: Cursor::default(),
        max: Pivot::new(),
        min: Pivot::new(),
    };
    drive(arr, out, Params::new(window, min_periods), T::nan(), acc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn apply(
        f: fn(&[f64], &mut [f64], usize, usize) -> Result<()>,
        input: &[f64],
        window: usize,
        min_periods: usize,
    ) -> Vec<f64> {
        let mut out = vec![0.0; input.len()];
        f(input, &mut out, window, min_periods).unwrap();
        out
    }

    /// Brute-force maximum over each full window
    fn naive_max(input: &[f64], window: usize) -> Vec<f64> {
        (0..input.len())
            .map(|end| {
                if end + 1 < window {
                    return f64::NAN;
                }
                input[end + 1 - window..=end]
                    .iter()
                    .copied()
                    .filter(|v| !v.is_nan())
                    .fold(f64::NAN, f64::max)
            })
            .collect()
    }

    #[test]
    fn max_and_argmax_of_short_series() {
        let out = apply(max, &[3.0, 1.0, 2.0], 3, 1);
        assert!(out[0].is_nan() && out[1].is_nan());
        assert_eq!(out[2], 3.0);
        let out = apply(argmax, &[3.0, 1.0, 2.0], 3, 1);
        assert_eq!(out[2], 1.0);
    }

    #[test]
    fn ties_report_the_most_recent() {
        let out = apply(argmax, &[5.0, 5.0, 5.0, 1.0], 3, 1);
        assert_eq!(out[2], 3.0);
        assert_eq!(out[3], 2.0);
        let out = apply(argmin, &[1.0, 2.0, 1.0], 3, 1);
        assert_eq!(out[2], 3.0);
    }

    #[test]
    fn expiry_rescans_the_window() {
        let input = [9.0_f64, 1.0, 2.0, 3.0, 8.0, 4.0, 1.0, 0.5];
        let out = apply(max, &input, 3, 1);
        let expected = naive_max(&input, 3);
        assert_eq!(&out[2..], &expected[2..]);
        let out = apply(argmax, &input, 3, 1);
        assert_eq!(&out[2..], &[1.0, 3.0, 3.0, 2.0, 1.0, 1.0]);
    }

    #[test]
    fn missing_values_never_become_pivots() {
        let input = [f64::NAN, 2.0, f64::NAN, f64::NAN, f64::NAN];
        let out = apply(min, &input, 2, 1);
        assert_eq!(out[1], 2.0);
        assert_eq!(out[2], 2.0);
        assert!(out[3].is_nan());
        assert!(out[4].is_nan());
        let out = apply(argmin, &input, 2, 0);
        assert_eq!(out[2], 1.0);
        assert!(out[3].is_nan());
    }

    #[test]
    fn min_tracks_falling_series() {
        let input = [25.4_f64, 26.2, 26.0, 26.1, 25.8, 25.9, 26.3, 26.2, 26.5];
        let out = apply(min, &input, 3, 1);
        assert_eq!(&out[2..], &[25.4, 26.0, 25.8, 25.8, 25.8, 25.9, 26.2]);
    }

    #[test]
    fn minmaxnorm_rescales_newest() {
        let out = apply(minmaxnorm, &[2.0, 4.0, 3.0, 6.0], 3, 1);
        assert_eq!(out[2], 0.5);
        assert_eq!(out[3], 1.0);
    }

    #[test]
    fn minmaxnorm_of_flat_window_is_nan() {
        let out = apply(minmaxnorm, &[1.0, 1.0, 1.0], 3, 1);
        assert!(out[2].is_nan());
    }

    #[test]
    fn pivot_state_transitions() {
        let mut pivot = Pivot::<f64, Max>::new();
        pivot.enter(f64::NAN, 0);
        assert_eq!(pivot.state, PivotState::Empty);
        pivot.enter(3.0, 1);
        pivot.enter(2.0, 2);
        assert_eq!(pivot.state, PivotState::Valid { value: 3.0, index: 1 });
        pivot.leave(0);
        assert_eq!(pivot.state, PivotState::Valid { value: 3.0, index: 1 });
        pivot.leave(1);
        assert_eq!(pivot.state, PivotState::Expired);
        assert_eq!(pivot.resolve(&[2.0], 2), Some((2.0, 2)));
    }
}
