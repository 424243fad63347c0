//! Rolling least-squares fits.
//!
//! The trend kernels ([`reg`], [`tsf`], [`reg_slope`], [`reg_intercept`],
//! [`reg_resid_mean`]) regress each window on the time index `t = 1..=W`. The index sums depend
//! only on `W` and are computed once per call; the value sums are re-scanned
//! every step.
//!
//! The `regx_*` kernels regress one sequence on another over the same window,
//! keeping compensated running sums of both. The residual statistics re-scan
//! the window under the current fit.

use num_traits::Float;

use crate::{
    Error, Result, RunningSum,
    helper::{Missing, Pair, cast, lit, zip_pairs},
    moments::adjusted_skew,
    window::{Accumulator, Output, Params, drive},
};

/// Sums of the time index `t = 1..=window`
#[derive(Debug, Clone, Copy)]
struct TimeIndex<T> {
    window: T,
    sum_t: T,
    divisor: T,
}

impl<T: Float> TimeIndex<T> {
    fn new(window: usize) -> Self {
        let w: T = cast(window);
        let _1 = T::one();
        let _2 = lit::<T>(2.0);
        let sum_t = w * (w + _1) / _2;
        let sum_t2 = w * (w + _1) * (_2 * w + _1) / lit(6.0);
        Self {
            window: w,
            sum_t,
            divisor: w * sum_t2 - sum_t * sum_t,
        }
    }
}

/// Output of a trend fit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trend {
    /// Fitted value at the newest slot
    Fitted,
    /// Fitted value one step past the window
    Forecast,
    Slope,
    Intercept,
    /// Mean squared residual of the present values
    ResidualMean,
}

#[derive(Debug, Clone)]
struct TrendAccumulator<T> {
    trend: Trend,
    index: TimeIndex<T>,
    n: usize,
}

impl<T: Float> Accumulator<T> for TrendAccumulator<T> {
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
        let (sum_y, sum_ty) = window
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_present())
            .fold((T::zero(), T::zero()), |(sy, sty), (k, &v)| {
                (sy + v, sty + cast::<T>(k + 1) * v)
            });

        let TimeIndex {
            window: w,
            sum_t,
            divisor,
        } = self.index;
        let slope = (w * sum_ty - sum_t * sum_y) / divisor;
        let level = sum_y - slope * sum_t;
        let intercept = level / cast(self.n);

        match self.trend {
            Trend::Fitted => intercept + slope * w,
            Trend::Forecast => intercept + slope * (w + T::one()),
            Trend::Slope => slope,
            Trend::Intercept => level / w,
            Trend::ResidualMean => {
                let ss = window
                    .iter()
                    .enumerate()
                    .filter(|(_, v)| v.is_present())
                    .fold(T::zero(), |acc, (k, &v)| {
                        let r = v - intercept - slope * cast::<T>(k + 1);
                        acc + r * r
                    });
                ss / cast(self.n)
            }
        }
    }
}

fn run_trend<T, O>(arr: &[T], out: &mut O, window: usize, min_periods: usize, trend: Trend) -> Result<()>
where
    T: Float,
    O: Output<T> + ?Sized,
{
    let acc = TrendAccumulator {
        trend,
        index: TimeIndex::new(window),
        n: 0,
    };
    drive(arr, out, Params::new(window, min_periods), T::nan(), acc)
}

/// Rolling linear regression value at the newest slot, `a + b·W`
///
/// Missing values are skipped in the value sums; the intercept divides by the
/// number of present values.
///
/// # Examples
///
/// ```
/// # use ta_rolling::regression;
/// # use assert_approx_eq::assert_approx_eq;
/// let input = [1.0_f64, 2.0, 3.0, 4.0, 5.0];
/// let mut out = [0.0_f64; 5];
/// regression::reg(&input, &mut out[..], 3, 1).unwrap();
///
/// assert_approx_eq!(out[2], 3.0, 1e-12);
/// assert_approx_eq!(out[4], 5.0, 1e-12);
/// ```
pub fn reg<T, O>(arr: &[T], out: &mut O, window: usize, min_periods: usize) -> Result<()>
where
    T: Float,
    O: Output<T> + ?Sized,
{
    run_trend(arr, out, window, min_periods, Trend::Fitted)
}

/// Rolling time series forecast, the fit extended one step, `a + b·(W + 1)`
pub fn tsf<T, O>(arr: &[T], out: &mut O, window: usize, min_periods: usize) -> Result<()>
where
    T: Float,
    O: Output<T> + ?Sized,
{
    run_trend(arr, out, window, min_periods, Trend::Forecast)
}

/// Rolling slope of the fit against the time index
pub fn reg_slope<T, O>(arr: &[T], out: &mut O, window: usize, min_periods: usize) -> Result<()>
where
    T: Float,
    O: Output<T> + ?Sized,
{
    run_trend(arr, out, window, min_periods, Trend::Slope)
}

/// Rolling intercept of the fit against the time index
///
/// Unlike [`reg`] and [`tsf`] the intercept is divided by the window size,
/// not by the number of present values, so the two disagree on windows with
/// missing values.
pub fn reg_intercept<T, O>(arr: &[T], out: &mut O, window: usize, min_periods: usize) -> Result<()>
where
    T: Float,
    O: Output<T> + ?Sized,
{
    run_trend(arr, out, window, min_periods, Trend::Intercept)
}

/// Rolling mean squared residual of the fit against the time index
///
/// Residuals are taken from the same line as [`reg`], over the present values
/// only.
pub fn reg_resid_mean<T, O>(arr: &[T], out: &mut O, window: usize, min_periods: usize) -> Result<()>
where
    T: Float,
    O: Output<T> + ?Sized,
{
    run_trend(arr, out, window, min_periods, Trend::ResidualMean)
}

/// Output of a two-sequence fit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fit {
    Beta,
    Alpha,
    ResidualMean,
    ResidualStd,
    ResidualSkew,
}

impl Fit {
    /// Smallest number of present pairs the output is defined for
    const fn floor(self) -> usize {
        match self {
            Fit::ResidualSkew => 3,
            _ => 2,
        }
    }
}

/// Residuals of the present pairs under `y = alpha + beta·x`
fn residuals<T: Float>(window: &[Pair<T>], beta: T, alpha: T) -> impl Iterator<Item = T> + '_ {
    window
        .iter()
        .filter(|p| p.is_present())
        .map(move |&Pair(y, x)| y - alpha - beta * x)
}

/// Running sums of `(y, x)` pairs present in the window
#[derive(Debug, Clone)]
struct CrossSums<T> {
    fit: Fit,
    n: usize,
    sum_y: RunningSum<T>,
    sum_x: RunningSum<T>,
    sum_xx: RunningSum<T>,
    sum_xy: RunningSum<T>,
}

impl<T: Float + Default> CrossSums<T> {
    fn new(fit: Fit) -> Self {
        Self {
            fit,
            n: 0,
            sum_y: Default::default(),
            sum_x: Default::default(),
            sum_xx: Default::default(),
            sum_xy: Default::default(),
        }
    }

    /// Returns `(beta, alpha)` of `y = alpha + beta·x`
    fn coefficients(&self) -> (T, T) {
        let n: T = cast(self.n);
        let (sy, sx) = (self.sum_y.total(), self.sum_x.total());
        let beta = (n * self.sum_xy.total() - sx * sy) / (n * self.sum_xx.total() - sx * sx);
        (beta, (sy - beta * sx) / n)
    }

    /// Mean of the residuals of the present pairs
    fn residual_mean(&self, window: &[Pair<T>], beta: T, alpha: T) -> T {
        let total = residuals(window, beta, alpha).fold(T::zero(), |acc, r| acc + r);
        total / cast(self.n)
    }

    /// Sample deviation of the residuals of the present pairs
    fn residual_std(&self, window: &[Pair<T>], beta: T, alpha: T) -> T {
        let mean = self.residual_mean(window, beta, alpha);
        let ss = residuals(window, beta, alpha).fold(T::zero(), |acc, r| {
            let d = r - mean;
            acc + d * d
        });
        (ss / (cast::<T>(self.n) - T::one())).sqrt()
    }

    /// Bias-corrected skewness of the residuals of the present pairs
    fn residual_skew(&self, window: &[Pair<T>], beta: T, alpha: T) -> T {
        let mean = self.residual_mean(window, beta, alpha);
        let (m2, m3) = residuals(window, beta, alpha).fold((T::zero(), T::zero()), |(m2, m3), r| {
            let d = r - mean;
            (m2 + d * d, m3 + d * d * d)
        });
        let n: T = cast(self.n);
        adjusted_skew(self.n, m2 / n, m3 / n)
    }
}

impl<T: Float + Default> Accumulator<Pair<T>> for CrossSums<T> {
    type Output = T;

    #[inline]
    fn on_enter(&mut self, item: Pair<T>) {
        if item.is_missing() {
            return;
        }
        let Pair(y, x) = item;
        self.n += 1;
        self.sum_y += y;
        self.sum_x += x;
        self.sum_xx += x * x;
        self.sum_xy += x * y;
    }

    #[inline]
    fn on_leave(&mut self, item: Pair<T>) {
        if item.is_missing() {
            return;
        }
        let Pair(y, x) = item;
        self.n -= 1;
        self.sum_y -= y;
        self.sum_x -= x;
        self.sum_xx -= x * x;
        self.sum_xy -= x * y;
    }

    #[inline]
    fn count(&self) -> usize {
        self.n
    }

    fn emit(&mut self, window: &[Pair<T>]) -> T {
        let (beta, alpha) = self.coefficients();
        match self.fit {
            Fit::Beta => beta,
            Fit::Alpha => alpha,
            Fit::ResidualMean => self.residual_mean(window, beta, alpha),
            Fit::ResidualStd => self.residual_std(window, beta, alpha),
            Fit::ResidualSkew => self.residual_skew(window, beta, alpha),
        }
    }

    fn is_degenerate(&self) -> bool {
        [&self.sum_y, &self.sum_x, &self.sum_xx, &self.sum_xy]
            .iter()
            .any(|s| s.is_degenerate())
    }

    fn recompute(&mut self, retained: &[Pair<T>]) {
        *self = Self::new(self.fit);
        for &p in retained {
            self.on_enter(p);
        }
    }
}

fn run_fit<T, O>(y: &[T], x: &[T], out: &mut O, window: usize, min_periods: usize, fit: Fit) -> Result<()>
where
    T: Float + Default,
    O: Output<T> + ?Sized,
{
    if x.len() != y.len() {
        return Err(Error::LengthMismatch {
            expected: y.len(),
            actual: x.len(),
        });
    }
    let params = Params::new(window, min_periods).with_floor(fit.floor());
    drive(&zip_pairs(y, x), out, params, T::nan(), CrossSums::new(fit))
}

/// Rolling slope of `y` regressed on `x`
///
/// A position takes part only when both sequences are present there. Needs at
/// least two such positions.
///
/// # Arguments
///
/// * `y` - The dependent sequence
/// * `x` - The explanatory sequence, same length as `y`
/// * `out` - The destination, same length as `y`
/// * `window` - The window size
/// * `min_periods` - The minimum number of present pairs
///
/// # Returns
///
/// * `Result<()>` - An error if `x` or `out` differs in length from `y`
///
/// # Examples
///
/// ```
/// # use ta_rolling::regression;
/// let x = [1.0_f64, 2.0, 3.0, 4.0, 5.0];
/// let y = [3.0_f64, 5.0, 7.0, 9.0, 11.0];
/// let mut out = [0.0_f64; 5];
/// regression::regx_beta(&y, &x, &mut out[..], 3, 1).unwrap();
///
/// assert_eq!(&out[2..], &[2.0, 2.0, 2.0]);
/// ```
pub fn regx_beta<T, O>(y: &[T], x: &[T], out: &mut O, window: usize, min_periods: usize) -> Result<()>
where
    T: Float + Default,
    O: Output<T> + ?Sized,
{
    run_fit(y, x, out, window, min_periods, Fit::Beta)
}

/// Rolling intercept of `y` regressed on `x`
pub fn regx_alpha<T, O>(y: &[T], x: &[T], out: &mut O, window: usize, min_periods: usize) -> Result<()>
where
    T: Float + Default,
    O: Output<T> + ?Sized,
{
    run_fit(y, x, out, window, min_periods, Fit::Alpha)
}

/// Rolling sample standard deviation of the residuals of `y` on `x`
///
/// The fit uses the running sums; the residuals are re-scanned over the
/// window.
pub fn regx_resid_std<T, O>(y: &[T], x: &[T], out: &mut O, window: usize, min_periods: usize) -> Result<()>
where
    T: Float + Default,
    O: Output<T> + ?Sized,
{
    run_fit(y, x, out, window, min_periods, Fit::ResidualStd)
}

/// Rolling mean of the residuals of `y` on `x`
///
/// Close to zero whenever the fit has an intercept; a large value points at
/// cancellation in the running sums.
pub fn regx_resid_mean<T, O>(y: &[T], x: &[T], out: &mut O, window: usize, min_periods: usize) -> Result<()>
where
    T: Float + Default,
    O: Output<T> + ?Sized,
{
    run_fit(y, x, out, window, min_periods, Fit::ResidualMean)
}

/// Rolling bias-corrected skewness of the residuals of `y` on `x`
///
/// Needs at least three present pairs. Residuals without spread give NaN.
pub fn regx_resid_skew<T, O>(y: &[T], x: &[T], out: &mut O, window: usize, min_periods: usize) -> Result<()>
where
    T: Float + Default,
    O: Output<T> + ?Sized,
{
    run_fit(y, x, out, window, min_periods, Fit::ResidualSkew)
}
