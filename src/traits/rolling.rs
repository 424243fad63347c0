use alloc::vec::Vec;

use num_traits::Float;

use crate::{
    Result, extrema, moments,
    rank::{self, RankOptions},
    regression, weighted,
};

/// Allocating front end to the rolling kernels
///
/// Every method runs the kernel of the same name (without the `ts_` prefix)
/// over the whole slice and returns a freshly allocated output of the same
/// length. Use the kernels directly to write into an existing or strided
/// buffer.
///
/// # Examples
///
/// ```
/// use ta_rolling::Rolling;
///
/// let prices = [25.4_f64, 26.2, 26.0, 26.1, 25.8];
/// let sma = prices.ts_sma(3, 3).unwrap();
///
/// assert!(sma[1].is_nan());
/// assert_eq!(sma.len(), prices.len());
/// ```
pub trait Rolling<T> {
    /// Rolling sum, see [`moments::sum`]
    fn ts_sum(&self, window: usize, min_periods: usize) -> Result<Vec<T>>;

    /// Rolling arithmetic mean, see [`moments::sma`]
    fn ts_sma(&self, window: usize, min_periods: usize) -> Result<Vec<T>>;

    /// Rolling product, see [`moments::prod`]
    fn ts_prod(&self, window: usize, min_periods: usize) -> Result<Vec<T>>;

    /// Rolling geometric mean, see [`moments::prod_mean`]
    fn ts_prod_mean(&self, window: usize, min_periods: usize) -> Result<Vec<T>>;

    /// Rolling sample variance, see [`moments::var`]
    fn ts_var(&self, window: usize, min_periods: usize) -> Result<Vec<T>>;

    /// Rolling sample standard deviation, see [`moments::std`]
    fn ts_std(&self, window: usize, min_periods: usize) -> Result<Vec<T>>;

    /// Rolling skewness, see [`moments::skew`]
    fn ts_skew(&self, window: usize, min_periods: usize) -> Result<Vec<T>>;

    /// Rolling excess kurtosis, see [`moments::kurt`]
    fn ts_kurt(&self, window: usize, min_periods: usize) -> Result<Vec<T>>;

    /// Rolling signal stability, see [`moments::stable`]
    fn ts_stable(&self, window: usize, min_periods: usize) -> Result<Vec<T>>;

    /// Rolling z-score of the newest value, see [`moments::meanstdnorm`]
    fn ts_meanstdnorm(&self, window: usize, min_periods: usize) -> Result<Vec<T>>;

    /// Rolling covariance with `other`, see [`moments::cov`]
    fn ts_cov(&self, other: &[T], window: usize, min_periods: usize) -> Result<Vec<T>>;

    /// Rolling correlation with `other`, see [`moments::corr`]
    fn ts_corr(&self, other: &[T], window: usize, min_periods: usize) -> Result<Vec<T>>;

    /// Rolling maximum, see [`extrema::max`]
    fn ts_max(&self, window: usize, min_periods: usize) -> Result<Vec<T>>;

    /// Rolling minimum, see [`extrema::min`]
    fn ts_min(&self, window: usize, min_periods: usize) -> Result<Vec<T>>;

    /// Position of the rolling maximum, see [`extrema::argmax`]
    fn ts_argmax(&self, window: usize, min_periods: usize) -> Result<Vec<T>>;

    /// Position of the rolling minimum, see [`extrema::argmin`]
    fn ts_argmin(&self, window: usize, min_periods: usize) -> Result<Vec<T>>;

    /// Min-max normalised newest value, see [`extrema::minmaxnorm`]
    fn ts_minmaxnorm(&self, window: usize, min_periods: usize) -> Result<Vec<T>>;

    /// Weighted average with explicit weights, see [`weighted::ema`]
    fn ts_ema(&self, weights: &[T], window: usize, min_periods: usize) -> Result<Vec<T>>;

    /// Exponential average with [`weighted::ema_weights`]
    fn ts_ewm(&self, window: usize, min_periods: usize) -> Result<Vec<T>>;

    /// Linearly weighted average, see [`weighted::wma`]
    fn ts_wma(&self, window: usize, min_periods: usize) -> Result<Vec<T>>;

    /// Rank of the newest value, see [`rank::rank`]
    fn ts_rank(&self, window: usize, min_periods: usize, options: RankOptions) -> Result<Vec<T>>;

    /// Fitted trend value, see [`regression::reg`]
    fn ts_reg(&self, window: usize, min_periods: usize) -> Result<Vec<T>>;

    /// Trend forecast, see [`regression::tsf`]
    fn ts_tsf(&self, window: usize, min_periods: usize) -> Result<Vec<T>>;

    /// Trend slope, see [`regression::reg_slope`]
    fn ts_reg_slope(&self, window: usize, min_periods: usize) -> Result<Vec<T>>;

    /// Trend intercept, see [`regression::reg_intercept`]
    fn ts_reg_intercept(&self, window: usize, min_periods: usize) -> Result<Vec<T>>;

    /// Mean squared residual of the trend, see [`regression::reg_resid_mean`]
    fn ts_reg_resid_mean(&self, window: usize, min_periods: usize) -> Result<Vec<T>>;

    /// Slope of `self` regressed on `x`, see [`regression::regx_beta`]
    fn ts_regx_beta(&self, x: &[T], window: usize, min_periods: usize) -> Result<Vec<T>>;

    /// Intercept of `self` regressed on `x`, see [`regression::regx_alpha`]
    fn ts_regx_alpha(&self, x: &[T], window: usize, min_periods: usize) -> Result<Vec<T>>;

    /// Residual deviation of `self` regressed on `x`, see
    /// [`regression::regx_resid_std`]
    fn ts_regx_resid_std(&self, x: &[T], window: usize, min_periods: usize) -> Result<Vec<T>>;

    /// Residual mean of `self` regressed on `x`, see
    /// [`regression::regx_resid_mean`]
    fn ts_regx_resid_mean(&self, x: &[T], window: usize, min_periods: usize) -> Result<Vec<T>>;

    /// Residual skewness of `self` regressed on `x`, see
    /// [`regression::regx_resid_skew`]
    fn ts_regx_resid_skew(&self, x: &[T], window: usize, min_periods: usize) -> Result<Vec<T>>;
}

/// Allocates an output of `len` positions and lets `kernel` fill it
#[inline]
fn allocate<T, F>(len: usize, kernel: F) -> Result<Vec<T>>
where
    T: Float,
    F: FnOnce(&mut [T]) -> Result<()>,
{
    let mut out = vec![T::nan(); len];
    kernel(&mut out)?;
    Ok(out)
}

impl<T: Float + Default> Rolling<T> for [T] {
    fn ts_sum(&self, window: usize, min_periods: usize) -> Result<Vec<T>> {
        allocate(self.len(), |out| moments::sum(self, out, window, min_periods))
    }

    fn ts_sma(&self, window: usize, min_periods: usize) -> Result<Vec<T>> {
        allocate(self.len(), |out| moments::sma(self, out, window, min_periods))
    }

    fn ts_prod(&self, window: usize, min_periods: usize) -> Result<Vec<T>> {
        allocate(self.len(), |out| moments::prod(self, out, window, min_periods))
    }

    fn ts_prod_mean(&self, window: usize, min_periods: usize) -> Result<Vec<T>> {
        allocate(self.len(), |out| moments::prod_mean(self, out, window, min_periods))
    }

    fn ts_var(&self, window: usize, min_periods: usize) -> Result<Vec<T>> {
        allocate(self.len(), |out| moments::var(self, out, window, min_periods))
    }

    fn ts_std(&self, window: usize, min_periods: usize) -> Result<Vec<T>> {
        allocate(self.len(), |out| moments::std(self, out, window, min_periods))
    }

    fn ts_skew(&self, window: usize, min_periods: usize) -> Result<Vec<T>> {
        allocate(self.len(), |out| moments::skew(self, out, window, min_periods))
    }

    fn ts_kurt(&self, window: usize, min_periods: usize) -> Result<Vec<T>> {
        allocate(self.len(), |out| moments::kurt(self, out, window, min_periods))
    }

    fn ts_stable(&self, window: usize, min_periods: usize) -> Result<Vec<T>> {
        allocate(self.len(), |out| moments::stable(self, out, window, min_periods))
    }

    fn ts_meanstdnorm(&self, window: usize, min_periods: usize) -> Result<Vec<T>> {
        allocate(self.len(), |out| {
            moments::meanstdnorm(self, out, window, min_periods)
        })
    }

    fn ts_cov(&self, other: &[T], window: usize, min_periods: usize) -> Result<Vec<T>> {
        allocate(self.len(), |out| {
            moments::cov(self, other, out, window, min_periods)
        })
    }

    fn ts_corr(&self, other: &[T], window: usize, min_periods: usize) -> Result<Vec<T>> {
        allocate(self.len(), |out| {
            moments::corr(self, other, out, window, min_periods)
        })
    }

    fn ts_max(&self, window: usize, min_periods: usize) -> Result<Vec<T>> {
        allocate(self.len(), |out| extrema::max(self, out, window, min_periods))
    }

    fn ts_min(&self, window: usize, min_periods: usize) -> Result<Vec<T>> {
        allocate(self.len(), |out| extrema::min(self, out, window, min_periods))
    }

    fn ts_argmax(&self, window: usize, min_periods: usize) -> Result<Vec<T>> {
        allocate(self.len(), |out| extrema::argmax(self, out, window, min_periods))
    }

    fn ts_argmin(&self, window: usize, min_periods: usize) -> Result<Vec<T>> {
        allocate(self.len(), |out| extrema::argmin(self, out, window, min_periods))
    }

    fn ts_minmaxnorm(&self, window: usize, min_periods: usize) -> Result<Vec<T>> {
        allocate(self.len(), |out| {
            extrema::minmaxnorm(self, out, window, min_periods)
        })
    }

    fn ts_ema(&self, weights: &[T], window: usize, min_periods: usize) -> Result<Vec<T>> {
        allocate(self.len(), |out| {
            weighted::ema(self, weights, out, window, min_periods)
        })
    }

    fn ts_ewm(&self, window: usize, min_periods: usize) -> Result<Vec<T>> {
        let weights = weighted::ema_weights(window);
        self.ts_ema(&weights, window, min_periods)
    }

    fn ts_wma(&self, window: usize, min_periods: usize) -> Result<Vec<T>> {
        allocate(self.len(), |out| weighted::wma(self, out, window, min_periods))
    }

    fn ts_rank(&self, window: usize, min_periods: usize, options: RankOptions) -> Result<Vec<T>> {
        allocate(self.len(), |out| {
            rank::rank(self, out, window, min_periods, options)
        })
    }

    fn ts_reg(&self, window: usize, min_periods: usize) -> Result<Vec<T>> {
        allocate(self.len(), |out| regression::reg(self, out, window, min_periods))
    }

    fn ts_tsf(&self, window: usize, min_periods: usize) -> Result<Vec<T>> {
        allocate(self.len(), |out| regression::tsf(self, out, window, min_periods))
    }

    fn ts_reg_slope(&self, window: usize, min_periods: usize) -> Result<Vec<T>> {
        allocate(self.len(), |out| {
            regression::reg_slope(self, out, window, min_periods)
        })
    }

    fn ts_reg_intercept(&self, window: usize, min_periods: usize) -> Result<Vec<T>> {
        allocate(self.len(), |out| {
            regression::reg_intercept(self, out, window, min_periods)
        })
    }

    fn ts_reg_resid_mean(&self, window: usize, min_periods: usize) -> Result<Vec<T>> {
        allocate(self.len(), |out| {
            regression::reg_resid_mean(self, out, window, min_periods)
        })
    }

    fn ts_regx_beta(&self, x: &[T], window: usize, min_periods: usize) -> Result<Vec<T>> {
        allocate(self.len(), |out| {
            regression::regx_beta(self, x, out, window, min_periods)
        })
    }

    fn ts_regx_alpha(&self, x: &[T], window: usize, min_periods: usize) -> Result<Vec<T>> {
        allocate(self.len(), |out| {
            regression::regx_alpha(self, x, out, window, min_periods)
        })
    }

    fn ts_regx_resid_std(&self, x: &[T], window: usize, min_periods: usize) -> Result<Vec<T>> {
        allocate(self.len(), |out| {
            regression::regx_resid_std(self, x, out, window, min_periods)
        })
    }

    fn ts_regx_resid_mean(&self, x: &[T], window: usize, min_periods: usize) -> Result<Vec<T>> {
        allocate(self.len(), |out| {
            regression::regx_resid_mean(self, x, out, window, min_periods)
        })
    }

    fn ts_regx_resid_skew(&self, x: &[T], window: usize, min_periods: usize) -> Result<Vec<T>> {
        allocate(self.len(), |out| {
            regression::regx_resid_skew(self, x, out, window, min_periods)
        })
    }
}
