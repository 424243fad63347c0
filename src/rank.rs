//! Rank of the newest value within its trailing window.

use num_traits::Float;

use crate::{
    Result,
    helper::{Missing, cast, lit},
    window::{Accumulator, Output, Params, drive},
};

/// Options for [`rank`]
///
/// # Examples
///
/// ```
/// # use ta_rolling::rank::{self, RankOptions};
/// let input = [3.0_f64, 1.0, 2.0, 5.0];
/// let mut out = [0.0_f64; 4];
/// let mut options = RankOptions::new();
/// options.set_pct(true).set_rev(true);
/// rank::rank(&input, &mut out[..], 4, 1, options).unwrap();
///
/// // 5.0 is the largest of four values
/// assert_eq!(out[3], 0.25);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RankOptions {
    /// Divide the rank by the number of present values
    pct: bool,
    /// Rank in descending order
    rev: bool,
}

impl RankOptions {
    /// Creates options for an ascending, unscaled rank
    #[inline]
    pub const fn new() -> Self {
        Self {
            pct: false,
            rev: false,
        }
    }

    /// Returns true if ranks are scaled into `(0, 1]`
    #[inline]
    pub const fn pct(&self) -> bool {
        self.pct
    }

    /// Sets percentage scaling
    ///
    /// # Arguments
    ///
    /// * `pct` - Whether to divide the rank by the present count
    ///
    /// # Returns
    ///
    /// * `&mut Self` - The options object
    #[inline]
    pub const fn set_pct(&mut self, pct: bool) -> &mut Self {
        self.pct = pct;
        self
    }

    /// Returns true if the largest value ranks first
    #[inline]
    pub const fn rev(&self) -> bool {
        self.rev
    }

    /// Sets descending order
    ///
    /// # Arguments
    ///
    /// * `rev` - Whether the largest value should rank 1
    ///
    /// # Returns
    ///
    /// * `&mut Self` - The options object
    #[inline]
    pub const fn set_rev(&mut self, rev: bool) -> &mut Self {
        self.rev = rev;
        self
    }
}

#[derive(Debug, Clone)]
struct RankAccumulator {
    options: RankOptions,
    n: usize,
}

impl<T: Float> Accumulator<T> for RankAccumulator {
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
        let Some((&newest, others)) = window.split_last() else {
            return T::nan();
        };
        if newest.is_missing() {
            return T::nan();
        }

        let (mut ahead, mut ties) = (0usize, 0usize);
        for &v in others.iter().filter(|v| v.is_present()) {
            let beats = if self.options.rev { v > newest } else { v < newest };
            if beats {
                ahead += 1;
            } else if v == newest {
                ties += 1;
            }
        }

        // Tied values share the average of the positions they span
        let rank = cast::<T>(1 + ahead) + lit::<T>(0.5) * cast(ties);
        if self.options.pct {
            rank / cast(self.n)
        } else {
            rank
        }
    }
}

/// Rolling rank of the newest value among the present values of its window
///
/// The smallest value ranks 1 (the largest, with `rev`). Ties get the average
/// of the ranks they span. A missing newest value ranks NaN. With `pct` the
/// rank is divided by the number of present values.
///
/// # Arguments
///
/// * `arr` - The input sequence, NaN marking missing values
/// * `out` - The destination, same length as `arr`
/// * `window` - The window size
/// * `min_periods` - The minimum number of present values
/// * `options` - Ordering and scaling
///
/// # Returns
///
/// * `Result<()>` - An error only if `out` has the wrong length
///
/// # Examples
///
/// ```
/// # use ta_rolling::rank::{self, RankOptions};
/// let input = [2.0_f64, 1.0, 2.0, 3.0];
/// let mut out = [0.0_f64; 4];
/// rank::rank(&input, &mut out[..], 3, 1, RankOptions::new()).unwrap();
///
/// assert_eq!(out[2], 2.5);
/// assert_eq!(out[3], 3.0);
/// ```
pub fn rank<T, O>(
    arr: &[T],
    out: &mut O,
    window: usize,
    min_periods: usize,
    options: RankOptions,
) -> Result<()>
where
    T: Float,
    O: Output<T> + ?Sized,
{
    let acc = RankAccumulator { options, n: 0 };
    drive(arr, out, Params::new(window, min_periods), T::nan(), acc)
}
