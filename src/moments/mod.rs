//! Statistics built on running power sums.
//!
//! Every kernel here keeps `Σx`, `Σx²`, ... (or a running product) of the
//! present values in the window and updates them in O(1) as the window
//! slides. Skewness, kurtosis and the paired cross term re-scan the window for
//! their central moments, which keeps them exact at O(W) per step.
//!
//! | kernel        | floor | value                                     |
//! |---------------|-------|-------------------------------------------|
//! | `sum`         | 0     | sum of present values                     |
//! | `sma`         | 0     | arithmetic mean                           |
//! | `prod`        | 0     | product of present values                 |
//! | `prod_mean`   | 0     | geometric mean                            |
//! | `var`         | 2     | unbiased sample variance                  |
//! | `std`         | 2     | unbiased sample deviation                 |
//! | `stable`      | 2     | mean over population deviation            |
//! | `meanstdnorm` | 2     | z-score of the newest value               |
//! | `skew`        | 3     | bias-corrected skewness                   |
//! | `kurt`        | 4     | bias-corrected excess kurtosis            |
//! | `cov`         | 3     | sample covariance of two sequences        |
//! | `corr`        | 3     | Pearson correlation of two sequences      |
//!
//! The floor is the smallest present count the formula is defined for; it
//! raises `min_periods` when the caller passes something smaller.

mod paired;
mod product;
mod single;
mod sums;

pub use paired::{corr, cov};
pub use product::{prod, prod_mean};
pub use single::{kurt, meanstdnorm, skew, sma, stable, std, sum, var};
pub(crate) use sums::adjusted_skew;
