#![doc = include_str!("../README.md")]
#![no_std]
#![deny(
    unsafe_code,
    unused_imports,
    unused_variables,
    unused_must_use,
    missing_docs,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented
)]
#![allow(clippy::just_underscores_and_digits, clippy::len_without_is_empty)]

#[macro_use]
extern crate alloc;

pub(crate) type Kbn<T> = compensated_summation::KahanBabuskaNeumaier<T>;

mod utils;
pub(crate) use utils::{helper, running_sum::RunningSum};

mod error;
pub use error::{Error, Result};

pub mod window;
pub use window::{Output, Strided};

pub mod extrema;
pub mod moments;
pub mod rank;
pub mod regression;
pub mod weighted;

mod traits;
pub use traits::Rolling;
