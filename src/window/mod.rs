//! The contract shared by every kernel: a causal window of fixed size, a gate
//! on the number of present values, and an output sink that may be strided.

mod driver;
mod output;
mod params;

pub(crate) use driver::{Accumulator, drive, fill_all};
pub use output::{Output, Strided};
pub(crate) use params::Params;
