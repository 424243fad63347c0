use thiserror::Error;

/// Buffer-shape errors reported by the kernels.
///
/// Insufficient data is never an error: it is written to the output as NaN.
/// These variants only describe buffers that cannot hold a well-formed output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The output (or a paired input) does not have the length of the input.
    #[error("length mismatch: expected {expected} elements, got {actual}")]
    LengthMismatch {
        /// Length of the primary input sequence
        expected: usize,
        /// Length that was provided
        actual: usize,
    },

    /// A strided output was requested with a stride of zero.
    #[error("output stride must be at least 1")]
    ZeroStride,

    /// The backing buffer of a strided output cannot hold every position.
    #[error("strided buffer too short: required {required} elements, got {actual}")]
    BufferTooShort {
        /// Minimum backing length for the requested length and stride
        required: usize,
        /// Backing length that was provided
        actual: usize,
    },

    /// The EMA weight sequence does not have one weight per window slot.
    #[error("weight length mismatch: window is {expected}, got {actual} weights")]
    WeightLength {
        /// The window size
        expected: usize,
        /// Number of weights provided
        actual: usize,
    },
}

/// Convenience alias for results carrying [`Error`].
pub type Result<T> = core::result::Result<T, Error>;
