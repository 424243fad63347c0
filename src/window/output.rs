use crate::{Error, Result};

/// A writable destination for kernel results
///
/// Kernels write every logical position `0..len()` exactly once, left to
/// right. Implementations decide where position `i` lands in memory.
pub trait Output<T> {
    /// Returns the logical number of positions
    fn len(&self) -> usize;

    /// Writes `value` at logical position `i`
    fn set(&mut self, i: usize, value: T);

    /// Writes `value` at every logical position
    fn fill(&mut self, value: T)
    where
        T: Copy,
    {
        for i in 0..self.len() {
            self.set(i, value);
        }
    }
}

impl<T> Output<T> for [T] {
    #[inline]
    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    #[inline]
    fn set(&mut self, i: usize, value: T) {
        self[i] = value;
    }
}

/// A strided view over a larger buffer
///
/// Position `i` is stored at `buf[i * stride]`, which lets a kernel fill one
/// column of a row-major table (or one row of a column-major one) without an
/// intermediate copy. Elements between the strided slots are never touched.
///
/// # Examples
///
/// ```
/// use ta_rolling::{Strided, moments};
///
/// // 3 rows x 2 columns, row-major; fill column 1 with a rolling sum
/// let input = [1.0_f64, 2.0, 3.0];
/// let mut table = [0.0_f64; 6];
/// let mut column = Strided::new(&mut table[1..], input.len(), 2).unwrap();
/// moments::sum(&input, &mut column, 2, 1).unwrap();
///
/// assert_eq!(table[0], 0.0);
/// assert!(table[1].is_nan());
/// assert_eq!(table[3], 3.0);
/// assert_eq!(table[5], 5.0);
/// ```
#[derive(Debug)]
pub struct Strided<'a, T> {
    /// Backing storage
    buf: &'a mut [T],
    /// Logical number of positions
    len: usize,
    /// Distance between consecutive positions
    stride: usize,
}

impl<'a, T> Strided<'a, T> {
    /// Creates a strided view of `len` positions spaced `stride` apart
    ///
    /// # Arguments
    ///
    /// * `buf` - The backing buffer, starting at logical position 0
    /// * `len` - The number of logical positions
    /// * `stride` - The element spacing between positions
    ///
    /// # Returns
    ///
    /// * `Result<Self>` - The view, or an error if `stride` is zero or `buf`
    ///   cannot hold `len` positions
    pub fn new(buf: &'a mut [T], len: usize, stride: usize) -> Result<Self> {
        if stride == 0 {
            return Err(Error::ZeroStride);
        }
        let required = match len {
            0 => 0,
            _ => (len - 1).saturating_mul(stride).saturating_add(1),
        };
        if buf.len() < required {
            return Err(Error::BufferTooShort {
                required,
                actual: buf.len(),
            });
        }
        Ok(Self { buf, len, stride })
    }

    /// Returns the element spacing
    pub const fn stride(&self) -> usize {
        self.stride
    }
}

impl<T> Output<T> for Strided<'_, T> {
    #[inline]
    fn len(&self) -> usize {
        self.len
    }

    #[inline]
    fn set(&mut self, i: usize, value: T) {
        self.buf[i * self.stride] = value;
    }
}
