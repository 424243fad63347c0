use num_traits::Float;

/// Converts a count into the element type
///
/// Counts are bounded by the window size, so the conversion only fails for
/// exotic float types; it degrades to NaN rather than panicking.
#[inline]
pub fn cast<T: Float>(n: usize) -> T {
    T::from(n).unwrap_or_else(T::nan)
}

/// Converts an `f64` literal into the element type
#[inline]
pub fn lit<T: Float>(v: f64) -> T {
    T::from(v).unwrap_or_else(T::nan)
}

/// Two aligned observations taken at the same position
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pair<T>(pub T, pub T);

/// Zips two aligned sequences into one buffer of pairs
pub fn zip_pairs<T: Copy>(a: &[T], b: &[T]) -> alloc::vec::Vec<Pair<T>> {
    a.iter().zip(b).map(|(&x, &y)| Pair(x, y)).collect()
}

/// Missing-value test for window items
///
/// A scalar is missing when it is NaN. A pair is missing when either side is,
/// which is what makes paired statistics drop a position from both sequences.
pub trait Missing: Copy {
    /// Returns true if the item is absent
    fn is_missing(&self) -> bool;

    /// Returns true if the item is present
    #[inline]
    fn is_present(&self) -> bool {
        !self.is_missing()
    }
}

impl<T: Float> Missing for T {
    #[inline]
    fn is_missing(&self) -> bool {
        self.is_nan()
    }
}

impl<T: Float> Missing for Pair<T> {
    #[inline]
    fn is_missing(&self) -> bool {
        self.0.is_nan() || self.1.is_nan()
    }
}
