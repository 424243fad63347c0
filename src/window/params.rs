/// Per-call window parameters with the statistic's floor applied
///
/// `min_periods` here is already `max(min_periods, floor)`, where the floor is
/// the smallest count for which the statistic's formula is defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Params {
    /// The window size
    pub window: usize,
    /// The effective minimum number of present values
    pub min_periods: usize,
}

impl Params {
    /// Creates parameters without a floor
    #[inline]
    pub const fn new(window: usize, min_periods: usize) -> Self {
        Self {
            window,
            min_periods,
        }
    }

    /// Raises the minimum count to `floor`
    #[inline]
    pub const fn with_floor(mut self, floor: usize) -> Self {
        if self.min_periods < floor {
            self.min_periods = floor;
        }
        self
    }

    /// Returns true if no position can ever pass the gate
    ///
    /// This is the single short-circuit of every kernel: the output is then
    /// filled with the statistic's sentinel and nothing else is computed.
    #[inline]
    pub const fn is_degenerate(&self) -> bool {
        self.window == 0 || self.window < self.min_periods
    }

    /// Returns true if a window holding `count` present values may emit
    #[inline]
    pub const fn passes(&self, count: usize) -> bool {
        count >= self.min_periods
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_only_raises() {
        assert_eq!(Params::new(5, 1).with_floor(3).min_periods, 3);
        assert_eq!(Params::new(5, 4).with_floor(3).min_periods, 4);
    }

    #[test]
    fn degenerate_when_window_below_min_periods() {
        assert!(Params::new(3, 4).is_degenerate());
        assert!(Params::new(3, 1).with_floor(4).is_degenerate());
        assert!(!Params::new(3, 3).is_degenerate());
    }

    #[test]
    fn zero_window_is_degenerate() {
        assert!(Params::new(0, 0).is_degenerate());
    }

    #[test]
    fn gate_compares_count() {
        let params = Params::new(4, 2);
        assert!(!params.passes(1));
        assert!(params.passes(2));
        assert!(Params::new(4, 0).passes(0));
    }
}
