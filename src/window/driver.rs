use num_traits::Float;

use super::{Output, Params};
use crate::{Error, Result};

/// Per-family state advanced by [`drive`]
///
/// The driver feeds every input item to `on_enter` exactly once, asks for a
/// value with `emit` whenever a full window passes the gate, and hands the
/// item at the trailing edge to `on_leave` after each full-window position.
pub(crate) trait Accumulator<I> {
    /// The emitted element type
    type Output: Float;

    /// Incorporates the item entering at the leading edge
    fn on_enter(&mut self, item: I);

    /// Removes the item leaving at the trailing edge
    fn on_leave(&mut self, item: I);

    /// Number of present items currently inside the window
    fn count(&self) -> usize;

    /// Computes the statistic for the full `window`, newest item last
    fn emit(&mut self, window: &[I]) -> Self::Output;

    /// Returns true if running state can no longer be updated incrementally
    fn is_degenerate(&self) -> bool {
        false
    }

    /// Rebuilds running state from the items still inside the window
    fn recompute(&mut self, _retained: &[I]) {}
}

/// Fails unless `out` has exactly `expected` positions
#[inline]
pub(crate) fn check_len<T, O>(expected: usize, out: &O) -> Result<()>
where
    O: Output<T> + ?Sized,
{
    if out.len() == expected {
        Ok(())
    } else {
        Err(Error::LengthMismatch {
            expected,
            actual: out.len(),
        })
    }
}

/// Fills every position with `value` after checking the output length
pub(crate) fn fill_all<T, O>(expected: usize, out: &mut O, value: T) -> Result<()>
where
    T: Copy,
    O: Output<T> + ?Sized,
{
    check_len::<T, O>(expected, out)?;
    out.fill(value);
    Ok(())
}

/// Runs the shared sliding loop over `input`
///
/// # Arguments
///
/// * `input` - The items to slide over
/// * `out` - The destination, one position per input item
/// * `params` - The window and effective minimum count
/// * `sentinel` - The value written everywhere when `params` is degenerate
/// * `acc` - The family accumulator, owned for the duration of the call
///
/// # Returns
///
/// * `Result<()>` - An error only if `out` does not match `input` in length
pub(crate) fn drive<I, A, O>(
    input: &[I],
    out: &mut O,
    params: Params,
    sentinel: A::Output,
    mut acc: A,
) -> Result<()>
where
    I: Copy,
    A: Accumulator<I>,
    O: Output<A::Output> + ?Sized,
{
    check_len::<A::Output, O>(input.len(), out)?;
    if params.is_degenerate() {
        out.fill(sentinel);
        return Ok(());
    }

    let window = params.window;
    for (end, &item) in input.iter().enumerate() {
        let start = (end + 1).saturating_sub(window);
        if acc.is_degenerate() {
            acc.recompute(&input[start..end]);
        }
        acc.on_enter(item);

        if end + 1 < window {
            out.set(end, A::Output::nan());
            continue;
        }

        let value = if params.passes(acc.count()) {
            acc.emit(&input[start..=end])
        } else {
            A::Output::nan()
        };
        out.set(end, value);
        acc.on_leave(input[start]);
    }
    Ok(())
}
