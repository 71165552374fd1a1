//! Pair averaging and the smooth tendency predictor.
//!
//! Both functions here are part of the bitstream contract: the inverse transform recomputes
//! exactly the same values from the averages it decodes, so any change to the arithmetic
//! (including rounding of negative values) breaks reconstruction.

use modular_squeeze_common::PixelWide;

/// Average of a pair of samples, rounded up when `a > b` and the sum is odd.
///
/// The rounding direction is what lets the inverse recover `a` as `avg + (a - b) / 2`.
#[inline(always)]
pub fn average(a: PixelWide, b: PixelWide) -> PixelWide {
    (a + b + PixelWide::from(a > b)) >> 1
}

/// Predicts the difference between a pair of samples from their smoothed surroundings.
///
/// If `left`, `center` and `right` are monotonic, the pair that averages to `center` most
/// likely continues the same slope; the returned value estimates its difference while being
/// clamped so it never overshoots either neighbour. Otherwise no tendency is assumed.
///
/// # Parameters
///
/// - `left`: The last sample before the pair (left or above), at the input resolution
/// - `center`: The average of the pair
/// - `right`: The average of the next pair (or the trailing unpaired sample)
///
/// # Returns
///
/// The predicted difference, subtracted from the real difference to form the residual.
#[inline(always)]
pub fn smooth_tendency(left: PixelWide, center: PixelWide, right: PixelWide) -> PixelWide {
    let mut diff = 0;
    if left >= center && center >= right {
        diff = (4 * left - 3 * right - center + 6) / 12;
        if diff - (diff & 1) > 2 * (left - center) {
            diff = 2 * (left - center) + 1;
        }
        if diff + (diff & 1) > 2 * (center - right) {
            diff = 2 * (center - right);
        }
    } else if left <= center && center <= right {
        diff = (4 * left - 3 * right - center - 6) / 12;
        if diff + (diff & 1) < 2 * (left - center) {
            diff = 2 * (left - center) - 1;
        }
        if diff - (diff & 1) < 2 * (center - right) {
            diff = 2 * (center - right);
        }
    }
    diff
}
