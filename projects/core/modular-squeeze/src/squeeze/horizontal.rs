//! Horizontal squeeze step: halves the width of a channel.

use super::{check_sample_range, check_step_indices, commit_step};
use crate::error::SqueezeError;
use crate::executor::Executor;
use crate::tendency::{average, smooth_tendency};
use modular_squeeze_common::{ChannelAllocator, Image, Pixel, PixelWide};
use tracing::debug;

/// Squeezes channel `c` horizontally, inserting the produced residual channel at `rc`.
///
/// Channel `c` is replaced by a channel of width `ceil(w / 2)` holding the pair averages,
/// with its `hshift` incremented. The residual channel has width `floor(w / 2)` and the same
/// height and shifts as the averages. When the input width is odd, the last input column is
/// carried into the last average column unchanged and has no residual.
///
/// # Parameters
///
/// - `image`: The image to transform
/// - `c`: Index of the channel to squeeze
/// - `rc`: Index the residual channel is inserted at, counted after `c` has been replaced
/// - `executor`: Where the rows are processed
///
/// # Errors
///
/// - [`SqueezeError::Validation`] if `c` or `rc` are out of bounds, or if the samples of
///   channel `c` spread further than [`MAX_SAMPLE_SPAN`](modular_squeeze_common::MAX_SAMPLE_SPAN)
/// - [`SqueezeError::Allocation`] if either output channel cannot be created
///
/// The image is left unmodified on error.
pub fn fwd_h_squeeze<A: ChannelAllocator>(
    image: &mut Image<A>,
    c: usize,
    rc: usize,
    executor: &Executor,
) -> Result<(), SqueezeError> {
    check_step_indices(image.channel_count(), c, rc)?;
    debug!("Doing horizontal squeeze of channel {c} to new channel {rc}");

    let chin = &image.channels()[c];
    check_sample_range(chin, c)?;
    let allocator = image.allocator();
    let mut chout = allocator.create_channel(
        chin.w().div_ceil(2),
        chin.h(),
        chin.hshift() + 1,
        chin.vshift(),
    )?;
    let mut chout_residual = allocator.create_channel(
        chin.w() - chout.w(),
        chout.h(),
        chout.hshift(),
        chout.vshift(),
    )?;

    let (out_w, res_w) = (chout.w(), chout_residual.w());
    executor.for_each_row_pair(
        chout.pixels_mut(),
        out_w,
        chout_residual.pixels_mut(),
        res_w,
        chin.h(),
        |y, p_out, p_res| h_squeeze_row(chin.row(y), p_out, p_res),
    );

    commit_step(image, c, rc, chout, chout_residual);
    Ok(())
}

/// Squeezes one row of `2 * p_res.len()` or `2 * p_res.len() + 1` samples.
///
/// # Parameters
///
/// - `p_in`: The input row
/// - `p_out`: Receives the pair averages, `ceil(p_in.len() / 2)` samples
/// - `p_res`: Receives the residuals, `floor(p_in.len() / 2)` samples
#[allow(clippy::needless_range_loop)]
#[inline]
pub(crate) fn h_squeeze_row(p_in: &[Pixel], p_out: &mut [Pixel], p_res: &mut [Pixel]) {
    debug_assert_eq!(p_out.len(), p_in.len().div_ceil(2));
    debug_assert_eq!(p_res.len(), p_in.len() / 2);

    let odd = p_in.len() & 1 == 1;
    let res_w = p_res.len();
    let sample = |x: usize| PixelWide::from(p_in[x]);

    for x in 0..res_w {
        let a = sample(x * 2);
        let b = sample(x * 2 + 1);
        let avg = average(a, b);
        p_out[x] = avg as Pixel;

        let diff = a - b;

        let next_avg = if x + 1 < res_w {
            // which will be p_out[x + 1]
            average(sample(x * 2 + 2), sample(x * 2 + 3))
        } else if odd {
            sample(x * 2 + 2)
        } else {
            avg
        };
        let left = if x > 0 { sample(x * 2 - 1) } else { avg };
        let tendency = smooth_tendency(left, avg, next_avg);

        p_res[x] = (diff - tendency) as Pixel;
    }

    if odd {
        p_out[p_out.len() - 1] = p_in[p_in.len() - 1];
    }
}
