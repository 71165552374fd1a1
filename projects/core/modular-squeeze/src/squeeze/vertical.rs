//! Vertical squeeze step: halves the height of a channel.
//!
//! This mirrors the [horizontal step](super::horizontal) with rows taking the place of
//! columns: rows `2y` and `2y + 1` are paired, and the row above the pair takes the role of
//! the left neighbour.

use super::{check_sample_range, check_step_indices, commit_step};
use crate::error::SqueezeError;
use crate::executor::Executor;
use crate::tendency::{average, smooth_tendency};
use modular_squeeze_common::{Channel, ChannelAllocator, Image, Pixel, PixelWide};
use tracing::debug;

/// Squeezes channel `c` vertically, inserting the produced residual channel at `rc`.
///
/// Channel `c` is replaced by a channel of height `ceil(h / 2)` holding the pair averages,
/// with its `vshift` incremented. The residual channel has height `floor(h / 2)` and the same
/// width and shifts as the averages. When the input height is odd, the last input row is
/// carried into the last average row unchanged and has no residual.
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
pub fn fwd_v_squeeze<A: ChannelAllocator>(
    image: &mut Image<A>,
    c: usize,
    rc: usize,
    executor: &Executor,
) -> Result<(), SqueezeError> {
    check_step_indices(image.channel_count(), c, rc)?;
    debug!("Doing vertical squeeze of channel {c} to new channel {rc}");

    let chin = &image.channels()[c];
    check_sample_range(chin, c)?;
    let allocator = image.allocator();
    let mut chout = allocator.create_channel(
        chin.w(),
        chin.h().div_ceil(2),
        chin.hshift(),
        chin.vshift() + 1,
    )?;
    let mut chout_residual = allocator.create_channel(
        chin.w(),
        chin.h() - chout.h(),
        chout.hshift(),
        chout.vshift(),
    )?;

    let w = chin.w();
    let res_h = chout_residual.h();
    executor.for_each_row_pair(
        chout.pixels_mut(),
        w,
        chout_residual.pixels_mut(),
        w,
        res_h,
        |y, p_out, p_res| v_squeeze_row(chin, y, res_h, p_out, p_res),
    );

    if chin.h() & 1 == 1 {
        let y = chout.h() - 1;
        chout.row_mut(y).copy_from_slice(chin.row(y * 2));
    }

    commit_step(image, c, rc, chout, chout_residual);
    Ok(())
}

/// The rows following a pair, used to predict its tendency.
#[derive(Clone, Copy)]
enum NextRows<'a> {
    /// Another full pair follows.
    Pair(&'a [Pixel], &'a [Pixel]),
    /// Only the trailing unpaired row of an odd height channel follows.
    Single(&'a [Pixel]),
    /// This is the last pair.
    None,
}

/// Squeezes input rows `2y` and `2y + 1` into average row `p_out` and residual row `p_res`.
#[allow(clippy::needless_range_loop)]
#[inline]
pub(crate) fn v_squeeze_row(
    chin: &Channel,
    y: usize,
    res_h: usize,
    p_out: &mut [Pixel],
    p_res: &mut [Pixel],
) {
    let p_a = chin.row(y * 2);
    let p_b = chin.row(y * 2 + 1);
    let next = if y + 1 < res_h {
        NextRows::Pair(chin.row(y * 2 + 2), chin.row(y * 2 + 3))
    } else if chin.h() & 1 == 1 {
        NextRows::Single(chin.row(y * 2 + 2))
    } else {
        NextRows::None
    };
    let p_top = if y > 0 { Some(chin.row(y * 2 - 1)) } else { None };

    for x in 0..p_out.len() {
        let a = PixelWide::from(p_a[x]);
        let b = PixelWide::from(p_b[x]);
        let avg = average(a, b);
        p_out[x] = avg as Pixel;

        let diff = a - b;

        let next_avg = match next {
            // which will be chout[y + 1, x]
            NextRows::Pair(p_c, p_d) => average(p_c[x].into(), p_d[x].into()),
            NextRows::Single(p_c) => PixelWide::from(p_c[x]),
            NextRows::None => avg,
        };
        let top = p_top.map_or(avg, |p_top| PixelWide::from(p_top[x]));
        let tendency = smooth_tendency(top, avg, next_avg);

        p_res[x] = (diff - tendency) as Pixel;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::squeeze::horizontal::fwd_h_squeeze;
    use crate::test_prelude::*;

    /// Transposes a channel, keeping its shifts swapped along with the axes.
    fn transpose(channel: &Channel) -> Channel {
        let mut out =
            Channel::create(channel.h(), channel.w(), channel.vshift(), channel.hshift()).unwrap();
        for y in 0..channel.h() {
            for x in 0..channel.w() {
                out.row_mut(x)[y] = channel.get(x, y);
            }
        }
        out
    }

    #[rstest]
    fn squeezes_reference_column() {
        let mut image = single_channel_image(1, 5, &[10, 12, 14, 11, 9]);
        fwd_v_squeeze(&mut image, 0, 1, &Executor::Sequential).unwrap();

        assert_eq!(image.channel(0).unwrap().pixels(), &[11, 13, 9]);
        assert_eq!(image.channel(1).unwrap().pixels(), &[-1, 3]);
    }

    #[rstest]
    #[case(3, 1)]
    #[case(3, 2)]
    #[case(2, 5)]
    #[case(4, 8)]
    #[case(1, 9)]
    #[case(2, 0)]
    fn output_shapes(#[case] w: usize, #[case] h: usize) {
        let mut image = pattern_image(&[(w, h)], 0x4321);
        fwd_v_squeeze(&mut image, 0, 1, &Executor::Sequential).unwrap();

        let averages = image.channel(0).unwrap();
        let residuals = image.channel(1).unwrap();
        assert_eq!((averages.w(), averages.h()), (w, h.div_ceil(2)));
        assert_eq!((residuals.w(), residuals.h()), (w, h / 2));
        assert_eq!((averages.hshift(), averages.vshift()), (0, 1));
        assert_eq!((residuals.hshift(), residuals.vshift()), (0, 1));
    }

    #[rstest]
    #[case(1)]
    #[case(3)]
    #[case(9)]
    fn odd_height_carries_last_row(#[case] h: usize) {
        let original = pattern_channel(6, h, 17);
        let mut image = Image::new(vec![original.try_clone().unwrap()], 0);
        fwd_v_squeeze(&mut image, 0, 1, &Executor::Sequential).unwrap();

        let averages = image.channel(0).unwrap();
        assert_eq!(averages.row(averages.h() - 1), original.row(h - 1));
        assert_eq!(image.channel(1).unwrap().h(), averages.h() - 1);
    }

    #[rstest]
    #[case(7, 5)]
    #[case(4, 8)]
    #[case(1, 3)]
    #[case(16, 1)]
    fn matches_transposed_horizontal_squeeze(#[case] w: usize, #[case] h: usize) {
        let original = pattern_channel(w, h, 1234);

        let mut vertical = Image::new(vec![original.try_clone().unwrap()], 0);
        fwd_v_squeeze(&mut vertical, 0, 1, &Executor::Sequential).unwrap();

        let mut horizontal = Image::new(vec![transpose(&original)], 0);
        fwd_h_squeeze(&mut horizontal, 0, 1, &Executor::Sequential).unwrap();

        for (v, t) in vertical.channels().iter().zip(horizontal.channels()) {
            assert_eq!(v, &transpose(t));
        }
    }

    #[rstest]
    #[case(5, 12)]
    #[case(6, 13)]
    #[case(1, 2)]
    #[case(7, 1)]
    #[case(33, 31)]
    fn round_trips(#[case] w: usize, #[case] h: usize) {
        for seed in [3, 0xfeed_f00d, 77] {
            let original = pattern_channel(w, h, seed);
            let mut image = Image::new(vec![original.try_clone().unwrap()], 0);
            fwd_v_squeeze(&mut image, 0, 1, &Executor::Sequential).unwrap();
            inv_v_squeeze(&mut image, 0, 1);
            image.remove_channel(1);
            assert_eq!(image.channel(0).unwrap(), &original);
        }
    }

    #[rstest]
    #[case::bottom(Pixel::MIN)]
    #[case::top(Pixel::MAX - MAX_SAMPLE_SPAN as Pixel)]
    fn round_trips_widest_span(#[case] lo: Pixel) {
        let hi = lo + MAX_SAMPLE_SPAN as Pixel;
        let pixels = [hi, lo, lo, lo, hi, hi, lo, hi, lo, hi, lo];
        let original = Channel::from_pixels(1, pixels.len(), &pixels).unwrap();
        let mut image = Image::new(vec![original.try_clone().unwrap()], 0);
        fwd_v_squeeze(&mut image, 0, 1, &Executor::Sequential).unwrap();
        inv_v_squeeze(&mut image, 0, 1);
        image.remove_channel(1);
        assert_eq!(image.channel(0).unwrap(), &original);
    }

    #[rstest]
    fn too_wide_samples_are_rejected() {
        let original = Channel::from_pixels(1, 3, &[Pixel::MIN, 0, Pixel::MAX]).unwrap();
        let mut image = Image::new(vec![original.try_clone().unwrap()], 0);
        let result = fwd_v_squeeze(&mut image, 0, 1, &Executor::Sequential);

        assert!(matches!(
            result,
            Err(SqueezeError::Validation(ValidationError::SampleRange { channel: 0, .. }))
        ));
        assert_eq!(image.channel_count(), 1);
        assert_eq!(image.channel(0).unwrap(), &original);
    }

    #[rstest]
    fn executors_agree() {
        let mut expected = pattern_image(&[(45, 67)], 11);
        fwd_v_squeeze(&mut expected, 0, 1, &Executor::Sequential).unwrap();

        for executor in all_executors() {
            let mut image = pattern_image(&[(45, 67)], 11);
            fwd_v_squeeze(&mut image, 0, 1, &executor).unwrap();
            assert_eq!(image.channels(), expected.channels());
        }
    }

    #[rstest]
    #[case::first_allocation(0)]
    #[case::residual_allocation(1)]
    fn allocation_failure_leaves_image_untouched(#[case] successful_allocations: usize) {
        let original = pattern_channel(3, 6, 5);
        let mut image = Image::with_allocator(
            vec![original.try_clone().unwrap()],
            0,
            FailingAllocator::new(successful_allocations),
        );
        let result = fwd_v_squeeze(&mut image, 0, 1, &Executor::Sequential);

        assert!(matches!(result, Err(SqueezeError::Allocation(_))));
        assert_eq!(image.channel_count(), 1);
        assert_eq!(image.channel(0).unwrap(), &original);
    }
}
