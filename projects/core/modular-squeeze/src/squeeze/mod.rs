//! The horizontal and vertical squeeze steps.
//!
//! Each step replaces one channel with its half resolution averages and inserts a residual
//! channel into the image. Both steps validate their indices and input range and allocate
//! their outputs before touching the image, so a failed step leaves the image as it was.

pub(crate) mod horizontal;
pub(crate) mod vertical;

pub use horizontal::fwd_h_squeeze;
pub use vertical::fwd_v_squeeze;

use crate::error::ValidationError;
use modular_squeeze_common::{Channel, ChannelAllocator, Image, PixelWide, MAX_SAMPLE_SPAN};

/// Checks that channel `c` exists and that a residual can be inserted at `rc`.
///
/// `rc` may equal `channel_count`, which appends the residual.
pub(crate) fn check_step_indices(
    channel_count: usize,
    c: usize,
    rc: usize,
) -> Result<(), ValidationError> {
    if c >= channel_count {
        return Err(ValidationError::ChannelIndex {
            index: c,
            channel_count,
        });
    }
    if rc > channel_count {
        return Err(ValidationError::ChannelIndex {
            index: rc,
            channel_count,
        });
    }
    Ok(())
}

/// Checks that the residuals of channel `c` are guaranteed to fit in a [`Pixel`].
///
/// [`Pixel`]: modular_squeeze_common::Pixel
pub(crate) fn check_sample_range(channel: &Channel, c: usize) -> Result<(), ValidationError> {
    match channel.sample_range() {
        Some((min, max)) if PixelWide::from(max) - PixelWide::from(min) > MAX_SAMPLE_SPAN => {
            Err(ValidationError::SampleRange {
                channel: c,
                min,
                max,
            })
        }
        _ => Ok(()),
    }
}

/// Moves the averages into slot `c` and inserts the residual at `rc`.
#[inline]
pub(crate) fn commit_step<A: ChannelAllocator>(
    image: &mut Image<A>,
    c: usize,
    rc: usize,
    averages: Channel,
    residual: Channel,
) {
    image.replace_channel(c, averages);
    image.insert_channel(rc, residual);
}
