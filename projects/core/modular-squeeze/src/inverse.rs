//! Reference inverse of the squeeze transform.
//!
//! Reconstructs the original channels from averages and residuals. This is a straightforward
//! single threaded implementation used to check that the forward transform is lossless; it is
//! not tuned for speed.

use crate::error::{SqueezeError, ValidationError};
use crate::params::SqueezeParams;
use crate::tendency::smooth_tendency;
use modular_squeeze_common::{Channel, ChannelAllocator, Image, Pixel, PixelWide};

/// Undoes `steps`, the parameter sets returned by a successful forward squeeze.
///
/// Sets are undone last to first. Every residual channel is removed from the image once its
/// source channel has been restored.
///
/// # Errors
///
/// - [`SqueezeError::Validation`] if the image does not have the layout `steps` produced
/// - [`SqueezeError::Allocation`] if a restored channel could not be created
pub fn inv_squeeze<A: ChannelAllocator>(
    image: &mut Image<A>,
    steps: &[SqueezeParams],
) -> Result<(), SqueezeError> {
    for parameter in steps.iter().rev() {
        let (begin_c, end_c) = parameter.validate(image.channel_count())?;
        let num_c = end_c - begin_c + 1;

        // The forward pass appended its residuals to what is now the end of the image.
        let offset = if parameter.in_place {
            end_c + 1
        } else {
            image.channel_count() - num_c
        };
        if offset < end_c + 1 {
            return Err(ValidationError::OutOfRange {
                begin_c: parameter.begin_c,
                num_c: parameter.num_c * 2,
                channel_count: image.channel_count(),
            }
            .into());
        }

        for c in begin_c..=end_c {
            let rc = offset + (c - begin_c);
            if parameter.horizontal {
                inv_h_squeeze(image, c, rc)?;
            } else {
                inv_v_squeeze(image, c, rc)?;
            }
        }

        for _ in 0..num_c {
            image.remove_channel(offset);
        }
    }
    Ok(())
}

/// Restores channel `c` from its averages and the horizontal residuals in channel `rc`.
///
/// The residual channel is left in the image.
pub fn inv_h_squeeze<A: ChannelAllocator>(
    image: &mut Image<A>,
    c: usize,
    rc: usize,
) -> Result<(), SqueezeError> {
    let (chin, chin_residual) = step_channels(image, c, rc)?;
    let res_w = chin_residual.w();
    if chin_residual.h() != chin.h() || (chin.w() != res_w && chin.w() != res_w + 1) {
        return Err(mismatch(c, chin, rc, chin_residual).into());
    }

    let mut chout = image.allocator().create_channel(
        chin.w() + res_w,
        chin.h(),
        chin.hshift().saturating_sub(1),
        chin.vshift(),
    )?;

    for y in 0..chin.h() {
        let p_in = chin.row(y);
        let p_res = chin_residual.row(y);
        let p_out = chout.row_mut(y);
        for x in 0..res_w {
            let avg = PixelWide::from(p_in[x]);
            let next_avg = if x + 1 < p_in.len() {
                PixelWide::from(p_in[x + 1])
            } else {
                avg
            };
            let left = if x > 0 {
                PixelWide::from(p_out[x * 2 - 1])
            } else {
                avg
            };
            let diff = PixelWide::from(p_res[x]) + smooth_tendency(left, avg, next_avg);
            let a = avg + diff / 2;
            p_out[x * 2] = a as Pixel;
            p_out[x * 2 + 1] = (a - diff) as Pixel;
        }
        if p_out.len() & 1 == 1 {
            p_out[p_out.len() - 1] = p_in[p_in.len() - 1];
        }
    }

    image.replace_channel(c, chout);
    Ok(())
}

/// Restores channel `c` from its averages and the vertical residuals in channel `rc`.
///
/// The residual channel is left in the image.
pub fn inv_v_squeeze<A: ChannelAllocator>(
    image: &mut Image<A>,
    c: usize,
    rc: usize,
) -> Result<(), SqueezeError> {
    let (chin, chin_residual) = step_channels(image, c, rc)?;
    let res_h = chin_residual.h();
    if chin_residual.w() != chin.w() || (chin.h() != res_h && chin.h() != res_h + 1) {
        return Err(mismatch(c, chin, rc, chin_residual).into());
    }

    let mut chout = image.allocator().create_channel(
        chin.w(),
        chin.h() + res_h,
        chin.hshift(),
        chin.vshift().saturating_sub(1),
    )?;

    for y in 0..res_h {
        let p_in = chin.row(y);
        let p_res = chin_residual.row(y);
        let p_next = if y + 1 < chin.h() {
            Some(chin.row(y + 1))
        } else {
            None
        };
        for x in 0..chin.w() {
            let avg = PixelWide::from(p_in[x]);
            let next_avg = p_next.map_or(avg, |p_next| PixelWide::from(p_next[x]));
            let top = if y > 0 {
                PixelWide::from(chout.get(x, y * 2 - 1))
            } else {
                avg
            };
            let diff = PixelWide::from(p_res[x]) + smooth_tendency(top, avg, next_avg);
            let a = avg + diff / 2;
            chout.row_mut(y * 2)[x] = a as Pixel;
            chout.row_mut(y * 2 + 1)[x] = (a - diff) as Pixel;
        }
    }
    if chout.h() & 1 == 1 {
        let last = chout.h() - 1;
        chout.row_mut(last).copy_from_slice(chin.row(chin.h() - 1));
    }

    image.replace_channel(c, chout);
    Ok(())
}

fn step_channels<A: ChannelAllocator>(
    image: &Image<A>,
    c: usize,
    rc: usize,
) -> Result<(&Channel, &Channel), ValidationError> {
    let channel_count = image.channel_count();
    match (image.channel(c), image.channel(rc)) {
        (Some(chin), Some(chin_residual)) if c != rc => Ok((chin, chin_residual)),
        (Some(_), _) => Err(ValidationError::ChannelIndex {
            index: rc,
            channel_count,
        }),
        (None, _) => Err(ValidationError::ChannelIndex {
            index: c,
            channel_count,
        }),
    }
}

fn mismatch(c: usize, chin: &Channel, rc: usize, chin_residual: &Channel) -> ValidationError {
    ValidationError::ResidualMismatch {
        channel: c,
        channel_w: chin.w(),
        channel_h: chin.h(),
        residual: rc,
        residual_w: chin_residual.w(),
        residual_h: chin_residual.h(),
    }
}
