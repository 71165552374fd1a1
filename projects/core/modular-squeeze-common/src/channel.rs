//! A single plane of pixel samples.
//!
//! A [`Channel`] is a `w` x `h` grid of [`Pixel`]s stored row after row in one
//! [`PixelBuffer`]. Rows are only ever accessed through the row accessors, so callers never
//! deal with strides themselves.
//!
//! Alongside its dimensions, every channel records how many times it has been halved in each
//! axis relative to the full resolution grid (`hshift` and `vshift`).

use crate::allocate::{AllocateError, PixelBuffer};
use crate::Pixel;
use core::fmt;
use thiserror::Error;

/// An error that happened while creating a [`Channel`] from existing pixels.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError {
    /// The number of supplied pixels does not match the requested dimensions.
    #[error("Expected {w}x{h} pixels, got {actual}.")]
    LengthMismatch {
        /// Requested width.
        w: usize,
        /// Requested height.
        h: usize,
        /// Number of pixels supplied.
        actual: usize,
    },

    /// The channel storage could not be allocated.
    #[error(transparent)]
    Allocation(#[from] AllocateError),
}

/// One plane of samples within an [`Image`](crate::Image).
pub struct Channel {
    buffer: PixelBuffer,
    w: usize,
    h: usize,
    hshift: u32,
    vshift: u32,
}

impl Channel {
    /// Creates a zero filled channel.
    ///
    /// # Parameters
    ///
    /// - `w`: Width in pixels
    /// - `h`: Height in pixels
    /// - `hshift`: Number of times this channel was halved horizontally
    /// - `vshift`: Number of times this channel was halved vertically
    ///
    /// # Returns
    ///
    /// The new channel, or an [`AllocateError`] if the backing storage could not be allocated.
    pub fn create(w: usize, h: usize, hshift: u32, vshift: u32) -> Result<Self, AllocateError> {
        let num_pixels = w
            .checked_mul(h)
            .ok_or(AllocateError::SizeOverflow { num_pixels: usize::MAX })?;
        Ok(Self {
            buffer: PixelBuffer::new_zeroed(num_pixels)?,
            w,
            h,
            hshift,
            vshift,
        })
    }

    /// Creates an unshifted channel holding a copy of `pixels`, which are laid out row by row.
    ///
    /// # Errors
    ///
    /// - [`ChannelError::LengthMismatch`] if `pixels.len() != w * h`
    /// - [`ChannelError::Allocation`] if the backing storage could not be allocated
    pub fn from_pixels(w: usize, h: usize, pixels: &[Pixel]) -> Result<Self, ChannelError> {
        if w.checked_mul(h) != Some(pixels.len()) {
            return Err(ChannelError::LengthMismatch {
                w,
                h,
                actual: pixels.len(),
            });
        }
        let mut channel = Self::create(w, h, 0, 0)?;
        channel.pixels_mut().copy_from_slice(pixels);
        Ok(channel)
    }

    /// Creates a copy of this channel in a new allocation.
    pub fn try_clone(&self) -> Result<Self, AllocateError> {
        let mut copy = Self::create(self.w, self.h, self.hshift, self.vshift)?;
        copy.pixels_mut().copy_from_slice(self.pixels());
        Ok(copy)
    }

    /// Width in pixels.
    #[inline]
    pub fn w(&self) -> usize {
        self.w
    }

    /// Height in pixels.
    #[inline]
    pub fn h(&self) -> usize {
        self.h
    }

    /// How many times this channel has been halved horizontally.
    #[inline]
    pub fn hshift(&self) -> u32 {
        self.hshift
    }

    /// How many times this channel has been halved vertically.
    #[inline]
    pub fn vshift(&self) -> u32 {
        self.vshift
    }

    /// Returns `true` if the channel holds no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// All pixels, row by row.
    #[inline]
    pub fn pixels(&self) -> &[Pixel] {
        self.buffer.as_slice()
    }

    /// All pixels, row by row.
    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [Pixel] {
        self.buffer.as_mut_slice()
    }

    /// Row `y` of the channel.
    ///
    /// # Panics
    ///
    /// If `y >= h`.
    #[inline]
    pub fn row(&self, y: usize) -> &[Pixel] {
        assert!(y < self.h, "row {y} out of bounds for height {}", self.h);
        let start = y * self.w;
        &self.buffer.as_slice()[start..start + self.w]
    }

    /// Row `y` of the channel.
    ///
    /// # Panics
    ///
    /// If `y >= h`.
    #[inline]
    pub fn row_mut(&mut self, y: usize) -> &mut [Pixel] {
        assert!(y < self.h, "row {y} out of bounds for height {}", self.h);
        let start = y * self.w;
        let w = self.w;
        &mut self.buffer.as_mut_slice()[start..start + w]
    }

    /// Iterates over all rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Pixel]> + '_ {
        (0..self.h).map(move |y| self.row(y))
    }

    /// Value at column `x`, row `y`.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Pixel {
        self.row(y)[x]
    }

    /// Smallest and largest sample, or [`None`] if the channel is empty.
    pub fn sample_range(&self) -> Option<(Pixel, Pixel)> {
        self.pixels()
            .iter()
            .fold(None, |range, &p| match range {
                None => Some((p, p)),
                Some((min, max)) => Some((min.min(p), max.max(p))),
            })
    }
}

impl fmt::Debug for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel")
            .field("w", &self.w)
            .field("h", &self.h)
            .field("hshift", &self.hshift)
            .field("vshift", &self.vshift)
            .finish_non_exhaustive()
    }
}

/// Channels are equal if they have the same shape, shifts and pixels.
impl PartialEq for Channel {
    fn eq(&self, other: &Self) -> bool {
        self.w == other.w
            && self.h == other.h
            && self.hshift == other.hshift
            && self.vshift == other.vshift
            && self.pixels() == other.pixels()
    }
}

impl Eq for Channel {}
