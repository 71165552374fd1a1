#![doc = include_str!(concat!("../", core::env!("CARGO_PKG_README")))]
#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

pub mod allocate;
pub mod channel;
pub mod image;

pub use allocate::{AllocateError, PixelBuffer};
pub use channel::{Channel, ChannelError};
pub use image::{AlignedChannelAllocator, ChannelAllocator, Image};

/// A stored sample value.
///
/// Squeezing a channel produces residuals of up to about three times the spread of its
/// samples, so not every [`Pixel`] can be squeezed losslessly. Channels whose samples fit in
/// [`MAX_SAMPLE_BITS`] signed bits are always accepted; in general, the difference between the
/// largest and smallest sample of a channel may not exceed [`MAX_SAMPLE_SPAN`].
pub type Pixel = i32;

/// Intermediate type wide enough to hold sums and differences of two [`Pixel`]s.
pub type PixelWide = i64;

/// Largest (signed) bit depth whose samples can always be squeezed without overflow.
pub const MAX_SAMPLE_BITS: u32 = 29;

/// Largest `max - min` spread of samples within a channel that can be squeezed.
///
/// A residual is at most `3 * spread + 1` in magnitude, which has to fit in a [`Pixel`].
pub const MAX_SAMPLE_SPAN: PixelWide = (Pixel::MAX as PixelWide - 1) / 3;

// Every MAX_SAMPLE_BITS channel must be accepted.
const _: () = assert!((1 << MAX_SAMPLE_BITS) - 1 <= MAX_SAMPLE_SPAN);
