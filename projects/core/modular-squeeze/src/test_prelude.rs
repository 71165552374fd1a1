//! Common test imports and utilities for squeeze tests
//!
//! This module provides a common prelude for test modules to avoid
//! duplicate imports across the codebase.

// External crates commonly used in tests
pub use rstest::rstest;

// Core functionality from this crate
pub use super::*;
pub use crate::error::ValidationError;

// Standard library imports commonly used in tests
pub use alloc::vec;
pub use alloc::vec::Vec;

use core::alloc::Layout;
use core::cell::Cell;

/// Largest sample of a [`MAX_SAMPLE_BITS`] channel.
pub(crate) const SAMPLE_MAX: Pixel = (1 << (MAX_SAMPLE_BITS - 1)) - 1;

/// Smallest sample of a [`MAX_SAMPLE_BITS`] channel.
pub(crate) const SAMPLE_MIN: Pixel = -(1 << (MAX_SAMPLE_BITS - 1));

/// Creates an image with a single `w` x `h` channel holding `pixels`.
pub(crate) fn single_channel_image(w: usize, h: usize, pixels: &[Pixel]) -> Image {
    Image::new(vec![Channel::from_pixels(w, h, pixels).unwrap()], 0)
}

/// Creates a channel filled with a gradient plus deterministic noise derived from `seed`.
pub(crate) fn pattern_channel(w: usize, h: usize, seed: u64) -> Channel {
    let mut channel = Channel::create(w, h, 0, 0).unwrap();
    let mut state = seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) | 1;
    for (i, pixel) in channel.pixels_mut().iter_mut().enumerate() {
        // xorshift64
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        let noise = (state % 64) as Pixel - 32;
        let (x, y) = (i % w, i / w);
        *pixel = ((x * 7 + y * 3) % 512) as Pixel - 256 + noise;
    }
    channel
}

/// Creates an image with one [`pattern_channel`] per entry of `shapes` and no meta channels.
pub(crate) fn pattern_image(shapes: &[(usize, usize)], seed: u64) -> Image {
    let channels = shapes
        .iter()
        .enumerate()
        .map(|(i, &(w, h))| pattern_channel(w, h, seed.wrapping_add(i as u64)))
        .collect();
    Image::new(channels, 0)
}

/// Every [`Executor`] available with the enabled features.
pub(crate) fn all_executors() -> Vec<Executor> {
    #[allow(unused_mut)]
    let mut executors = vec![Executor::Sequential];
    #[cfg(feature = "multithreaded")]
    {
        executors.push(Executor::Global);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(2)
            .build()
            .unwrap();
        executors.push(Executor::Pool(alloc::sync::Arc::new(pool)));
    }
    executors
}

/// A [`ChannelAllocator`] which fails once a set number of channels has been created.
pub(crate) struct FailingAllocator {
    remaining: Cell<usize>,
}

impl FailingAllocator {
    pub(crate) fn new(successful_allocations: usize) -> Self {
        Self {
            remaining: Cell::new(successful_allocations),
        }
    }
}

impl ChannelAllocator for FailingAllocator {
    fn create_channel(
        &self,
        w: usize,
        h: usize,
        hshift: u32,
        vshift: u32,
    ) -> Result<Channel, AllocateError> {
        match self.remaining.get() {
            0 => Err(Layout::from_size_align(usize::MAX, 64).unwrap_err().into()),
            remaining => {
                self.remaining.set(remaining - 1);
                Channel::create(w, h, hshift, vshift)
            }
        }
    }
}

/// Restores channel `c` from a horizontal squeeze, leaving the residual at `rc` in place.
pub(crate) fn inv_h_squeeze<A: ChannelAllocator>(image: &mut Image<A>, c: usize, rc: usize) {
    inverse::inv_h_squeeze(image, c, rc).unwrap();
}

/// Restores channel `c` from a vertical squeeze, leaving the residual at `rc` in place.
pub(crate) fn inv_v_squeeze<A: ChannelAllocator>(image: &mut Image<A>, c: usize, rc: usize) {
    inverse::inv_v_squeeze(image, c, rc).unwrap();
}

/// Undoes all `steps` of a forward squeeze.
pub(crate) fn inv_squeeze<A: ChannelAllocator>(image: &mut Image<A>, steps: &[SqueezeParams]) {
    inverse::inv_squeeze(image, steps).unwrap();
}
