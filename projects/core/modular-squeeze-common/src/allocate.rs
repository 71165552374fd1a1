//! Memory allocation utilities for channel storage.
//!
//! Channel planes are allocated aligned to the processor's cache line size, so that rows
//! handed out to worker threads start on a fresh cache line whenever the row width allows it.
//!
//! ## Useful APIs
//!
//! [`allocate_cache_line_aligned`]: Allocates uninitialized memory aligned to a cache line.
//! [`PixelBuffer::new_zeroed`]: Allocates a zero initialized buffer of [`Pixel`]s.
//!
//! ## Safety
//!
//! All allocation operations are wrapped in safe APIs that handle proper initialization,
//! cleanup, and error handling. Memory is automatically deallocated when the allocation
//! wrappers are dropped.

use crate::Pixel;
use core::alloc::{Layout, LayoutError};
use core::fmt;
use core::mem::size_of;
use core::ptr::write_bytes;
use core::slice;
use safe_allocator_api::prelude::*;
use safe_allocator_api::RawAlloc;
use thiserror::Error;

/// Cache line size used for all channel allocations.
///
/// - x86/x86_64: 64 bytes (Intel/AMD mainstream)
/// - aarch64: 64 bytes (ARM64 typical, but can vary)
/// - Other architectures: 64 bytes (conservative default)
pub const CACHE_LINE_SIZE: usize = 64;

/// Allocates data aligned to the processor's cache line size.
///
/// # Parameters
///
/// - `num_bytes`: The number of bytes to allocate
///
/// # Returns
///
/// A [`RawAlloc`] containing the allocated (uninitialized) data
pub fn allocate_cache_line_aligned(num_bytes: usize) -> Result<RawAlloc, AllocateError> {
    let layout = Layout::from_size_align(num_bytes, CACHE_LINE_SIZE)?;
    Ok(RawAlloc::new(layout)?)
}

/// An owned, zero initialized, cache line aligned buffer of [`Pixel`]s.
///
/// This is the backing storage of a [`Channel`](crate::Channel).
pub struct PixelBuffer {
    // Ownership kept in struct, only accessed through the slice accessors.
    alloc: RawAlloc,
    len: usize,
}

// SAFETY: The buffer uniquely owns its allocation, exactly like a `Vec<Pixel>` would.
unsafe impl Send for PixelBuffer {}
// SAFETY: Shared access only hands out `&[Pixel]`.
unsafe impl Sync for PixelBuffer {}

impl PixelBuffer {
    /// Allocates a buffer holding `len` pixels, all set to zero.
    ///
    /// Empty buffers still reserve a single cache line so that the slice accessors always
    /// point into a live allocation.
    ///
    /// # Parameters
    ///
    /// - `len`: Number of [`Pixel`]s in the buffer
    ///
    /// # Returns
    ///
    /// The new buffer, or an [`AllocateError`] if the size overflows or the allocator fails.
    pub fn new_zeroed(len: usize) -> Result<Self, AllocateError> {
        let num_bytes = len
            .checked_mul(size_of::<Pixel>())
            .ok_or(AllocateError::SizeOverflow { num_pixels: len })?;
        let alloc_bytes = num_bytes.max(CACHE_LINE_SIZE);

        let mut alloc = allocate_cache_line_aligned(alloc_bytes)?;
        unsafe {
            write_bytes(alloc.as_mut_ptr(), 0, alloc_bytes);
        }

        Ok(Self { alloc, len })
    }

    /// Number of pixels in the buffer.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the buffer holds no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Gets the pixels as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[Pixel] {
        // SAFETY: The allocation is at least `len * size_of::<Pixel>()` bytes, aligned to
        // a cache line (which satisfies `Pixel`'s alignment) and fully initialized.
        unsafe { slice::from_raw_parts(self.alloc.as_ptr() as *const Pixel, self.len) }
    }

    /// Gets the pixels as a mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [Pixel] {
        // SAFETY: See `as_slice`; `&mut self` guarantees exclusive access.
        unsafe { slice::from_raw_parts_mut(self.alloc.as_mut_ptr() as *mut Pixel, self.len) }
    }
}

impl fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("len", &self.len)
            .finish_non_exhaustive()
    }
}

/// An error that happened in memory allocation within the library.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocateError {
    /// The requested number of pixels does not fit in the address space.
    #[error("Requested buffer of {num_pixels} pixels overflows the address space.")]
    SizeOverflow {
        /// Number of pixels that was requested.
        num_pixels: usize,
    },

    /// An error that occurred while creating a layout for allocation.
    #[error("Invalid layout provided. Likely due to `num_bytes` in `allocate_cache_line_aligned` being larger than isize::MAX. {0}")]
    LayoutError(#[from] LayoutError),

    /// An error that occurred while allocating memory.
    #[error(transparent)]
    AllocationFailed(#[from] AllocError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::empty(0)]
    #[case::single(1)]
    #[case::partial_line(7)]
    #[case::full_line(16)]
    #[case::many_lines(1000)]
    fn new_zeroed_is_zeroed_and_aligned(#[case] len: usize) {
        let buffer = PixelBuffer::new_zeroed(len).unwrap();
        assert_eq!(buffer.len(), len);
        assert_eq!(buffer.is_empty(), len == 0);
        assert!(buffer.as_slice().iter().all(|&p| p == 0));
        assert_eq!(buffer.as_slice().as_ptr() as usize % CACHE_LINE_SIZE, 0);
    }

    #[rstest]
    fn writes_are_visible() {
        let mut buffer = PixelBuffer::new_zeroed(5).unwrap();
        buffer.as_mut_slice().copy_from_slice(&[1, -2, 3, -4, 5]);
        assert_eq!(buffer.as_slice(), &[1, -2, 3, -4, 5]);
    }

    #[rstest]
    fn overflowing_size_is_an_error() {
        let result = PixelBuffer::new_zeroed(usize::MAX);
        assert_eq!(
            result.unwrap_err(),
            AllocateError::SizeOverflow {
                num_pixels: usize::MAX
            }
        );
    }

    #[rstest]
    fn oversized_layout_is_an_error() {
        // Fits in usize, but not in isize.
        let result = PixelBuffer::new_zeroed(usize::MAX / size_of::<Pixel>());
        assert!(matches!(result, Err(AllocateError::LayoutError(_))));
    }
}
