//! An ordered list of channels.
//!
//! The order of the channels inside an [`Image`] is significant: transforms insert new
//! channels at specific positions, and the inverse transforms rely on finding them there.
//! The first [`Image::nb_meta_channels`] channels are meta channels (for example palettes),
//! which default transform policies leave alone.

use crate::allocate::AllocateError;
use crate::channel::Channel;
use alloc::vec::Vec;

/// Creates new channels on behalf of transforms.
///
/// Transforms never allocate channels directly; they go through the allocator owned by the
/// [`Image`] they operate on. This allows callers to plug in their own memory management
/// (or to simulate allocation failure).
pub trait ChannelAllocator {
    /// Creates a zero filled channel.
    ///
    /// # Parameters
    ///
    /// - `w`: Width in pixels
    /// - `h`: Height in pixels
    /// - `hshift`: Number of times the channel was halved horizontally
    /// - `vshift`: Number of times the channel was halved vertically
    fn create_channel(
        &self,
        w: usize,
        h: usize,
        hshift: u32,
        vshift: u32,
    ) -> Result<Channel, AllocateError>;
}

/// The default [`ChannelAllocator`], which places every channel in its own cache line
/// aligned allocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlignedChannelAllocator;

impl ChannelAllocator for AlignedChannelAllocator {
    #[inline]
    fn create_channel(
        &self,
        w: usize,
        h: usize,
        hshift: u32,
        vshift: u32,
    ) -> Result<Channel, AllocateError> {
        Channel::create(w, h, hshift, vshift)
    }
}

/// An ordered collection of [`Channel`]s plus the allocator used to create more of them.
#[derive(Debug)]
pub struct Image<A: ChannelAllocator = AlignedChannelAllocator> {
    channels: Vec<Channel>,
    nb_meta_channels: usize,
    allocator: A,
}

impl Image<AlignedChannelAllocator> {
    /// Creates an image from existing channels using the [`AlignedChannelAllocator`].
    ///
    /// # Parameters
    ///
    /// - `channels`: The channels, in order
    /// - `nb_meta_channels`: How many of the leading channels are meta channels
    pub fn new(channels: Vec<Channel>, nb_meta_channels: usize) -> Self {
        Self::with_allocator(channels, nb_meta_channels, AlignedChannelAllocator)
    }
}

impl<A: ChannelAllocator> Image<A> {
    /// Creates an image from existing channels, creating future channels with `allocator`.
    ///
    /// # Panics
    ///
    /// If `nb_meta_channels` exceeds the number of channels.
    pub fn with_allocator(channels: Vec<Channel>, nb_meta_channels: usize, allocator: A) -> Self {
        assert!(
            nb_meta_channels <= channels.len(),
            "{nb_meta_channels} meta channels requested, but image only has {} channels",
            channels.len()
        );
        Self {
            channels,
            nb_meta_channels,
            allocator,
        }
    }

    /// The allocator new channels are created with.
    #[inline]
    pub fn allocator(&self) -> &A {
        &self.allocator
    }

    /// All channels, in order.
    #[inline]
    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    /// Channel at `index`, if present.
    #[inline]
    pub fn channel(&self, index: usize) -> Option<&Channel> {
        self.channels.get(index)
    }

    /// Number of channels, including meta channels.
    #[inline]
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Number of leading meta channels.
    #[inline]
    pub fn nb_meta_channels(&self) -> usize {
        self.nb_meta_channels
    }

    /// Moves `channel` into slot `index`, returning the channel previously stored there.
    ///
    /// # Panics
    ///
    /// If `index` is out of bounds.
    #[inline]
    pub fn replace_channel(&mut self, index: usize, channel: Channel) -> Channel {
        core::mem::replace(&mut self.channels[index], channel)
    }

    /// Inserts `channel` at `index`, shifting all channels after it one slot to the right.
    ///
    /// # Panics
    ///
    /// If `index > channel_count()`.
    #[inline]
    pub fn insert_channel(&mut self, index: usize, channel: Channel) {
        self.channels.insert(index, channel);
    }

    /// Removes and returns the channel at `index`.
    ///
    /// # Panics
    ///
    /// If `index` is out of bounds.
    #[inline]
    pub fn remove_channel(&mut self, index: usize) -> Channel {
        self.channels.remove(index)
    }

    /// Consumes the image, returning its channels.
    pub fn into_channels(self) -> Vec<Channel> {
        self.channels
    }
}
