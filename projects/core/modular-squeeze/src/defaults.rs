//! Default squeeze parameters.
//!
//! When the caller does not supply any [`SqueezeParams`], the pipeline asks a
//! [`DefaultSqueezePolicy`] for them. The standard policy, [`PreviewSqueezePolicy`], keeps
//! halving the image until the remaining averages fit in a tiny preview.

use crate::params::SqueezeParams;
use alloc::vec::Vec;
use modular_squeeze_common::{ChannelAllocator, Image};

/// The averages are squeezed until neither dimension exceeds this many pixels.
pub const MAX_FIRST_PREVIEW_SIZE: usize = 8;

/// Derives squeeze parameters for images that were not given any explicitly.
pub trait DefaultSqueezePolicy {
    /// Returns the squeeze steps to apply to `image`, in order.
    ///
    /// An empty list means the image should not be squeezed at all.
    fn derive_defaults<A: ChannelAllocator>(&self, image: &Image<A>) -> Vec<SqueezeParams>;
}

/// A policy that never produces any parameters.
///
/// With this policy, an empty parameter list leaves the image untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoDefaults;

impl DefaultSqueezePolicy for NoDefaults {
    fn derive_defaults<A: ChannelAllocator>(&self, _image: &Image<A>) -> Vec<SqueezeParams> {
        Vec::new()
    }
}

/// The standard policy: build a pyramid down to a [`MAX_FIRST_PREVIEW_SIZE`] preview.
///
/// Dimensions are taken from the first non-meta channel.
///
/// - If there are more than 2 non-meta channels and the second one has the same dimensions
///   as the first, channels 1 and 2 are assumed to be chroma. They are squeezed horizontally
///   and then vertically first, with their residuals appended to the end, so that a 4:2:0
///   preview can be decoded early.
/// - Then all non-meta channels are squeezed in place, alternating directions. Wide images
///   start horizontally, others start vertically.
///
/// Only averages are ever squeezed, so images whose samples fit in
/// [`MAX_SAMPLE_BITS`](modular_squeeze_common::MAX_SAMPLE_BITS) always accept these parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreviewSqueezePolicy;

impl DefaultSqueezePolicy for PreviewSqueezePolicy {
    fn derive_defaults<A: ChannelAllocator>(&self, image: &Image<A>) -> Vec<SqueezeParams> {
        let mut parameters = Vec::new();
        let meta = image.nb_meta_channels();
        let nb_channels = image.channel_count() - meta;
        let Some(first) = image.channel(meta) else {
            return parameters;
        };

        let mut w = first.w();
        let mut h = first.h();
        // do horizontal first on wide images; vertical first on tall images
        let wide = w > h;

        if nb_channels > 2 {
            if let Some(second) = image.channel(meta + 1) {
                if second.w() == w && second.h() == h {
                    parameters.push(SqueezeParams::horizontal(meta as u32 + 1, 2, false));
                    parameters.push(SqueezeParams::vertical(meta as u32 + 1, 2, false));
                }
            }
        }

        let begin_c = meta as u32;
        let num_c = nb_channels as u32;

        if !wide && h > MAX_FIRST_PREVIEW_SIZE {
            parameters.push(SqueezeParams::vertical(begin_c, num_c, true));
            h = h.div_ceil(2);
        }
        while w > MAX_FIRST_PREVIEW_SIZE || h > MAX_FIRST_PREVIEW_SIZE {
            if w > MAX_FIRST_PREVIEW_SIZE {
                parameters.push(SqueezeParams::horizontal(begin_c, num_c, true));
                w = w.div_ceil(2);
            }
            if h > MAX_FIRST_PREVIEW_SIZE {
                parameters.push(SqueezeParams::vertical(begin_c, num_c, true));
                h = h.div_ceil(2);
            }
        }

        parameters
    }
}
