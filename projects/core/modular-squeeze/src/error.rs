//! Error types for squeeze transform operations.

use modular_squeeze_common::{AllocateError, Pixel};
use thiserror::Error;

/// Malformed squeeze parameters, or a step invoked on channels that do not exist.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A parameter set selects zero channels.
    #[error("Squeeze parameters starting at channel {begin_c} select no channels (num_c == 0).")]
    EmptyRange {
        /// First channel of the range.
        begin_c: u32,
    },

    /// A parameter set selects channels past the end of the image.
    #[error("Invalid channel range: channels {begin_c}..{begin_c}+{num_c} requested, but image has {channel_count} channels.")]
    OutOfRange {
        /// First channel of the range.
        begin_c: u32,
        /// Number of channels in the range.
        num_c: u32,
        /// Number of channels in the image at validation time.
        channel_count: usize,
    },

    /// A single step was asked to read or insert at a channel index that does not exist.
    #[error("Channel index {index} is out of bounds for an image with {channel_count} channels.")]
    ChannelIndex {
        /// The offending index.
        index: usize,
        /// Number of channels in the image.
        channel_count: usize,
    },

    /// The samples of a channel are spread too far apart to be squeezed without overflowing
    /// the residuals. See [`MAX_SAMPLE_SPAN`](modular_squeeze_common::MAX_SAMPLE_SPAN).
    #[error("Channel {channel} holds samples from {min} to {max}, which is too wide a range to squeeze.")]
    SampleRange {
        /// Index of the offending channel.
        channel: usize,
        /// Smallest sample in the channel.
        min: Pixel,
        /// Largest sample in the channel.
        max: Pixel,
    },

    /// A residual channel does not match the shape of the averages it is paired with.
    #[error("Residual channel {residual} ({residual_w}x{residual_h}) does not fit averages channel {channel} ({channel_w}x{channel_h}).")]
    ResidualMismatch {
        /// Index of the averages channel.
        channel: usize,
        /// Width of the averages channel.
        channel_w: usize,
        /// Height of the averages channel.
        channel_h: usize,
        /// Index of the residual channel.
        residual: usize,
        /// Width of the residual channel.
        residual_w: usize,
        /// Height of the residual channel.
        residual_h: usize,
    },
}

/// Errors that can occur while applying the squeeze transform.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SqueezeError {
    /// The squeeze parameters are invalid for the image.
    #[error("Invalid squeeze parameters: {0}")]
    Validation(#[from] ValidationError),

    /// Memory allocation for a new channel failed.
    #[error("Memory allocation failed: {0}")]
    Allocation(#[from] AllocateError),
}
