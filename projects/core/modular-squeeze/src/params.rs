//! Squeeze Parameters
//!
//! A [`SqueezeParams`] describes one squeeze step: which consecutive channels to squeeze,
//! in which direction, and where the produced residual channels go.

use crate::error::ValidationError;

/// Parameters for a single squeeze step over a run of consecutive channels.
///
/// Each selected channel is replaced by its half resolution average, and a residual channel
/// is inserted for it. With [`in_place`](Self::in_place) set, the residuals are placed right
/// after the squeezed block; otherwise they are appended to the end of the channel list.
/// Either way the residuals keep the relative order of their source channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SqueezeParams {
    /// Squeeze horizontally (halving width) if `true`, vertically (halving height) otherwise.
    pub horizontal: bool,

    /// Insert residuals directly after the squeezed block instead of appending them.
    pub in_place: bool,

    /// Index of the first channel to squeeze.
    pub begin_c: u32,

    /// Number of consecutive channels to squeeze. Must be at least 1.
    pub num_c: u32,
}

impl SqueezeParams {
    /// Parameters for a horizontal squeeze of channels `begin_c..begin_c + num_c`.
    pub const fn horizontal(begin_c: u32, num_c: u32, in_place: bool) -> Self {
        Self {
            horizontal: true,
            in_place,
            begin_c,
            num_c,
        }
    }

    /// Parameters for a vertical squeeze of channels `begin_c..begin_c + num_c`.
    pub const fn vertical(begin_c: u32, num_c: u32, in_place: bool) -> Self {
        Self {
            horizontal: false,
            in_place,
            begin_c,
            num_c,
        }
    }

    /// Checks that these parameters select an existing, non-empty channel range.
    ///
    /// # Parameters
    ///
    /// - `channel_count`: Number of channels currently in the image
    ///
    /// # Returns
    ///
    /// The inclusive range of selected channel indices (`begin_c`, `end_c`).
    pub fn validate(&self, channel_count: usize) -> Result<(usize, usize), ValidationError> {
        if self.num_c == 0 {
            return Err(ValidationError::EmptyRange {
                begin_c: self.begin_c,
            });
        }

        let begin_c = self.begin_c as usize;
        let end_exclusive = begin_c.checked_add(self.num_c as usize);
        match end_exclusive {
            Some(end) if end <= channel_count => Ok((begin_c, end - 1)),
            _ => Err(ValidationError::OutOfRange {
                begin_c: self.begin_c,
                num_c: self.num_c,
                channel_count,
            }),
        }
    }
}
