//! The squeeze pipeline: applies a list of [`SqueezeParams`] to an image.
//!
//! ## Channel layout
//!
//! Every parameter set squeezes channels `begin_c..=end_c` in increasing order. The residual
//! of channel `c` is inserted at `offset + (c - begin_c)`, where `offset` is
//!
//! - `end_c + 1` for in-place sets (residuals directly follow the squeezed block), or
//! - the channel count before the set started (residuals are appended).
//!
//! In both cases `offset` lies past `end_c`, so inserting residuals never moves a channel
//! that is still waiting to be squeezed, and the residuals end up contiguous and in source
//! order.
//!
//! ## Failure
//!
//! The pipeline stops at the first error. Parameter sets (and steps within a set) that were
//! already applied stay applied; the failing step itself leaves the image unmodified.

use crate::defaults::{DefaultSqueezePolicy, PreviewSqueezePolicy};
use crate::error::SqueezeError;
use crate::executor::Executor;
use crate::params::SqueezeParams;
use crate::squeeze::{fwd_h_squeeze, fwd_v_squeeze};
use alloc::vec::Vec;
use modular_squeeze_common::{ChannelAllocator, Image};
use tracing::{debug, trace};

/// The result of a successful call to [`fwd_squeeze`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqueezeOutcome {
    /// No parameters were given and the default policy produced none either.
    /// The image was not modified.
    NotApplied,

    /// The transform was applied.
    Applied {
        /// The parameter sets that were applied, in order. When the caller passed an empty
        /// list, these are the defaults derived for the image; they need to be stored
        /// alongside the image so the transform can be undone.
        steps: Vec<SqueezeParams>,
    },
}

impl SqueezeOutcome {
    /// Returns `true` if the image was modified.
    #[inline]
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// Applies the squeeze transform to `image`, using [`PreviewSqueezePolicy`] when
/// `parameters` is empty.
///
/// # Parameters
///
/// - `image`: The image to transform
/// - `parameters`: The squeeze steps to apply, in order. May be empty.
/// - `executor`: Where the rows of each step are processed
///
/// # Returns
///
/// [`SqueezeOutcome::NotApplied`] if there was nothing to do, otherwise the applied steps.
///
/// # Errors
///
/// - [`SqueezeError::Validation`] if a parameter set does not fit the image at the time it
///   is applied, or a selected channel holds samples too far apart to squeeze losslessly
///   (see [`MAX_SAMPLE_BITS`](crate::MAX_SAMPLE_BITS))
/// - [`SqueezeError::Allocation`] if a channel could not be created
///
/// # Examples
///
/// ```
/// use modular_squeeze::{fwd_squeeze, Channel, Executor, Image, SqueezeParams};
///
/// let channel = Channel::from_pixels(4, 2, &[1, 2, 3, 4, 5, 6, 7, 8])?;
/// let mut image = Image::new(vec![channel], 0);
/// let params = [
///     SqueezeParams::horizontal(0, 1, true),
///     SqueezeParams::vertical(0, 1, true),
/// ];
/// fwd_squeeze(&mut image, &params, &Executor::Sequential)?;
///
/// // averages, vertical residual, horizontal residual
/// let widths: Vec<_> = image.channels().iter().map(|c| (c.w(), c.h())).collect();
/// assert_eq!(widths, [(2, 1), (2, 1), (2, 2)]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn fwd_squeeze<A: ChannelAllocator>(
    image: &mut Image<A>,
    parameters: &[SqueezeParams],
    executor: &Executor,
) -> Result<SqueezeOutcome, SqueezeError> {
    fwd_squeeze_with_policy(image, parameters, &PreviewSqueezePolicy, executor)
}

/// Applies the squeeze transform to `image`, asking `policy` for parameters when
/// `parameters` is empty.
///
/// See [`fwd_squeeze`] for details.
pub fn fwd_squeeze_with_policy<A, P>(
    image: &mut Image<A>,
    parameters: &[SqueezeParams],
    policy: &P,
    executor: &Executor,
) -> Result<SqueezeOutcome, SqueezeError>
where
    A: ChannelAllocator,
    P: DefaultSqueezePolicy,
{
    let steps = if parameters.is_empty() {
        let defaults = policy.derive_defaults(image);
        debug!("No squeeze parameters given, derived {} default steps", defaults.len());
        defaults
    } else {
        parameters.to_vec()
    };

    // if nothing to do, don't do squeeze
    if steps.is_empty() {
        debug!("Nothing to squeeze, skipping transform");
        return Ok(SqueezeOutcome::NotApplied);
    }

    for parameter in &steps {
        apply_parameter_set(image, parameter, executor)?;
    }

    Ok(SqueezeOutcome::Applied { steps })
}

/// Applies a single parameter set to `image`.
fn apply_parameter_set<A: ChannelAllocator>(
    image: &mut Image<A>,
    parameter: &SqueezeParams,
    executor: &Executor,
) -> Result<(), SqueezeError> {
    let (begin_c, end_c) = parameter.validate(image.channel_count())?;
    let offset = if parameter.in_place {
        end_c + 1
    } else {
        image.channel_count()
    };
    trace!(?parameter, offset, "Applying squeeze parameters");

    for c in begin_c..=end_c {
        let rc = offset + (c - begin_c);
        if parameter.horizontal {
            fwd_h_squeeze(image, c, rc, executor)?;
        } else {
            fwd_v_squeeze(image, c, rc, executor)?;
        }
    }
    Ok(())
}
