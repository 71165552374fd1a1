#![doc = include_str!(concat!("../", core::env!("CARGO_PKG_README")))]
#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

pub mod defaults;
pub mod error;
pub mod executor;
pub mod params;
pub mod pipeline;
pub mod squeeze;
pub mod tendency;

/// Reference inverse transform, for verifying round trips.
#[cfg(any(test, feature = "reference-inverse"))]
pub mod inverse;

#[cfg(feature = "bench")]
pub mod bench;

#[cfg(test)]
pub(crate) mod test_prelude;

pub use defaults::{
    DefaultSqueezePolicy, NoDefaults, PreviewSqueezePolicy, MAX_FIRST_PREVIEW_SIZE,
};
pub use error::{SqueezeError, ValidationError};
pub use executor::Executor;
pub use params::SqueezeParams;
pub use pipeline::{fwd_squeeze, fwd_squeeze_with_policy, SqueezeOutcome};
pub use squeeze::{fwd_h_squeeze, fwd_v_squeeze};

// Containers from the common crate, so callers only need a single dependency.
pub use modular_squeeze_common::{
    AlignedChannelAllocator, AllocateError, Channel, ChannelAllocator, ChannelError, Image, Pixel,
    PixelWide, MAX_SAMPLE_BITS, MAX_SAMPLE_SPAN,
};
