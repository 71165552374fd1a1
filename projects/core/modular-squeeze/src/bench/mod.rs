//! Row kernels re-exported for external benchmarks.
//!
//! The kernels are `pub(crate)`; this module exposes them when the `bench` feature is enabled.
#![cfg(not(tarpaulin_include))]
#![allow(missing_docs)]

use crate::{Channel, Pixel};

#[inline]
pub fn h_squeeze_row(p_in: &[Pixel], p_out: &mut [Pixel], p_res: &mut [Pixel]) {
    crate::squeeze::horizontal::h_squeeze_row(p_in, p_out, p_res)
}

#[inline]
pub fn v_squeeze_row(
    chin: &Channel,
    y: usize,
    res_h: usize,
    p_out: &mut [Pixel],
    p_res: &mut [Pixel],
) {
    crate::squeeze::vertical::v_squeeze_row(chin, y, res_h, p_out, p_res)
}
