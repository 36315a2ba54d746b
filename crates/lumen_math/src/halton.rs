//! Halton low-discrepancy sequence used for sub-pixel jitter.
//!
//! Reference: <https://en.wikipedia.org/wiki/Halton_sequence>

use crate::Vec2;

/// Value of the Halton sequence at `index` in radix `base`, in [0, 1).
///
/// Reverses the base-`base` digits of `index` about the radix point.
/// `base` must be at least 2.
pub fn halton(mut index: u32, base: u32) -> f32 {
    let mut f = 1.0_f32;
    let mut r = 0.0_f32;
    let b = base as f32;

    while index > 0 {
        f /= b;
        r += f * (index % base) as f32;
        index /= base;
    }

    r
}

/// Sub-pixel offset for accumulated sample `sample`, using bases 2 and 3.
pub fn jitter_offset(sample: u32) -> Vec2 {
    Vec2::new(halton(sample, 2), halton(sample, 3))
}
