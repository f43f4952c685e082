//! Area-conserving growth algebra.
//!
//! Mass is circle area. Every radius change goes through these
//! functions so mass is never created or destroyed outside the
//! defined gain/loss points.

use std::f32::consts::PI;

/// Circle area for a radius.
#[inline]
pub fn area(radius: f32) -> f32 {
    PI * radius * radius
}

/// Radius after gaining `mass_gain` units of area.
///
/// Returns `None` when the result would be non-finite or
/// non-positive; the caller must leave the cell untouched in that
/// case.
#[inline]
pub fn grow(radius: f32, mass_gain: f32) -> Option<f32> {
    valid(((area(radius) + mass_gain) / PI).sqrt())
}

/// Radius after losing `mass_loss` units of area.
///
/// The loss is clamped so area never goes negative; a result of zero
/// is still rejected since a zero-radius cell is not representable.
#[inline]
pub fn shrink(radius: f32, mass_loss: f32) -> Option<f32> {
    valid(((area(radius) - mass_loss).max(0.0) / PI).sqrt())
}

/// Radius of the fusion of two cells. Total area is conserved
/// exactly.
#[inline]
pub fn merge_radius(r1: f32, r2: f32) -> f32 {
    ((area(r1) + area(r2)) / PI).sqrt()
}

/// Radius of each half when a cell splits in two. Two cells of this
/// radius hold exactly the original area.
#[inline]
pub fn split_radius(radius: f32) -> f32 {
    radius / std::f32::consts::SQRT_2
}

/// Inverse of [`area`].
#[inline]
pub fn radius_from_area(area: f32) -> f32 {
    (area / PI).sqrt()
}

#[inline]
fn valid(radius: f32) -> Option<f32> {
    (radius.is_finite() && radius > 0.0).then_some(radius)
}
