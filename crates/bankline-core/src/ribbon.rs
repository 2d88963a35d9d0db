//! Track ribbon sampling: evenly spaced cross-sections along the loop.
//!
//! Samples are taken at fixed arc-length intervals, converted to a
//! parametric offset through the spline's length table, and widened along
//! `forward × up` so the ribbon banks with the interpolated normals.

use crate::{BanklineError, Result, Spline};
use glam::Vec3;

/// Upper bound on cross-sections per loop
pub const MAX_RIBBON_SLICES: usize = 100_000;

/// One cross-section of the track ribbon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RibbonSlice {
    /// Arc-length distance from point 0.
    pub distance: f32,
    pub position: Vec3,
    /// Unit tangent.
    pub forward: Vec3,
    /// Unit bank vector.
    pub up: Vec3,
    pub left: Vec3,
    pub right: Vec3,
}

/// Sample the ribbon every `spacing` units of arc length.
///
/// Loops with fewer than three points have no ribbon.
pub fn sample_ribbon(spline: &Spline, spacing: f32, half_width: f32) -> Result<Vec<RibbonSlice>> {
    if !(spacing.is_finite() && spacing > 0.0) {
        return Err(BanklineError::InvalidParameter(format!(
            "ribbon spacing must be positive, got {}",
            spacing
        )));
    }
    if !half_width.is_finite() {
        return Err(BanklineError::InvalidParameter(format!(
            "ribbon half width must be finite, got {}",
            half_width
        )));
    }
    if spline.len() < 3 {
        return Ok(Vec::new());
    }

    let total = spline.total_length();
    let steps = (total / spacing).ceil();
    if !(steps <= MAX_RIBBON_SLICES as f32) {
        return Err(BanklineError::InvalidParameter(format!(
            "ribbon spacing {} needs more than {} slices for a loop of length {}",
            spacing, MAX_RIBBON_SLICES, total
        )));
    }
    let count = steps as usize;
    let mut slices = Vec::with_capacity(count);

    for i in 0..count {
        let distance = i as f32 * spacing;
        if distance >= total {
            break;
        }

        let f = spline.normalised_offset(distance)?;
        let (Some(position), Some(gradient), Some(up)) =
            (spline.point(f), spline.gradient(f), spline.normal(f))
        else {
            break;
        };

        let forward = gradient.normalize_or_zero();
        let side = forward.cross(up) * half_width;

        slices.push(RibbonSlice {
            distance,
            position,
            forward,
            up,
            left: position + side,
            right: position - side,
        });
    }

    Ok(slices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn make_square_loop() -> Spline {
        let mut spline = Spline::new();
        spline.insert_point(Vec3::new(0.0, 0.0, 0.0));
        spline.insert_point(Vec3::new(10.0, 0.0, 0.0));
        spline.insert_point(Vec3::new(10.0, 0.0, 10.0));
        spline.insert_point(Vec3::new(0.0, 0.0, 10.0));
        spline
    }

    #[test]
    fn closed_loop_produces_evenly_spaced_slices() {
        let spline = make_square_loop();
        let slices = sample_ribbon(&spline, 0.5, 0.2).unwrap();

        let expected = (spline.total_length() / 0.5).ceil() as usize;
        assert_eq!(slices.len(), expected);
        assert_eq!(slices[0].distance, 0.0);
        assert_eq!(slices[0].position, Vec3::ZERO);
        assert!(slices.last().unwrap().distance < spline.total_length());
    }

    #[test]
    fn slices_are_symmetric_and_level() {
        let spline = make_square_loop();
        for slice in sample_ribbon(&spline, 1.0, 0.2).unwrap() {
            assert_relative_eq!(slice.left.distance(slice.right), 0.4, epsilon = 1e-4);
            let mid = (slice.left + slice.right) * 0.5;
            assert_relative_eq!(mid.distance(slice.position), 0.0, epsilon = 1e-5);
            // Flat loop with upward bank vectors: rails stay on the ground.
            assert_relative_eq!(slice.left.y, 0.0, epsilon = 1e-5);
            assert_relative_eq!(slice.forward.dot(slice.left - slice.position), 0.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn too_few_points_returns_empty() {
        let mut spline = Spline::new();
        spline.insert_point(Vec3::ZERO);
        spline.insert_point(Vec3::new(1.0, 0.0, 0.0));
        assert!(sample_ribbon(&spline, 0.5, 0.2).unwrap().is_empty());
    }

    #[test]
    fn non_positive_spacing_is_rejected() {
        let spline = make_square_loop();
        assert!(matches!(
            sample_ribbon(&spline, 0.0, 0.2),
            Err(BanklineError::InvalidParameter(_))
        ));
        assert!(sample_ribbon(&spline, f32::NAN, 0.2).is_err());
    }

    #[test]
    fn tiny_spacing_is_rejected_instead_of_allocating() {
        let spline = make_square_loop();
        assert!(matches!(
            sample_ribbon(&spline, 1e-20, 0.2),
            Err(BanklineError::InvalidParameter(_))
        ));

        let spacing = spline.total_length() / MAX_RIBBON_SLICES as f32 * 2.0;
        let slices = sample_ribbon(&spline, spacing, 0.2).unwrap();
        assert!(slices.len() <= MAX_RIBBON_SLICES);
    }
}
