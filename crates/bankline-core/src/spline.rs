//! Closed-loop cubic Bezier track spline with banking normals.
//!
//! Every point owns a symmetric tangent handle (stored as an offset from the
//! point) and a bank vector. Segment `i` runs from point `i` to point
//! `i + 1`, wrapping back to point 0, so the curve is always closed. The
//! per-segment arc-length table is rebuilt by every mutator and is what
//! [`Spline::normalised_offset`] walks to turn a distance along the track
//! into a parametric offset.

use crate::{BanklineError, Result};
use glam::Vec3;

/// Chord samples used to integrate one segment's arc length.
pub const SEGMENT_SAMPLES: usize = 200;

/// Bank vector given to freshly inserted points.
const DEFAULT_NORMAL: Vec3 = Vec3::Y;

/// A closed piecewise cubic Bezier loop.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Spline {
    points: Vec<Vec3>,
    /// Handle offsets: forward control is `point + control`, backward is `point - control`.
    controls: Vec<Vec3>,
    /// Bank vectors, normalized on read.
    normals: Vec<Vec3>,
    lengths: Vec<f32>,
    total_length: f32,
}

impl Spline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a spline from stored sequences, e.g. a loaded track file.
    pub fn from_parts(points: Vec<Vec3>, controls: Vec<Vec3>, normals: Vec<Vec3>) -> Result<Self> {
        if points.len() != controls.len() || points.len() != normals.len() {
            return Err(BanklineError::InvalidParameter(format!(
                "mismatched sequence lengths: {} points, {} controls, {} normals",
                points.len(),
                controls.len(),
                normals.len()
            )));
        }

        let mut spline = Self {
            points,
            controls,
            normals,
            lengths: Vec::new(),
            total_length: 0.0,
        };
        spline.update();
        Ok(spline)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn controls(&self) -> &[Vec3] {
        &self.controls
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    /// Per-segment arc lengths as of the last mutation.
    pub fn lengths(&self) -> &[f32] {
        &self.lengths
    }

    pub fn total_length(&self) -> f32 {
        self.total_length
    }

    /// Map any signed index onto the loop. `None` for an empty spline.
    pub fn index(&self, i: isize) -> Option<usize> {
        let n = self.points.len() as isize;
        if n == 0 {
            return None;
        }
        Some(i.rem_euclid(n) as usize)
    }

    /// Append a point with a zero handle and an upward bank vector.
    ///
    /// Auto-tangents are recomputed for the new point and both of its loop
    /// neighbours; handles further away keep whatever the user gave them.
    pub fn insert_point(&mut self, position: Vec3) {
        self.points.push(position);
        self.controls.push(Vec3::ZERO);
        self.normals.push(DEFAULT_NORMAL);

        let n = self.points.len();
        if n > 1 {
            self.recalculate_control(n - 2);
            self.recalculate_control(n - 1);
            self.recalculate_control(0);
        }

        self.update();
        log::debug!("Inserted point {} at {:?}", n - 1, position);
    }

    /// Move a point to an absolute position. Neighbouring handles are left alone.
    pub fn move_point(&mut self, index: usize, position: Vec3) -> Result<()> {
        self.check_index(index)?;
        self.points[index] = position;
        self.update();
        Ok(())
    }

    /// Place the forward handle of `index` at an absolute position.
    pub fn move_control(&mut self, index: usize, handle_position: Vec3) -> Result<()> {
        self.check_index(index)?;
        self.controls[index] = handle_position - self.points[index];
        self.update();
        Ok(())
    }

    /// Point the bank vector of `index` towards `target`.
    pub fn move_normal(&mut self, index: usize, target: Vec3) -> Result<()> {
        self.check_index(index)?;
        self.normals[index] = (target - self.points[index]).normalize_or_zero();
        self.update();
        Ok(())
    }

    /// Position at parametric offset `f` (segment `floor(f)`, local `t = fract`).
    pub fn point(&self, f: f32) -> Option<Vec3> {
        let (i0, i1, t) = self.segment(f)?;
        Some(self.bezier(i0, i1, t))
    }

    /// Tangent at `f`, not normalized.
    pub fn gradient(&self, f: f32) -> Option<Vec3> {
        let (i0, i1, t) = self.segment(f)?;
        let [p0, p1, p2, p3] = self.hull(i0, i1);

        let q0 = p0.lerp(p1, t);
        let q1 = p1.lerp(p2, t);
        let q2 = p2.lerp(p3, t);

        let r0 = q0.lerp(q1, t);
        let r1 = q1.lerp(q2, t);
        Some(r1 - r0)
    }

    /// Unit bank vector at `f`.
    ///
    /// Each endpoint's stored normal has its component along that point's
    /// handle removed before the two are blended, so the result stays
    /// roughly perpendicular to the curve as handles rotate.
    pub fn normal(&self, f: f32) -> Option<Vec3> {
        let (i0, i1, t) = self.segment(f)?;

        let n0 = self.orthogonal_normal(i0);
        let n1 = self.orthogonal_normal(i1);
        Some(n0.lerp(n1, t).normalize_or_zero())
    }

    /// Arc length of segment `node`, integrated over [`SEGMENT_SAMPLES`] chords.
    pub fn segment_length(&self, node: usize) -> f32 {
        let n = self.points.len();
        if n == 0 {
            return 0.0;
        }
        let i0 = node % n;
        let i1 = (i0 + 1) % n;

        let mut length = 0.0;
        let mut previous = self.points[i0];
        for step in 1..=SEGMENT_SAMPLES {
            let t = step as f32 / SEGMENT_SAMPLES as f32;
            let next = self.bezier(i0, i1, t);
            length += previous.distance(next);
            previous = next;
        }
        length
    }

    /// Rebuild the arc-length table and the total length.
    pub fn update(&mut self) {
        let lengths: Vec<f32> = (0..self.points.len())
            .map(|i| self.segment_length(i))
            .collect();
        self.total_length = lengths.iter().sum();
        self.lengths = lengths;
    }

    /// Convert a distance along the track into a parametric offset.
    ///
    /// The distance is clamped to `[0, total_length]`; the walk stops at the
    /// last segment so accumulated rounding can never run past the table.
    pub fn normalised_offset(&self, distance: f32) -> Result<f32> {
        if self.lengths.is_empty() {
            return Err(BanklineError::OffsetOutOfRange(
                "spline has no segments".to_string(),
            ));
        }
        if !distance.is_finite() {
            return Err(BanklineError::OffsetOutOfRange(format!(
                "distance {} is not finite",
                distance
            )));
        }

        let mut p = distance.clamp(0.0, self.total_length);
        let last = self.lengths.len() - 1;
        let mut i = 0;
        while i < last && p > self.lengths[i] {
            p -= self.lengths[i];
            i += 1;
        }

        let length = self.lengths[i];
        let fraction = if length > 0.0 {
            (p / length).clamp(0.0, 1.0)
        } else {
            0.0
        };
        Ok(i as f32 + fraction)
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.points.len() {
            return Err(BanklineError::IndexOutOfRange {
                index,
                count: self.points.len(),
            });
        }
        Ok(())
    }

    /// Auto-tangent: normalized average of the incoming and outgoing chords.
    fn recalculate_control(&mut self, i: usize) {
        let i = i as isize;
        let (Some(prev), Some(curr), Some(next)) =
            (self.index(i - 1), self.index(i), self.index(i + 1))
        else {
            return;
        };

        let d0 = self.points[curr] - self.points[prev];
        let d1 = self.points[next] - self.points[curr];
        self.controls[curr] = ((d0 + d1) / 2.0).normalize_or_zero();
    }

    fn segment(&self, f: f32) -> Option<(usize, usize, f32)> {
        let base = f.floor();
        let i0 = self.index(base as isize)?;
        let i1 = self.index(i0 as isize + 1)?;
        Some((i0, i1, f - base))
    }

    fn hull(&self, i0: usize, i1: usize) -> [Vec3; 4] {
        [
            self.points[i0],
            self.points[i0] + self.controls[i0],
            self.points[i1] - self.controls[i1],
            self.points[i1],
        ]
    }

    fn bezier(&self, i0: usize, i1: usize, t: f32) -> Vec3 {
        let [p0, p1, p2, p3] = self.hull(i0, i1);
        let c = 1.0 - t;

        let b0 = c * c * c;
        let b1 = 3.0 * t * c * c;
        let b2 = 3.0 * t * t * c;
        let b3 = t * t * t;

        p0 * b0 + p1 * b1 + p2 * b2 + p3 * b3
    }

    fn orthogonal_normal(&self, i: usize) -> Vec3 {
        let handle = self.controls[i].normalize_or_zero();
        let normal = self.normals[i];
        (normal - handle * handle.dot(normal)).normalize_or_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn make_square_loop() -> Spline {
        let mut spline = Spline::new();
        spline.insert_point(Vec3::new(0.0, 0.0, 0.0));
        spline.insert_point(Vec3::new(10.0, 0.0, 0.0));
        spline.insert_point(Vec3::new(10.0, 0.0, 10.0));
        spline.insert_point(Vec3::new(0.0, 0.0, 10.0));
        spline
    }

    #[test]
    fn index_wraps_negative_and_large_values() {
        let spline = make_square_loop();
        let n = spline.len() as isize;
        for i in -9..9 {
            let idx = spline.index(i).unwrap();
            assert!(idx < spline.len());
            for k in -3..3 {
                assert_eq!(spline.index(i + k * n), Some(idx));
            }
        }
        assert_eq!(spline.index(-1), Some(3));
        assert_eq!(Spline::new().index(0), None);
    }

    #[test]
    fn integer_offsets_hit_points_exactly() {
        let spline = make_square_loop();
        for (i, p) in spline.points().iter().enumerate() {
            assert_eq!(spline.point(i as f32), Some(*p));
        }
        assert_eq!(spline.point(0.0), Some(Vec3::ZERO));
        assert_eq!(spline.point(2.0), Some(Vec3::new(10.0, 0.0, 10.0)));
        assert_eq!(spline.point(-4.0), Some(Vec3::ZERO));
    }

    #[test]
    fn evaluation_is_periodic() {
        let spline = make_square_loop();
        let n = spline.len() as f32;
        for step in 0..40 {
            let f = step as f32 * 0.1 - 1.3;
            let a = spline.point(f).unwrap();
            let b = spline.point(f + n).unwrap();
            assert_abs_diff_eq!(a, b, epsilon = 1e-3);

            let ga = spline.gradient(f).unwrap();
            let gb = spline.gradient(f + n).unwrap();
            assert_abs_diff_eq!(ga, gb, epsilon = 1e-3);
        }
    }

    #[test]
    fn empty_spline_queries_return_none() {
        let spline = Spline::new();
        assert!(spline.point(0.5).is_none());
        assert!(spline.gradient(0.5).is_none());
        assert!(spline.normal(0.5).is_none());
        assert_eq!(spline.total_length(), 0.0);
    }

    #[test]
    fn total_length_is_sum_of_segments() {
        let spline = make_square_loop();
        assert_eq!(spline.lengths().len(), 4);
        let sum: f32 = spline.lengths().iter().sum();
        assert_relative_eq!(spline.total_length(), sum);
        assert!(spline.lengths().iter().all(|l| *l > 0.0));
    }

    #[test]
    fn two_distinct_points_have_positive_length() {
        let mut spline = Spline::new();
        spline.insert_point(Vec3::ZERO);
        spline.insert_point(Vec3::new(4.0, 0.0, 0.0));
        assert!(spline.total_length() > 0.0);
    }

    #[test]
    fn square_loop_length_is_near_perimeter() {
        let spline = make_square_loop();
        // Unit auto-tangents bow each side slightly outwards; the control
        // polygon bounds it from above.
        assert!(spline.total_length() > 40.0, "{}", spline.total_length());
        assert!(spline.total_length() < 42.4, "{}", spline.total_length());
    }

    #[test]
    fn segment_length_matches_chord_for_straight_segment() {
        let spline = Spline::from_parts(
            vec![Vec3::ZERO, Vec3::new(6.0, 0.0, 0.0)],
            vec![Vec3::X, Vec3::X],
            vec![Vec3::Y, Vec3::Y],
        )
        .unwrap();
        assert_relative_eq!(spline.segment_length(0), 6.0, epsilon = 1e-3);
    }

    #[test]
    fn normalised_offset_lands_in_containing_segment() {
        let spline = make_square_loop();
        let mut start = 0.0;
        for (i, length) in spline.lengths().iter().enumerate() {
            let mid = start + length * 0.5;
            let f = spline.normalised_offset(mid).unwrap();
            assert_eq!(f.floor() as usize, i);
            assert_relative_eq!(f.fract(), 0.5, epsilon = 1e-3);
            start += length;
        }
    }

    #[test]
    fn normalised_offset_clamps_at_the_ends() {
        let spline = make_square_loop();
        let total = spline.total_length();
        assert_eq!(spline.normalised_offset(-5.0).unwrap(), 0.0);

        let end = spline.normalised_offset(total).unwrap();
        assert_relative_eq!(end, 4.0, epsilon = 1e-4);
        let past = spline.normalised_offset(total * 3.0).unwrap();
        assert_relative_eq!(past, 4.0, epsilon = 1e-4);
    }

    #[test]
    fn normalised_offset_rejects_empty_and_nan() {
        assert!(matches!(
            Spline::new().normalised_offset(1.0),
            Err(BanklineError::OffsetOutOfRange(_))
        ));
        assert!(make_square_loop().normalised_offset(f32::NAN).is_err());
    }

    #[test]
    fn insert_retunes_only_new_point_and_neighbours() {
        let mut spline = Spline::new();
        spline.insert_point(Vec3::new(0.0, 0.0, 0.0));
        spline.insert_point(Vec3::new(10.0, 0.0, 0.0));
        spline.insert_point(Vec3::new(10.0, 0.0, 10.0));

        // Hand-tune every handle so auto-tangent writes are detectable.
        for i in 0..3 {
            let target = spline.points()[i] + Vec3::new(0.0, 5.0, 0.0);
            spline.move_control(i, target).unwrap();
        }
        let before = spline.controls().to_vec();

        spline.insert_point(Vec3::new(0.0, 0.0, 10.0));
        let after = spline.controls();

        assert_eq!(after[1], before[1]);
        assert_ne!(after[0], before[0]);
        assert_ne!(after[2], before[2]);
        let expected_new = Vec3::new(-1.0, 0.0, -1.0).normalize();
        let expected_first = Vec3::new(1.0, 0.0, -1.0).normalize();
        assert_abs_diff_eq!(after[3], expected_new, epsilon = 1e-6);
        assert_abs_diff_eq!(after[0], expected_first, epsilon = 1e-6);
        assert_eq!(spline.normals()[3], Vec3::Y);
    }

    #[test]
    fn auto_tangent_follows_chord_average() {
        let spline = make_square_loop();
        let expected = Vec3::new(1.0, 0.0, -1.0).normalize();
        assert_abs_diff_eq!(spline.controls()[0], expected, epsilon = 1e-6);
    }

    #[test]
    fn move_point_keeps_handles() {
        let mut spline = make_square_loop();
        let controls = spline.controls().to_vec();
        let before = spline.total_length();

        spline.move_point(1, Vec3::new(20.0, 0.0, 0.0)).unwrap();
        assert_eq!(spline.points()[1], Vec3::new(20.0, 0.0, 0.0));
        assert_eq!(spline.controls(), controls.as_slice());
        assert!(spline.total_length() > before);
    }

    #[test]
    fn move_control_stores_offset() {
        let mut spline = make_square_loop();
        spline.move_control(2, Vec3::new(12.0, 1.0, 10.0)).unwrap();
        assert_eq!(spline.controls()[2], Vec3::new(2.0, 1.0, 0.0));
    }

    #[test]
    fn move_normal_stores_unit_direction() {
        let mut spline = make_square_loop();
        spline.move_normal(1, Vec3::new(10.0, 0.0, 3.0)).unwrap();
        assert_abs_diff_eq!(spline.normals()[1], Vec3::Z, epsilon = 1e-6);

        spline.move_normal(1, spline.points()[1]).unwrap();
        assert_eq!(spline.normals()[1], Vec3::ZERO);
    }

    #[test]
    fn mutators_reject_out_of_range_index() {
        let mut spline = make_square_loop();
        let err = spline.move_point(4, Vec3::ZERO).unwrap_err();
        assert!(matches!(err, BanklineError::IndexOutOfRange { index: 4, count: 4 }));
        assert!(spline.move_control(9, Vec3::ZERO).is_err());
        assert!(spline.move_normal(4, Vec3::ZERO).is_err());
        assert!(Spline::new().move_point(0, Vec3::ZERO).is_err());
    }

    #[test]
    fn normal_is_unit_and_perpendicular_to_handle() {
        let spline = make_square_loop();
        for step in 0..16 {
            let f = step as f32 * 0.25;
            let n = spline.normal(f).unwrap();
            assert_relative_eq!(n.length(), 1.0, epsilon = 1e-5);
        }
        // Flat loop with upward bank vectors stays upward.
        assert_abs_diff_eq!(spline.normal(1.5).unwrap(), Vec3::Y, epsilon = 1e-6);
    }

    #[test]
    fn normal_removes_component_along_handle() {
        let spline = Spline::from_parts(
            vec![Vec3::ZERO, Vec3::new(5.0, 0.0, 0.0)],
            vec![Vec3::X, Vec3::X],
            vec![Vec3::new(1.0, 1.0, 0.0), Vec3::new(1.0, 1.0, 0.0)],
        )
        .unwrap();
        assert_abs_diff_eq!(spline.normal(0.0).unwrap(), Vec3::Y, epsilon = 1e-6);
    }

    #[test]
    fn normal_blends_between_endpoints() {
        let spline = Spline::from_parts(
            vec![Vec3::ZERO, Vec3::new(5.0, 0.0, 0.0)],
            vec![Vec3::X, Vec3::X],
            vec![Vec3::Y, Vec3::Z],
        )
        .unwrap();

        let half = (Vec3::Y + Vec3::Z).normalize();
        assert_abs_diff_eq!(spline.normal(0.5).unwrap(), half, epsilon = 1e-6);
        assert_abs_diff_eq!(
            spline.normal(0.25).unwrap(),
            (Vec3::Y * 0.75 + Vec3::Z * 0.25).normalize(),
            epsilon = 1e-6
        );

        // Closing segment runs from the second normal back to the first.
        assert_abs_diff_eq!(
            spline.normal(1.25).unwrap(),
            (Vec3::Z * 0.75 + Vec3::Y * 0.25).normalize(),
            epsilon = 1e-6
        );
        assert_abs_diff_eq!(spline.normal(1.0).unwrap(), Vec3::Z, epsilon = 1e-6);
    }

    #[test]
    fn gradient_follows_straight_segment() {
        let spline = Spline::from_parts(
            vec![Vec3::ZERO, Vec3::new(6.0, 0.0, 0.0)],
            vec![Vec3::new(2.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 0.0)],
            vec![Vec3::Y, Vec3::Y],
        )
        .unwrap();
        let g = spline.gradient(0.5).unwrap();
        assert!(g.x > 0.0);
        assert_abs_diff_eq!(g.normalize(), Vec3::X, epsilon = 1e-6);
    }

    #[test]
    fn from_parts_rejects_mismatched_sequences() {
        let result = Spline::from_parts(vec![Vec3::ZERO], vec![], vec![Vec3::Y]);
        assert!(matches!(result, Err(BanklineError::InvalidParameter(_))));
    }
}
