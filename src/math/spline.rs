//! Piecewise-linear remap curves
//!
//! Terrain layers pass a normalized noise value through a control-point curve
//! to shape plateaus, cliffs and valleys. Curves are immutable once built.

use crate::core::{Error, Result};

/// Piecewise-linear curve over control points `(input, output)`
#[derive(Clone, Debug, PartialEq)]
pub struct Spline {
    points: Vec<(f32, f32)>,
}

impl Spline {
    /// Create a curve from control points sorted by input
    pub fn new(points: Vec<(f32, f32)>) -> Result<Self> {
        if points.len() < 2 {
            return Err(Error::config(format!(
                "spline needs at least 2 control points, got {}",
                points.len()
            )));
        }
        if points.iter().any(|(x, y)| !x.is_finite() || !y.is_finite()) {
            return Err(Error::config("spline control points must be finite"));
        }
        if points.windows(2).any(|w| w[1].0 < w[0].0) {
            return Err(Error::config("spline control point inputs must be non-decreasing"));
        }
        Ok(Self { points })
    }

    /// Continentalness curve: deep basins, a coastal shelf and inland plateaus
    pub fn continentalness() -> Self {
        Self {
            points: vec![
                (0.0, 1.0),
                (0.08, 0.55),
                (0.33, 0.21),
                (0.36, 0.24),
                (0.51, 0.45),
                (0.56, 0.65),
                (0.6, 0.8),
                (0.63, 0.91),
                (0.72, 1.0),
                (0.88, 0.58),
                (1.0, 0.26),
            ],
        }
    }

    /// Erosion curve: mostly flat with a sharp drop for heavily eroded land
    pub fn erosion() -> Self {
        Self {
            points: vec![
                (0.0, 0.567124),
                (0.1387, 0.56807),
                (0.3246, 0.45072),
                (0.6937, 0.48783),
                (0.72, 0.84),
                (0.84, 0.82),
                (0.86, 0.034),
                (0.9215, 0.033),
                (1.0, 0.019),
            ],
        }
    }

    /// Peaks and valleys curve
    pub fn peaks_valleys() -> Self {
        Self {
            points: vec![
                (0.0, 0.0),
                (0.16, 0.16),
                (0.37, 0.43),
                (0.47, 0.7),
                (0.56, 0.98),
                (0.73, 0.88),
                (0.85, 0.7),
                (0.95, 0.64),
                (1.0, 0.44),
            ],
        }
    }

    /// Control points of this curve
    pub fn points(&self) -> &[(f32, f32)] {
        &self.points
    }

    /// Evaluate the curve at `v`, clamped to [0, 1]
    ///
    /// The bracketing segment is the first one whose bounds contain `v`. When
    /// `v` lies past every point the last segment is used, so the scan never
    /// runs off the end of the list.
    pub fn sample(&self, v: f32) -> f32 {
        let last = self.points.len() - 2;
        let i = self.points[..=last]
            .iter()
            .zip(&self.points[1..])
            .position(|(a, b)| a.0 <= v && v <= b.0)
            .unwrap_or(if v < self.points[0].0 { 0 } else { last });

        let (x0, y0) = self.points[i];
        let (x1, y1) = self.points[i + 1];
        let span = x1 - x0;
        if span <= f32::EPSILON {
            return y0.clamp(0.0, 1.0);
        }
        let t = (v - x0) / span;
        (y0 + (y1 - y0) * t).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_short_curve() {
        assert!(Spline::new(vec![(0.0, 1.0)]).is_err());
        assert!(Spline::new(Vec::new()).is_err());
    }

    #[test]
    fn test_rejects_unsorted_inputs() {
        assert!(Spline::new(vec![(0.5, 0.0), (0.2, 1.0)]).is_err());
    }

    #[test]
    fn test_rejects_non_finite() {
        assert!(Spline::new(vec![(0.0, f32::NAN), (1.0, 1.0)]).is_err());
    }

    #[test]
    fn test_control_points_are_exact() {
        for spline in [Spline::continentalness(), Spline::erosion(), Spline::peaks_valleys()] {
            for &(x, y) in spline.points() {
                assert!(
                    (spline.sample(x) - y).abs() < 1e-6,
                    "sample({}) = {}, expected {}",
                    x,
                    spline.sample(x),
                    y
                );
            }
        }
    }

    #[test]
    fn test_linear_interpolation() {
        let spline = Spline::new(vec![(0.0, 0.0), (0.5, 1.0), (1.0, 0.0)]).unwrap();
        assert!((spline.sample(0.25) - 0.5).abs() < 1e-6);
        assert!((spline.sample(0.75) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_deterministic() {
        let a = Spline::erosion();
        let b = Spline::erosion();
        for i in 0..=100 {
            let v = i as f32 / 100.0;
            assert_eq!(a.sample(v), b.sample(v));
        }
    }

    #[test]
    fn test_past_last_point_clamps_to_last_segment() {
        // Curve does not reach 1.0; values past it extrapolate the last segment.
        let spline = Spline::new(vec![(0.0, 0.0), (0.4, 0.2), (0.8, 0.6)]).unwrap();
        let v = spline.sample(0.9);
        assert!((v - 0.7).abs() < 1e-6);

        // Far past the end, the output is clamped to the unit range.
        assert_eq!(spline.sample(5.0), 1.0);
    }

    #[test]
    fn test_before_first_point_uses_first_segment() {
        let spline = Spline::new(vec![(0.2, 0.5), (1.0, 0.9)]).unwrap();
        let v = spline.sample(0.0);
        assert!((v - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_zero_width_segment() {
        let spline = Spline::new(vec![(0.0, 0.0), (0.5, 0.3), (0.5, 0.9), (1.0, 1.0)]).unwrap();
        assert!((spline.sample(0.5) - 0.3).abs() < 1e-6);
        assert!((spline.sample(0.75) - 0.95).abs() < 1e-6);
    }

    #[test]
    fn test_output_in_unit_range() {
        for spline in [Spline::continentalness(), Spline::erosion(), Spline::peaks_valleys()] {
            for i in 0..=200 {
                let v = i as f32 / 200.0;
                let out = spline.sample(v);
                assert!((0.0..=1.0).contains(&out));
            }
        }
    }
}
