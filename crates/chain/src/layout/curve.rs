//! Closed centripetal Catmull-Rom curve through the control points.

use glam::Vec3;

use crate::types::ControlPoints;

/// Knot spacing exponent; 0.5 of the chord length squared gives centripetal
const CENTRIPETAL_EXPONENT: f32 = 0.25;

/// Segments shorter than this are treated as unit length
const MIN_KNOT_SPACING: f32 = 1e-4;

/// Chords summed for the arc-length table
const ARC_LENGTH_DIVISIONS: usize = 200;

/// Cubic in one curve segment: `c0 + c1*t + c2*t^2 + c3*t^3`
#[derive(Debug, Clone, Copy)]
struct CubicSegment {
    c0: Vec3,
    c1: Vec3,
    c2: Vec3,
    c3: Vec3,
}

impl CubicSegment {
    /// Hermite form from endpoints and tangents
    fn hermite(x0: Vec3, x1: Vec3, t0: Vec3, t1: Vec3) -> Self {
        Self {
            c0: x0,
            c1: t0,
            c2: -3.0 * x0 + 3.0 * x1 - 2.0 * t0 - t1,
            c3: 2.0 * x0 - 2.0 * x1 + t0 + t1,
        }
    }

    /// Nonuniform Catmull-Rom between `p1` and `p2` with knot spacings `dt0..dt2`
    fn nonuniform(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, dt0: f32, dt1: f32, dt2: f32) -> Self {
        let t1 = (p1 - p0) / dt0 - (p2 - p0) / (dt0 + dt1) + (p2 - p1) / dt1;
        let t2 = (p2 - p1) / dt1 - (p3 - p1) / (dt1 + dt2) + (p3 - p2) / dt2;
        Self::hermite(p1, p2, t1 * dt1, t2 * dt1)
    }

    fn point(&self, t: f32) -> Vec3 {
        ((self.c3 * t + self.c2) * t + self.c1) * t + self.c0
    }

    fn derivative(&self, t: f32) -> Vec3 {
        (3.0 * self.c3 * t + 2.0 * self.c2) * t + self.c1
    }
}

/// A smooth closed curve interpolating every control point.
///
/// Two parameterizations are exposed. Spline parameter `t` gives each control
/// point span an equal share of `[0, 1]`, so `t = i / n` lands exactly on
/// control point `i`. Arc-length parameter `u` is the fraction of the total
/// length walked from the start, so evenly spaced `u` values are evenly
/// spaced along the curve.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainCurve {
    points: Vec<Vec3>,
    /// Cumulative chord length at `t = i / ARC_LENGTH_DIVISIONS`
    arc_lengths: Vec<f32>,
}

impl ChainCurve {
    pub fn new(control_points: &ControlPoints) -> Self {
        Self::from_points(control_points.as_slice().to_vec())
    }

    /// Curve through an arbitrary closed point loop. Needs at least 3 points
    /// to be smooth; fewer degrade to the points themselves.
    pub fn from_points(points: Vec<Vec3>) -> Self {
        let mut curve = Self {
            points,
            arc_lengths: Vec::new(),
        };
        curve.arc_lengths = curve.measure_arc_lengths();
        curve
    }

    fn measure_arc_lengths(&self) -> Vec<f32> {
        let mut lengths = Vec::with_capacity(ARC_LENGTH_DIVISIONS + 1);
        let mut total = 0.0;
        let mut previous = self.point_at(0.0);
        lengths.push(0.0);
        for i in 1..=ARC_LENGTH_DIVISIONS {
            let current = self.point_at(i as f32 / ARC_LENGTH_DIVISIONS as f32);
            total += previous.distance(current);
            lengths.push(total);
            previous = current;
        }
        lengths
    }

    /// Approximate length of the closed loop
    pub fn length(&self) -> f32 {
        self.arc_lengths.last().copied().unwrap_or(0.0)
    }

    /// Spline parameter at arc-length fraction `u`; `u` wraps around the loop.
    pub fn u_to_t(&self, u: f32) -> f32 {
        let total = self.length();
        if total <= f32::EPSILON || !u.is_finite() {
            return u;
        }

        let target = u.rem_euclid(1.0) * total;
        // First table entry at or past the target distance
        let upper = self
            .arc_lengths
            .partition_point(|&length| length < target)
            .clamp(1, ARC_LENGTH_DIVISIONS);
        let lower = upper - 1;

        let before = self.arc_lengths[lower];
        let span = self.arc_lengths[upper] - before;
        let fraction = if span > f32::EPSILON {
            (target - before) / span
        } else {
            0.0
        };
        (lower as f32 + fraction) / ARC_LENGTH_DIVISIONS as f32
    }

    /// Point at arc-length fraction `u`
    pub fn point_at_u(&self, u: f32) -> Vec3 {
        self.point_at(self.u_to_t(u))
    }

    /// Unit tangent at arc-length fraction `u`
    pub fn tangent_at_u(&self, u: f32) -> Vec3 {
        self.tangent_at(self.u_to_t(u))
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    fn segment(&self, t: f32) -> Option<(CubicSegment, f32)> {
        let n = self.points.len();
        if n == 0 {
            return None;
        }

        let p = n as f32 * t;
        let base = p.floor();
        let weight = p - base;
        let i = base as i64;
        let at = |offset: i64| self.points[(i + offset).rem_euclid(n as i64) as usize];

        let (p0, p1, p2, p3) = (at(-1), at(0), at(1), at(2));

        let mut dt0 = p0.distance_squared(p1).powf(CENTRIPETAL_EXPONENT);
        let mut dt1 = p1.distance_squared(p2).powf(CENTRIPETAL_EXPONENT);
        let mut dt2 = p2.distance_squared(p3).powf(CENTRIPETAL_EXPONENT);
        if dt1 < MIN_KNOT_SPACING {
            dt1 = 1.0;
        }
        if dt0 < MIN_KNOT_SPACING {
            dt0 = dt1;
        }
        if dt2 < MIN_KNOT_SPACING {
            dt2 = dt1;
        }

        Some((CubicSegment::nonuniform(p0, p1, p2, p3, dt0, dt1, dt2), weight))
    }

    /// Point at parameter `t`; values outside `[0, 1]` wrap around the loop.
    pub fn point_at(&self, t: f32) -> Vec3 {
        match self.segment(t) {
            Some((segment, weight)) => segment.point(weight),
            None => Vec3::ZERO,
        }
    }

    /// Unit tangent at parameter `t`
    pub fn tangent_at(&self, t: f32) -> Vec3 {
        let Some((segment, weight)) = self.segment(t) else {
            return Vec3::X;
        };
        let derivative = segment.derivative(weight);
        if derivative.length_squared() > f32::EPSILON {
            return derivative.normalize();
        }

        // Coincident points; fall back to a central difference
        let delta = 1e-4;
        (self.point_at(t + delta) - self.point_at(t - delta)).normalize_or(Vec3::X)
    }
}
