//! Catmull-Rom path sampling for the domino chain.

use glam::Vec3;

/// Uniform Catmull-Rom spline through a list of control points, with
/// clamped end tangents.
pub struct CatmullRom {
    points: Vec<Vec3>,
}

impl CatmullRom {
    /// Needs at least two control points.
    #[must_use]
    pub fn new(points: Vec<Vec3>) -> Option<Self> {
        if points.len() < 2 {
            return None;
        }
        Some(Self { points })
    }

    /// Evaluate at `t` in [0, 1] across the whole path.
    #[must_use]
    pub fn point_at(&self, t: f32) -> Vec3 {
        let segments = self.points.len() - 1;
        let scaled = t.clamp(0.0, 1.0) * segments as f32;
        let segment = (scaled as usize).min(segments - 1);
        let local = scaled - segment as f32;

        let p1 = self.points[segment];
        let p2 = self.points[segment + 1];
        let p0 = if segment == 0 {
            p1
        } else {
            self.points[segment - 1]
        };
        let p3 = if segment + 2 < self.points.len() {
            self.points[segment + 2]
        } else {
            p2
        };

        catmull_rom(p0, p1, p2, p3, local)
    }

    /// Walk the curve in small parameter increments and emit a point every
    /// `spacing` of accumulated arc length, each paired with the local
    /// forward direction. This is how dominoes get laid out facing along
    /// the path.
    #[must_use]
    pub fn sample_spaced(&self, spacing: f32, step: f32) -> Vec<(Vec3, Vec3)> {
        let mut samples = Vec::new();
        let mut travelled = 0.0;
        let mut t = 0.0;
        while t < 1.0 {
            let here = self.point_at(t);
            let next = self.point_at((t + step).min(1.0));
            travelled += here.distance(next);
            if travelled > spacing {
                let dir = (next - here).normalize_or_zero();
                samples.push((here, dir));
                travelled = 0.0;
            }
            t += step;
        }
        samples
    }
}

fn catmull_rom(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f32) -> Vec3 {
    let t2 = t * t;
    let t3 = t2 * t;
    ((p1 * 2.0)
        + (p2 - p0) * t
        + (p0 * 2.0 - p1 * 5.0 + p2 * 4.0 - p3) * t2
        + (p1 * 3.0 - p0 - p2 * 3.0 + p3) * t3)
        * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_interpolated() {
        let curve = CatmullRom::new(vec![
            Vec3::ZERO,
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 1.0),
        ])
        .unwrap();
        assert!(curve.point_at(0.0).distance(Vec3::ZERO) < 1e-5);
        assert!(curve.point_at(1.0).distance(Vec3::new(2.0, 0.0, 1.0)) < 1e-5);
    }

    #[test]
    fn spacing_is_roughly_uniform() {
        let curve = CatmullRom::new(vec![
            Vec3::new(-5.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 3.0),
            Vec3::new(5.0, 0.0, 0.0),
        ])
        .unwrap();
        let samples = curve.sample_spaced(0.5, 0.001);
        assert!(samples.len() > 10);
        for pair in samples.windows(2) {
            let gap = pair[0].0.distance(pair[1].0);
            assert!(gap > 0.3 && gap < 0.8, "gap={gap}");
        }
    }

    #[test]
    fn single_point_is_rejected() {
        assert!(CatmullRom::new(vec![Vec3::ZERO]).is_none());
    }
}
