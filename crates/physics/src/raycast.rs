//! Ray queries against shapes and the world.
//!
//! Used by the wheel suspension casts and by input-to-world projection when
//! a pointer ray needs a spawn origin.

use crate::shape::Shape;
use crate::transform::Transform;
use crate::world::BodyId;
use glam::Vec3;

/// A world-space ray; `dir` is expected to be normalized.
#[derive(Copy, Clone, Debug)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    #[must_use]
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self {
            origin,
            dir: dir.normalize_or_zero(),
        }
    }

    #[must_use]
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.dir * t
    }
}

/// Result of a world raycast.
#[derive(Copy, Clone, Debug)]
pub struct RayHit {
    pub body: BodyId,
    pub distance: f32,
    pub point: Vec3,
    pub normal: Vec3,
}

/// Intersect a ray with a shape in the shape's local frame.
///
/// Returns distance along the ray and the local surface normal. Convex hulls
/// are tested against their local bounding box, which is exact for the flat
/// floors wheels actually drive on.
#[must_use]
pub fn raycast_shape_local(
    shape: &Shape,
    origin: Vec3,
    dir: Vec3,
    max_distance: f32,
) -> Option<(f32, Vec3)> {
    match shape {
        Shape::Ball { radius } => ray_sphere(origin, dir, *radius, max_distance),
        Shape::Cuboid { half_extents } => {
            ray_aabb(origin, dir, -*half_extents, *half_extents, max_distance)
        }
        Shape::ConvexHull {
            local_min,
            local_max,
            ..
        } => ray_aabb(origin, dir, *local_min, *local_max, max_distance),
    }
}

/// Intersect a world ray with a posed shape.
#[must_use]
pub fn raycast_shape(
    shape: &Shape,
    transform: &Transform,
    ray: &Ray,
    max_distance: f32,
) -> Option<(f32, Vec3)> {
    let local_origin = transform.inverse_transform_point(ray.origin);
    let local_dir = transform.inverse_transform_vector(ray.dir);
    let (t, local_normal) = raycast_shape_local(shape, local_origin, local_dir, max_distance)?;
    Some((t, transform.transform_vector(local_normal)))
}

fn ray_sphere(origin: Vec3, dir: Vec3, radius: f32, max_distance: f32) -> Option<(f32, Vec3)> {
    let b = origin.dot(dir);
    let c = origin.length_squared() - radius * radius;
    if c > 0.0 && b > 0.0 {
        return None;
    }
    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }
    let t = (-b - discriminant.sqrt()).max(0.0);
    if t > max_distance {
        return None;
    }
    let normal = (origin + dir * t).normalize_or_zero();
    Some((t, normal))
}

fn ray_aabb(
    origin: Vec3,
    dir: Vec3,
    min: Vec3,
    max: Vec3,
    max_distance: f32,
) -> Option<(f32, Vec3)> {
    let mut t_enter = 0.0_f32;
    let mut t_exit = max_distance;
    let mut enter_axis = 0;
    let mut enter_sign = 0.0_f32;

    for axis in 0..3 {
        let o = origin[axis];
        let d = dir[axis];
        if d.abs() < 1e-9 {
            if o < min[axis] || o > max[axis] {
                return None;
            }
            continue;
        }
        let inv = 1.0 / d;
        let mut t0 = (min[axis] - o) * inv;
        let mut t1 = (max[axis] - o) * inv;
        let mut sign = -1.0;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
            sign = 1.0;
        }
        if t0 > t_enter {
            t_enter = t0;
            enter_axis = axis;
            enter_sign = sign;
        }
        t_exit = t_exit.min(t1);
        if t_enter > t_exit {
            return None;
        }
    }

    let mut normal = Vec3::ZERO;
    if enter_sign == 0.0 {
        // Ray started inside: report the direction it came from.
        normal = -dir;
    } else {
        normal[enter_axis] = enter_sign;
    }
    Some((t_enter, normal))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ray_hits_sphere_head_on() {
        let shape = Shape::ball(1.0);
        let (t, normal) = raycast_shape_local(
            &shape,
            Vec3::new(0.0, 5.0, 0.0),
            Vec3::new(0.0, -1.0, 0.0),
            10.0,
        )
        .expect("hit");
        assert!((t - 4.0).abs() < 1e-5);
        assert!(normal.y > 0.99);
    }

    #[test]
    fn ray_down_onto_box_top() {
        let shape = Shape::cuboid(Vec3::new(2.0, 0.5, 2.0));
        let (t, normal) = raycast_shape_local(
            &shape,
            Vec3::new(1.0, 3.0, 0.0),
            Vec3::new(0.0, -1.0, 0.0),
            10.0,
        )
        .expect("hit");
        assert!((t - 2.5).abs() < 1e-5);
        assert!(normal.y > 0.99);
    }

    #[test]
    fn ray_misses_to_the_side() {
        let shape = Shape::cuboid(Vec3::splat(0.5));
        assert!(raycast_shape_local(
            &shape,
            Vec3::new(2.0, 5.0, 0.0),
            Vec3::new(0.0, -1.0, 0.0),
            20.0,
        )
        .is_none());
    }

    #[test]
    fn range_limit_respected() {
        let shape = Shape::cuboid(Vec3::splat(0.5));
        assert!(raycast_shape_local(
            &shape,
            Vec3::new(0.0, 5.0, 0.0),
            Vec3::new(0.0, -1.0, 0.0),
            2.0,
        )
        .is_none());
    }
}
