//! Collision shape construction.
//!
//! Shapes are immutable geometric descriptors shared read-only between bodies
//! (all ten bowling pins reference one hull instance through an `Arc`). Each
//! shape knows how to derive its local inertia for a given mass, its world
//! bounding box for the broad phase, and its support point for the
//! convex-convex narrow phase.

use crate::error::PhysicsError;
use crate::transform::Transform;
use glam::{Mat3, Vec3};

/// Padding applied around convex shapes at build time to keep exact-contact
/// configurations from jittering. Fixed, never mutated after construction.
pub const COLLISION_MARGIN: f32 = 0.01;

/// Axis-aligned bounding box.
#[derive(Copy, Clone, Debug)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    #[must_use]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }
}

/// Immutable collision geometry.
#[derive(Clone, Debug)]
pub enum Shape {
    /// Box described by its half extents.
    Cuboid { half_extents: Vec3 },
    /// Sphere described by its radius.
    Ball { radius: f32 },
    /// Convex hull over a vertex set; collision queries use the support
    /// mapping over the raw points, so no explicit hull faces are stored.
    ConvexHull {
        points: Vec<Vec3>,
        local_min: Vec3,
        local_max: Vec3,
    },
}

impl Shape {
    #[must_use]
    pub const fn cuboid(half_extents: Vec3) -> Self {
        Self::Cuboid { half_extents }
    }

    #[must_use]
    pub const fn ball(radius: f32) -> Self {
        Self::Ball { radius }
    }

    /// Derive a convex collision hull from a static mesh's vertex buffer.
    ///
    /// The points are kept as-is; interior vertices are harmless because only
    /// the support mapping is ever evaluated.
    ///
    /// # Errors
    ///
    /// Rejects vertex sets that cannot bound a volume: fewer than four
    /// points, non-finite coordinates, or a degenerate (flat) extent.
    pub fn convex_hull(points: &[Vec3]) -> Result<Self, PhysicsError> {
        if points.len() < 4 {
            return Err(PhysicsError::MalformedShape(format!(
                "convex hull needs at least 4 vertices, got {}",
                points.len()
            )));
        }
        if points.iter().any(|p| !p.is_finite()) {
            return Err(PhysicsError::MalformedShape(
                "convex hull vertex is not finite".into(),
            ));
        }
        let mut min = points[0];
        let mut max = points[0];
        for p in &points[1..] {
            min = min.min(*p);
            max = max.max(*p);
        }
        let extent = max - min;
        if extent.min_element() < 1e-5 {
            return Err(PhysicsError::MalformedShape(
                "convex hull is flat along at least one axis".into(),
            ));
        }
        Ok(Self::ConvexHull {
            points: points.to_vec(),
            local_min: min,
            local_max: max,
        })
    }

    /// Check the geometry a body registration is about to rely on.
    pub(crate) fn validate(&self) -> Result<(), PhysicsError> {
        match self {
            Self::Cuboid { half_extents } => {
                if !half_extents.is_finite() || half_extents.min_element() <= 0.0 {
                    return Err(PhysicsError::MalformedShape(format!(
                        "cuboid half extents must be positive, got {half_extents:?}"
                    )));
                }
            }
            Self::Ball { radius } => {
                if !radius.is_finite() || *radius <= 0.0 {
                    return Err(PhysicsError::MalformedShape(format!(
                        "ball radius must be positive, got {radius}"
                    )));
                }
            }
            // Hull invariants are enforced by the constructor.
            Self::ConvexHull { .. } => {}
        }
        Ok(())
    }

    /// Local inertia diagonal for the given mass.
    ///
    /// Analytic for boxes and spheres; a convex hull is approximated by its
    /// local bounding box. Static bodies (mass 0) report zero inertia.
    #[must_use]
    pub fn local_inertia(&self, mass: f32) -> Vec3 {
        if mass <= 0.0 {
            return Vec3::ZERO;
        }
        match self {
            Self::Cuboid { half_extents } => cuboid_inertia(*half_extents, mass),
            Self::Ball { radius } => {
                let i = 0.4 * mass * radius * radius;
                Vec3::splat(i)
            }
            Self::ConvexHull {
                local_min,
                local_max,
                ..
            } => cuboid_inertia((*local_max - *local_min) * 0.5, mass),
        }
    }

    /// Farthest local point in the given local direction, margin included.
    #[must_use]
    pub fn support_local(&self, dir: Vec3) -> Vec3 {
        let dir_n = dir.normalize_or_zero();
        match self {
            Self::Cuboid { half_extents } => {
                let padded = *half_extents + Vec3::splat(COLLISION_MARGIN);
                Vec3::new(
                    padded.x * dir.x.signum(),
                    padded.y * dir.y.signum(),
                    padded.z * dir.z.signum(),
                )
            }
            Self::Ball { radius } => dir_n * *radius,
            Self::ConvexHull { points, .. } => {
                let mut best = points[0];
                let mut best_dot = best.dot(dir);
                for p in &points[1..] {
                    let d = p.dot(dir);
                    if d > best_dot {
                        best_dot = d;
                        best = *p;
                    }
                }
                best + dir_n * COLLISION_MARGIN
            }
        }
    }

    /// World-space bounding box for a body at the given pose.
    #[must_use]
    pub fn aabb(&self, transform: &Transform) -> Aabb {
        let (local_center, half) = match self {
            Self::Cuboid { half_extents } => (Vec3::ZERO, *half_extents),
            Self::Ball { radius } => (Vec3::ZERO, Vec3::splat(*radius)),
            Self::ConvexHull {
                local_min,
                local_max,
                ..
            } => ((*local_min + *local_max) * 0.5, (*local_max - *local_min) * 0.5),
        };
        let center = transform.transform_point(local_center);
        let abs_rot = abs_mat3(Mat3::from_quat(transform.rotation));
        let world_half = abs_rot * (half + Vec3::splat(COLLISION_MARGIN));
        Aabb {
            min: center - world_half,
            max: center + world_half,
        }
    }

    /// Vertex set used when extending a single contact into a patch. Boxes
    /// expose their corners; spheres have none (they never need a patch).
    #[must_use]
    pub fn patch_vertices(&self) -> Vec<Vec3> {
        match self {
            Self::Cuboid { half_extents } => {
                let h = *half_extents;
                let mut corners = Vec::with_capacity(8);
                for sx in [-1.0, 1.0] {
                    for sy in [-1.0, 1.0] {
                        for sz in [-1.0, 1.0] {
                            corners.push(Vec3::new(h.x * sx, h.y * sy, h.z * sz));
                        }
                    }
                }
                corners
            }
            Self::Ball { .. } => Vec::new(),
            Self::ConvexHull { points, .. } => points.clone(),
        }
    }
}

fn cuboid_inertia(half_extents: Vec3, mass: f32) -> Vec3 {
    let h = half_extents;
    let third = mass / 3.0;
    Vec3::new(
        third * (h.y * h.y + h.z * h.z),
        third * (h.x * h.x + h.z * h.z),
        third * (h.x * h.x + h.y * h.y),
    )
}

fn abs_mat3(m: Mat3) -> Mat3 {
    Mat3::from_cols(m.x_axis.abs(), m.y_axis.abs(), m.z_axis.abs())
}
