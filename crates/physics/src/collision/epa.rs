//! EPA penetration depth from a GJK enclosing simplex.
//!
//! Expands the Minkowski-space tetrahedron toward the contact surface until
//! the closest face stops moving, yielding the minimum translation normal
//! and penetration depth.

use super::gjk::SupportMap;
use glam::Vec3;

const MAX_ITERATIONS: u32 = 48;
const TOLERANCE: f32 = 1e-4;

/// Penetration result in world space: unit `normal` points from shape A into
/// shape B, `depth` is the overlap along it.
pub(crate) struct Penetration {
    pub normal: Vec3,
    pub depth: f32,
}

struct Face {
    indices: [usize; 3],
    normal: Vec3,
    distance: f32,
}

fn make_face(vertices: &[Vec3], indices: [usize; 3]) -> Option<Face> {
    let [i0, i1, i2] = indices;
    let a = vertices[i0];
    let b = vertices[i1];
    let c = vertices[i2];
    let mut normal = (b - a).cross(c - a);
    if normal.length_squared() < 1e-12 {
        return None;
    }
    normal = normal.normalize();
    let mut distance = normal.dot(a);
    // Keep normals pointing away from the origin.
    if distance < 0.0 {
        return Some(Face {
            indices: [i0, i2, i1],
            normal: -normal,
            distance: -distance,
        });
    }
    Some(Face {
        indices,
        normal,
        distance,
    })
}

/// Expand the polytope until the closest boundary face is found.
pub(crate) fn penetration(
    a: &SupportMap,
    b: &SupportMap,
    simplex: [Vec3; 4],
) -> Option<Penetration> {
    let mut vertices: Vec<Vec3> = simplex.to_vec();
    let mut faces: Vec<Face> = Vec::new();
    for idx in [[0, 1, 2], [0, 1, 3], [0, 2, 3], [1, 2, 3]] {
        faces.push(make_face(&vertices, idx)?);
    }

    for _ in 0..MAX_ITERATIONS {
        let (closest_dist, closest_normal) = {
            let mut best = 0;
            for (i, f) in faces.iter().enumerate() {
                if f.distance < faces[best].distance {
                    best = i;
                }
            }
            (faces[best].distance, faces[best].normal)
        };

        let support = a.support(closest_normal) - b.support(-closest_normal);
        let growth = support.dot(closest_normal) - closest_dist;
        if growth < TOLERANCE {
            return Some(Penetration {
                normal: closest_normal,
                depth: support.dot(closest_normal).max(closest_dist),
            });
        }

        // Remove every face visible from the new support point and rebuild
        // the hole from its horizon edges.
        let new_index = vertices.len();
        vertices.push(support);

        let mut horizon: Vec<(usize, usize)> = Vec::new();
        let mut kept: Vec<Face> = Vec::new();
        for face in faces.drain(..) {
            let visible = face.normal.dot(support - vertices[face.indices[0]]) > 0.0;
            if visible {
                for edge in [
                    (face.indices[0], face.indices[1]),
                    (face.indices[1], face.indices[2]),
                    (face.indices[2], face.indices[0]),
                ] {
                    // An edge shared by two removed faces cancels out.
                    if let Some(pos) = horizon
                        .iter()
                        .position(|&(s, e)| (s, e) == (edge.1, edge.0) || (s, e) == edge)
                    {
                        horizon.remove(pos);
                    } else {
                        horizon.push(edge);
                    }
                }
            } else {
                kept.push(face);
            }
        }
        if horizon.is_empty() {
            // Numerical stall: nothing was visible despite growth.
            return Some(Penetration {
                normal: closest_normal,
                depth: closest_dist,
            });
        }
        faces = kept;
        for (start, end) in horizon {
            faces.push(make_face(&vertices, [start, end, new_index])?);
        }
    }

    // Iteration cap: report the best estimate so a deep contact still
    // resolves rather than tunnelling.
    faces
        .iter()
        .min_by(|x, y| x.distance.total_cmp(&y.distance))
        .map(|f| Penetration {
            normal: f.normal,
            depth: f.distance,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::gjk::{intersect, SupportMap};
    use crate::shape::{Shape, COLLISION_MARGIN};
    use crate::transform::Transform;

    fn penetrate(sa: &Shape, ta: &Transform, sb: &Shape, tb: &Transform) -> Option<Penetration> {
        let a = SupportMap {
            shape: sa,
            transform: ta,
        };
        let b = SupportMap {
            shape: sb,
            transform: tb,
        };
        let simplex = intersect(&a, &b)?;
        penetration(&a, &b, simplex)
    }

    #[test]
    fn axis_aligned_overlap_depth() {
        let shape = Shape::cuboid(Vec3::splat(0.5));
        let ta = Transform::IDENTITY;
        let tb = Transform::from_position(Vec3::new(0.8, 0.0, 0.0));
        let pen = penetrate(&shape, &ta, &shape, &tb).expect("overlap");
        // Overlap is 0.2 plus both margins.
        let expected = 0.2 + 2.0 * COLLISION_MARGIN;
        assert!((pen.depth - expected).abs() < 0.02, "depth={}", pen.depth);
        assert!(pen.normal.x > 0.99, "normal={:?}", pen.normal);
    }

    #[test]
    fn stacked_overlap_points_up() {
        let shape = Shape::cuboid(Vec3::splat(0.5));
        let ta = Transform::IDENTITY;
        let tb = Transform::from_position(Vec3::new(0.0, 0.95, 0.0));
        let pen = penetrate(&shape, &ta, &shape, &tb).expect("overlap");
        assert!(pen.normal.y > 0.99, "normal={:?}", pen.normal);
        assert!(pen.depth > 0.04 && pen.depth < 0.1, "depth={}", pen.depth);
    }
}
