//! Contact-patch construction.
//!
//! EPA yields one normal and depth; resting stacks and standing pins need a
//! patch of contact points to avoid rocking on a single point. The patch is
//! built by collecting each shape's extreme face along the contact normal and
//! clipping one against the other in the contact plane.

use crate::body::RigidBody;
use crate::shape::COLLISION_MARGIN;
use glam::{Vec2, Vec3};

use super::ContactPoint;

/// Vertices within this band of the extreme are considered part of the
/// contact face.
const FACE_TOLERANCE: f32 = 0.02;
/// Points separated by more than this along the normal are discarded.
const DEPTH_CULL: f32 = 0.005;
const MAX_POINTS: usize = 4;

/// Clip the two contact faces into up to four contact points.
///
/// Returns `None` when either shape has no usable face along the normal
/// (spheres, edge-on configurations); the caller falls back to the single
/// EPA point.
pub(super) fn build_patch(a: &RigidBody, b: &RigidBody, normal: Vec3) -> Option<Vec<ContactPoint>> {
    let verts_a: Vec<Vec3> = a
        .shape
        .patch_vertices()
        .into_iter()
        .map(|v| a.transform.transform_point(v))
        .collect();
    let verts_b: Vec<Vec3> = b
        .shape
        .patch_vertices()
        .into_iter()
        .map(|v| b.transform.transform_point(v))
        .collect();
    if verts_a.is_empty() || verts_b.is_empty() {
        return None;
    }

    // A's face is its extreme along +normal, B's along -normal.
    let max_a = verts_a
        .iter()
        .map(|v| v.dot(normal))
        .fold(f32::NEG_INFINITY, f32::max);
    let min_b = verts_b
        .iter()
        .map(|v| v.dot(normal))
        .fold(f32::INFINITY, f32::min);

    let face_a: Vec<Vec3> = verts_a
        .into_iter()
        .filter(|v| v.dot(normal) > max_a - FACE_TOLERANCE)
        .collect();
    let face_b: Vec<Vec3> = verts_b
        .into_iter()
        .filter(|v| v.dot(normal) < min_b + FACE_TOLERANCE)
        .collect();

    let u = normal.any_orthonormal_vector();
    let v = normal.cross(u);
    let project = |p: Vec3| PlanePoint {
        uv: Vec2::new(p.dot(u), p.dot(v)),
        height: p.dot(normal),
    };

    let candidates: Vec<PlanePoint> = if face_a.len() >= 3 && face_b.len() >= 3 {
        let reference = order_convex(face_a.iter().map(|&p| project(p)).collect());
        let incident = order_convex(face_b.iter().map(|&p| project(p)).collect());
        clip_polygon(incident, &reference)
    } else if face_a.len() >= 3 {
        // B touches with an edge or vertex: its points are the candidates,
        // kept only where they lie over A's face.
        let reference = order_convex(face_a.iter().map(|&p| project(p)).collect());
        face_b
            .iter()
            .map(|&p| project(p))
            .filter(|p| inside_polygon(p.uv, &reference))
            .collect()
    } else {
        return None;
    };

    let mut points: Vec<ContactPoint> = candidates
        .into_iter()
        .filter_map(|p| {
            // Patch vertices carry no margin, the narrow phase does; keep
            // the depths in the same margin-inflated metric so resting
            // bodies (which float about one margin apart) keep their patch.
            let depth = max_a - p.height + 2.0 * COLLISION_MARGIN;
            if depth < -DEPTH_CULL {
                return None;
            }
            let depth = depth.max(0.0);
            // Reconstruct in world space, shifted to mid-overlap.
            let world = u * p.uv.x + v * p.uv.y + normal * (p.height + depth * 0.5);
            Some(ContactPoint {
                point: world,
                depth,
            })
        })
        .collect();

    if points.is_empty() {
        return None;
    }
    if points.len() > MAX_POINTS {
        points = reduce_points(points);
    }
    Some(points)
}

#[derive(Copy, Clone)]
struct PlanePoint {
    uv: Vec2,
    height: f32,
}

/// Order a point cloud counter-clockwise around its centroid.
fn order_convex(mut points: Vec<PlanePoint>) -> Vec<PlanePoint> {
    let n = points.len() as f32;
    let centroid = points.iter().fold(Vec2::ZERO, |acc, p| acc + p.uv) / n;
    points.sort_by(|p, q| {
        let pd = p.uv - centroid;
        let qd = q.uv - centroid;
        pd.y.atan2(pd.x).total_cmp(&qd.y.atan2(qd.x))
    });
    points
}

fn inside_polygon(point: Vec2, polygon: &[PlanePoint]) -> bool {
    if polygon.len() < 3 {
        return false;
    }
    for i in 0..polygon.len() {
        let p0 = polygon[i].uv;
        let p1 = polygon[(i + 1) % polygon.len()].uv;
        let edge = p1 - p0;
        if edge.perp_dot(point - p0) < -FACE_TOLERANCE {
            return false;
        }
    }
    true
}

/// Sutherland-Hodgman clip of `subject` against the convex `clip` polygon,
/// interpolating heights at edge crossings.
fn clip_polygon(subject: Vec<PlanePoint>, clip: &[PlanePoint]) -> Vec<PlanePoint> {
    let mut output = subject;
    for i in 0..clip.len() {
        let e0 = clip[i].uv;
        let e1 = clip[(i + 1) % clip.len()].uv;
        let edge = e1 - e0;
        let input = std::mem::take(&mut output);
        if input.is_empty() {
            break;
        }
        for j in 0..input.len() {
            let current = input[j];
            let previous = input[(j + input.len() - 1) % input.len()];
            let side_cur = edge.perp_dot(current.uv - e0);
            let side_prev = edge.perp_dot(previous.uv - e0);
            if side_cur >= 0.0 {
                if side_prev < 0.0 {
                    output.push(intersect_edge(previous, current, side_prev, side_cur));
                }
                output.push(current);
            } else if side_prev >= 0.0 {
                output.push(intersect_edge(previous, current, side_prev, side_cur));
            }
        }
    }
    output
}

fn intersect_edge(from: PlanePoint, to: PlanePoint, side_from: f32, side_to: f32) -> PlanePoint {
    let t = side_from / (side_from - side_to);
    PlanePoint {
        uv: from.uv + (to.uv - from.uv) * t,
        height: from.height + (to.height - from.height) * t,
    }
}

/// Keep the four points that best span the patch: the deepest, the farthest
/// from it, then the two maximizing triangle area on either side.
fn reduce_points(points: Vec<ContactPoint>) -> Vec<ContactPoint> {
    let deepest = points
        .iter()
        .enumerate()
        .max_by(|(_, p), (_, q)| p.depth.total_cmp(&q.depth))
        .map(|(i, _)| i)
        .unwrap_or(0);
    let p0 = points[deepest].point;

    let farthest = points
        .iter()
        .enumerate()
        .max_by(|(_, p), (_, q)| {
            (p.point - p0)
                .length_squared()
                .total_cmp(&(q.point - p0).length_squared())
        })
        .map(|(i, _)| i)
        .unwrap_or(0);
    let p1 = points[farthest].point;
    let axis = p1 - p0;

    let mut best_pos = (deepest, 0.0_f32);
    let mut best_neg = (farthest, 0.0_f32);
    for (i, p) in points.iter().enumerate() {
        let area = axis.cross(p.point - p0).length_squared();
        let side = axis.cross(p.point - p0);
        // Split by an arbitrary but consistent hemisphere.
        if side.dot(Vec3::ONE) >= 0.0 {
            if area > best_pos.1 {
                best_pos = (i, area);
            }
        } else if area > best_neg.1 {
            best_neg = (i, area);
        }
    }

    let mut picked = vec![deepest, farthest, best_pos.0, best_neg.0];
    picked.sort_unstable();
    picked.dedup();
    picked.into_iter().map(|i| points[i]).collect()
}
