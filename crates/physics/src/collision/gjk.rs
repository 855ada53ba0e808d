//! GJK intersection test over support mappings.
//!
//! Works on the Minkowski difference of two convex shapes; every shape
//! exposes a support point so boxes, spheres and mesh-derived hulls all flow
//! through the same routine. On intersection the final simplex is a
//! tetrahedron enclosing the origin, which seeds the EPA penetration solve.

use crate::shape::Shape;
use crate::transform::Transform;
use glam::Vec3;

const MAX_ITERATIONS: u32 = 32;

/// World-space support evaluator for one shape at one pose.
#[derive(Copy, Clone)]
pub(crate) struct SupportMap<'a> {
    pub shape: &'a Shape,
    pub transform: &'a Transform,
}

impl SupportMap<'_> {
    pub(crate) fn support(&self, world_dir: Vec3) -> Vec3 {
        let local_dir = self.transform.inverse_transform_vector(world_dir);
        self.transform
            .transform_point(self.shape.support_local(local_dir))
    }
}

fn minkowski_support(a: &SupportMap, b: &SupportMap, dir: Vec3) -> Vec3 {
    a.support(dir) - b.support(-dir)
}

/// Test two convex shapes for overlap.
///
/// Returns the enclosing tetrahedron (in Minkowski space) when they
/// intersect, `None` when a separating direction is found.
pub(crate) fn intersect(a: &SupportMap, b: &SupportMap) -> Option<[Vec3; 4]> {
    let initial = b.transform.position - a.transform.position;
    let mut dir = if initial.length_squared() > 1e-10 {
        initial
    } else {
        Vec3::X
    };

    let mut simplex: Vec<Vec3> = Vec::with_capacity(4);
    simplex.push(minkowski_support(a, b, dir));
    dir = -simplex[0];

    for _ in 0..MAX_ITERATIONS {
        if dir.length_squared() < 1e-12 {
            // Origin sits on the current simplex feature; count it as a
            // touching contact and let EPA sort out the direction.
            return complete_tetrahedron(a, b, simplex);
        }
        let point = minkowski_support(a, b, dir);
        if point.dot(dir) < 0.0 {
            return None;
        }
        simplex.push(point);
        if next_simplex(&mut simplex, &mut dir) {
            return complete_tetrahedron(a, b, simplex);
        }
    }
    None
}

/// Pad a degenerate simplex up to four affinely independent points so EPA
/// always starts from a tetrahedron.
fn complete_tetrahedron(a: &SupportMap, b: &SupportMap, mut simplex: Vec<Vec3>) -> Option<[Vec3; 4]> {
    let probes = [
        Vec3::X,
        Vec3::NEG_X,
        Vec3::Y,
        Vec3::NEG_Y,
        Vec3::Z,
        Vec3::NEG_Z,
    ];
    let mut probe_iter = probes.iter();
    while simplex.len() < 4 {
        let dir = probe_iter.next()?;
        let candidate = minkowski_support(a, b, *dir);
        if simplex
            .iter()
            .all(|p| (*p - candidate).length_squared() > 1e-10)
        {
            simplex.push(candidate);
        }
    }
    // Reject a flat tetrahedron; EPA cannot expand it.
    let [p0, p1, p2, p3] = [simplex[0], simplex[1], simplex[2], simplex[3]];
    let volume = (p1 - p0).cross(p2 - p0).dot(p3 - p0);
    if volume.abs() < 1e-12 {
        return None;
    }
    Some([p0, p1, p2, p3])
}

/// Evolve the simplex toward the origin. Returns true once a tetrahedron
/// encloses it. The most recently added point is always last.
fn next_simplex(simplex: &mut Vec<Vec3>, dir: &mut Vec3) -> bool {
    match simplex.len() {
        2 => line_case(simplex, dir),
        3 => triangle_case(simplex, dir),
        4 => tetrahedron_case(simplex, dir),
        _ => unreachable!("simplex size is bounded by 4"),
    }
}

fn line_case(simplex: &mut Vec<Vec3>, dir: &mut Vec3) -> bool {
    let a = simplex[1];
    let b = simplex[0];
    let ab = b - a;
    let ao = -a;
    if ab.dot(ao) > 0.0 {
        *dir = ab.cross(ao).cross(ab);
    } else {
        simplex.remove(0);
        *dir = ao;
    }
    false
}

fn triangle_case(simplex: &mut Vec<Vec3>, dir: &mut Vec3) -> bool {
    let a = simplex[2];
    let b = simplex[1];
    let c = simplex[0];
    let ab = b - a;
    let ac = c - a;
    let ao = -a;
    let abc = ab.cross(ac);

    if abc.cross(ac).dot(ao) > 0.0 {
        if ac.dot(ao) > 0.0 {
            // Keep edge AC.
            *simplex = vec![c, a];
            *dir = ac.cross(ao).cross(ac);
        } else {
            *simplex = vec![b, a];
            return line_case(simplex, dir);
        }
    } else if ab.cross(abc).dot(ao) > 0.0 {
        *simplex = vec![b, a];
        return line_case(simplex, dir);
    } else if abc.dot(ao) > 0.0 {
        *dir = abc;
    } else {
        // Below the triangle: flip winding so the new direction faces the
        // origin side.
        *simplex = vec![b, c, a];
        *dir = -abc;
    }
    false
}

fn tetrahedron_case(simplex: &mut Vec<Vec3>, dir: &mut Vec3) -> bool {
    let a = simplex[3];
    let b = simplex[2];
    let c = simplex[1];
    let d = simplex[0];
    let ab = b - a;
    let ac = c - a;
    let ad = d - a;
    let ao = -a;

    let abc = ab.cross(ac);
    let acd = ac.cross(ad);
    let adb = ad.cross(ab);

    if abc.dot(ao) > 0.0 {
        *simplex = vec![c, b, a];
        return triangle_case(simplex, dir);
    }
    if acd.dot(ao) > 0.0 {
        *simplex = vec![d, c, a];
        return triangle_case(simplex, dir);
    }
    if adb.dot(ao) > 0.0 {
        *simplex = vec![b, d, a];
        return triangle_case(simplex, dir);
    }
    true
}
