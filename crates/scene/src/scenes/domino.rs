//! Domino chain scene.
//!
//! A static table, a spiral of dominoes laid along a Catmull-Rom path, and a
//! click-to-throw ball that knocks the chain over.

use crate::context::SimulationContext;
use crate::curve::CatmullRom;
use crate::error::SceneError;
use crate::registry::RenderHandle;
use crate::render::{RenderCollaborator, VisualKind};
use crate::spawner::ProjectileSpawner;
use glam::{Quat, Vec3};
use physics::{BodyId, RigidBody, Shape, Transform};
use std::sync::Arc;

const TABLE_HALF: Vec3 = Vec3::new(15.0, 0.25, 15.0);
const TABLE_POSITION: Vec3 = Vec3::new(0.0, -0.525, 0.0);
const DOMINO_HALF: Vec3 = Vec3::new(0.375, 0.5, 0.05);
const DOMINO_SPACING: f32 = 0.3;
const DOMINO_MASS: f32 = 1.0;
const BALL_RADIUS: f32 = 0.25;
const BALL_MASS: f32 = 1.0;

/// Spiral layout the chain follows, corners rounded by extra control points
/// at 30% and 70% of every leg.
const PATH_CORNERS: [[f32; 2]; 22] = [
    [-10.0, -10.0],
    [10.0, -10.0],
    [10.0, 10.0],
    [-10.0, 10.0],
    [-10.0, -8.0],
    [8.0, -8.0],
    [8.0, 8.0],
    [-8.0, 8.0],
    [-8.0, -6.0],
    [6.0, -6.0],
    [6.0, 6.0],
    [-6.0, 6.0],
    [-6.0, -4.0],
    [4.0, -4.0],
    [4.0, 4.0],
    [-4.0, 4.0],
    [-4.0, -2.0],
    [2.0, -2.0],
    [2.0, 2.0],
    [-2.0, 2.0],
    [-2.0, 0.0],
    [0.0, 0.0],
];

pub struct DominoScene {
    pub table: BodyId,
    pub dominoes: Vec<BodyId>,
    pub spawner: ProjectileSpawner,
    pub ball_prototype: RenderHandle,
}

impl DominoScene {
    /// Populate the context with the full chain.
    pub fn build(
        ctx: &mut SimulationContext,
        renderer: &mut impl RenderCollaborator,
    ) -> Result<Self, SceneError> {
        let table = spawn_table(ctx, renderer)?;

        let table_top = TABLE_POSITION.y + TABLE_HALF.y;
        let rest_y = table_top + DOMINO_HALF.y;

        let curve = CatmullRom::new(path_points(rest_y)).ok_or_else(|| {
            SceneError::InvalidConfig("domino path needs at least two control points".into())
        })?;
        let domino_shape = Arc::new(Shape::cuboid(DOMINO_HALF));

        let mut dominoes = Vec::new();
        for (position, forward) in curve.sample_spaced(DOMINO_SPACING, 0.0001) {
            // Face along the path, the way the original aimed each domino
            // at the next curve sample.
            let yaw = forward.x.atan2(forward.z);
            let pose = Transform::new(position, Quat::from_rotation_y(yaw));

            let body = RigidBody::new(Arc::clone(&domino_shape), DOMINO_MASS, pose);
            // A rejected body only loses itself; the rest of the chain
            // still goes up.
            let id = match ctx.world.add_body(body) {
                Ok(id) => id,
                Err(err) => {
                    tracing::warn!(%err, ?position, "domino rejected");
                    continue;
                }
            };
            let handle = renderer.create_visual(VisualKind::Cuboid {
                half_extents: DOMINO_HALF,
            });
            ctx.registry.bind(id, handle);
            dominoes.push(id);
        }
        tracing::info!(count = dominoes.len(), "domino chain laid out");

        let ball_prototype = renderer.create_visual(VisualKind::Ball {
            radius: BALL_RADIUS,
        });
        let spawner = ProjectileSpawner::new(BALL_RADIUS, BALL_MASS, ball_prototype);

        Ok(Self {
            table,
            dominoes,
            spawner,
            ball_prototype,
        })
    }
}

fn spawn_table(
    ctx: &mut SimulationContext,
    renderer: &mut impl RenderCollaborator,
) -> Result<BodyId, SceneError> {
    let body = RigidBody::new(
        Arc::new(Shape::cuboid(TABLE_HALF)),
        0.0,
        Transform::from_position(TABLE_POSITION),
    );
    let id = ctx.world.add_body(body)?;
    let handle = renderer.create_visual(VisualKind::Cuboid {
        half_extents: TABLE_HALF,
    });
    ctx.registry.bind(id, handle);
    Ok(id)
}

fn path_points(y: f32) -> Vec<Vec3> {
    let corner = |c: [f32; 2]| Vec3::new(c[0], y, c[1]);
    let mut points = Vec::new();
    for (i, c) in PATH_CORNERS.iter().enumerate() {
        let p0 = corner(*c);
        if i == PATH_CORNERS.len() - 1 {
            points.push(p0);
            break;
        }
        let p1 = corner(PATH_CORNERS[i + 1]);
        points.push(p0);
        points.push(p0.lerp(p1, 0.3));
        points.push(p0.lerp(p1, 0.7));
    }
    points
}
