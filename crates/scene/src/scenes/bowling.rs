//! Bowling scene.
//!
//! Stage and pin geometry arrive through the named-mesh lookup; the stage
//! becomes one static convex hull, ten pins share a single hull shape at the
//! marker positions, and a drag gesture throws the ball down-lane. A new
//! throw replaces the previous ball.

use crate::context::SimulationContext;
use crate::error::SceneError;
use crate::mesh::MeshSource;
use crate::render::{RenderCollaborator, VisualKind};
use crate::spawner::ProjectileSpawner;
use glam::Vec3;
use physics::{BodyId, RigidBody, Shape, Transform};
use std::sync::Arc;

pub const STAGE_MESH: &str = "Stage";
pub const PIN_MESH: &str = "Pin";
pub const PIN_MARKER_PREFIX: &str = "PinPos";

const STAGE_FRICTION: f32 = 0.5;
const STAGE_ROLLING_FRICTION: f32 = 0.1;
const STAGE_RESTITUTION: f32 = 0.2;

const PIN_MASS: f32 = 1.5;
const PIN_FRICTION: f32 = 0.5;
const PIN_ROLLING_FRICTION: f32 = 0.1;

const BALL_RADIUS: f32 = 0.12;
const BALL_MASS: f32 = 6.0;
/// Slightly below center so a throw picks up forward roll.
const BALL_LAUNCH_OFFSET: Vec3 = Vec3::new(0.0, -0.04, 0.0);

pub struct BowlingScene {
    pub stage: BodyId,
    pub pins: Vec<BodyId>,
    pub spawner: ProjectileSpawner,
}

impl BowlingScene {
    /// Assemble the scene from a mesh lookup.
    ///
    /// # Errors
    ///
    /// Fails when the stage or pin mesh is missing, when the pin hull is
    /// degenerate, or when no pin markers exist.
    pub fn build(
        ctx: &mut SimulationContext,
        renderer: &mut impl RenderCollaborator,
        meshes: &impl MeshSource,
    ) -> Result<Self, SceneError> {
        let stage = spawn_stage(ctx, renderer, meshes)?;
        let pins = spawn_pins(ctx, renderer, meshes)?;

        let ball_prototype = renderer.create_visual(VisualKind::Ball {
            radius: BALL_RADIUS,
        });
        let mut spawner = ProjectileSpawner::new(BALL_RADIUS, BALL_MASS, ball_prototype);
        spawner.replace_previous = true;
        spawner.launch_offset = BALL_LAUNCH_OFFSET;
        spawner.material.friction = 0.5;
        spawner.material.rolling_friction = 0.1;

        Ok(Self {
            stage,
            pins,
            spawner,
        })
    }
}

fn spawn_stage(
    ctx: &mut SimulationContext,
    renderer: &mut impl RenderCollaborator,
    meshes: &impl MeshSource,
) -> Result<BodyId, SceneError> {
    let mesh = meshes
        .mesh(STAGE_MESH)
        .ok_or_else(|| SceneError::MissingMesh(STAGE_MESH.into()))?;
    let hull = Shape::convex_hull(&mesh.vertices)?;

    let mut body = RigidBody::new(Arc::new(hull), 0.0, Transform::IDENTITY);
    body.material.friction = STAGE_FRICTION;
    body.material.rolling_friction = STAGE_ROLLING_FRICTION;
    body.material.restitution = STAGE_RESTITUTION;

    let id = ctx.world.add_body(body)?;
    let handle = renderer.create_visual(VisualKind::NamedMesh {
        name: STAGE_MESH.into(),
    });
    ctx.registry.bind(id, handle);
    Ok(id)
}

fn spawn_pins(
    ctx: &mut SimulationContext,
    renderer: &mut impl RenderCollaborator,
    meshes: &impl MeshSource,
) -> Result<Vec<BodyId>, SceneError> {
    let mesh = meshes
        .mesh(PIN_MESH)
        .ok_or_else(|| SceneError::MissingMesh(PIN_MESH.into()))?;
    // All pins share one hull instance.
    let hull = Arc::new(Shape::convex_hull(&mesh.vertices)?);

    let markers = meshes.marker_positions(PIN_MARKER_PREFIX);
    if markers.is_empty() {
        return Err(SceneError::MissingMesh(format!(
            "no markers with prefix {PIN_MARKER_PREFIX}"
        )));
    }

    let mut pins = Vec::with_capacity(markers.len());
    for position in markers {
        let mut body = RigidBody::new(
            Arc::clone(&hull),
            PIN_MASS,
            Transform::from_position(position),
        );
        body.material.friction = PIN_FRICTION;
        body.material.rolling_friction = PIN_ROLLING_FRICTION;

        // One bad pin does not cancel the rack.
        let id = match ctx.world.add_body(body) {
            Ok(id) => id,
            Err(err) => {
                tracing::warn!(%err, ?position, "pin rejected");
                continue;
            }
        };
        let handle = renderer.create_visual(VisualKind::NamedMesh {
            name: PIN_MESH.into(),
        });
        ctx.registry.bind(id, handle);
        pins.push(id);
    }
    tracing::info!(count = pins.len(), "pins racked");
    Ok(pins)
}
