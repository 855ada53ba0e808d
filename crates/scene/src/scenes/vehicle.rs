//! Drivable vehicle scene.
//!
//! A static table, a ten-by-ten wall of boxes to plow through, and a
//! four-wheel raycast vehicle wired to the keyboard action flags.

use crate::context::{SimulationContext, WheelBinding};
use crate::error::SceneError;
use crate::render::{RenderCollaborator, VisualKind};
use glam::Vec3;
use physics::{
    BodyId, RaycastVehicle, RigidBody, Shape, Transform, VehicleId, VehicleTuning, WheelDesc,
};
use std::sync::Arc;

const TABLE_HALF: Vec3 = Vec3::new(15.0, 0.1, 15.0);
const WALL_SIZE: usize = 10;
const BOX_HALF: f32 = 0.5;
const BOX_MASS: f32 = 1.0;
const BOX_FRICTION: f32 = 1.0;

const CHASSIS_HALF: Vec3 = Vec3::new(0.9, 0.3, 2.0);
const CHASSIS_MASS: f32 = 150.0;
const WHEEL_RADIUS: f32 = 0.35;
const WHEEL_REST_LENGTH: f32 = 0.3;
const WHEEL_STIFFNESS: f32 = 6000.0;
const WHEEL_DAMPING: f32 = 900.0;
const WHEEL_FRICTION_SLIP: f32 = 10.0;
const WHEEL_ROLL_INFLUENCE: f32 = 0.2;

pub struct VehicleScene {
    pub table: BodyId,
    pub wall: Vec<BodyId>,
    pub chassis: BodyId,
    pub vehicle: VehicleId,
}

impl VehicleScene {
    pub fn build(
        ctx: &mut SimulationContext,
        renderer: &mut impl RenderCollaborator,
    ) -> Result<Self, SceneError> {
        let table = {
            let body = RigidBody::new(
                Arc::new(Shape::cuboid(TABLE_HALF)),
                0.0,
                Transform::IDENTITY,
            );
            let id = ctx.world.add_body(body)?;
            let handle = renderer.create_visual(VisualKind::Cuboid {
                half_extents: TABLE_HALF,
            });
            ctx.registry.bind(id, handle);
            id
        };
        let table_top = TABLE_HALF.y;

        let wall = spawn_wall(ctx, renderer, table_top)?;
        let (chassis, vehicle) = spawn_vehicle(ctx, renderer, table_top)?;
        ctx.driven_vehicle = Some(vehicle);

        Ok(Self {
            table,
            wall,
            chassis,
            vehicle,
        })
    }
}

fn spawn_wall(
    ctx: &mut SimulationContext,
    renderer: &mut impl RenderCollaborator,
    table_top: f32,
) -> Result<Vec<BodyId>, SceneError> {
    let shape = Arc::new(Shape::cuboid(Vec3::splat(BOX_HALF)));
    let mut wall = Vec::with_capacity(WALL_SIZE * WALL_SIZE);
    let offset = (WALL_SIZE / 2) as f32;
    for i in 0..WALL_SIZE {
        for j in 0..WALL_SIZE {
            let position = Vec3::new(
                i as f32 - offset,
                table_top + BOX_HALF + j as f32 * (BOX_HALF * 2.0),
                -5.0,
            );
            let mut body = RigidBody::new(
                Arc::clone(&shape),
                BOX_MASS,
                Transform::from_position(position),
            );
            body.material.friction = BOX_FRICTION;
            let id = match ctx.world.add_body(body) {
                Ok(id) => id,
                Err(err) => {
                    tracing::warn!(%err, ?position, "wall box rejected");
                    continue;
                }
            };
            let handle = renderer.create_visual(VisualKind::Cuboid {
                half_extents: Vec3::splat(BOX_HALF),
            });
            ctx.registry.bind(id, handle);
            wall.push(id);
        }
    }
    Ok(wall)
}

fn spawn_vehicle(
    ctx: &mut SimulationContext,
    renderer: &mut impl RenderCollaborator,
    table_top: f32,
) -> Result<(BodyId, VehicleId), SceneError> {
    // Spawn just above suspension equilibrium and let it settle.
    let spawn_height = table_top + WHEEL_RADIUS + WHEEL_REST_LENGTH + 0.25;
    let mut chassis = RigidBody::new(
        Arc::new(Shape::cuboid(CHASSIS_HALF)),
        CHASSIS_MASS,
        Transform::from_position(Vec3::new(0.0, spawn_height, 5.0)),
    );
    chassis.material.friction = 1.0;
    chassis.angular_damping = 0.5;
    let chassis_id = ctx.world.add_body(chassis)?;
    let chassis_handle = renderer.create_visual(VisualKind::Cuboid {
        half_extents: CHASSIS_HALF,
    });
    ctx.registry.bind(chassis_id, chassis_handle);

    // Front of the chassis points toward -z; order is front-left,
    // front-right, back-left, back-right and must stay that way.
    let wheel = |x: f32, z: f32, front: bool| WheelDesc {
        chassis_connection: Vec3::new(x, -0.2, z),
        suspension_dir: Vec3::NEG_Y,
        axle: Vec3::X,
        rest_length: WHEEL_REST_LENGTH,
        radius: WHEEL_RADIUS,
        suspension_stiffness: WHEEL_STIFFNESS,
        suspension_damping: WHEEL_DAMPING,
        friction_slip: WHEEL_FRICTION_SLIP,
        roll_influence: WHEEL_ROLL_INFLUENCE,
        steers: front,
        driven: !front,
    };
    let wheels = [
        wheel(-0.8, -1.4, true),
        wheel(0.8, -1.4, true),
        wheel(-0.8, 1.4, false),
        wheel(0.8, 1.4, false),
    ];

    let vehicle = RaycastVehicle::new(chassis_id, wheels, VehicleTuning::default());
    let vehicle_id = ctx.world.add_vehicle(vehicle)?;

    let wheel_handles = [(); 4].map(|()| {
        renderer.create_visual(VisualKind::Wheel {
            radius: WHEEL_RADIUS,
        })
    });
    ctx.wheel_bindings.push(WheelBinding {
        vehicle: vehicle_id,
        wheels: wheel_handles,
    });

    Ok((chassis_id, vehicle_id))
}
