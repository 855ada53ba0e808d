use glam::Vec3;
use physics::{
    PhysicsWorld, RaycastVehicle, RigidBody, Shape, Transform, VehicleTuning, WheelDesc,
    FIXED_TIMESTEP,
};
use std::sync::Arc;

const CHASSIS_HALF: Vec3 = Vec3::new(0.9, 0.3, 2.0);

fn wheel(x: f32, z: f32, front: bool) -> WheelDesc {
    WheelDesc {
        chassis_connection: Vec3::new(x, -0.2, z),
        suspension_dir: Vec3::NEG_Y,
        axle: Vec3::X,
        rest_length: 0.3,
        radius: 0.35,
        suspension_stiffness: 6000.0,
        suspension_damping: 900.0,
        friction_slip: 10.0,
        roll_influence: 0.2,
        steers: front,
        driven: !front,
    }
}

fn spawn_vehicle(world: &mut PhysicsWorld) -> (physics::BodyId, physics::VehicleId) {
    // Ground surface at y = 0.1; oversized so long drives stay on it.
    world
        .add_body(RigidBody::new(
            Arc::new(Shape::cuboid(Vec3::new(300.0, 0.1, 300.0))),
            0.0,
            Transform::IDENTITY,
        ))
        .unwrap();

    let mut chassis = RigidBody::new(
        Arc::new(Shape::cuboid(CHASSIS_HALF)),
        150.0,
        Transform::from_position(Vec3::new(0.0, 0.9, 5.0)),
    );
    chassis.angular_damping = 0.5;
    let chassis_id = world.add_body(chassis).unwrap();

    let wheels = [
        wheel(-0.8, -1.4, true),
        wheel(0.8, -1.4, true),
        wheel(-0.8, 1.4, false),
        wheel(0.8, 1.4, false),
    ];
    let vehicle = RaycastVehicle::new(chassis_id, wheels, VehicleTuning::default());
    let vehicle_id = world.add_vehicle(vehicle).unwrap();
    (chassis_id, vehicle_id)
}

#[test]
fn idle_vehicle_does_not_drift() {
    let mut world = PhysicsWorld::new(Vec3::new(0.0, -9.807, 0.0));
    let (chassis_id, _) = spawn_vehicle(&mut world);

    // Let the suspension settle first, then watch for drift.
    for _ in 0..120 {
        world.step(FIXED_TIMESTEP, 10);
    }
    let settled = world.body(chassis_id).unwrap().transform.position;

    for _ in 0..240 {
        world.step(FIXED_TIMESTEP, 10);
    }
    let after = world.body(chassis_id).unwrap().transform.position;

    let planar = Vec3::new(after.x - settled.x, 0.0, after.z - settled.z).length();
    assert!(planar < 0.05, "chassis drifted {planar} m at rest");
    assert!(
        (after.y - settled.y).abs() < 0.05,
        "suspension still bouncing: {} vs {}",
        after.y,
        settled.y
    );
}

#[test]
fn throttle_moves_the_chassis_forward_monotonically() {
    let mut world = PhysicsWorld::new(Vec3::new(0.0, -9.807, 0.0));
    let (chassis_id, vehicle_id) = spawn_vehicle(&mut world);

    for _ in 0..120 {
        world.step(FIXED_TIMESTEP, 10);
    }
    let start_z = world.body(chassis_id).unwrap().transform.position.z;

    // Forward is -z for this chassis layout.
    world
        .vehicle_mut(vehicle_id)
        .unwrap()
        .set_engine_force(1.0);

    let mut last_z = start_z;
    for window in 0..6 {
        for _ in 0..30 {
            world.step(FIXED_TIMESTEP, 10);
        }
        let z = world.body(chassis_id).unwrap().transform.position.z;
        assert!(
            z < last_z - 1e-3,
            "no forward progress in window {window}: {z} vs {last_z}"
        );
        last_z = z;
    }
    assert!(start_z - last_z > 1.0, "barely moved: {}", start_z - last_z);

    // All four wheels stayed grounded on flat ground.
    let vehicle = world.vehicle(vehicle_id).unwrap();
    assert!(vehicle.wheels().iter().all(|w| w.grounded));
}

#[test]
fn braking_stops_a_rolling_vehicle() {
    let mut world = PhysicsWorld::new(Vec3::new(0.0, -9.807, 0.0));
    let (chassis_id, vehicle_id) = spawn_vehicle(&mut world);

    for _ in 0..120 {
        world.step(FIXED_TIMESTEP, 10);
    }
    world
        .vehicle_mut(vehicle_id)
        .unwrap()
        .set_engine_force(1.0);
    for _ in 0..60 {
        world.step(FIXED_TIMESTEP, 10);
    }

    world.vehicle_mut(vehicle_id).unwrap().set_engine_force(0.0);
    world.vehicle_mut(vehicle_id).unwrap().set_brake(1.0);
    for _ in 0..360 {
        world.step(FIXED_TIMESTEP, 10);
    }

    let speed = world.body(chassis_id).unwrap().linvel.length();
    assert!(speed < 0.2, "vehicle still rolling at {speed} m/s");
}

#[test]
fn airborne_wheels_apply_no_force() {
    let mut world = PhysicsWorld::new(Vec3::new(0.0, -9.807, 0.0));
    // No ground at all: the vehicle is in free fall.
    let mut chassis = RigidBody::new(
        Arc::new(Shape::cuboid(CHASSIS_HALF)),
        150.0,
        Transform::from_position(Vec3::new(0.0, 50.0, 0.0)),
    );
    chassis.angular_damping = 0.0;
    let chassis_id = world.add_body(chassis).unwrap();
    let wheels = [
        wheel(-0.8, -1.4, true),
        wheel(0.8, -1.4, true),
        wheel(-0.8, 1.4, false),
        wheel(0.8, 1.4, false),
    ];
    let vehicle_id = world
        .add_vehicle(RaycastVehicle::new(
            chassis_id,
            wheels,
            VehicleTuning::default(),
        ))
        .unwrap();
    world
        .vehicle_mut(vehicle_id)
        .unwrap()
        .set_engine_force(1.0);

    let steps = 30;
    for _ in 0..steps {
        world.step(FIXED_TIMESTEP, 10);
    }

    let body = world.body(chassis_id).unwrap();
    // Pure gravity: no lateral velocity, no spin picked up from the engine.
    assert!(body.linvel.x.abs() < 1e-4);
    assert!(body.linvel.z.abs() < 1e-4);
    assert!(body.angvel.length() < 1e-4);
    let expected_vy = -9.807 * FIXED_TIMESTEP * steps as f32;
    assert!((body.linvel.y - expected_vy).abs() < 1e-3);

    let vehicle = world.vehicle(vehicle_id).unwrap();
    assert!(vehicle.wheels().iter().all(|w| !w.grounded));
}
