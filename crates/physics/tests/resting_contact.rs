use glam::Vec3;
use physics::{PhysicsWorld, RigidBody, Shape, Transform, COLLISION_MARGIN, FIXED_TIMESTEP};
use std::sync::Arc;

fn world_with_table() -> PhysicsWorld {
    let mut world = PhysicsWorld::new(Vec3::new(0.0, -9.807, 0.0));
    // Table top surface at y = 0.
    world
        .add_body(RigidBody::new(
            Arc::new(Shape::cuboid(Vec3::new(15.0, 0.25, 15.0))),
            0.0,
            Transform::from_position(Vec3::new(0.0, -0.25, 0.0)),
        ))
        .unwrap();
    world
}

#[test]
fn dropped_box_settles_without_sinking() {
    let mut world = world_with_table();
    let id = world
        .add_body(RigidBody::new(
            Arc::new(Shape::cuboid(Vec3::splat(0.5))),
            1.0,
            Transform::from_position(Vec3::new(0.0, 1.2, 0.0)),
        ))
        .unwrap();

    // Two simulated seconds is plenty to settle from a short drop.
    for _ in 0..120 {
        world.step(FIXED_TIMESTEP, 10);
    }

    let body = world.body(id).unwrap();
    assert!(
        body.linvel.y.abs() < 0.05,
        "vertical velocity did not converge: {}",
        body.linvel.y
    );
    // Resting height is half extent above the surface; the box may not sink
    // below it by more than the collision margin (plus float slack).
    let sink = 0.5 - body.transform.position.y;
    assert!(
        sink < COLLISION_MARGIN + 5e-3,
        "box sank {sink} below the surface"
    );
}

#[test]
fn dropped_ball_with_zero_restitution_stops() {
    let mut world = world_with_table();
    let id = world
        .add_body(RigidBody::new(
            Arc::new(Shape::ball(0.25)),
            1.0,
            Transform::from_position(Vec3::new(0.0, 1.0, 0.0)),
        ))
        .unwrap();

    for _ in 0..180 {
        world.step(FIXED_TIMESTEP, 10);
    }

    let body = world.body(id).unwrap();
    assert!(body.linvel.y.abs() < 0.05, "ball still moving: {:?}", body.linvel);
    let sink = 0.25 - body.transform.position.y;
    assert!(
        sink < COLLISION_MARGIN + 5e-3,
        "ball sank {sink} below the surface"
    );
}

#[test]
fn stacked_boxes_stay_stacked() {
    let mut world = world_with_table();
    let mut ids = Vec::new();
    for level in 0..3 {
        let y = 0.5 + level as f32 * 1.001;
        ids.push(
            world
                .add_body(RigidBody::new(
                    Arc::new(Shape::cuboid(Vec3::splat(0.5))),
                    1.0,
                    Transform::from_position(Vec3::new(0.0, y, 0.0)),
                ))
                .unwrap(),
        );
    }

    for _ in 0..240 {
        world.step(FIXED_TIMESTEP, 10);
    }

    for (level, id) in ids.iter().enumerate() {
        let body = world.body(*id).unwrap();
        let expected_y = 0.5 + level as f32;
        assert!(
            (body.transform.position.y - expected_y).abs() < 0.1,
            "level {level} drifted to {}",
            body.transform.position.y
        );
        let lateral = body.transform.position.x.abs() + body.transform.position.z.abs();
        assert!(lateral < 0.1, "level {level} slid {lateral}");
    }
}
