use glam::Vec3;
use physics::{PhysicsWorld, RigidBody, Shape, Transform, FIXED_TIMESTEP};
use std::sync::Arc;

#[test]
fn sphere_free_fall_matches_discrete_sum() {
    let gravity = Vec3::new(0.0, -9.807, 0.0);
    let mut world = PhysicsWorld::new(gravity);
    let id = world
        .add_body(RigidBody::new(
            Arc::new(Shape::ball(0.25)),
            1.0,
            Transform::from_position(Vec3::new(0.0, 100.0, 0.0)),
        ))
        .unwrap();

    let steps = 60;
    for _ in 0..steps {
        world.step(FIXED_TIMESTEP, 10);
    }

    // Semi-implicit Euler: y_n = y0 + g * dt^2 * n(n+1)/2
    let n = steps as f32;
    let expected = 100.0 + gravity.y * FIXED_TIMESTEP * FIXED_TIMESTEP * n * (n + 1.0) / 2.0;
    let actual = world.body(id).unwrap().transform.position.y;
    let diff = (actual - expected).abs();
    assert!(diff < 1e-3, "diff={diff}");
}

#[test]
fn linear_damping_slows_the_fall() {
    let gravity = Vec3::new(0.0, -9.807, 0.0);
    let mut damped_world = PhysicsWorld::new(gravity);
    let mut free_world = PhysicsWorld::new(gravity);

    let mut damped = RigidBody::new(
        Arc::new(Shape::ball(0.25)),
        1.0,
        Transform::from_position(Vec3::new(0.0, 100.0, 0.0)),
    );
    damped.linear_damping = 0.5;
    let damped_id = damped_world.add_body(damped).unwrap();

    let free_id = free_world
        .add_body(RigidBody::new(
            Arc::new(Shape::ball(0.25)),
            1.0,
            Transform::from_position(Vec3::new(0.0, 100.0, 0.0)),
        ))
        .unwrap();

    for _ in 0..60 {
        damped_world.step(FIXED_TIMESTEP, 10);
        free_world.step(FIXED_TIMESTEP, 10);
    }

    let damped_y = damped_world.body(damped_id).unwrap().transform.position.y;
    let free_y = free_world.body(free_id).unwrap().transform.position.y;
    assert!(damped_y > free_y, "damped={damped_y} free={free_y}");
}
