use criterion::{criterion_group, criterion_main, Criterion};
use glam::Vec3;
use physics::{PhysicsWorld, RigidBody, Shape, Transform, FIXED_TIMESTEP};
use std::sync::Arc;

fn build_stack_world() -> PhysicsWorld {
    let mut world = PhysicsWorld::new(Vec3::new(0.0, -9.807, 0.0));
    world
        .add_body(RigidBody::new(
            Arc::new(Shape::cuboid(Vec3::new(15.0, 0.25, 15.0))),
            0.0,
            Transform::from_position(Vec3::new(0.0, -0.25, 0.0)),
        ))
        .unwrap();

    let cube = Arc::new(Shape::cuboid(Vec3::splat(0.5)));
    for i in 0..10 {
        for j in 0..4 {
            world
                .add_body(RigidBody::new(
                    Arc::clone(&cube),
                    1.0,
                    Transform::from_position(Vec3::new(i as f32 - 5.0, 0.5 + j as f32 * 1.01, 0.0)),
                ))
                .unwrap();
        }
    }
    world
}

fn bench_step(c: &mut Criterion) {
    c.bench_function("step_box_wall", |b| {
        let mut world = build_stack_world();
        b.iter(|| world.step(FIXED_TIMESTEP, 10));
    });
}

criterion_group!(benches, bench_step);
criterion_main!(benches);
