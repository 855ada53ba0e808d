use glam::Vec3;
use scene::{Engine, EngineConfig, ProjectileSpawner, RecordingRenderer, RenderCollaborator, VisualKind, GRAVITY};

fn setup() -> (scene::SimulationContext, RecordingRenderer, ProjectileSpawner) {
    let engine = Engine::initialize(EngineConfig::default()).unwrap();
    let ctx = engine.create_context(GRAVITY);
    let mut renderer = RecordingRenderer::new();
    let prototype = renderer.create_visual(VisualKind::Ball { radius: 0.25 });
    let spawner = ProjectileSpawner::new(0.25, 1.0, prototype);
    (ctx, renderer, spawner)
}

#[test]
fn sub_threshold_power_spawns_nothing() {
    let (mut ctx, mut renderer, mut spawner) = setup();

    assert!(!spawner.queue(Vec3::new(0.0, 2.0, 0.0), Vec3::NEG_Z, 0.01));
    let spawned = spawner.apply_pending(&mut ctx, &mut renderer);

    assert!(spawned.is_empty());
    assert_eq!(ctx.world.body_count(), 0);
    assert!(ctx.registry.is_empty());
}

#[test]
fn threshold_power_spawns_exactly_one_body() {
    let (mut ctx, mut renderer, mut spawner) = setup();

    assert!(spawner.queue(Vec3::new(0.0, 2.0, 0.0), Vec3::NEG_Z, 1.0));
    let spawned = spawner.apply_pending(&mut ctx, &mut renderer);

    assert_eq!(spawned.len(), 1);
    assert_eq!(ctx.world.body_count(), 1);
    assert!(ctx.registry.contains(spawned[0]));

    let body = ctx.world.body(spawned[0]).unwrap();
    assert_eq!(body.transform.position, Vec3::new(0.0, 2.0, 0.0));
    assert_eq!(body.transform.rotation, glam::Quat::IDENTITY);
}

#[test]
fn launch_speed_is_proportional_to_power() {
    let (mut ctx, mut renderer, mut spawner) = setup();

    spawner.queue(Vec3::ZERO, Vec3::NEG_Z, 0.5);
    spawner.queue(Vec3::new(5.0, 0.0, 0.0), Vec3::NEG_Z, 1.0);
    let spawned = spawner.apply_pending(&mut ctx, &mut renderer);
    assert_eq!(spawned.len(), 2);

    let half = ctx.world.body(spawned[0]).unwrap().linvel.length();
    let full = ctx.world.body(spawned[1]).unwrap().linvel.length();
    assert!((half - 0.5 * spawner.speed_scale).abs() < 1e-4, "half={half}");
    assert!((full - spawner.speed_scale).abs() < 1e-4, "full={full}");
    assert!((full / half - 2.0).abs() < 1e-4);
}

#[test]
fn off_center_launch_offset_adds_spin() {
    let (mut ctx, mut renderer, mut spawner) = setup();
    spawner.launch_offset = Vec3::new(0.0, -0.05, 0.0);

    spawner.queue(Vec3::ZERO, Vec3::NEG_Z, 1.0);
    let spawned = spawner.apply_pending(&mut ctx, &mut renderer);

    let body = ctx.world.body(spawned[0]).unwrap();
    assert!(body.angvel.length() > 0.1, "no spin: {:?}", body.angvel);
}

#[test]
fn replace_previous_removes_the_old_ball() {
    let (mut ctx, mut renderer, mut spawner) = setup();
    spawner.replace_previous = true;

    spawner.queue(Vec3::ZERO, Vec3::NEG_Z, 1.0);
    let first = spawner.apply_pending(&mut ctx, &mut renderer)[0];
    assert_eq!(ctx.world.body_count(), 1);

    spawner.queue(Vec3::new(0.0, 1.0, 0.0), Vec3::NEG_Z, 1.0);
    let second = spawner.apply_pending(&mut ctx, &mut renderer)[0];

    assert_eq!(ctx.world.body_count(), 1);
    assert!(ctx.world.body(first).is_none());
    assert!(ctx.world.body(second).is_some());
    assert!(!ctx.registry.contains(first));
    assert!(ctx.registry.contains(second));
}

#[test]
fn spawning_does_not_disturb_existing_bodies() {
    let (mut ctx, mut renderer, mut spawner) = setup();

    spawner.queue(Vec3::ZERO, Vec3::NEG_Z, 1.0);
    let first = spawner.apply_pending(&mut ctx, &mut renderer)[0];
    let before = ctx.world.body(first).unwrap().linvel;

    spawner.queue(Vec3::new(3.0, 0.0, 0.0), Vec3::Z, 0.8);
    spawner.apply_pending(&mut ctx, &mut renderer);

    assert_eq!(ctx.world.body(first).unwrap().linvel, before);
}
