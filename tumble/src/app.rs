//! Scene setup and the cooperative frame loop.
//!
//! One iteration per target refresh: scripted input is sampled, the frame
//! driver advances the world and syncs poses into the recording renderer,
//! and the loop sleeps off any spare frame budget. Structure and pacing
//! follow the windowed loop this runtime grew out of; the renderer is just
//! headless here.

use crate::meshes;
use crate::SceneKind;
use anyhow::Result;
use glam::Vec3;
use physics::BodyId;
use scene::{
    BowlingScene, DominoScene, DragGesture, Engine, EngineConfig, FrameDriver, InputState,
    ProjectileSpawner, RecordingRenderer, SimulationContext, VehicleScene, GRAVITY,
};
use std::time::{Duration, Instant};

pub fn run(kind: SceneKind, frames: u32, fps: f32) -> Result<()> {
    tracing_subscriber::fmt::init();

    tracing::info!(?kind, frames, "initializing physics engine");
    let engine = Engine::initialize(EngineConfig::default())?;
    let config = engine.config();
    let mut ctx = engine.create_context(GRAVITY);
    let mut renderer = RecordingRenderer::new();

    let mut scene = build_scene(kind, &mut ctx, &mut renderer)?;
    tracing::info!(bodies = ctx.world.body_count(), "scene constructed");

    let mut driver = FrameDriver::new(config.max_frame_delta, config.max_sub_steps);
    let frame_budget = if fps > 0.0 {
        Some(Duration::from_secs_f32(1.0 / fps))
    } else {
        None
    };

    for frame in 0..frames {
        let frame_start = Instant::now();

        let input = scene.input_for_frame(frame);
        scene.script_frame(frame);
        driver.tick(&mut ctx, scene.spawner_mut(), &mut renderer, &input);

        if (frame + 1) % 50 == 0 {
            match scene.watched_body().and_then(|id| ctx.world.body(id)) {
                Some(body) => tracing::info!(
                    frame = frame + 1,
                    position = ?body.transform.position,
                    bodies = ctx.world.body_count(),
                    "frame complete"
                ),
                None => tracing::info!(
                    frame = frame + 1,
                    bodies = ctx.world.body_count(),
                    "frame complete"
                ),
            }
        }

        if let Some(budget) = frame_budget {
            let elapsed = frame_start.elapsed();
            if elapsed < budget {
                std::thread::sleep(budget - elapsed);
            }
        }
    }

    tracing::info!(
        frames,
        synced_handles = renderer.tracked_handles(),
        "run finished"
    );
    Ok(())
}

fn build_scene(
    kind: SceneKind,
    ctx: &mut SimulationContext,
    renderer: &mut RecordingRenderer,
) -> Result<ScriptedScene> {
    Ok(match kind {
        SceneKind::Domino => {
            let built = DominoScene::build(ctx, renderer)?;
            let target = built
                .dominoes
                .first()
                .and_then(|id| ctx.world.body(*id))
                .map(|b| b.transform.position)
                .unwrap_or(Vec3::ZERO);
            ScriptedScene::Domino {
                scene: built,
                throw_target: target,
            }
        }
        SceneKind::Vehicle => ScriptedScene::Vehicle {
            scene: VehicleScene::build(ctx, renderer)?,
        },
        SceneKind::Bowling => {
            let meshes = meshes::bowling_meshes();
            ScriptedScene::Bowling {
                scene: BowlingScene::build(ctx, renderer, &meshes)?,
            }
        }
    })
}

/// A built scene plus its canned input script for headless runs.
enum ScriptedScene {
    Domino {
        scene: DominoScene,
        throw_target: Vec3,
    },
    Vehicle {
        scene: VehicleScene,
    },
    Bowling {
        scene: BowlingScene,
    },
}

impl ScriptedScene {
    /// Action flags for this frame.
    fn input_for_frame(&self, frame: u32) -> InputState {
        match self {
            // Pull away, swing back toward the wall, brake at the end.
            ScriptedScene::Vehicle { .. } => InputState {
                accelerate: (60..360).contains(&frame),
                brake: frame >= 420,
                steer_left: (180..240).contains(&frame),
                steer_right: (240..300).contains(&frame),
                ..InputState::default()
            },
            _ => InputState::default(),
        }
    }

    /// One-shot scripted events (throws).
    fn script_frame(&mut self, frame: u32) {
        match self {
            ScriptedScene::Domino {
                scene,
                throw_target,
            } => {
                if frame == 60 {
                    let origin = *throw_target + Vec3::new(0.0, 1.5, -3.0);
                    let direction = *throw_target - origin;
                    if scene.spawner.queue(origin, direction, 1.0) {
                        tracing::info!("ball thrown at the head of the chain");
                    }
                }
            }
            ScriptedScene::Bowling { scene } => {
                // Two throws; the second replaces the first ball.
                if frame == 60 || frame == 360 {
                    let gesture = DragGesture {
                        start_y: 120.0,
                        end_y: 260.0,
                    };
                    let accepted = scene.spawner.queue(
                        Vec3::new(0.0, 0.12, -4.5),
                        Vec3::Z,
                        gesture.power(),
                    );
                    if accepted {
                        tracing::info!(power = gesture.power(), "ball rolled down the lane");
                    }
                }
            }
            ScriptedScene::Vehicle { .. } => {}
        }
    }

    fn spawner_mut(&mut self) -> Option<&mut ProjectileSpawner> {
        match self {
            ScriptedScene::Domino { scene, .. } => Some(&mut scene.spawner),
            ScriptedScene::Bowling { scene } => Some(&mut scene.spawner),
            ScriptedScene::Vehicle { .. } => None,
        }
    }

    /// Body whose position the progress log tracks.
    fn watched_body(&self) -> Option<BodyId> {
        match self {
            ScriptedScene::Domino { scene, .. } => scene.spawner.last_spawned(),
            ScriptedScene::Vehicle { scene } => Some(scene.chassis),
            ScriptedScene::Bowling { scene } => scene.pins.first().copied(),
        }
    }
}
