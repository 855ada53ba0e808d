//! # Simulation context layer
//!
//! Everything between the physics engine and a renderer: the body/render
//! registry, the per-frame transform sync bridge, the projectile spawner,
//! the frame driver, and the three interactive scenes (domino chain,
//! drivable vehicle, bowling).
//!
//! Startup is two-phase: [`Engine::initialize`] once, then synchronous
//! construction of a [`SimulationContext`] and a scene. Per frame the
//! [`FrameDriver`] applies queued spawns and input, steps the world, and
//! mirrors every bound body onto the render collaborator.

pub mod context;
pub mod curve;
pub mod error;
pub mod frame;
pub mod input;
pub mod mesh;
pub mod registry;
pub mod render;
pub mod scenes;
pub mod spawner;
pub mod sync;

pub use context::{Engine, EngineConfig, SimulationContext, WheelBinding};
pub use error::SceneError;
pub use frame::FrameDriver;
pub use input::{DragGesture, InputState};
pub use mesh::{MeshData, MeshSource, StaticMeshSource};
pub use registry::{BindingRegistry, BodyBinding, RenderHandle};
pub use render::{RecordingRenderer, RenderCollaborator, RenderTarget, VisualKind};
pub use scenes::{BowlingScene, DominoScene, VehicleScene};
pub use spawner::ProjectileSpawner;
pub use sync::{sync_transforms, sync_wheels};

use glam::Vec3;

/// World gravity used by every scene.
pub const GRAVITY: Vec3 = Vec3::new(0.0, -9.807, 0.0);
