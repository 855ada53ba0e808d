//! Engine startup and the simulation context.
//!
//! Startup is explicitly two-phase: [`Engine::initialize`] validates the
//! fixed configuration once, then worlds and bodies are built synchronously
//! through the handle. All simulation state lives in one
//! [`SimulationContext`] passed by reference; there are no ambient
//! singletons.

use crate::error::SceneError;
use crate::registry::{BindingRegistry, RenderHandle};
use glam::Vec3;
use physics::{PhysicsWorld, VehicleId};

/// Render handles for a vehicle's four wheels, in wheel order.
#[derive(Copy, Clone, Debug)]
pub struct WheelBinding {
    pub vehicle: VehicleId,
    pub wheels: [RenderHandle; 4],
}

/// Fixed engine-level constants, set once before any simulation object
/// exists.
#[derive(Copy, Clone, Debug)]
pub struct EngineConfig {
    /// Upper bound on fixed sub-steps consumed per frame.
    pub max_sub_steps: u32,
    /// Frame deltas are clamped here before stepping, so a stalled frame
    /// cannot explode the integrator.
    pub max_frame_delta: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_sub_steps: 10,
            max_frame_delta: 0.25,
        }
    }
}

/// One-time initialized engine handle; everything simulation-side is built
/// through it.
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    /// Validate the configuration and hand back the engine.
    ///
    /// # Errors
    ///
    /// Rejects configurations the frame driver could not honor.
    pub fn initialize(config: EngineConfig) -> Result<Self, SceneError> {
        if config.max_sub_steps == 0 {
            return Err(SceneError::InvalidConfig(
                "max_sub_steps must be at least 1".into(),
            ));
        }
        if !config.max_frame_delta.is_finite() || config.max_frame_delta <= 0.0 {
            return Err(SceneError::InvalidConfig(format!(
                "max_frame_delta must be positive, got {}",
                config.max_frame_delta
            )));
        }
        tracing::info!(?config, "physics engine initialized");
        Ok(Self { config })
    }

    #[must_use]
    pub fn config(&self) -> EngineConfig {
        self.config
    }

    /// Build an empty simulation context with the given gravity.
    #[must_use]
    pub fn create_context(&self, gravity: Vec3) -> SimulationContext {
        SimulationContext {
            world: PhysicsWorld::new(gravity),
            registry: BindingRegistry::new(),
            wheel_bindings: Vec::new(),
            driven_vehicle: None,
        }
    }
}

/// Owns the world, the body/render registry and vehicle bookkeeping for one
/// running scene.
pub struct SimulationContext {
    pub world: PhysicsWorld,
    pub registry: BindingRegistry,
    pub wheel_bindings: Vec<WheelBinding>,
    /// The vehicle that receives keyboard input, if the scene has one.
    pub driven_vehicle: Option<VehicleId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_substeps_rejected() {
        let config = EngineConfig {
            max_sub_steps: 0,
            ..EngineConfig::default()
        };
        assert!(Engine::initialize(config).is_err());
    }

    #[test]
    fn context_starts_empty() {
        let engine = Engine::initialize(EngineConfig::default()).unwrap();
        let ctx = engine.create_context(Vec3::new(0.0, -9.807, 0.0));
        assert_eq!(ctx.world.body_count(), 0);
        assert!(ctx.registry.is_empty());
        assert!(ctx.driven_vehicle.is_none());
    }
}
