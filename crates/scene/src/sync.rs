//! Transform sync bridge.
//!
//! Copies each bound body's world origin and orientation quaternion to its
//! render handle, verbatim, once per frame. Pure copying: pair order never
//! matters because every render handle is written independently. A binding
//! whose body has been removed is skipped with a warning and the frame
//! carries on.

use crate::context::WheelBinding;
use crate::registry::BindingRegistry;
use crate::render::RenderTarget;
use physics::PhysicsWorld;

/// Push every bound body's pose to the renderer.
pub fn sync_transforms(
    world: &PhysicsWorld,
    registry: &BindingRegistry,
    target: &mut impl RenderTarget,
) {
    for binding in registry.iter() {
        match world.body(binding.body) {
            Some(body) => {
                target.set_transform(
                    binding.render,
                    body.transform.position,
                    body.transform.rotation,
                );
            }
            None => {
                tracing::warn!(body = ?binding.body, "bound body is gone, skipping sync");
            }
        }
    }
}

/// Push wheel poses, recomputed by the vehicle during the step, to their
/// render handles.
pub fn sync_wheels(
    world: &PhysicsWorld,
    wheel_bindings: &[WheelBinding],
    target: &mut impl RenderTarget,
) {
    for binding in wheel_bindings {
        let Some(vehicle) = world.vehicle(binding.vehicle) else {
            tracing::warn!(vehicle = ?binding.vehicle, "bound vehicle is gone, skipping sync");
            continue;
        };
        for (wheel, handle) in vehicle.wheels().iter().zip(binding.wheels) {
            target.set_transform(
                handle,
                wheel.world_transform.position,
                wheel.world_transform.rotation,
            );
        }
    }
}
