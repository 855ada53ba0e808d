//! Render-collaborator contract.
//!
//! The physics core never owns renderer state; it pushes poses through
//! [`RenderTarget`] and asks a [`RenderCollaborator`] for fresh handles when
//! a projectile needs a cloned visual. [`RecordingRenderer`] is the headless
//! implementation used by tests and `--headless` runs.

use crate::registry::RenderHandle;
use glam::{Quat, Vec3};
use std::collections::HashMap;

/// Per-frame transform sink.
pub trait RenderTarget {
    /// Assign a body's world origin and orientation verbatim to the render
    /// object behind `handle`.
    fn set_transform(&mut self, handle: RenderHandle, position: Vec3, rotation: Quat);
}

/// What a scene asks the renderer to draw for one body.
#[derive(Clone, Debug)]
pub enum VisualKind {
    Cuboid { half_extents: Vec3 },
    Ball { radius: f32 },
    Wheel { radius: f32 },
    /// A mesh the host already loaded, referenced by name.
    NamedMesh { name: String },
}

/// The full collaborator surface the simulation layer needs.
pub trait RenderCollaborator: RenderTarget {
    /// Create a visual during scene construction and hand back its handle.
    fn create_visual(&mut self, kind: VisualKind) -> RenderHandle;

    /// Clone the visual behind `prototype`, returning a handle for the new
    /// instance.
    fn instantiate(&mut self, prototype: RenderHandle) -> RenderHandle;

    /// Release a handle whose body is gone. Optional.
    fn retire(&mut self, _handle: RenderHandle) {}

    /// End-of-frame hook, called after sync. Optional.
    fn present(&mut self) {}
}

/// Headless collaborator that records every pose it is handed.
#[derive(Default)]
pub struct RecordingRenderer {
    next_handle: u32,
    transforms: HashMap<RenderHandle, (Vec3, Quat)>,
    visuals: HashMap<RenderHandle, VisualKind>,
    pub presented_frames: u64,
}

impl RecordingRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&mut self) -> RenderHandle {
        let handle = RenderHandle(self.next_handle);
        self.next_handle += 1;
        handle
    }

    #[must_use]
    pub fn transform_of(&self, handle: RenderHandle) -> Option<(Vec3, Quat)> {
        self.transforms.get(&handle).copied()
    }

    #[must_use]
    pub fn visual_of(&self, handle: RenderHandle) -> Option<&VisualKind> {
        self.visuals.get(&handle)
    }

    /// Handles that have received at least one transform.
    #[must_use]
    pub fn tracked_handles(&self) -> usize {
        self.transforms.len()
    }

    #[must_use]
    pub fn visual_count(&self) -> usize {
        self.visuals.len()
    }
}

impl RenderTarget for RecordingRenderer {
    fn set_transform(&mut self, handle: RenderHandle, position: Vec3, rotation: Quat) {
        self.transforms.insert(handle, (position, rotation));
    }
}

impl RenderCollaborator for RecordingRenderer {
    fn create_visual(&mut self, kind: VisualKind) -> RenderHandle {
        let handle = self.allocate();
        self.visuals.insert(handle, kind);
        handle
    }

    fn instantiate(&mut self, prototype: RenderHandle) -> RenderHandle {
        let kind = self
            .visuals
            .get(&prototype)
            .cloned()
            .unwrap_or(VisualKind::Ball { radius: 0.25 });
        self.create_visual(kind)
    }

    fn retire(&mut self, handle: RenderHandle) {
        self.transforms.remove(&handle);
        self.visuals.remove(&handle);
    }

    fn present(&mut self) {
        self.presented_frames += 1;
    }
}
