//! Body/render-handle registry.
//!
//! Pairs every simulated body with the render object that mirrors it. The
//! binding is a weak association used purely for lookup during sync; it owns
//! neither side and affects neither lifetime. Keeping an explicit list also
//! means the sync pass never has to walk a scene graph asking each node
//! whether it happens to carry a physics body.

use physics::BodyId;

/// Opaque handle minted by the render collaborator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct RenderHandle(pub u32);

/// One body/render pairing.
#[derive(Copy, Clone, Debug)]
pub struct BodyBinding {
    pub body: BodyId,
    pub render: RenderHandle,
}

/// The authoritative list of bound pairs.
#[derive(Default)]
pub struct BindingRegistry {
    bindings: Vec<BodyBinding>,
}

impl BindingRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Associate a body with a render handle. A body is bound at most once;
    /// rebinding replaces the previous handle.
    pub fn bind(&mut self, body: BodyId, render: RenderHandle) {
        if let Some(existing) = self.bindings.iter_mut().find(|b| b.body == body) {
            existing.render = render;
        } else {
            self.bindings.push(BodyBinding { body, render });
        }
    }

    /// Drop the binding for a body, returning its render handle.
    pub fn unbind(&mut self, body: BodyId) -> Option<RenderHandle> {
        let index = self.bindings.iter().position(|b| b.body == body)?;
        Some(self.bindings.remove(index).render)
    }

    /// A fresh, finite traversal of the currently bound set. Each call
    /// restarts from the beginning.
    pub fn iter(&self) -> impl Iterator<Item = &BodyBinding> {
        self.bindings.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    #[must_use]
    pub fn contains(&self, body: BodyId) -> bool {
        self.bindings.iter().any(|b| b.body == body)
    }
}
