use physics::PhysicsError;

/// Errors raised while assembling or driving a scene.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    /// Engine configuration rejected at startup.
    #[error("invalid engine config: {0}")]
    InvalidConfig(String),
    /// The named-mesh lookup had no entry for a required mesh.
    #[error("mesh not found: {0}")]
    MissingMesh(String),
    #[error(transparent)]
    Physics(#[from] PhysicsError),
}
