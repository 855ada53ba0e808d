use crate::world::BodyId;

/// Simulation error types.
///
/// Configuration errors are fatal for the object being constructed and are
/// reported at shape-build or body-registration time; nothing degenerate is
/// ever silently stepped.
#[derive(Debug, thiserror::Error)]
pub enum PhysicsError {
    /// A shape could not be built from the given geometry.
    #[error("malformed shape: {0}")]
    MalformedShape(String),
    /// A body was rejected at registration because its mass/inertia pairing
    /// is unusable by the solver.
    #[error("degenerate body: {0}")]
    DegenerateBody(String),
    /// A handle referred to a body that is not (or no longer) registered.
    #[error("unknown body {0:?}")]
    UnknownBody(BodyId),
}
