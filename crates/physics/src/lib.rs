//! # Rigid-body physics core
//!
//! A discrete-time rigid-body engine for interactive scenes: a stepped
//! [`PhysicsWorld`] of boxes, spheres and mesh-derived convex hulls, an
//! impulse-based contact solver, ray queries, and a four-wheel raycast
//! vehicle model.
//!
//! ## Key components
//!
//! - **Shapes:** [`Shape`] builds immutable collision geometry that bodies
//!   share through an `Arc`; see the [`shape`] module.
//! - **Bodies:** [`RigidBody`] carries mass, material response and pose.
//!   Mass 0 marks static scenery.
//! - **World:** [`PhysicsWorld`] owns all registered bodies, subdivides
//!   frame deltas into fixed sub-steps, and resolves contacts before a step
//!   call returns.
//! - **Vehicles:** [`RaycastVehicle`] models wheels as suspension rays that
//!   feed spring and friction impulses into an ordinary chassis body.
//!
//! ## Usage
//!
//! ```rust
//! use physics::{PhysicsWorld, RigidBody, Shape, Transform};
//! use glam::Vec3;
//! use std::sync::Arc;
//!
//! let mut world = PhysicsWorld::new(Vec3::new(0.0, -9.807, 0.0));
//! let ball = RigidBody::new(
//!     Arc::new(Shape::ball(0.25)),
//!     1.0,
//!     Transform::from_position(Vec3::new(0.0, 5.0, 0.0)),
//! );
//! let id = world.add_body(ball).unwrap();
//! world.step(1.0 / 60.0, 10);
//! assert!(world.body(id).unwrap().transform.position.y < 5.0);
//! ```

pub mod body;
pub mod collision;
pub mod error;
mod integrator;
pub mod raycast;
pub mod shape;
mod solver;
pub mod transform;
pub mod vehicle;
pub mod world;

pub use body::{Material, RigidBody};
pub use collision::{ContactManifold, ContactPoint};
pub use error::PhysicsError;
pub use raycast::{Ray, RayHit};
pub use shape::{Aabb, Shape, COLLISION_MARGIN};
pub use transform::Transform;
pub use vehicle::{
    RaycastVehicle, VehicleId, VehicleTuning, WheelDesc, WheelState, WHEEL_BACK_LEFT,
    WHEEL_BACK_RIGHT, WHEEL_FRONT_LEFT, WHEEL_FRONT_RIGHT,
};
pub use world::{BodyId, PhysicsWorld, FIXED_TIMESTEP};
