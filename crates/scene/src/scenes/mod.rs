//! The three interactive scenes.

pub mod bowling;
pub mod domino;
pub mod vehicle;

pub use bowling::BowlingScene;
pub use domino::DominoScene;
pub use vehicle::VehicleScene;
