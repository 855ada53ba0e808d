//! # Tumble runtime
//!
//! Entry point for the collision-scene runner. Picks one of the three
//! interactive scenes, drives it headless with scripted input, and logs
//! simulation progress. The render collaborator here only records poses;
//! a graphical front-end plugs into the same traits.

mod app;
mod meshes;

use anyhow::Result;
use clap::{Parser, ValueEnum};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum SceneKind {
    /// Spiral of dominoes toppled by a thrown ball.
    Domino,
    /// Drivable vehicle plowing into a wall of boxes.
    Vehicle,
    /// Ten pins, a lane, and a drag-gesture throw.
    Bowling,
}

/// Collision scene runner.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Scene to simulate.
    #[arg(value_enum, default_value = "domino")]
    scene: SceneKind,

    /// Number of frames to run.
    #[arg(long, default_value_t = 600)]
    frames: u32,

    /// Frame-rate cap; 0 runs as fast as possible.
    #[arg(long, default_value_t = 60.0)]
    fps: f32,
}

fn main() -> Result<()> {
    let args = Args::parse();
    app::run(args.scene, args.frames, args.fps)
}
