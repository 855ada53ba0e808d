//! Host-side mesh supply for the bowling scene.
//!
//! Stands in for the model loader: the lane slab, the pin template, and the
//! ten rack markers, delivered through the same named-mesh lookup a GLTF
//! loader would fill.

use glam::Vec3;
use scene::StaticMeshSource;

const LANE_HALF_WIDTH: f32 = 1.5;
const LANE_HALF_LENGTH: f32 = 6.0;
const LANE_THICKNESS: f32 = 0.2;
const PIN_BASE_HALF: f32 = 0.06;
const PIN_TOP_HALF: f32 = 0.03;
const PIN_HEIGHT: f32 = 0.38;
const RACK_Z: f32 = 4.0;
const PIN_SPACING: f32 = 0.3;

/// Build the lookup the bowling scene consumes.
pub fn bowling_meshes() -> StaticMeshSource {
    let mut source = StaticMeshSource::new();

    // Lane slab with its top surface at y = 0.
    let mut lane = Vec::new();
    for sx in [-1.0_f32, 1.0] {
        for sz in [-1.0_f32, 1.0] {
            for y in [-LANE_THICKNESS, 0.0] {
                lane.push(Vec3::new(
                    sx * LANE_HALF_WIDTH,
                    y,
                    sz * LANE_HALF_LENGTH,
                ));
            }
        }
    }
    source.insert_mesh("Stage", lane);

    // Tapered pin standing on its base at the origin.
    let mut pin = Vec::new();
    for sx in [-1.0_f32, 1.0] {
        for sz in [-1.0_f32, 1.0] {
            pin.push(Vec3::new(sx * PIN_BASE_HALF, 0.0, sz * PIN_BASE_HALF));
            pin.push(Vec3::new(sx * PIN_TOP_HALF, PIN_HEIGHT, sz * PIN_TOP_HALF));
        }
    }
    source.insert_mesh("Pin", pin);

    // Standard 1-2-3-4 rack.
    let mut index = 0;
    for row in 0..4 {
        let count = row + 1;
        let x0 = -(count as f32 - 1.0) * PIN_SPACING * 0.5;
        for i in 0..count {
            source.insert_marker(
                format!("PinPos.{index:03}"),
                Vec3::new(
                    x0 + i as f32 * PIN_SPACING,
                    0.0,
                    RACK_Z + row as f32 * 0.26,
                ),
            );
            index += 1;
        }
    }
    source
}
