//! Per-frame animation inputs and CPU mirrors of the triangle shaders' math.

use glam::{Mat3, Vec3, Vec4};

/// Uniform values pushed once per frame. Derived from the clock, never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameUniforms {
    /// Radians about Z, read by the vertex stage.
    pub rotation: f32,
    /// Seconds, read by the fragment stage.
    pub time: f32,
}

impl FrameUniforms {
    pub fn at(elapsed_seconds: f32) -> Self {
        Self {
            rotation: elapsed_seconds,
            time: elapsed_seconds,
        }
    }
}

/// `[[c, -s, 0], [s, c, 0], [0, 0, 1]]`.
pub fn rotation_matrix(angle: f32) -> Mat3 {
    let (s, c) = angle.sin_cos();
    Mat3::from_cols(
        Vec3::new(c, s, 0.0),
        Vec3::new(-s, c, 0.0),
        Vec3::new(0.0, 0.0, 1.0),
    )
}

/// Clip-space position the vertex stage emits for `position`.
pub fn transform_vertex(position: Vec3, rotation: f32) -> Vec4 {
    (rotation_matrix(rotation) * position).extend(1.0)
}

/// Color the fragment stage emits. Red and green range over [-1, 1].
pub fn fragment_color(time: f32) -> Vec4 {
    Vec4::new(
        time.sin(),
        time.cos(),
        0.5 + 0.5 * (2.0 * time).sin(),
        1.0,
    )
}
