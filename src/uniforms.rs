//! Host-side packing of the fragment shader's uniform block.

use crate::config::ShaderParams;

pub const U_RESOLUTION: &str = "u_resolution";
pub const U_DATA: &str = "u_data";
pub const U_GEOMETRY_A: &str = "u_geometryA";
pub const U_GEOMETRY_B: &str = "u_geometryB";
pub const U_SUPPORT: &str = "u_support";
pub const U_RESEZ: &str = "u_resez";

pub const UNIFORM_NAMES: [&str; 6] =
    [U_RESOLUTION, U_DATA, U_GEOMETRY_A, U_GEOMETRY_B, U_SUPPORT, U_RESEZ];

/// Attribute carrying the quad corners.
pub const A_POSITION: &str = "a_position";

/// Two triangles covering clip space.
pub const QUAD_VERTICES: [f32; 12] = [
    -1.0, -1.0, 1.0, -1.0, -1.0, 1.0, //
    -1.0, 1.0, 1.0, -1.0, 1.0, 1.0,
];

/// Every uniform value for one draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformValues {
    pub resolution: [f32; 2],
    pub data: [f32; 4],
    pub geometry_a: [f32; 2],
    pub geometry_b: [f32; 3],
    pub support: [f32; 2],
    pub resez: [f32; 4],
}

impl UniformValues {
    pub fn new(params: &ShaderParams, width: u32, height: u32, geometry_b: [f32; 3]) -> Self {
        let size = [width as f32, height as f32];
        Self {
            resolution: size,
            data: params.data,
            geometry_a: size,
            geometry_b,
            support: params.support,
            resez: params.resez,
        }
    }

    /// New canvas size; everything else carries over.
    pub fn resized(self, width: u32, height: u32) -> Self {
        let size = [width as f32, height as f32];
        Self { resolution: size, geometry_a: size, ..self }
    }
}
