//! GPU buffer layouts. Must match the structs in the WGSL sources.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::scene::{AmbientLight, PointLight};

/// Per-frame uniforms (group 0, binding 0 in both shaders).
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct FrameUniforms {
    pub view_proj: [[f32; 4]; 4],
    /// xyz = light position, w unused.
    pub point_light_position: [f32; 4],
    /// rgb = linear colour, a = intensity.
    pub point_light_color: [f32; 4],
    /// rgb = linear colour, a = intensity.
    pub ambient_color: [f32; 4],
}

impl FrameUniforms {
    pub fn new(
        view_proj: Mat4,
        point_light: &PointLight,
        ambient: &AmbientLight,
    ) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            point_light_position: point_light.position.extend(1.0).to_array(),
            point_light_color: point_light.color.extend(point_light.intensity).to_array(),
            ambient_color: ambient.color.extend(ambient.intensity).to_array(),
        }
    }
}

/// Per-instance data for the lit pipeline: model matrix columns + colour.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct InstanceRaw {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
}

impl InstanceRaw {
    pub fn new(model: Mat4, color: Vec3) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            color: color.extend(1.0).to_array(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sizes_are_16_byte_multiples() {
        assert_eq!(std::mem::size_of::<FrameUniforms>(), 112);
        assert_eq!(std::mem::size_of::<InstanceRaw>(), 80);
        assert_eq!(std::mem::size_of::<FrameUniforms>() % 16, 0);
    }

    #[test]
    fn test_light_packing() {
        let point = PointLight {
            position: Vec3::new(5.0, 15.0, 15.0),
            color: Vec3::ONE,
            intensity: 1000.0,
        };
        let ambient = AmbientLight {
            color: Vec3::splat(0.5),
            intensity: 0.8,
        };
        let u = FrameUniforms::new(Mat4::IDENTITY, &point, &ambient);
        assert_eq!(u.point_light_color, [1.0, 1.0, 1.0, 1000.0]);
        assert_eq!(u.ambient_color, [0.5, 0.5, 0.5, 0.8]);
        assert_eq!(u.point_light_position, [5.0, 15.0, 15.0, 1.0]);
        assert_eq!(u.view_proj, Mat4::IDENTITY.to_cols_array_2d());
    }
}
