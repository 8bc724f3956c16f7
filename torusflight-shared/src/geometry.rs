//! Procedural meshes for the scene: torus, star sphere, ground grid and the
//! point-light marker.

use std::f32::consts::{PI, TAU};

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// Lit mesh vertex.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// Unlit line vertex.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

/// Indexed triangle list.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Radius of the smallest origin-centred sphere containing the mesh.
    pub fn bounding_radius(&self) -> f32 {
        self.vertices
            .iter()
            .map(|v| Vec3::from_array(v.position).length())
            .fold(0.0, f32::max)
    }
}

/// Non-indexed line list: every two vertices form one segment.
#[derive(Debug, Clone, Default)]
pub struct LineMesh {
    pub vertices: Vec<LineVertex>,
}

impl LineMesh {
    pub fn segment_count(&self) -> usize {
        self.vertices.len() / 2
    }

    fn push_segment(&mut self, a: Vec3, b: Vec3, color: [f32; 3]) {
        self.vertices.push(LineVertex {
            position: a.to_array(),
            color,
        });
        self.vertices.push(LineVertex {
            position: b.to_array(),
            color,
        });
    }
}

/// Torus in the XY plane around the Z axis.
///
/// `radius` is the distance from the centre to the middle of the tube, `tube`
/// the tube radius. Produces `(radial + 1) * (tubular + 1)` vertices so the
/// seams carry duplicated positions.
pub fn torus(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> Mesh {
    let mut mesh = Mesh::default();

    for j in 0..=radial_segments {
        let v = j as f32 / radial_segments as f32 * TAU;
        for i in 0..=tubular_segments {
            let u = i as f32 / tubular_segments as f32 * TAU;

            let ring = radius + tube * v.cos();
            let position = Vec3::new(ring * u.cos(), ring * u.sin(), tube * v.sin());
            let center = Vec3::new(radius * u.cos(), radius * u.sin(), 0.0);
            let normal = (position - center).normalize_or_zero();

            mesh.vertices.push(Vertex {
                position: position.to_array(),
                normal: normal.to_array(),
            });
        }
    }

    let row = tubular_segments + 1;
    for j in 1..=radial_segments {
        for i in 1..=tubular_segments {
            let a = row * j + i - 1;
            let b = row * (j - 1) + i - 1;
            let c = row * (j - 1) + i;
            let d = row * j + i;
            mesh.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    mesh
}

/// UV sphere centred on the origin. Pole rows emit one triangle per quad.
pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Mesh {
    let mut mesh = Mesh::default();
    let row = width_segments + 1;

    for iy in 0..=height_segments {
        let v = iy as f32 / height_segments as f32;
        for ix in 0..=width_segments {
            let u = ix as f32 / width_segments as f32;
            let normal = Vec3::new(
                -(u * TAU).cos() * (v * PI).sin(),
                (v * PI).cos(),
                (u * TAU).sin() * (v * PI).sin(),
            );
            mesh.vertices.push(Vertex {
                position: (normal * radius).to_array(),
                normal: normal.normalize_or_zero().to_array(),
            });
        }
    }

    for iy in 0..height_segments {
        for ix in 0..width_segments {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;
            if iy != 0 {
                mesh.indices.extend_from_slice(&[a, b, d]);
            }
            if iy != height_segments - 1 {
                mesh.indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    mesh
}

/// Square grid on the XZ plane. The middle line in each direction uses
/// `center_color` when `divisions` is even.
pub fn grid(size: f32, divisions: u32, center_color: [f32; 3], line_color: [f32; 3]) -> LineMesh {
    let mut lines = LineMesh::default();
    let half = size / 2.0;
    let step = size / divisions as f32;
    let center = divisions / 2;

    for i in 0..=divisions {
        let k = -half + i as f32 * step;
        let color = if divisions % 2 == 0 && i == center {
            center_color
        } else {
            line_color
        };
        lines.push_segment(Vec3::new(-half, 0.0, k), Vec3::new(half, 0.0, k), color);
        lines.push_segment(Vec3::new(k, 0.0, -half), Vec3::new(k, 0.0, half), color);
    }

    lines
}

/// Wire octahedron marking a point light.
pub fn light_marker(center: Vec3, size: f32, color: [f32; 3]) -> LineMesh {
    let mut lines = LineMesh::default();
    let top = center + Vec3::Y * size;
    let bottom = center - Vec3::Y * size;
    let ring = [
        center + Vec3::X * size,
        center + Vec3::Z * size,
        center - Vec3::X * size,
        center - Vec3::Z * size,
    ];

    for (i, &p) in ring.iter().enumerate() {
        let next = ring[(i + 1) % ring.len()];
        lines.push_segment(p, next, color);
        lines.push_segment(p, top, color);
        lines.push_segment(p, bottom, color);
    }

    lines
}
