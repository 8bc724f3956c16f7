use glam::{Mat4, Vec3, Vec4, Vec4Swizzles};

/// Extract the 6 frustum planes of a view-projection matrix (Gribb-Hartmann),
/// for a `[0, 1]` clip-space depth range.
///
/// Each plane is `(a, b, c, d)` with `ax + by + cz + d >= 0` inside, and a unit
/// normal.
pub fn frustum_planes(view_proj: &Mat4) -> [Vec4; 6] {
    let rows = [
        view_proj.row(0),
        view_proj.row(1),
        view_proj.row(2),
        view_proj.row(3),
    ];

    let mut planes = [
        rows[3] + rows[0], // left
        rows[3] - rows[0], // right
        rows[3] + rows[1], // bottom
        rows[3] - rows[1], // top
        rows[2],           // near
        rows[3] - rows[2], // far
    ];

    for plane in &mut planes {
        let len = plane.xyz().length();
        if len > 1e-8 {
            *plane /= len;
        }
    }

    planes
}

/// True when a bounding sphere is inside or straddles the frustum.
pub fn sphere_in_frustum(planes: &[Vec4; 6], center: Vec3, radius: f32) -> bool {
    planes
        .iter()
        .all(|plane| plane.xyz().dot(center) + plane.w >= -radius)
}

/// Decode one sRGB channel to linear.
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Split a `0xRRGGBB` sRGB colour into linear RGB.
pub fn rgb_linear(hex: u32) -> [f32; 3] {
    let channel = |shift: u32| srgb_to_linear(((hex >> shift) & 0xFF) as f32 / 255.0);
    [channel(16), channel(8), channel(0)]
}
