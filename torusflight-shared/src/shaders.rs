//! Embedded WGSL sources. Both pipelines bind [`crate::uniforms::FrameUniforms`]
//! at group 0, binding 0.

/// Lit instanced meshes: vertex slot 0 is [`crate::geometry::Vertex`], slot 1 is
/// [`crate::uniforms::InstanceRaw`] (locations 2..=6).
pub const SCENE_WGSL: &str = include_str!("../shaders/scene.wgsl");

/// World-space line lists of [`crate::geometry::LineVertex`].
pub const LINES_WGSL: &str = include_str!("../shaders/lines.wgsl");
