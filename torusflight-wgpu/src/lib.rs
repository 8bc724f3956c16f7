//! torusflight wgpu backend.
//!
//! Shared by the browser runtime (WebGPU, falling back to WebGL2) and the
//! native viewer. Owns every GPU resource; the scene and flight state stay in
//! `torusflight-shared`.

mod backend;
mod handle;

pub use backend::{GpuMesh, RenderError, Renderer};
