//! torusflight shared core
//!
//! Everything that does not touch a window or a GPU: keyboard flag tracking,
//! per-frame camera integration, the view toggle, the scene description built
//! from configuration, mesh generation, GPU uniform layouts and WGSL sources.
//! Both the browser runtime and the native viewer drive the same
//! [`state::FlightState`] through [`frame::run_frame`].

pub mod config;
pub mod flight;
pub mod frame;
pub mod geometry;
pub mod input;
pub mod math;
pub mod scene;
pub mod shaders;
pub mod state;
pub mod uniforms;
pub mod view;

pub use config::SceneConfig;
pub use frame::{DrawTarget, FrameCounter, FrameView};
pub use input::{KeyAction, KeyEvent, KeyResponse, Movement, MovementFlags};
pub use scene::SceneDescription;
pub use state::FlightState;
pub use view::ViewMode;
