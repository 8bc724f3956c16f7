use glam::Vec3;

use crate::config::CameraConfig;
use crate::flight::CameraState;

/// The two named camera views.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    Orbit,
    Rocket,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Orbit => ViewMode::Rocket,
            ViewMode::Rocket => ViewMode::Orbit,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ViewMode::Orbit => "orbit",
            ViewMode::Rocket => "rocket",
        }
    }
}

/// Fixed point the view toggle puts the camera back to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HomePose {
    pub position: Vec3,
    pub target: Vec3,
}

impl HomePose {
    pub fn from_config(config: &CameraConfig) -> Self {
        Self {
            position: Vec3::from_array(config.home),
            target: Vec3::from_array(config.look_at),
        }
    }
}

impl Default for HomePose {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}

/// Place the camera for the view being left and flip the mode.
///
/// Both views currently use the same home pose, so the only lasting effect
/// besides the flag flip is that position and orientation are reset.
pub fn toggle_view(camera: &mut CameraState, mode: &mut ViewMode, home: &HomePose) {
    let pose = match *mode {
        ViewMode::Rocket => home,
        ViewMode::Orbit => home,
    };
    camera.position = pose.position;
    camera.look_at(pose.target);
    *mode = mode.toggled();
}
