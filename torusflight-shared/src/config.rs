//! Scene configuration.
//!
//! Every field has a default equal to the stock scene, so an empty TOML
//! document (or none at all) yields the stock torus, starfield and lights.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("camera fov must be in (0, 180) degrees, got {0}")]
    InvalidFov(f32),
    #[error("camera clip planes must satisfy 0 < near < far (near={near}, far={far})")]
    InvalidClipPlanes { near: f32, far: f32 },
    #[error("{what} needs at least {min} segments, got {got}")]
    TooFewSegments { what: &'static str, min: u32, got: u32 },
    #[error("{what} must be positive, got {value}")]
    NotPositive { what: &'static str, value: f32 },
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub camera: CameraConfig,
    pub flight: FlightConfig,
    pub torus: TorusConfig,
    pub stars: StarConfig,
    pub lights: LightConfig,
    pub grid: GridConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Start position, and the fixed point the view toggle returns to.
    pub home: [f32; 3],
    /// Point the view toggle orients the camera towards.
    pub look_at: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            home: [0.0, 0.0, 30.0],
            look_at: [0.0, 0.0, 0.0],
        }
    }
}

/// Per-frame motion constants. These are applied once per displayed frame,
/// not scaled by elapsed time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightConfig {
    pub speed: f32,
    pub rotation_speed: f32,
    pub torus_spin: [f32; 3],
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self {
            speed: 0.1,
            rotation_speed: 0.05,
            torus_spin: [0.01, 0.005, 0.01],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TorusConfig {
    pub radius: f32,
    pub tube: f32,
    pub radial_segments: u32,
    pub tubular_segments: u32,
    /// sRGB colour as 0xRRGGBB.
    pub color: u32,
}

impl Default for TorusConfig {
    fn default() -> Self {
        Self {
            radius: 10.0,
            tube: 3.0,
            radial_segments: 16,
            tubular_segments: 100,
            color: 0xFF6347,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarConfig {
    pub count: u32,
    pub radius: f32,
    pub segments: u32,
    /// Each coordinate is drawn uniformly from `[-spread / 2, spread / 2)`.
    pub spread: f32,
    pub seed: u64,
    pub color: u32,
}

impl Default for StarConfig {
    fn default() -> Self {
        Self {
            count: 200,
            radius: 0.25,
            segments: 24,
            spread: 100.0,
            seed: 0x7072_6f78_696d_61,
            color: 0xFFFFFF,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    pub point_position: [f32; 3],
    pub point_color: u32,
    /// Luminous intensity; falls off with the square of the distance.
    pub point_intensity: f32,
    pub ambient_color: u32,
    /// Unitless multiplier on the ambient colour; the three.js scene used 800
    /// in its physical light units, which this renderer would saturate.
    pub ambient_intensity: f32,
    /// Radius of the wire marker drawn at the point light.
    pub helper_size: f32,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            point_position: [5.0, 15.0, 15.0],
            point_color: 0xFFFFFF,
            point_intensity: 1000.0,
            ambient_color: 0xFFFFFF,
            ambient_intensity: 0.8,
            helper_size: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub size: f32,
    pub divisions: u32,
    pub center_color: u32,
    pub line_color: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            size: 200.0,
            divisions: 50,
            center_color: 0x444444,
            line_color: 0x888888,
        }
    }
}

impl SceneConfig {
    /// Reject values that would produce a degenerate projection or mesh.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let camera = &self.camera;
        if !(camera.fov_degrees > 0.0 && camera.fov_degrees < 180.0) {
            return Err(ConfigError::InvalidFov(camera.fov_degrees));
        }
        if !(camera.near > 0.0 && camera.near < camera.far) {
            return Err(ConfigError::InvalidClipPlanes {
                near: camera.near,
                far: camera.far,
            });
        }

        min_segments("torus radial", self.torus.radial_segments, 3)?;
        min_segments("torus tubular", self.torus.tubular_segments, 3)?;
        min_segments("star", self.stars.segments, 3)?;
        min_segments("grid", self.grid.divisions, 1)?;

        positive("torus radius", self.torus.radius)?;
        positive("torus tube", self.torus.tube)?;
        positive("star radius", self.stars.radius)?;
        positive("grid size", self.grid.size)?;
        Ok(())
    }
}

fn min_segments(what: &'static str, got: u32, min: u32) -> Result<(), ConfigError> {
    if got < min {
        return Err(ConfigError::TooFewSegments { what, min, got });
    }
    Ok(())
}

fn positive(what: &'static str, value: f32) -> Result<(), ConfigError> {
    if !(value > 0.0) {
        return Err(ConfigError::NotPositive { what, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_stock_scene() {
        let config = SceneConfig::default();
        assert_eq!(config.flight.speed, 0.1);
        assert_eq!(config.flight.rotation_speed, 0.05);
        assert_eq!(config.camera.home, [0.0, 0.0, 30.0]);
        assert_eq!(config.torus.color, 0xFF6347);
        assert_eq!(config.stars.count, 200);
        assert_eq!(config.grid.divisions, 50);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_ambient_intensity_is_unitless_factor() {
        let lights = LightConfig::default();
        assert_eq!(lights.ambient_intensity, 0.8);
        assert_eq!(lights.point_intensity, 1000.0);

        let config: SceneConfig = toml::from_str("[lights]\nambient_intensity = 800.0\n").unwrap();
        assert_eq!(config.lights.ambient_intensity, 800.0);
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config: SceneConfig = toml::from_str("").unwrap();
        assert_eq!(config, SceneConfig::default());
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config: SceneConfig = toml::from_str(
            "[stars]\ncount = 12\nseed = 7\n\n[torus]\ncolor = 0x00ff00\n",
        )
        .unwrap();
        assert_eq!(config.stars.count, 12);
        assert_eq!(config.stars.seed, 7);
        assert_eq!(config.stars.radius, 0.25);
        assert_eq!(config.torus.color, 0x00FF00);
        assert_eq!(config.torus.radius, 10.0);
        assert_eq!(config.camera, CameraConfig::default());
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = SceneConfig::default();
        config.flight.speed = 0.25;
        config.lights.point_position = [1.0, 2.0, 3.0];
        let text = toml::to_string(&config).unwrap();
        let back: SceneConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_rejects_bad_fov() {
        let mut config = SceneConfig::default();
        config.camera.fov_degrees = 0.0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidFov(0.0)));
        config.camera.fov_degrees = 180.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_inverted_clip_planes() {
        let mut config = SceneConfig::default();
        config.camera.near = 10.0;
        config.camera.far = 1.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidClipPlanes { .. })
        ));
    }

    #[test]
    fn test_rejects_zero_grid_divisions() {
        let mut config = SceneConfig::default();
        config.grid.divisions = 0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::TooFewSegments {
                what: "grid",
                min: 1,
                got: 0
            })
        );
    }

    #[test]
    fn test_rejects_nan_radius() {
        let mut config = SceneConfig::default();
        config.stars.radius = f32::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotPositive { what: "star radius", .. })
        ));
    }
}
