use glam::{Mat4, Vec3};

use crate::config::SceneConfig;
use crate::geometry::{self, LineMesh, Mesh};
use crate::math::rgb_linear;

/// Point light with inverse-square falloff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    /// Linear RGB.
    pub color: Vec3,
    pub intensity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    pub color: Vec3,
    pub intensity: f32,
}

/// Perspective projection parameters. Aspect comes from the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl Projection {
    pub fn matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, aspect, self.near, self.far)
    }
}

/// Everything that is built once at startup and stays fixed for the run.
/// The torus rotation is the only per-frame change and lives in
/// [`crate::state::FlightState`].
#[derive(Debug, Clone)]
pub struct SceneDescription {
    pub torus: Mesh,
    pub torus_color: Vec3,
    pub star_mesh: Mesh,
    pub star_color: Vec3,
    pub stars: Vec<Vec3>,
    pub point_light: PointLight,
    pub ambient_light: AmbientLight,
    pub grid: LineMesh,
    pub light_marker: LineMesh,
    pub projection: Projection,
}

impl SceneDescription {
    pub fn build(config: &SceneConfig) -> Self {
        let torus = geometry::torus(
            config.torus.radius,
            config.torus.tube,
            config.torus.radial_segments,
            config.torus.tubular_segments,
        );
        let star_mesh = geometry::sphere(
            config.stars.radius,
            config.stars.segments,
            config.stars.segments,
        );

        let mut rng = StarRng::new(config.stars.seed);
        let stars = (0..config.stars.count)
            .map(|_| {
                let x = rng.float_spread(config.stars.spread);
                let y = rng.float_spread(config.stars.spread);
                let z = rng.float_spread(config.stars.spread);
                Vec3::new(x, y, z)
            })
            .collect();

        let lights = &config.lights;
        let point_light = PointLight {
            position: Vec3::from_array(lights.point_position),
            color: Vec3::from_array(rgb_linear(lights.point_color)),
            intensity: lights.point_intensity,
        };
        let ambient_light = AmbientLight {
            color: Vec3::from_array(rgb_linear(lights.ambient_color)),
            intensity: lights.ambient_intensity,
        };

        let grid = geometry::grid(
            config.grid.size,
            config.grid.divisions,
            rgb_linear(config.grid.center_color),
            rgb_linear(config.grid.line_color),
        );
        let light_marker = geometry::light_marker(
            point_light.position,
            lights.helper_size,
            point_light.color.to_array(),
        );

        let scene = Self {
            torus,
            torus_color: Vec3::from_array(rgb_linear(config.torus.color)),
            star_mesh,
            star_color: Vec3::from_array(rgb_linear(config.stars.color)),
            stars,
            point_light,
            ambient_light,
            grid,
            light_marker,
            projection: Projection {
                fov_y: config.camera.fov_degrees.to_radians(),
                near: config.camera.near,
                far: config.camera.far,
            },
        };

        log::debug!(
            "Built scene: torus {} verts, {} stars, {} grid lines",
            scene.torus.vertex_count(),
            scene.stars.len(),
            scene.grid.segment_count(),
        );

        scene
    }

    /// Axis-aligned bounds of the star positions, or `None` without stars.
    pub fn star_bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = *self.stars.first()?;
        Some(
            self.stars
                .iter()
                .fold((first, first), |(lo, hi), &p| (lo.min(p), hi.max(p))),
        )
    }
}

/// xorshift32 generator used for star placement. Seeded so a given
/// configuration always produces the same sky.
#[derive(Debug, Clone)]
pub struct StarRng {
    state: u32,
}

impl StarRng {
    pub fn new(seed: u64) -> Self {
        let folded = (seed ^ (seed >> 32)) as u32;
        // xorshift never leaves the all-zero state.
        let state = if folded == 0 { 0x9E37_79B9 } else { folded };
        Self { state }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 17;
        self.state ^= self.state << 5;
        self.state
    }

    /// Uniform in `[0, 1)`.
    pub fn next_f32(&mut self) -> f32 {
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Uniform in `[-range / 2, range / 2)`.
    pub fn float_spread(&mut self, range: f32) -> f32 {
        range * (self.next_f32() - 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scene() {
        let scene = SceneDescription::build(&SceneConfig::default());
        assert_eq!(scene.stars.len(), 200);
        assert_eq!(scene.torus.vertex_count(), 17 * 101);
        assert_eq!(scene.point_light.position, Vec3::new(5.0, 15.0, 15.0));
        assert_eq!(scene.point_light.intensity, 1000.0);
        assert_eq!(scene.grid.segment_count(), 102);
        assert!((scene.projection.fov_y - 75f32.to_radians()).abs() < 1e-6);
    }

    #[test]
    fn test_stars_inside_spread() {
        let scene = SceneDescription::build(&SceneConfig::default());
        for star in &scene.stars {
            for c in star.to_array() {
                assert!((-50.0..50.0).contains(&c), "star coordinate {c} out of range");
            }
        }
        let (lo, hi) = scene.star_bounds().unwrap();
        // 200 uniform samples cover most of the cube.
        assert!(lo.max_element() < -30.0, "{lo:?}");
        assert!(hi.min_element() > 30.0, "{hi:?}");
    }

    #[test]
    fn test_star_placement_is_seeded() {
        let mut config = SceneConfig::default();
        let a = SceneDescription::build(&config);
        let b = SceneDescription::build(&config);
        assert_eq!(a.stars, b.stars);

        config.stars.seed += 1;
        let c = SceneDescription::build(&config);
        assert_ne!(a.stars, c.stars);
    }

    #[test]
    fn test_no_stars() {
        let mut config = SceneConfig::default();
        config.stars.count = 0;
        let scene = SceneDescription::build(&config);
        assert!(scene.stars.is_empty());
        assert!(scene.star_bounds().is_none());
    }

    #[test]
    fn test_rng_zero_seed_still_moves() {
        let mut rng = StarRng::new(0);
        let first = rng.next_u32();
        assert_ne!(first, 0);
        assert_ne!(rng.next_u32(), first);
    }

    #[test]
    fn test_rng_unit_range() {
        let mut rng = StarRng::new(42);
        for _ in 0..10_000 {
            let x = rng.next_f32();
            assert!((0.0..1.0).contains(&x));
        }
    }

    #[test]
    fn test_projection_maps_near_and_far_to_depth_range() {
        let projection = Projection {
            fov_y: 75f32.to_radians(),
            near: 0.1,
            far: 1000.0,
        };
        let m = projection.matrix(16.0 / 9.0);
        let near = m.project_point3(Vec3::new(0.0, 0.0, -0.1));
        let far = m.project_point3(Vec3::new(0.0, 0.0, -1000.0));
        assert!(near.z.abs() < 1e-4, "near depth {}", near.z);
        assert!((far.z - 1.0).abs() < 1e-4, "far depth {}", far.z);
    }
}
