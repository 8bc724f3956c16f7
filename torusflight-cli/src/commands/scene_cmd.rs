use std::fmt::Write as _;
use std::path::Path;

use torusflight_shared::SceneDescription;

use crate::config::load_with_seed;

pub fn run(config: Option<&Path>, seed: Option<u64>) -> anyhow::Result<()> {
    let config = load_with_seed(config, seed)?;
    let scene = SceneDescription::build(&config);
    print!("{}", summary(&scene));
    Ok(())
}

pub fn summary(scene: &SceneDescription) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "torus:        {} vertices, {} triangles",
        scene.torus.vertex_count(),
        scene.torus.index_count() / 3
    );
    let _ = writeln!(
        out,
        "star mesh:    {} vertices, {} triangles",
        scene.star_mesh.vertex_count(),
        scene.star_mesh.index_count() / 3
    );
    let _ = writeln!(out, "stars:        {}", scene.stars.len());
    match scene.star_bounds() {
        Some((lo, hi)) => {
            let _ = writeln!(
                out,
                "star bounds:  ({:.2}, {:.2}, {:.2}) .. ({:.2}, {:.2}, {:.2})",
                lo.x, lo.y, lo.z, hi.x, hi.y, hi.z
            );
        }
        None => {
            let _ = writeln!(out, "star bounds:  none");
        }
    }
    let _ = writeln!(out, "grid lines:   {}", scene.grid.segment_count());
    let light = scene.point_light.position;
    let _ = writeln!(
        out,
        "point light:  ({}, {}, {}) intensity {}",
        light.x, light.y, light.z, scene.point_light.intensity
    );
    out
}
