use std::path::Path;

use torusflight_shared::frame::{drive, NullTarget};
use torusflight_shared::{FlightState, FrameCounter, KeyEvent, Movement, SceneConfig, SceneDescription};

use crate::config::load_config;
use crate::keys::parse_key_name;

pub fn run(config: Option<&Path>, frames: u64, keys: &[String]) -> anyhow::Result<()> {
    let config = load_config(config)?;
    let state = simulate(&config, frames, keys);
    print!("{}", report(&state));
    Ok(())
}

/// Hold `keys` down and run `frames` ticks with no display attached.
pub fn simulate(config: &SceneConfig, frames: u64, keys: &[String]) -> FlightState {
    let scene = SceneDescription::build(config);
    let mut state = FlightState::new(config);

    for name in keys {
        let key = parse_key_name(name);
        if Movement::from_key(key).is_none() {
            log::warn!("Ignoring {name:?}: not a movement key");
            continue;
        }
        state.handle_movement_key(&KeyEvent::down(key));
    }

    let ran = drive(FrameCounter::new(frames), &mut state, &scene, &mut NullTarget)
        .unwrap_or_else(|never| match never {});
    log::debug!("Simulated {ran} frames");
    state
}

pub fn report(state: &FlightState) -> String {
    let p = state.camera.position;
    let r = state.camera.rotation;
    let t = state.torus_rotation;
    format!(
        "frames:          {}\n\
         position:        ({:.4}, {:.4}, {:.4})\n\
         rotation:        ({:.4}, {:.4}, {:.4})\n\
         yaw (degrees):   {:.2}\n\
         torus rotation:  ({:.4}, {:.4}, {:.4})\n\
         view:            {}\n",
        state.frame_index,
        p.x,
        p.y,
        p.z,
        r.x,
        r.y,
        r.z,
        state.camera.yaw().to_degrees(),
        t.x,
        t.y,
        t.z,
        state.view_mode.label(),
    )
}
