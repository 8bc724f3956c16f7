use glam::Vec3;

use crate::config::SceneConfig;
use crate::flight::{self, CameraState, FlightParams};
use crate::input::{KeyAction, KeyEvent, KeyResponse, MovementFlags, TOGGLE_VIEW_KEY};
use crate::view::{self, HomePose, ViewMode};

/// All mutable application state. Owned by the host adapter and handed by
/// reference to the key handlers and the per-frame tick.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightState {
    pub flags: MovementFlags,
    pub camera: CameraState,
    pub view_mode: ViewMode,
    pub torus_rotation: Vec3,
    pub params: FlightParams,
    pub home: HomePose,
    /// Number of ticks run so far.
    pub frame_index: u64,
}

impl Default for FlightState {
    fn default() -> Self {
        Self::new(&SceneConfig::default())
    }
}

impl FlightState {
    /// Camera starts at the home position with zero rotation.
    pub fn new(config: &SceneConfig) -> Self {
        let home = HomePose::from_config(&config.camera);
        Self {
            flags: MovementFlags::new(),
            camera: CameraState::new(home.position),
            view_mode: ViewMode::default(),
            torus_rotation: Vec3::ZERO,
            params: FlightParams::from_config(&config.flight),
            home,
            frame_index: 0,
        }
    }

    /// Movement listener: press/release of the six flight keys.
    pub fn handle_movement_key(&mut self, event: &KeyEvent<'_>) -> KeyResponse {
        self.flags.apply(event)
    }

    /// View listener: `t` on key-down flips the view. Never asks for the
    /// default action to be suppressed.
    pub fn handle_view_key(&mut self, event: &KeyEvent<'_>) -> KeyResponse {
        if event.action == KeyAction::Down && event.key == TOGGLE_VIEW_KEY {
            self.toggle_view();
            return KeyResponse {
                prevent_default: false,
                view_toggled: true,
            };
        }
        KeyResponse::default()
    }

    /// Both listeners in registration order, for hosts with a single key
    /// callback.
    pub fn handle_key_event(&mut self, event: &KeyEvent<'_>) -> KeyResponse {
        let movement = self.handle_movement_key(event);
        let view = self.handle_view_key(event);
        movement.merge(view)
    }

    pub fn toggle_view(&mut self) {
        view::toggle_view(&mut self.camera, &mut self.view_mode, &self.home);
        log::debug!("View toggled to {}", self.view_mode.label());
    }

    /// One frame of simulation: camera motion from the held keys, then the
    /// decorative torus spin.
    pub fn tick(&mut self) {
        flight::integrate_camera(&mut self.camera, &self.flags, &self.params);
        flight::spin(&mut self.torus_rotation, self.params.torus_spin);
        self.frame_index += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_initial_state() {
        let state = FlightState::default();
        assert_eq!(state.camera.position, Vec3::new(0.0, 0.0, 30.0));
        assert_eq!(state.camera.rotation, Vec3::ZERO);
        assert_eq!(state.view_mode, ViewMode::Orbit);
        assert_eq!(state.frame_index, 0);
        assert!(!state.flags.any());
    }

    #[test]
    fn test_forward_tick() {
        let mut state = FlightState::default();
        state.handle_key_event(&KeyEvent::down("w"));
        state.tick();
        assert_eq!(state.camera.position.x, 0.0);
        assert!((state.camera.position.z - 29.9).abs() < EPSILON);
    }

    #[test]
    fn test_torus_spins_regardless_of_flags() {
        let mut idle = FlightState::default();
        let mut busy = FlightState::default();
        for key in ["w", "a", " ", "Shift"] {
            busy.handle_key_event(&KeyEvent::down(key));
        }

        for n in 1..=10 {
            let before = idle.torus_rotation.x;
            idle.tick();
            busy.tick();
            assert!((idle.torus_rotation.x - before - 0.01).abs() < EPSILON);
            assert_eq!(idle.torus_rotation, busy.torus_rotation);
            assert_eq!(idle.frame_index, n);
        }
        assert!((idle.torus_rotation - Vec3::new(0.1, 0.05, 0.1)).length() < EPSILON);
    }

    #[test]
    fn test_held_key_keeps_moving_until_released() {
        let mut state = FlightState::default();
        state.handle_key_event(&KeyEvent::down(" "));
        for _ in 0..5 {
            state.tick();
        }
        state.handle_key_event(&KeyEvent::up(" "));
        state.tick();
        state.tick();
        assert!((state.camera.position.y - 0.5).abs() < EPSILON);
    }

    #[test]
    fn test_movement_keys_request_suppression() {
        let mut state = FlightState::default();
        let response = state.handle_key_event(&KeyEvent::down("Shift"));
        assert!(response.prevent_default);
        assert!(!response.view_toggled);
        assert!(state.flags.down);
    }

    #[test]
    fn test_view_key_does_not_suppress() {
        let mut state = FlightState::default();
        let response = state.handle_key_event(&KeyEvent::down("t"));
        assert!(!response.prevent_default);
        assert!(response.view_toggled);
        assert_eq!(state.view_mode, ViewMode::Rocket);
        assert!(!state.flags.any());
    }

    #[test]
    fn test_view_key_release_is_ignored() {
        let mut state = FlightState::default();
        let response = state.handle_view_key(&KeyEvent::up("t"));
        assert_eq!(response, KeyResponse::default());
        assert_eq!(state.view_mode, ViewMode::Orbit);
    }

    #[test]
    fn test_toggle_resets_pose_after_flight() {
        let mut state = FlightState::default();
        state.handle_key_event(&KeyEvent::down("a"));
        state.handle_key_event(&KeyEvent::down("w"));
        for _ in 0..30 {
            state.tick();
        }
        assert!(state.camera.rotation.y > 1.0);

        state.handle_key_event(&KeyEvent::down("t"));
        let first = state.camera;
        assert_eq!(first.position, Vec3::new(0.0, 0.0, 30.0));
        assert!(first.rotation.length() < EPSILON);

        state.handle_key_event(&KeyEvent::down("t"));
        assert_eq!(state.view_mode, ViewMode::Orbit);
        assert_eq!(state.camera, first);
        // Held keys survive the toggle.
        assert!(state.flags.forward && state.flags.left);
    }

    #[test]
    fn test_toggle_from_home_above_target_resets_yaw() {
        let mut config = SceneConfig::default();
        config.camera.home = [0.0, 30.0, 0.0];
        let mut state = FlightState::new(&config);

        state.handle_key_event(&KeyEvent::down("a"));
        for _ in 0..10 {
            state.tick();
        }
        state.handle_key_event(&KeyEvent::down("t"));
        let first = state.camera;

        for _ in 0..10 {
            state.tick();
        }
        state.handle_key_event(&KeyEvent::down("t"));

        assert_eq!(state.camera, first);
        assert_eq!(first.position, Vec3::new(0.0, 30.0, 0.0));
        assert!(first.yaw().abs() < EPSILON, "yaw {}", first.yaw());
    }

    #[test]
    fn test_uppercase_key_is_ignored() {
        let mut state = FlightState::default();
        let response = state.handle_key_event(&KeyEvent::down("W"));
        assert_eq!(response, KeyResponse::default());
        state.tick();
        assert_eq!(state.camera.position, Vec3::new(0.0, 0.0, 30.0));
    }

    #[test]
    fn test_config_drives_params() {
        let mut config = SceneConfig::default();
        config.flight.speed = 2.0;
        config.camera.home = [1.0, 2.0, 3.0];
        let mut state = FlightState::new(&config);
        assert_eq!(state.camera.position, Vec3::new(1.0, 2.0, 3.0));
        state.handle_key_event(&KeyEvent::down(" "));
        state.tick();
        assert_eq!(state.camera.position.y, 4.0);
    }
}
