//! The per-frame update loop, decoupled from whatever schedules it.
//!
//! Hosts re-arm their frame primitive (`requestAnimationFrame`, a winit
//! redraw request) once per invocation and call [`run_frame`] from it. Tests
//! and headless tools pull frames from a [`FrameCounter`] instead.

use std::convert::Infallible;

use glam::{EulerRot, Mat4, Quat, Vec3};

use crate::flight::CameraState;
use crate::scene::SceneDescription;
use crate::state::FlightState;

/// Read-only snapshot handed to the renderer for one draw call.
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub scene: &'a SceneDescription,
    pub camera: &'a CameraState,
    pub torus_rotation: Vec3,
    pub frame_index: u64,
}

impl<'a> FrameView<'a> {
    pub fn new(scene: &'a SceneDescription, state: &'a FlightState) -> Self {
        Self {
            scene,
            camera: &state.camera,
            torus_rotation: state.torus_rotation,
            frame_index: state.frame_index,
        }
    }

    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        self.scene.projection.matrix(aspect) * self.camera.view_matrix()
    }

    pub fn torus_model(&self) -> Mat4 {
        let r = self.torus_rotation;
        Mat4::from_quat(Quat::from_euler(EulerRot::XYZ, r.x, r.y, r.z))
    }
}

/// Something that can draw a frame: the GPU renderer, or a recorder in tests.
pub trait DrawTarget {
    type Error;

    fn draw(&mut self, frame: &FrameView<'_>) -> Result<(), Self::Error>;
}

/// One invocation of the frame updater: tick, then exactly one draw.
pub fn run_frame<D: DrawTarget>(
    state: &mut FlightState,
    scene: &SceneDescription,
    target: &mut D,
) -> Result<(), D::Error> {
    state.tick();
    target.draw(&FrameView::new(scene, state))
}

/// Run one frame per item yielded by `frames`. Returns how many frames ran.
pub fn drive<D, I>(
    frames: I,
    state: &mut FlightState,
    scene: &SceneDescription,
    target: &mut D,
) -> Result<u64, D::Error>
where
    D: DrawTarget,
    I: IntoIterator<Item = u64>,
{
    let mut count = 0;
    for _ in frames {
        run_frame(state, scene, target)?;
        count += 1;
    }
    Ok(count)
}

/// Finite frame source yielding indices `0..limit`.
#[derive(Debug, Clone)]
pub struct FrameCounter {
    next: u64,
    limit: u64,
}

impl FrameCounter {
    pub fn new(limit: u64) -> Self {
        Self { next: 0, limit }
    }
}

impl Iterator for FrameCounter {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if self.next >= self.limit {
            return None;
        }
        let index = self.next;
        self.next += 1;
        Some(index)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        // `u64::MAX` frames does not fit a 32-bit `usize`.
        match usize::try_from(self.limit - self.next) {
            Ok(remaining) => (remaining, Some(remaining)),
            Err(_) => (usize::MAX, None),
        }
    }
}

/// Target that discards every frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTarget;

impl DrawTarget for NullTarget {
    type Error = Infallible;

    fn draw(&mut self, _frame: &FrameView<'_>) -> Result<(), Infallible> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SceneConfig;
    use crate::input::KeyEvent;

    #[derive(Default)]
    struct Recorder {
        frames: Vec<(u64, CameraState, Vec3)>,
    }

    impl DrawTarget for Recorder {
        type Error = Infallible;

        fn draw(&mut self, frame: &FrameView<'_>) -> Result<(), Infallible> {
            self.frames
                .push((frame.frame_index, *frame.camera, frame.torus_rotation));
            Ok(())
        }
    }

    struct FailAfter(u64);

    impl DrawTarget for FailAfter {
        type Error = String;

        fn draw(&mut self, frame: &FrameView<'_>) -> Result<(), String> {
            if frame.frame_index > self.0 {
                return Err(format!("frame {}", frame.frame_index));
            }
            Ok(())
        }
    }

    #[test]
    fn test_counter_yields_limit_frames() {
        let frames: Vec<u64> = FrameCounter::new(4).collect();
        assert_eq!(frames, [0, 1, 2, 3]);
        assert_eq!(FrameCounter::new(0).count(), 0);
        assert_eq!(FrameCounter::new(7).size_hint(), (7, Some(7)));
    }

    #[test]
    fn test_counter_size_hint_tracks_consumption() {
        let mut counter = FrameCounter::new(5);
        counter.next();
        counter.next();
        assert_eq!(counter.size_hint(), (3, Some(3)));
        counter.by_ref().for_each(drop);
        assert_eq!(counter.size_hint(), (0, Some(0)));
    }

    #[test]
    fn test_unbounded_counter_size_hint_is_consistent() {
        let (lower, upper) = FrameCounter::new(u64::MAX).size_hint();
        assert_eq!(lower, usize::MAX);
        if let Some(upper) = upper {
            assert_eq!(upper as u64, u64::MAX);
        }
    }

    #[test]
    fn test_one_draw_per_frame_after_tick() {
        let scene = SceneDescription::build(&SceneConfig::default());
        let mut state = FlightState::default();
        let mut recorder = Recorder::default();

        let ran = drive(FrameCounter::new(3), &mut state, &scene, &mut recorder).unwrap();
        assert_eq!(ran, 3);
        let indices: Vec<u64> = recorder.frames.iter().map(|f| f.0).collect();
        assert_eq!(indices, [1, 2, 3]);
        // The first draw already sees one frame of spin.
        assert!((recorder.frames[0].2.x - 0.01).abs() < 1e-6);
    }

    #[test]
    fn test_key_events_between_frames_apply_to_next_frame() {
        let scene = SceneDescription::build(&SceneConfig::default());
        let mut state = FlightState::default();
        let mut recorder = Recorder::default();

        run_frame(&mut state, &scene, &mut recorder).unwrap();
        state.handle_key_event(&KeyEvent::down("d"));
        run_frame(&mut state, &scene, &mut recorder).unwrap();
        state.handle_key_event(&KeyEvent::up("d"));
        run_frame(&mut state, &scene, &mut recorder).unwrap();

        let yaws: Vec<f32> = recorder.frames.iter().map(|f| f.1.rotation.y).collect();
        assert_eq!(yaws, [0.0, -0.05, -0.05]);
    }

    #[test]
    fn test_draw_error_stops_driving() {
        let scene = SceneDescription::build(&SceneConfig::default());
        let mut state = FlightState::default();
        let result = drive(FrameCounter::new(10), &mut state, &scene, &mut FailAfter(2));
        assert_eq!(result, Err("frame 3".to_string()));
        assert_eq!(state.frame_index, 3);
    }

    #[test]
    fn test_null_target_runs() {
        let scene = SceneDescription::build(&SceneConfig::default());
        let mut state = FlightState::default();
        let ran = drive(FrameCounter::new(60), &mut state, &scene, &mut NullTarget).unwrap();
        assert_eq!(ran, 60);
        assert_eq!(state.frame_index, 60);
    }

    #[test]
    fn test_home_view_proj_sees_torus_center() {
        let scene = SceneDescription::build(&SceneConfig::default());
        let state = FlightState::default();
        let frame = FrameView::new(&scene, &state);
        let clip = frame.view_proj(16.0 / 9.0).project_point3(Vec3::ZERO);
        assert!(clip.x.abs() < 1e-5 && clip.y.abs() < 1e-5);
        assert!(clip.z > 0.0 && clip.z < 1.0);
    }
}
