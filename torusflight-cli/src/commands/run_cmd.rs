use std::path::Path;

use winit::dpi::PhysicalSize;
use winit::event_loop::{ControlFlow, EventLoop};

use crate::config::load_with_seed;
use crate::viewer::Viewer;

pub fn run(config: Option<&Path>, width: u32, height: u32, seed: Option<u64>) -> anyhow::Result<()> {
    let config = load_with_seed(config, seed)?;

    println!("Controls:");
    println!("  W / S    - Forward / back");
    println!("  A / D    - Turn left / right");
    println!("  Space    - Up");
    println!("  Shift    - Down");
    println!("  T        - Return to the home view");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut viewer = Viewer::new(&config, PhysicalSize::new(width.max(1), height.max(1)));
    event_loop.run_app(&mut viewer)?;

    match viewer.take_error() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
