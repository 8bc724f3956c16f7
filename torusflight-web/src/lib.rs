//! torusflight WASM Web Runtime
//!
//! Renders the torus scene into a browser canvas with WebGPU (WebGL2 as a
//! fallback) and flies the camera from the keyboard: `w`/`s` forward and
//! back, `a`/`d` turn, space and shift up and down, `t` returns to the home
//! view.

#[cfg(target_arch = "wasm32")]
mod app;
mod events;
mod viewport;

pub use events::key_action;
pub use viewport::Viewport;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Entry point, called when the WASM module loads.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("torusflight web runtime initialized");
}

/// Build the app on the canvas with id `canvas_id` and start flying.
///
/// Called from JavaScript once the page has a canvas.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub async fn run(canvas_id: String) -> Result<app::App, JsValue> {
    let app = app::App::new(&canvas_id).await?;
    app.start()?;
    Ok(app)
}
