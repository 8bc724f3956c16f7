use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{EventTarget, HtmlCanvasElement, KeyboardEvent};

use torusflight_shared::frame;
use torusflight_shared::{FlightState, KeyEvent, SceneConfig, SceneDescription};
use torusflight_wgpu::Renderer;

use crate::events::{key_action, KEYDOWN, KEYUP};
use crate::viewport::Viewport;

/// Everything the listeners and the frame callback share.
struct Runtime {
    state: FlightState,
    scene: SceneDescription,
    renderer: Renderer,
}

/// Main application state for the WASM runtime.
#[wasm_bindgen]
pub struct App {
    runtime: Rc<RefCell<Runtime>>,
    canvas: HtmlCanvasElement,
}

#[wasm_bindgen]
impl App {
    /// Width of the canvas backing store.
    pub fn width(&self) -> u32 {
        self.canvas.width()
    }

    /// Height of the canvas backing store.
    pub fn height(&self) -> u32 {
        self.canvas.height()
    }

    /// Frames run so far.
    pub fn frame_index(&self) -> u64 {
        self.runtime.borrow().state.frame_index
    }
}

impl App {
    /// Size the canvas to the window and build the renderer and scene.
    pub async fn new(canvas_id: &str) -> Result<App, JsValue> {
        let window = web_sys::window().ok_or("No window")?;
        let document = window.document().ok_or("No document")?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or("Canvas not found")?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| "Element is not a canvas")?;

        // Read once; the page never resizes the canvas afterwards.
        let viewport = Viewport::new(
            window.inner_width()?.as_f64().unwrap_or(1.0),
            window.inner_height()?.as_f64().unwrap_or(1.0),
            window.device_pixel_ratio(),
        );
        let (width, height) = viewport.physical_size();
        canvas.set_width(width);
        canvas.set_height(height);
        let style = canvas.style();
        style.set_property("width", &format!("{}px", viewport.css_width))?;
        style.set_property("height", &format!("{}px", viewport.css_height))?;

        let config = SceneConfig::default();
        let scene = SceneDescription::build(&config);
        let state = FlightState::new(&config);

        let mut renderer = Renderer::new(wgpu::SurfaceTarget::Canvas(canvas.clone()), width, height)
            .await
            .map_err(|e| JsValue::from_str(&format!("Failed to create renderer: {e}")))?;
        renderer.upload_scene(&scene);

        log::info!(
            "Scene ready: {} stars, torus {} triangles, canvas {}x{} (dpr {})",
            scene.stars.len(),
            scene.torus.index_count() / 3,
            width,
            height,
            viewport.device_pixel_ratio,
        );

        Ok(App {
            runtime: Rc::new(RefCell::new(Runtime {
                state,
                scene,
                renderer,
            })),
            canvas,
        })
    }

    /// Register the keyboard listeners on `document` and schedule the first
    /// frame.
    pub fn start(&self) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("No window")?;
        let document = window.document().ok_or("No document")?;

        self.register_movement_listeners(&document)?;
        self.register_view_listener(&document)?;
        self.start_frame_loop()
    }

    fn register_movement_listeners(&self, target: &EventTarget) -> Result<(), JsValue> {
        for event_type in [KEYDOWN, KEYUP] {
            let runtime = Rc::clone(&self.runtime);
            let listener = Closure::<dyn FnMut(KeyboardEvent)>::new(move |event: KeyboardEvent| {
                let Some(action) = key_action(&event.type_()) else {
                    return;
                };
                let key = event.key();
                let response = runtime
                    .borrow_mut()
                    .state
                    .handle_movement_key(&KeyEvent { key: &key, action });
                if response.prevent_default {
                    event.prevent_default();
                }
            });
            target.add_event_listener_with_callback(
                event_type,
                listener.as_ref().unchecked_ref::<js_sys::Function>(),
            )?;
            // Lives as long as the page.
            listener.forget();
        }
        Ok(())
    }

    fn register_view_listener(&self, target: &EventTarget) -> Result<(), JsValue> {
        let runtime = Rc::clone(&self.runtime);
        let listener = Closure::<dyn FnMut(KeyboardEvent)>::new(move |event: KeyboardEvent| {
            let key = event.key();
            runtime.borrow_mut().state.handle_view_key(&KeyEvent::down(&key));
        });
        target.add_event_listener_with_callback(
            KEYDOWN,
            listener.as_ref().unchecked_ref::<js_sys::Function>(),
        )?;
        listener.forget();
        Ok(())
    }

    fn start_frame_loop(&self) -> Result<(), JsValue> {
        let callback: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));

        *callback.borrow_mut() = Some({
            let runtime = Rc::clone(&self.runtime);
            let callback = Rc::clone(&callback);
            Closure::new(move || {
                if let Some(next) = callback.borrow().as_ref() {
                    if let Err(e) = request_animation_frame(next) {
                        log::error!("Failed to schedule frame: {e:?}");
                    }
                }

                let mut runtime = runtime.borrow_mut();
                let Runtime {
                    state,
                    scene,
                    renderer,
                } = &mut *runtime;
                if let Err(e) = frame::run_frame(state, scene, renderer) {
                    log::error!("Frame {} failed: {e}", state.frame_index);
                }
            })
        });

        let first = callback.borrow();
        request_animation_frame(first.as_ref().ok_or("Frame loop not armed")?)?;
        Ok(())
    }
}

fn request_animation_frame(callback: &Closure<dyn FnMut()>) -> Result<i32, JsValue> {
    web_sys::window()
        .ok_or("No window")?
        .request_animation_frame(callback.as_ref().unchecked_ref::<js_sys::Function>())
}
