//! Gravity Paint entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlInputElement, HtmlSelectElement};

    use gravity_paint::Settings;
    use gravity_paint::renderer::{CanvasRenderer, build_scene};
    use gravity_paint::sim::{GravityPreset, PaintEdge, Shape, SimulationState, TickInput, tick};

    /// App instance holding all state
    struct App {
        state: SimulationState,
        renderer: CanvasRenderer,
        settings: Settings,
        /// Input accumulated since the last frame
        input: TickInput,
    }

    impl App {
        fn frame(&mut self, time: f64) {
            let input = std::mem::take(&mut self.input);
            let outcome = tick(&mut self.state, &input, time as u64);
            if outcome.merges > 0 || !outcome.collected.is_empty() {
                log::debug!(
                    "t={} merges={} collected={:?} particles={}",
                    self.state.now_ms,
                    outcome.merges,
                    outcome.collected,
                    self.state.particles.len()
                );
            }

            let scene = build_scene(&self.state);
            if let Err(e) = self.renderer.render(&scene) {
                log::warn!("Render error: {:?}", e);
            }
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        log::info!("Gravity Paint starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let canvas = document
            .get_element_by_id("game-canvas")
            .ok_or("missing #game-canvas")?
            .dyn_into::<HtmlCanvasElement>()?;

        let seed = js_sys::Date::now() as u64;
        let mut state = SimulationState::new(seed, 0);
        let settings = Settings::load();
        settings.apply(&mut state);
        show_settings(&document, &settings);
        log::info!("Session seed: {}", seed);

        let renderer = CanvasRenderer::new(
            canvas,
            state.tuning.width as u32,
            state.tuning.height as u32,
        )?;

        let app = Rc::new(RefCell::new(App {
            state,
            renderer,
            settings,
            input: TickInput::default(),
        }));

        setup_controls(&document, app.clone())?;
        request_animation_frame(app);

        log::info!("Gravity Paint running!");
        Ok(())
    }

    /// Register a listener on the element with `id`
    fn on<F>(document: &Document, id: &str, event: &str, handler: F) -> Result<(), JsValue>
    where
        F: FnMut(web_sys::Event) + 'static,
    {
        let element = document
            .get_element_by_id(id)
            .ok_or_else(|| JsValue::from_str(&format!("missing #{}", id)))?;
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web_sys::Event)>);
        element.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn input_value(document: &Document, id: &str) -> Option<String> {
        let el = document.get_element_by_id(id)?;
        if let Ok(input) = el.clone().dyn_into::<HtmlInputElement>() {
            return Some(input.value());
        }
        el.dyn_into::<HtmlSelectElement>().ok().map(|s| s.value())
    }

    fn set_input_value(document: &Document, id: &str, value: &str) {
        let Some(el) = document.get_element_by_id(id) else {
            log::warn!("missing #{}", id);
            return;
        };
        match el.dyn_into::<HtmlInputElement>() {
            Ok(input) => input.set_value(value),
            Err(el) => match el.dyn_into::<HtmlSelectElement>() {
                Ok(select) => select.set_value(value),
                Err(_) => log::warn!("#{} is not an input or select", id),
            },
        }
    }

    /// Make the controls show restored preferences
    fn show_settings(document: &Document, settings: &Settings) {
        for (id, value) in settings.control_values() {
            set_input_value(document, id, &value);
        }
    }

    fn setup_controls(document: &Document, app: Rc<RefCell<App>>) -> Result<(), JsValue> {
        {
            let app = app.clone();
            on(document, "tilt-left", "click", move |_| {
                app.borrow_mut().input.tilt_steps -= 1;
            })?;
        }
        {
            let app = app.clone();
            on(document, "tilt-right", "click", move |_| {
                app.borrow_mut().input.tilt_steps += 1;
            })?;
        }
        {
            let app = app.clone();
            on(document, "add-paint", "mousedown", move |_| {
                app.borrow_mut().input.paint = Some(PaintEdge::Down);
            })?;
        }
        {
            let app = app.clone();
            on(document, "add-paint", "mouseup", move |_| {
                app.borrow_mut().input.paint = Some(PaintEdge::Up);
            })?;
        }
        {
            let app = app.clone();
            let doc = document.clone();
            on(document, "color-picker", "input", move |_| {
                if let Some(hex) = input_value(&doc, "color-picker") {
                    let mut app = app.borrow_mut();
                    if let Ok(color) = hex.parse() {
                        app.settings.color = color;
                        app.settings.save();
                    }
                    app.input.color = Some(hex);
                }
            })?;
        }
        {
            let app = app.clone();
            let doc = document.clone();
            on(document, "size-slider", "input", move |_| {
                let Some(value) = input_value(&doc, "size-slider") else {
                    return;
                };
                if let Some(label) = doc.get_element_by_id("size-value") {
                    label.set_text_content(Some(&value));
                }
                match value.parse::<u32>() {
                    Ok(size) => app.borrow_mut().input.brush_size = Some(size),
                    Err(e) => log::warn!("Bad brush size '{}': {}", value, e),
                }
            })?;
        }
        {
            let app = app.clone();
            let doc = document.clone();
            on(document, "shape-select", "change", move |_| {
                let value = input_value(&doc, "shape-select").unwrap_or_default();
                match Shape::from_str(&value) {
                    Some(shape) => {
                        let mut app = app.borrow_mut();
                        app.input.shape = Some(shape);
                        app.settings.shape = shape;
                        app.settings.save();
                    }
                    None => log::warn!("Unknown shape '{}'", value),
                }
            })?;
        }
        {
            let app = app.clone();
            let doc = document.clone();
            on(document, "gravity-select", "change", move |_| {
                let value = input_value(&doc, "gravity-select").unwrap_or_default();
                let mut app = app.borrow_mut();
                if let Some(preset) = GravityPreset::from_str(&value) {
                    app.settings.gravity = preset;
                    app.settings.save();
                }
                // Unknown values are reported by the tick and ignored there
                app.input.preset = Some(value);
            })?;
        }
        {
            let app = app.clone();
            on(document, "save-btn", "click", move |_| {
                if let Err(e) = app.borrow().renderer.export_png() {
                    log::error!("Export failed: {:?}", e);
                }
            })?;
        }
        Ok(())
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        // A one-shot callback per frame; wasm-bindgen frees it after it runs
        let callback = Closure::once_into_js(move |time: f64| {
            app.borrow_mut().frame(time);
            request_animation_frame(app);
        });

        if let Some(window) = web_sys::window() {
            if let Err(e) = window.request_animation_frame(callback.unchecked_ref()) {
                log::error!("requestAnimationFrame failed: {:?}", e);
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_app::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {}

/// Headless run: paint a few strokes under changing gravity and report what
/// the simulation did.
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use gravity_paint::Tuning;
    use gravity_paint::sim::{PaintEdge, SimulationState, TickInput, tick};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let tuning = match std::env::var("GRAVITY_PAINT_TUNING") {
        Ok(path) => match std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|json| Tuning::from_json(&json).map_err(|e| e.to_string()))
        {
            Ok(tuning) => {
                log::info!("Using tuning from {}", path);
                tuning
            }
            Err(e) => {
                log::error!("Cannot load tuning from {}: {}", path, e);
                std::process::exit(1);
            }
        },
        Err(_) => Tuning::default(),
    };

    let seed = 2024;
    let mut state = SimulationState::with_tuning(seed, 0, tuning);
    log::info!("Gravity Paint (native, headless) seed = {}", seed);

    // ~60 fps for 30 seconds
    let frame_ms = 16;
    let frames = 30 * 1000 / frame_ms;
    let presets = ["earth", "moon", "jupiter", "earth"];
    let colors = ["#e63946", "#457b9d", "#2a9d8f", "#f4a261"];

    for frame in 0..frames {
        let now = frame * frame_ms;
        let second = now / 1000;
        let stroke = (second / 6) as usize % colors.len();
        let mut input = TickInput::default();

        // One 1.5 s stroke every 6 s, each with its own color and gravity
        if now % 6000 == 0 {
            input.paint = Some(PaintEdge::Down);
            input.color = Some(colors[stroke].to_string());
            input.preset = Some(presets[stroke % presets.len()].to_string());
        } else if now % 6000 == 1504 {
            input.paint = Some(PaintEdge::Up);
        }
        if frame % 240 == 120 {
            input.tilt_steps = if second % 2 == 0 { 1 } else { -1 };
        }

        let outcome = tick(&mut state, &input, now);
        for kind in &outcome.collected {
            log::info!("t={:>5} ms collected {:?}", now, kind);
        }

        if frame % 125 == 0 {
            let dry = state.particles.iter().filter(|p| p.is_dry()).count();
            log::info!(
                "t={:>5} ms particles={} dry={} power-ups={} gravity=({:.2}, {:.2}) mass={:.1}",
                now,
                state.particles.len(),
                dry,
                state.power_ups.len(),
                state.gravity.current().x,
                state.gravity.current().y,
                state.total_mass()
            );
        }
    }

    log::info!(
        "Done: {} ticks, {} particles, {} merges, {} power-ups collected",
        state.time_ticks,
        state.particles.len(),
        state.total_merges,
        state.total_collected
    );
}
