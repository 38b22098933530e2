//! Dodge Blast entry point
//!
//! The browser build wires the session to the canvas, DOM HUD, LocalStorage
//! and Web Audio. The native build runs a scripted headless session.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use dodge_blast::Session;
    use dodge_blast::audio::WebAudio;
    use dodge_blast::consts::*;
    use dodge_blast::persistence::LocalStore;
    use dodge_blast::renderer::{RenderState, build_scene, viewport_to_field};
    use dodge_blast::session::HudSnapshot;

    /// Game instance holding all state
    struct Game {
        session: Session<LocalStore, WebAudio>,
        render_state: Option<RenderState>,
        last_time: f64,
        last_hud: Option<HudSnapshot>,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            Self {
                session: Session::new(LocalStore::new(), WebAudio::new(), seed),
                render_state: None,
                last_time: 0.0,
                last_hud: None,
            }
        }

        fn render(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                let vertices = build_scene(self.session.state());
                match render_state.render(&vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Push score, buff timers and the game-over overlay into the DOM
        fn update_hud(&mut self) {
            let hud = self.session.hud();
            if self.last_hud.as_ref() == Some(&hud) {
                return;
            }
            let Some(document) = document() else { return };

            set_text(&document, "hud-score", &hud.score.to_string());
            set_text(&document, "hud-high-score", &hud.high_score.to_string());

            let buffs = hud
                .buffs
                .iter()
                .map(|(kind, ms)| format!("{} {:.1}s", kind.as_str(), ms / 1000.0))
                .collect::<Vec<_>>()
                .join("  ");
            set_text(&document, "hud-buffs", &buffs);

            if let Some(el) = document.get_element_by_id("game-over") {
                let _ = el.set_attribute("class", if hud.game_over { "" } else { "hidden" });
            }

            self.last_hud = Some(hud);
        }

        fn update_toggle_labels(&self) {
            let Some(document) = document() else { return };
            let settings = self.session.settings();
            set_text(
                &document,
                "auto-fire-toggle",
                &format!("Auto-fire: {}", on_off(settings.auto_fire)),
            );
            set_text(
                &document,
                "slow-shot-toggle",
                &format!("Slow shot drops: {}", on_off(settings.slow_shot_enabled)),
            );
            set_text(
                &document,
                "mute-toggle",
                &format!("Sound: {}", on_off(!settings.muted)),
            );
        }
    }

    fn on_off(enabled: bool) -> &'static str {
        if enabled { "on" } else { "off" }
    }

    fn document() -> Option<Document> {
        web_sys::window().and_then(|w| w.document())
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn new_seed() -> u64 {
        js_sys::Date::now() as u64
    }

    fn js_err(e: impl std::fmt::Display) -> JsValue {
        JsValue::from_str(&e.to_string())
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).map_err(js_err)?;

        log::info!("Dodge Blast starting...");

        let window = web_sys::window().ok_or_else(|| js_err("no window"))?;
        let document = window.document().ok_or_else(|| js_err("no document"))?;

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| js_err("no canvas"))?
            .dyn_into()?;

        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let seed = new_seed();
        let game = Rc::new(RefCell::new(Game::new(seed)));

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(js_err)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(js_err)?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height)
            .await
            .map_err(js_err)?;
        game.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(&canvas, game.clone());
        setup_restart_button(game.clone());
        setup_settings_toggles(game.clone());
        game.borrow().update_toggle_labels();

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        request_animation_frame(game);

        log::info!("Dodge Blast running!");
        Ok(())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };

        // Mouse move - absolute position mapped into field pixels
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let viewport = (
                    canvas_clone.client_width().max(0) as u32,
                    canvas_clone.client_height().max(0) as u32,
                );
                let (x, _) = viewport_to_field(
                    event.offset_x() as f32,
                    event.offset_y() as f32,
                    viewport,
                );
                game.borrow_mut().session.set_pointer_x(x);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Hold to fire
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().session.set_firing(true);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Release anywhere stops firing
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().session.set_firing(false);
            });
            let _ = window
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                if g.session.handle_key(&event.key(), new_seed()) {
                    event.prevent_default();
                    g.update_toggle_labels();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if game.borrow_mut().session.handle_key_up(&event.key()) {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt_ms = if g.last_time > 0.0 {
                time - g.last_time
            } else {
                SIM_DT_MS
            };
            g.last_time = time;

            g.session.frame(dt_ms);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }

    fn setup_restart_button(game: Rc<RefCell<Game>>) {
        let Some(document) = document() else { return };

        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                // The button only lives on the game-over overlay
                if g.session.state().is_game_over() {
                    g.session.restart(new_seed());
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_settings_toggles(game: Rc<RefCell<Game>>) {
        let Some(document) = document() else { return };

        if let Some(btn) = document.get_element_by_id("auto-fire-toggle") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.session.toggle_auto_fire();
                g.update_toggle_labels();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("mute-toggle") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.session.toggle_muted();
                g.update_toggle_labels();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("slow-shot-toggle") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.session.toggle_slow_shot();
                g.update_toggle_labels();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Startup failed: {:?}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use dodge_blast::persistence::FileStore;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(1);
    let store = FileStore::new(std::env::temp_dir().join("dodge-blast"));
    log::info!(
        "Dodge Blast (native) starting - headless run, seed {}, store {}",
        seed,
        store.dir().display()
    );

    headless::run(store, seed);
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use dodge_blast::Session;
    use dodge_blast::audio::NullAudio;
    use dodge_blast::consts::*;
    use dodge_blast::persistence::Store;

    /// Longest scripted run before giving up (seconds)
    const MAX_SECONDS: u32 = 300;
    /// Period of the pointer sweep across the field (ms)
    const SWEEP_PERIOD_MS: f64 = 3000.0;

    /// Sweep the ship back and forth while holding fire until the run ends
    pub fn run<S: Store>(store: S, seed: u64) {
        let mut session = Session::new(store, NullAudio, seed);
        session.set_firing(true);

        let half_travel = (FIELD_WIDTH - PLAYER_SIZE) / 2.0;
        let mut elapsed_ms = 0.0;
        for _ in 0..MAX_SECONDS * 60 {
            let phase = elapsed_ms / SWEEP_PERIOD_MS * std::f64::consts::TAU;
            session.set_pointer_x(FIELD_WIDTH / 2.0 + half_travel * phase.sin() as f32);
            session.frame(SIM_DT_MS);
            elapsed_ms += SIM_DT_MS;
            if session.state().is_game_over() {
                break;
            }
        }

        let state = session.state();
        let stats = &state.stats;
        println!("Seed:            {}", seed);
        println!("Survived:        {:.1}s", state.time_ms() / 1000.0);
        println!("Score:           {}", state.score);
        println!("High score:      {}", state.high_score);
        println!("Kills / misses:  {} / {}", stats.kills, stats.misses);
        println!("Shots fired:     {}", stats.shots_fired);
        println!("Power-ups:       {}", stats.powerups_collected);
        println!("Enemy speed:     x{:.2}", state.difficulty.multiplier());
        if !state.is_game_over() {
            println!("(stopped after {}s)", MAX_SECONDS);
        }
    }
}
