//! Arcade Classics entry point
//!
//! The browser build runs the selected game on a WebGPU canvas. The native
//! build is a headless runner for smoke-testing games from the command line.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, HtmlElement, KeyboardEvent, MouseEvent, WheelEvent};

    use arcade_classics::consts::SIM_DT;
    use arcade_classics::games::{Game, GameId, advance_frame};
    use arcade_classics::platform::{FixedTimestep, FpsCounter, InputState, Key, MouseButton};
    use arcade_classics::renderer::{DrawList, RenderState, colors, letterbox, tessellate, text_overlay_html};
    use arcade_classics::{ArcadeError, Result, Settings};

    #[wasm_bindgen(inline_js = "
        export function request_pointer_lock() {
            const canvas = document.getElementById('canvas');
            if (canvas && document.pointerLockElement !== canvas) {
                const result = canvas.requestPointerLock();
                if (result && result.catch) {
                    result.catch(e => console.warn('Pointer lock failed:', e));
                }
            }
        }
    ")]
    extern "C" {
        fn request_pointer_lock();
    }

    /// Keys whose browser default (scrolling, focus moves) is suppressed
    const CAPTURED_KEYS: [Key; 7] = [Key::Space, Key::Up, Key::Down, Key::Left, Key::Right, Key::Enter, Key::Escape];

    /// One running game plus everything the browser loop needs around it
    struct Runner {
        game: Box<dyn Game>,
        render_state: Option<RenderState>,
        clock: FixedTimestep,
        input: InputState,
        list: DrawList,
        fps: FpsCounter,
        show_fps: bool,
        last_time: f64,
        /// Canvas size in CSS pixels
        css_size: (f32, f32),
    }

    impl Runner {
        fn new(game: Box<dyn Game>, show_fps: bool) -> Self {
            Self {
                game,
                render_state: None,
                clock: FixedTimestep::default(),
                input: InputState::default(),
                list: DrawList::new(),
                fps: FpsCounter::default(),
                show_fps,
                last_time: 0.0,
                css_size: (0.0, 0.0),
            }
        }

        fn logical_size(&self) -> (f32, f32) {
            let (w, h) = self.game.screen_size();
            (w as f32, h as f32)
        }

        /// CSS pixels relative to the canvas to game pixels
        fn to_game(&self, css: Vec2) -> Vec2 {
            let (scale, offset) = letterbox(self.logical_size(), self.css_size);
            (css - offset) / scale
        }

        fn update(&mut self, dt: f32, time: f64) {
            advance_frame(self.game.as_mut(), &mut self.input, &mut self.clock, dt);
            self.fps.record(time);
        }

        fn render(&mut self) {
            self.list.reset();
            self.game.draw(&mut self.list);
            let (lw, lh) = self.logical_size();
            let vertices = tessellate(&self.list, Vec2::new(lw, lh));
            let clear = self.list.clear_color().unwrap_or(colors::BLACK);

            if let Some(render_state) = self.render_state.as_mut() {
                match render_state.render(&vertices, clear) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {e:?}"),
                }
            }
        }

        /// Rebuild the DOM text layer from this frame's text commands
        fn update_overlay(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let (scale, offset) = letterbox(self.logical_size(), self.css_size);
            if let Some(el) = document.get_element_by_id("overlay") {
                el.set_inner_html(&text_overlay_html(&self.list, scale, offset));
            }
            if let Some(el) = document.get_element_by_id("fps") {
                let text = if self.show_fps {
                    format!("{} FPS", self.fps.fps())
                } else {
                    String::new()
                };
                el.set_text_content(Some(&text));
            }
        }
    }

    /// `?game=<name>` from the page URL
    fn game_from_query() -> Option<GameId> {
        let search = web_sys::window()?.location().search().ok()?;
        let params = web_sys::UrlSearchParams::new_with_str(&search).ok()?;
        let name = params.get("game")?;
        match GameId::parse(&name) {
            Ok(id) => Some(id),
            Err(e) => {
                log::warn!("{e}");
                None
            }
        }
    }

    fn js_err(context: &'static str) -> impl Fn(JsValue) -> ArcadeError {
        move |e| ArcadeError::Renderer(format!("{context}: {e:?}"))
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        if let Err(e) = start().await {
            log::error!("Arcade Classics failed to start: {e}");
            if let Some(el) = web_sys::window()
                .and_then(|w| w.document())
                .and_then(|d| d.get_element_by_id("loading"))
            {
                el.set_text_content(Some(&format!("Failed to start: {e}")));
            }
        }
    }

    async fn start() -> Result<()> {
        let window = web_sys::window().ok_or_else(|| ArcadeError::Renderer("no window".into()))?;
        let document = window
            .document()
            .ok_or_else(|| ArcadeError::Renderer("no document".into()))?;

        let mut settings = Settings::load();
        if let Some(id) = game_from_query() {
            settings.game = id;
            settings.save();
        }
        let seed = settings.seed_or(js_sys::Date::now() as u64);
        let game = settings.game.create(seed)?;
        log::info!("Starting {} with seed {seed}", game.title());
        document.set_title(game.title());

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| ArcadeError::Renderer("no canvas".into()))?
            .dyn_into()
            .map_err(|_| ArcadeError::Renderer("#canvas is not a canvas".into()))?;

        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width();
        let client_h = canvas.client_height();
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        if let Some(overlay) = document
            .get_element_by_id("overlay")
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        {
            let style = overlay.style();
            let _ = style.set_property("width", &format!("{client_w}px"));
            let _ = style.set_property("height", &format!("{client_h}px"));
        }

        let runner = Rc::new(RefCell::new(Runner::new(game, settings.show_fps)));
        runner.borrow_mut().css_size = (client_w as f32, client_h as f32);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });
        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| ArcadeError::Renderer(format!("surface: {e}")))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| ArcadeError::Renderer(format!("adapter: {e}")))?;
        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let logical = runner.borrow().logical_size();
        let render_state = RenderState::new(surface, &adapter, width, height, logical).await?;
        runner.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(&canvas, runner.clone())?;
        setup_focus_loss(runner.clone());
        request_animation_frame(runner);
        Ok(())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, runner: Rc<RefCell<Runner>>) -> Result<()> {
        let window = web_sys::window().ok_or_else(|| ArcadeError::Renderer("no window".into()))?;

        // Keyboard
        {
            let runner = runner.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(key) = Key::from_code(&event.code()) {
                    if CAPTURED_KEYS.contains(&key) {
                        event.prevent_default();
                    }
                    runner.borrow_mut().input.press(key);
                }
            });
            window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())
                .map_err(js_err("keydown"))?;
            closure.forget();
        }
        {
            let runner = runner.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(key) = Key::from_code(&event.code()) {
                    runner.borrow_mut().input.release(key);
                }
            });
            window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())
                .map_err(js_err("keyup"))?;
            closure.forget();
        }

        // Mouse move: absolute position for aiming, movementX/Y for mouse look
        {
            let runner = runner.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut r = runner.borrow_mut();
                let pos = r.to_game(Vec2::new(event.offset_x() as f32, event.offset_y() as f32));
                let delta = Vec2::new(event.movement_x() as f32, event.movement_y() as f32);
                r.input.mouse_moved(pos, delta);
            });
            canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())
                .map_err(js_err("mousemove"))?;
            closure.forget();
        }

        // Mouse buttons; mouse-look games also take the pointer
        {
            let runner = runner.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut r = runner.borrow_mut();
                if matches!(r.game.id(), GameId::PhysicsSandbox | GameId::Explorer3d) {
                    request_pointer_lock();
                }
                if let Some(button) = MouseButton::from_dom(event.button()) {
                    event.prevent_default();
                    r.input.press_button(button);
                }
            });
            canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())
                .map_err(js_err("mousedown"))?;
            closure.forget();
        }
        {
            let runner = runner.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                if let Some(button) = MouseButton::from_dom(event.button()) {
                    runner.borrow_mut().input.release_button(button);
                }
            });
            window
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref())
                .map_err(js_err("mouseup"))?;
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                event.prevent_default();
            });
            canvas
                .add_event_listener_with_callback("contextmenu", closure.as_ref().unchecked_ref())
                .map_err(js_err("contextmenu"))?;
            closure.forget();
        }

        // Wheel: one notch per event, positive away from the user
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: WheelEvent| {
                event.prevent_default();
                let dy = event.delta_y();
                if dy != 0.0 {
                    runner.borrow_mut().input.wheel_moved(-dy.signum() as f32);
                }
            });
            canvas
                .add_event_listener_with_callback("wheel", closure.as_ref().unchecked_ref())
                .map_err(js_err("wheel"))?;
            closure.forget();
        }
        Ok(())
    }

    /// Release held input when the page loses focus
    fn setup_focus_loss(runner: Rc<RefCell<Runner>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        {
            let runner = runner.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    runner.borrow_mut().input.release_all();
                    log::info!("Input released (tab hidden)");
                }
            });
            let _ = document.add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                runner.borrow_mut().input.release_all();
                log::info!("Input released (window blur)");
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(runner: Rc<RefCell<Runner>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(runner, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(runner: Rc<RefCell<Runner>>, time: f64) {
        {
            let mut r = runner.borrow_mut();
            let dt = if r.last_time > 0.0 {
                ((time - r.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            r.last_time = time;

            r.update(dt, time);
            r.render();
            r.update_overlay();
        }

        request_animation_frame(runner);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::time::{SystemTime, UNIX_EPOCH};

    use glam::Vec2;

    use arcade_classics::games::{GameId, run_unattended};
    use arcade_classics::platform::Key;
    use arcade_classics::renderer::{DrawList, tessellate};
    use arcade_classics::settings::Command;
    use arcade_classics::{Result, Settings};

    pub fn run(args: &[String]) -> Result<()> {
        let mut settings = match Settings::config_path(args) {
            Some(path) => Settings::load_from_path(std::path::Path::new(path))?,
            None => Settings::load(),
        };

        if settings.apply_args(args)? == Command::List {
            for id in GameId::ALL {
                println!("{:<20} {}", id.as_str(), id.title());
            }
            return Ok(());
        }

        let clock_seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        let seed = settings.seed_or(clock_seed);
        let mut game = settings.game.create(seed)?;
        log::info!(
            "Running {} headless for {} frames (seed {seed})",
            game.title(),
            settings.headless_frames
        );

        let (w, h) = game.screen_size();
        let screen = Vec2::new(w as f32, h as f32);
        let mut list = DrawList::new();
        let steps = run_unattended(
            game.as_mut(),
            Key::Space,
            settings.headless_frames,
            settings.frame_dt,
            |frame, game| {
                list.reset();
                game.draw(&mut list);
                let vertices = tessellate(&list, screen);
                if frame % 60 == 0 {
                    log::debug!(
                        "frame {frame}: {} commands, {} vertices, {}",
                        list.len(),
                        vertices.len(),
                        game.summary()
                    );
                }
            },
        );

        log::info!(
            "{} frames, {steps} steps, {} draw commands in the last frame",
            settings.headless_frames,
            list.len()
        );
        println!("{}: {}", game.title(), game.summary());
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(e) = headless::run(&args) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The wasm entry point is `wasm_main`
}
