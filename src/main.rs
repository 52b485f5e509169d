//! Taxman Runner entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement, KeyboardEvent};

    use taxman_runner::GameConfig;
    use taxman_runner::consts::*;
    use taxman_runner::renderer::{NodeId, NodeKind, RetainedScene, SceneBinder, colors};
    use taxman_runner::sim::{GameEvent, GameSession, TickInput, tick};

    /// Game instance holding all state
    struct Game {
        config: GameConfig,
        session: GameSession,
        scene: RetainedScene,
        binder: SceneBinder<NodeId>,
        ctx: CanvasRenderingContext2d,
        /// `<img id="sprite-...">` lookups, cached per element id
        images: HashMap<String, Option<HtmlImageElement>>,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        /// Jump pressed since the last tick (catches taps shorter than a frame)
        jump_latched: bool,
    }

    impl Game {
        fn new(config: GameConfig, seed: u64, ctx: CanvasRenderingContext2d) -> Self {
            Self {
                session: GameSession::new(config.clone(), seed),
                config,
                scene: RetainedScene::new(),
                binder: SceneBinder::new(),
                ctx,
                images: HashMap::new(),
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
                jump_latched: false,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;
            let step = self.session.dt();

            let mut substeps = 0;
            while self.accumulator >= step && substeps < MAX_SUBSTEPS {
                let mut input = self.input.clone();
                input.jump |= self.jump_latched;
                tick(&mut self.session, &input);
                self.accumulator -= step;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.jump_latched = false;
            }

            for event in self.session.drain_events() {
                if let GameEvent::GameOver { score } = event {
                    log::info!("Final score: {}", score);
                }
            }

            self.binder.sync(&self.session, &mut self.scene);
        }

        fn image(&mut self, element_id: String) -> Option<HtmlImageElement> {
            self.images
                .entry(element_id)
                .or_insert_with_key(|id| {
                    web_sys::window()
                        .and_then(|w| w.document())
                        .and_then(|d| d.get_element_by_id(id))
                        .and_then(|el| el.dyn_into::<HtmlImageElement>().ok())
                })
                .clone()
        }

        /// Render the current frame
        fn render(&mut self) {
            let width = self.session.config.viewport_width as f64;
            let height = self.session.config.viewport_height as f64;
            self.ctx.set_fill_style_str(colors::BACKGROUND);
            self.ctx.fill_rect(0.0, 0.0, width, height);

            let draw_list: Vec<_> = self
                .scene
                .draw_list()
                .into_iter()
                .map(|(_, node)| node.clone())
                .collect();

            for node in draw_list {
                match &node.kind {
                    NodeKind::Sprite { key, size, frame } => {
                        let x = (node.pos.x - size.x / 2.0) as f64;
                        let y = (node.pos.y - size.y / 2.0) as f64;
                        let (w, h) = (size.x as f64, size.y as f64);
                        let img = self
                            .image(format!("sprite-{}-{}", key, frame))
                            .or_else(|| self.image(format!("sprite-{}", key)));
                        let drawn = img.is_some_and(|img| {
                            img.complete()
                                && self
                                    .ctx
                                    .draw_image_with_html_image_element_and_dw_and_dh(
                                        &img, x, y, w, h,
                                    )
                                    .is_ok()
                        });
                        if !drawn {
                            self.ctx.set_fill_style_str(colors::for_key(key));
                            self.ctx.fill_rect(x, y, w, h);
                        }
                    }
                    NodeKind::Text { text } => {
                        self.ctx.set_fill_style_str(colors::TEXT);
                        self.ctx.set_font("18px sans-serif");
                        self.ctx.set_text_baseline("top");
                        for (i, line) in text.lines().enumerate() {
                            let _ = self.ctx.fill_text(
                                line,
                                node.pos.x as f64,
                                node.pos.y as f64 + i as f64 * 24.0,
                            );
                        }
                    }
                }
            }
        }

        /// Start a fresh session (the only way out of Game Over)
        fn restart(&mut self, seed: u64) {
            self.binder.clear(&mut self.scene);
            let mut config = self.config.clone();
            config.viewport_width = self.session.config.viewport_width;
            config.viewport_height = self.session.config.viewport_height;
            self.session = GameSession::new(config, seed);
            self.accumulator = 0.0;
            self.input = TickInput::default();
            self.jump_latched = false;
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Failed to init logger: {}", e).into());
        }

        log::info!("Taxman Runner starting...");

        let Some(window) = web_sys::window() else {
            log::error!("no window");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("no document");
            return;
        };

        let canvas: HtmlCanvasElement = match document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into().ok())
        {
            Some(canvas) => canvas,
            None => {
                log::error!("no canvas element");
                return;
            }
        };
        let ctx: CanvasRenderingContext2d = match canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|c| c.dyn_into().ok())
        {
            Some(ctx) => ctx,
            None => {
                log::error!("2d context unavailable");
                return;
            }
        };

        let (width, height) = window_size(&window);
        canvas.set_width(width as u32);
        canvas.set_height(height as u32);

        let mut config = GameConfig::load();
        config.viewport_width = width;
        config.viewport_height = height;

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(config, seed, ctx)));
        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(game.clone());
        setup_resize_handler(canvas, game.clone());

        request_animation_frame(game);

        log::info!("Taxman Runner running!");
    }

    fn window_size(window: &web_sys::Window) -> (f32, f32) {
        let w = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(800.0);
        let h = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(600.0);
        (w as f32, h as f32)
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Key down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    " " | "ArrowUp" | "w" | "W" => {
                        event.prevent_default();
                        if !g.input.jump {
                            g.jump_latched = true;
                        }
                        g.input.jump = true;
                        g.input.up = true;
                    }
                    "ArrowDown" | "s" | "S" => {
                        event.prevent_default();
                        g.input.down = true;
                    }
                    "i" | "I" => {
                        g.input.idle_mode = !g.input.idle_mode;
                        log::info!("Idle mode: {}", g.input.idle_mode);
                    }
                    "r" | "R" if g.session.is_over() => {
                        let seed = js_sys::Date::now() as u64;
                        g.restart(seed);
                        log::info!("Game restarted with seed: {}", seed);
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    " " | "ArrowUp" | "w" | "W" => {
                        g.input.jump = false;
                        g.input.up = false;
                    }
                    "ArrowDown" | "s" | "S" => g.input.down = false,
                    _ => {}
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize_handler(canvas: HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::UiEvent| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let (w, h) = window_size(&window);
            canvas.set_width(w as u32);
            canvas.set_height(h as u32);
            game.borrow_mut().session.resize(w, h);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.render();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Taxman Runner (native) starting...");
    log::info!("Native mode runs a headless autopilot demo - run with `trunk serve` for the web version");

    let config = load_config(std::env::args().nth(1));
    run_headless(config, 60);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Read a JSON config from `path`, falling back to defaults
#[cfg(not(target_arch = "wasm32"))]
fn load_config(path: Option<String>) -> taxman_runner::GameConfig {
    use taxman_runner::GameConfig;

    let Some(path) = path else {
        return GameConfig::default();
    };
    match std::fs::read_to_string(&path) {
        Ok(json) => match GameConfig::from_json(&json) {
            Ok(config) => {
                log::info!("Loaded config from {}", path);
                config
            }
            Err(e) => {
                log::error!("Invalid config {}: {}", path, e);
                GameConfig::default()
            }
        },
        Err(e) => {
            log::error!("Cannot read {}: {}", path, e);
            GameConfig::default()
        }
    }
}

/// Play `seconds` of simulated time with the autopilot and report the outcome
#[cfg(not(target_arch = "wasm32"))]
fn run_headless(config: taxman_runner::GameConfig, seconds: u32) {
    use taxman_runner::renderer::{RetainedScene, SceneBinder};
    use taxman_runner::sim::{GameEvent, GameSession, TickInput, tick};

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let mut session = GameSession::new(config, seed);
    let mut scene = RetainedScene::new();
    let mut binder = SceneBinder::new();
    let input = TickInput {
        idle_mode: true,
        ..Default::default()
    };

    let (mut coins, mut obstacles) = (0u32, 0u32);
    let total_ticks = seconds * session.config.tick_rate;
    for _ in 0..total_ticks {
        tick(&mut session, &input);
        for event in session.drain_events() {
            match event {
                GameEvent::CoinCollected { .. } => coins += 1,
                GameEvent::ObstacleExited { .. } => obstacles += 1,
                _ => {}
            }
        }
        binder.sync(&session, &mut scene);
        if session.is_over() {
            break;
        }
    }

    log::info!(
        "Demo finished after {} ticks: {} (coins {}, obstacles cleared {}, {} scene nodes)",
        session.time_ticks,
        session.score.text(),
        coins,
        obstacles,
        scene.len()
    );
    if let Some(text) = session.game_over_text.as_deref() {
        log::info!("{}", text.replace('\n', " - "));
    }
}
