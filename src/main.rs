//! Raven Mayhem entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use raven_mayhem::audio::AudioManager;
    use raven_mayhem::render::canvas::CanvasSurface;
    use raven_mayhem::render::Sprite;
    use raven_mayhem::sim::{frame, pointer_down, FrameInput, Session, Viewport};
    use raven_mayhem::{HighScore, Settings};

    /// Game instance holding all state
    struct App {
        session: Session,
        surface: CanvasSurface,
        audio: AudioManager,
        highscore: HighScore,
        input: FrameInput,
        /// Game-over edge detection for the one-time high score save
        was_over: bool,
    }

    impl App {
        /// Play everything the simulation queued this frame
        fn drain_sounds(&mut self) {
            for effect in self.session.take_sounds() {
                self.audio.play(effect);
            }
        }

        /// Persist the stored best once per finished session
        fn check_game_over_transition(&mut self) {
            let over = self.session.state.game_over;
            if over && !self.was_over {
                if self.highscore.record(self.session.state.high_score) {
                    self.highscore.save();
                }
            }
            self.was_over = over;
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Raven Mayhem starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let width = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(800.0);
        let height = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(600.0);
        canvas.set_width(width as u32);
        canvas.set_height(height as u32);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .expect("failed to get 2d context")
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        let mut surface = CanvasSurface::new(ctx, width, height);
        let _ = surface.register_sprite(Sprite::Raven, "raven.png");
        let _ = surface.register_sprite(Sprite::Boom, "boom.png");

        let settings = Settings::load();
        let highscore = HighScore::load();

        let mut audio = AudioManager::new();
        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio.set_muted(settings.muted);

        let seed = js_sys::Date::now() as u64;
        let viewport = Viewport::new(width as f32, height as f32);
        let session = Session::new(seed, viewport, highscore.best);
        log::info!("Session started with seed: {}", seed);

        let input = FrameInput {
            reduced_motion: !settings.effective_screen_shake(),
            ..Default::default()
        };

        let app = Rc::new(RefCell::new(App {
            session,
            surface,
            audio,
            highscore,
            input,
            was_over: false,
        }));

        setup_input_handlers(&canvas, app.clone());
        request_animation_frame(app);

        log::info!("Raven Mayhem running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        // Pointer
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut a = app.borrow_mut();
                // Browsers require a user gesture before audio can start
                a.audio.resume();

                let restarted = pointer_down(
                    &mut a.session,
                    event.offset_x() as f32,
                    event.offset_y() as f32,
                );
                if restarted {
                    log::info!("Session restarted");
                    a.was_over = false;
                }
                a.drain_sounds();
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let window = web_sys::window().expect("no window");
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut a = app.borrow_mut();
                match event.key().as_str() {
                    " " => {
                        event.prevent_default();
                        a.input.toggle_pause = true;
                    }
                    "Escape" => a.input.quit_to_game_over = true,
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let a = &mut *app.borrow_mut();
            let input = a.input.clone();
            frame(&mut a.session, &input, time, &mut a.surface);

            // Clear one-shot inputs after processing
            a.input.toggle_pause = false;
            a.input.quit_to_game_over = false;

            a.drain_sounds();
            a.check_game_over_transition();
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Raven Mayhem (native) starting...");
    log::info!("The game targets the browser - build with `trunk serve` for the web version");
}
