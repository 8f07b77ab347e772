//! Sky Bomber entry point
//!
//! Handles platform-specific initialization and runs the game loop. The
//! browser shell owns input capture, the overlay, the countdown interval and
//! audio triggers; drawing itself is done by the hosting page, which receives
//! the tick-end state as JSON once per frame.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, KeyboardEvent};

    use sky_bomber::audio::{AudioManager, SoundEffect};
    use sky_bomber::sim::{
        tick, CharacterKind, GameEvent, LossReason, Session, TickInput,
    };
    use sky_bomber::{GameError, GameResult};

    // JS hook the hosting page implements for drawing; the shell hands it the
    // tick-end state and the tick's events, parsed.
    #[wasm_bindgen(inline_js = "
        export function present_frame(state, events) {
            if (window.presentFrame) {
                window.presentFrame(JSON.parse(state), JSON.parse(events));
            }
        }
    ")]
    extern "C" {
        fn present_frame(state: &str, events: &str);
    }

    /// Game instance holding all state
    struct Game {
        session: Session,
        input: TickInput,
        audio: AudioManager,
    }

    impl Game {
        fn new(seed: u64, character: CharacterKind) -> Self {
            Self {
                session: Session::new(seed, character),
                input: TickInput::default(),
                audio: AudioManager::new(),
            }
        }

        /// One redraw callback: advance the simulation a single tick, then
        /// hand the resulting state to the page.
        fn frame(&mut self) {
            let input = self.input.clone();
            tick(&mut self.session, &input);
            // Clear one-shot inputs after processing
            self.input.place_bomb = false;

            let events = self.session.take_events();
            for event in &events {
                self.apply_event(event);
            }
            match (
                serde_json::to_string(&self.session),
                serde_json::to_string(&events),
            ) {
                (Ok(state), Ok(ev)) => present_frame(&state, &ev),
                _ => log::warn!("failed to serialize frame state"),
            }
        }

        fn apply_event(&mut self, event: &GameEvent) {
            match event {
                GameEvent::BombExploded { .. } => self.audio.play(SoundEffect::Explosion),
                GameEvent::EnemyKilled { by_ally: true } => {
                    self.audio.play(SoundEffect::Explosion)
                }
                GameEvent::PickupCollected { life_gained: true } => {
                    self.audio.play(SoundEffect::PickupCollect)
                }
                GameEvent::LevelCleared { .. } => {
                    self.audio.play(SoundEffect::Victory);
                    show_overlay(
                        "Level Complete!",
                        "Get ready for the next level.",
                        "Next Level",
                    );
                }
                GameEvent::Victory => {
                    self.audio.play(SoundEffect::Victory);
                    self.audio.stop_background();
                    show_overlay(
                        "Total Victory!",
                        "You cleared all three levels.",
                        "Play Again",
                    );
                }
                GameEvent::GameOver { reason } => {
                    self.audio.stop_background();
                    show_overlay("Game Over", loss_text(*reason), "Retry Level");
                }
                _ => {}
            }
        }
    }

    fn loss_text(reason: LossReason) -> &'static str {
        match reason {
            LossReason::TimeExpired => "Time ran out!",
            LossReason::Explosion => "You were caught in the blast!",
            LossReason::EnemyContact => "A monster got you!",
        }
    }

    pub fn run() {
        console_log::init_with_level(log::Level::Info).expect("Failed to init logging");
        console_error_panic_hook::set_once();

        if let Err(err) = setup() {
            log::error!("initialization failed: {err}");
            show_fatal_notice(&err);
        }
    }

    fn setup() -> GameResult<()> {
        let window = web_sys::window()
            .ok_or_else(|| GameError::Platform("no window".into()))?;
        let document = window
            .document()
            .ok_or_else(|| GameError::Platform("no document".into()))?;

        // character choice set by the selection form before the game loads
        let character = js_sys::Reflect::get(&window, &JsValue::from_str("selectedCharacter"))
            .ok()
            .and_then(|v| v.as_string())
            .and_then(|s| CharacterKind::from_str(&s))
            .unwrap_or_default();
        let seed = js_sys::Date::now() as u64;
        log::info!(
            "starting session: seed {seed}, character {}",
            character.as_str()
        );

        let game = Rc::new(RefCell::new(Game::new(seed, character)));

        setup_keyboard(game.clone());
        setup_touch_controls(game.clone(), &document);
        setup_confirm_button(game.clone(), &document)?;
        setup_countdown_interval(game.clone(), &window)?;
        start_frame_loop(game);
        Ok(())
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.code().as_str() {
                    "ArrowUp" => g.input.up = true,
                    "ArrowDown" => g.input.down = true,
                    "ArrowLeft" => g.input.left = true,
                    "ArrowRight" => g.input.right = true,
                    "Space" => {
                        // keep the page from scrolling
                        event.prevent_default();
                        g.input.place_bomb = true;
                        g.audio.resume();
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.code().as_str() {
                    "ArrowUp" => g.input.up = false,
                    "ArrowDown" => g.input.down = false,
                    "ArrowLeft" => g.input.left = false,
                    "ArrowRight" => g.input.right = false,
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Wire one held-direction button; missing elements are fine (desktop
    /// layouts ship without the touch pad).
    fn bind_held_control(
        document: &Document,
        id: &str,
        game: Rc<RefCell<Game>>,
        set: fn(&mut TickInput, bool),
    ) {
        let Some(btn) = document.get_element_by_id(id) else {
            return;
        };
        for (event, held) in [
            ("touchstart", true),
            ("touchend", false),
            ("touchcancel", false),
            ("mousedown", true),
            ("mouseup", false),
            ("mouseleave", false),
        ] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |e: web_sys::Event| {
                e.prevent_default();
                set(&mut game.borrow_mut().input, held);
            });
            let _ = btn.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_touch_controls(game: Rc<RefCell<Game>>, document: &Document) {
        bind_held_control(document, "btn-up", game.clone(), |i, held| i.up = held);
        bind_held_control(document, "btn-down", game.clone(), |i, held| i.down = held);
        bind_held_control(document, "btn-left", game.clone(), |i, held| i.left = held);
        bind_held_control(document, "btn-right", game.clone(), |i, held| {
            i.right = held
        });

        if let Some(btn) = document.get_element_by_id("btn-bomb") {
            for event in ["touchstart", "click"] {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |e: web_sys::Event| {
                    e.prevent_default();
                    let mut g = game.borrow_mut();
                    g.input.place_bomb = true;
                    g.audio.resume();
                });
                let _ =
                    btn.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    /// The overlay button is the single confirmation path out of every
    /// paused phase (start, next level, retry, play again).
    fn setup_confirm_button(game: Rc<RefCell<Game>>, document: &Document) -> GameResult<()> {
        let btn = document
            .get_element_by_id("overlay-btn")
            .ok_or(GameError::MissingElement("overlay-btn"))?;
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            let mut g = game.borrow_mut();
            g.session.confirm();
            g.audio.resume();
            g.audio.start_background();
            hide_overlay();
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
        Ok(())
    }

    /// The level clock runs on real time, not on frames.
    fn setup_countdown_interval(
        game: Rc<RefCell<Game>>,
        window: &web_sys::Window,
    ) -> GameResult<()> {
        let closure = Closure::<dyn FnMut()>::new(move || {
            game.borrow_mut().session.countdown_second();
        });
        window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                1000,
            )
            .map_err(|_| GameError::Platform("setInterval rejected".into()))?;
        closure.forget();
        Ok(())
    }

    fn start_frame_loop(game: Rc<RefCell<Game>>) {
        let handle: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
        let starter = handle.clone();
        *starter.borrow_mut() = Some(Closure::new(move || {
            game.borrow_mut().frame();
            request_animation_frame(handle.borrow().as_ref().unwrap());
        }));
        request_animation_frame(starter.borrow().as_ref().unwrap());
    }

    fn request_animation_frame(callback: &Closure<dyn FnMut()>) {
        web_sys::window()
            .unwrap()
            .request_animation_frame(callback.as_ref().unchecked_ref())
            .expect("requestAnimationFrame failed");
    }

    fn show_overlay(title: &str, msg: &str, button: &str) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        if let Some(el) = document.get_element_by_id("overlay-title") {
            el.set_text_content(Some(title));
        }
        if let Some(el) = document.get_element_by_id("overlay-msg") {
            el.set_text_content(Some(msg));
        }
        if let Some(el) = document.get_element_by_id("overlay-btn") {
            el.set_text_content(Some(button));
        }
        if let Some(el) = document.get_element_by_id("overlay") {
            let _ = el.class_list().remove_1("hidden");
        }
    }

    fn hide_overlay() {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        if let Some(el) = document.get_element_by_id("overlay") {
            let _ = el.class_list().add_1("hidden");
        }
    }

    /// Unrecoverable setup failure: blocking notice, reload is the only way out.
    fn show_fatal_notice(err: &GameError) {
        let msg = format!("{err}. Please reload the page.");
        if let Some(window) = web_sys::window() {
            if let Some(document) = window.document() {
                if document.get_element_by_id("overlay").is_some() {
                    show_overlay("Something went wrong", &msg, "Reload");
                    return;
                }
            }
            let _ = window.alert_with_message(&msg);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use sky_bomber::consts::LEVEL_TIME_SECS;
    use sky_bomber::sim::{tick, CharacterKind, Phase, Session, TickInput};

    env_logger::init();
    log::info!("Sky Bomber (native) starting...");
    log::info!("Native mode is a headless demo - serve the web build for the real game");

    // Scripted run: wander, drop bombs on a cadence, let the clock tick.
    let mut session = Session::new(0xB0B5EED, CharacterKind::Pilot);
    session.confirm();

    let mut ticks: u32 = 0;
    let max_ticks = 60 * LEVEL_TIME_SECS;
    while session.phase == Phase::Active && ticks < max_ticks {
        let input = TickInput {
            right: ticks % 240 < 120,
            down: (120..240).contains(&(ticks % 240)),
            place_bomb: ticks % 180 == 0,
            ..TickInput::default()
        };
        tick(&mut session, &input);
        ticks += 1;
        if ticks % 60 == 0 {
            session.countdown_second();
        }
        for event in session.take_events() {
            log::info!("tick {ticks}: {event:?}");
        }
    }
    log::info!(
        "demo ended after {ticks} ticks in phase {:?} with {} lives left",
        session.phase,
        session.lives
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
