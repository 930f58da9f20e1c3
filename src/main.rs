//! Ghost Serpent entry point
//!
//! On the web this wires DOM input, the HUD and an external renderer to the
//! session. Natively it runs a headless autopilot demo.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{KeyboardEvent, MouseEvent, TouchEvent};

    use ghost_serpent::sim::{GameEvent, GamePhase};
    use ghost_serpent::{ControlMode, Controls, HudSummary, Session, Settings, Tuning};

    // Bridges to the page: a canvas renderer and an optional head tracker
    #[wasm_bindgen(inline_js = "
        export function present_frame(json) {
            if (typeof window.renderSerpentFrame === 'function') {
                window.renderSerpentFrame(json);
            }
        }

        export function head_yaw() {
            const head = window.serpentHead;
            return head && typeof head.yaw === 'number' ? head.yaw : NaN;
        }

        export function head_brow_raised() {
            const head = window.serpentHead;
            return !!(head && head.brow);
        }

        export function take_head_squint() {
            const head = window.serpentHead;
            if (head && head.squint) {
                head.squint = false;
                return true;
            }
            return false;
        }
    ")]
    extern "C" {
        fn present_frame(json: &str);
        fn head_yaw() -> f64;
        fn head_brow_raised() -> bool;
        fn take_head_squint() -> bool;
    }

    /// Game instance holding all state
    struct Game {
        session: Session,
        controls: Controls,
        settings: Settings,
        last_hud: Option<HudSummary>,
    }

    impl Game {
        fn new(seed: u64, settings: Settings) -> Self {
            Self {
                session: Session::new(seed, Tuning::default()),
                controls: settings.controls(),
                settings,
                last_hud: None,
            }
        }

        /// Pull the latest head-tracker reading
        fn poll_head(&mut self, time: f64) {
            if self.controls.mode != ControlMode::Head {
                return;
            }
            let yaw = head_yaw();
            if yaw.is_finite() {
                self.controls.head.set_raw_yaw(yaw as f32);
            }
            self.controls.head.brow_raised = head_brow_raised();
            if take_head_squint() {
                self.controls.head.squint_detected(time);
            }
        }

        fn frame(&mut self, time: f64) {
            self.poll_head(time);
            let hud = self.session.frame(time, &mut self.controls);

            for event in self.session.drain_events() {
                match event {
                    GameEvent::GameOver { reason, score } => {
                        log::info!("Game over ({}) with score {}", reason, score);
                    }
                    GameEvent::ShieldAbsorbed { remaining } => {
                        log::info!("Shield absorbed a hit, {} left", remaining);
                    }
                    other => log::debug!("{:?}", other),
                }
            }

            match self.session.snapshot_json() {
                Ok(json) => present_frame(&json),
                Err(e) => log::warn!("Snapshot failed: {}", e),
            }

            if self.last_hud.as_ref() != Some(&hud) {
                update_hud(&hud);
                self.last_hud = Some(hud);
            }
        }
    }

    /// Update HUD elements in DOM
    fn update_hud(hud: &HudSummary) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        let set = |id: &str, text: &str| {
            if let Some(el) = document.get_element_by_id(id) {
                el.set_text_content(Some(text));
            }
        };

        set("score", &hud.score.to_string());
        set("shield", &hud.shield.to_string());
        let state = match hud.end_reason {
            Some(reason) => format!("{} ({})", hud.state.as_str(), reason),
            None => hud.state.as_str().to_string(),
        };
        set("state", &state);
        set("effects", &hud.effects.join(" "));
    }

    fn set_control_mode_label(mode: ControlMode) {
        let document = web_sys::window().and_then(|w| w.document());
        if let Some(btn) = document.and_then(|d| d.get_element_by_id("controlModeBtn")) {
            btn.set_text_content(Some(&format!("Control: {}", mode.as_str())));
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Ghost Serpent starting...");

        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, settings.clone())));
        log::info!("Session created with seed: {}", seed);

        if let Some(document) = web_sys::window().and_then(|w| w.document()) {
            if let Some(el) = document.get_element_by_id("touchControls") {
                let class = if settings.touch_controls { "" } else { "hidden" };
                let _ = el.set_attribute("class", class);
            }
        }
        set_control_mode_label(settings.control_mode);
        update_hud(&game.borrow().session.summary(0.0));

        setup_keyboard(game.clone());
        setup_buttons(game.clone());
        setup_hold_button("btnLeft", game.clone(), |c, held| c.direct.turn_left = held);
        setup_hold_button("btnRight", game.clone(), |c, held| c.direct.turn_right = held);
        setup_hold_button("btnBoost", game.clone(), |c, held| c.direct.boost = held);
        setup_auto_pause(game.clone());

        request_animation_frame(game);

        log::info!("Ghost Serpent running!");
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if game.borrow_mut().controls.direct.key_down(&event.code()) {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().controls.direct.key_up(&event.code());
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn on_click(id: &str, handler: impl FnMut(MouseEvent) + 'static) {
        let document = web_sys::window().and_then(|w| w.document());
        if let Some(btn) = document.and_then(|d| d.get_element_by_id(id)) {
            let closure = Closure::<dyn FnMut(MouseEvent)>::new(handler);
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        } else {
            log::debug!("No #{} in page", id);
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            on_click("startBtn", move |_| game.borrow_mut().session.start());
        }

        {
            let game = game.clone();
            on_click("restartBtn", move |_| {
                let mut g = game.borrow_mut();
                g.session.reset();
                g.controls.direct.release_all();
                let hud = g.session.summary(js_sys::Date::now());
                update_hud(&hud);
                g.last_hud = Some(hud);
            });
        }

        {
            let game = game.clone();
            on_click("controlModeBtn", move |_| {
                let mut g = game.borrow_mut();
                let mode = g.controls.toggle_mode();
                g.settings.control_mode = mode;
                g.settings.save();
                set_control_mode_label(mode);
            });
        }

        {
            let game = game.clone();
            on_click("btnGhost", move |_| game.borrow_mut().controls.direct.ghost_pressed = true);
        }

        on_click("btnPause", move |_| game.borrow_mut().controls.direct.pause_pressed = true);
    }

    /// Button that sets a control while pressed (mouse or touch)
    fn setup_hold_button(id: &str, game: Rc<RefCell<Game>>, apply: fn(&mut Controls, bool)) {
        let document = web_sys::window().and_then(|w| w.document());
        let Some(btn) = document.and_then(|d| d.get_element_by_id(id)) else {
            log::debug!("No #{} in page", id);
            return;
        };

        let mouse = [("mousedown", true), ("mouseup", false), ("mouseleave", false)];
        for (event_name, held) in mouse {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                apply(&mut game.borrow_mut().controls, held);
            });
            let _ = btn
                .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        let touch = [("touchstart", true), ("touchend", false), ("touchcancel", false)];
        for (event_name, held) in touch {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                apply(&mut game.borrow_mut().controls, held);
            });
            let _ = btn
                .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        fn auto_pause(g: &mut Game, why: &str) {
            g.controls.direct.release_all();
            if g.settings.pause_on_blur && g.session.phase() == GamePhase::Running {
                g.session.toggle_pause();
                log::info!("Auto-paused ({})", why);
            }
        }

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    auto_pause(&mut game.borrow_mut(), "tab hidden");
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                auto_pause(&mut game.borrow_mut(), "window blur");
            });
            let _ = window
                .add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
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
        game.borrow_mut().frame(time);
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
    log::info!("Ghost Serpent (native) starting...");
    log::info!("Native mode runs a headless autopilot - serve the wasm build for the web version");

    let mut seed = 1u64;
    let mut frames = 3600u32;
    let mut tuning = ghost_serpent::Tuning::default();

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--seed" => match args.next().map(|v| v.parse()) {
                Some(Ok(v)) => seed = v,
                _ => log::warn!("--seed expects an integer"),
            },
            "--frames" => match args.next().map(|v| v.parse()) {
                Some(Ok(v)) => frames = v,
                _ => log::warn!("--frames expects an integer"),
            },
            "--tuning" => {
                let Some(path) = args.next() else {
                    log::warn!("--tuning expects a path");
                    continue;
                };
                let loaded = std::fs::read_to_string(&path)
                    .map_err(|e| e.to_string())
                    .and_then(|json| {
                        ghost_serpent::Tuning::from_json(&json).map_err(|e| e.to_string())
                    });
                match loaded {
                    Ok(t) => {
                        log::info!("Loaded tuning from {}", path);
                        tuning = t;
                    }
                    Err(e) => log::error!("Ignoring tuning {}: {}", path, e),
                }
            }
            other => log::warn!("Unknown argument: {}", other),
        }
    }

    let hud = autopilot::run(seed, tuning, frames);
    match serde_json::to_string_pretty(&hud) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Could not encode summary: {}", e),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Simple steering bot for the headless demo
#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use ghost_serpent::consts::FRAME_MS;
    use ghost_serpent::sim::{GameEvent, GameState, distance};
    use ghost_serpent::{Controls, HudSummary, Session, Tuning, angle_between, normalize_angle};

    /// Distance from an edge at which the bot steers back to the center
    const EDGE_CAUTION: f32 = 70.0;
    /// Hazard distance that makes the bot phase out
    const PANIC_DIST: f32 = 40.0;

    fn steer(state: &GameState, controls: &mut Controls) {
        let player = &state.player;
        let arena = &state.arena;
        let edge = player
            .pos
            .x
            .min(player.pos.y)
            .min(arena.width - player.pos.x)
            .min(arena.height - player.pos.y);

        let target = if edge < EDGE_CAUTION {
            arena.center()
        } else {
            state.food.pos
        };
        let diff = normalize_angle(angle_between(player.pos, target) - player.angle);
        controls.direct.turn_left = diff < -0.05;
        controls.direct.turn_right = diff > 0.05;

        let threatened = state
            .chasers
            .iter()
            .map(|c| distance(c.pos, player.pos) - c.radius)
            .chain(state.projectiles.iter().map(|p| distance(p.pos, player.pos)))
            .any(|d| d < PANIC_DIST);
        controls.direct.ghost_pressed = threatened && player.can_activate_ghost();
    }

    pub fn run(seed: u64, tuning: Tuning, frames: u32) -> HudSummary {
        let mut session = Session::new(seed, tuning);
        let mut controls = Controls::default();
        session.start();

        let mut hud = session.summary(0.0);
        for frame in 0..frames {
            let now = frame as f64 * FRAME_MS;
            steer(session.state(), &mut controls);
            hud = session.frame(now, &mut controls);

            for event in session.drain_events() {
                match event {
                    GameEvent::FoodEaten { score } => log::info!("Score {}", score),
                    GameEvent::HazardSpawned { id, kind } => {
                        log::info!("Hazard {} spawned: {:?}", id, kind)
                    }
                    GameEvent::GameOver { reason, score } => {
                        log::info!("Game over ({}) at frame {} with score {}", reason, frame, score)
                    }
                    other => log::debug!("{:?}", other),
                }
            }

            if !session.state().is_running() {
                break;
            }
        }
        hud
    }
}
