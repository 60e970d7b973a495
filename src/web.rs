//! Browser bindings (wasm32 only)
//!
//! The page owns the canvas, DOM buttons and `requestAnimationFrame`; it
//! forwards events here and draws from the JSON snapshot.

use wasm_bindgen::prelude::*;

use crate::Session;
use crate::audio::AudioManager;
use crate::consts::TICK_MS;
use crate::embed::handle_embed_request;
use crate::input::TouchButton;
use crate::persistence::LocalStorage;
use crate::taunts::BuiltInTaunts;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Rasta Blasta starting...");
}

/// Game instance driven by the page
#[wasm_bindgen]
pub struct WebGame {
    session: Session,
    audio: AudioManager,
    last_time: f64,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: f64) -> WebGame {
        let session = Session::new(
            seed as u64,
            Box::new(LocalStorage),
            Box::new(BuiltInTaunts),
        );
        let audio = AudioManager::new(session.mixer());
        log::info!("Game initialized with seed: {}", seed as u64);
        WebGame {
            session,
            audio,
            last_time: 0.0,
        }
    }

    /// START button
    pub fn start(&mut self, time: f64) -> bool {
        // Browsers only allow audio after a user gesture
        self.audio.resume();
        self.last_time = time;
        self.session.start(time)
    }

    /// HIGH SCORES button
    pub fn toggle_high_scores(&mut self) -> bool {
        self.session.toggle_high_scores()
    }

    pub fn key_down(&mut self, key: &str) -> bool {
        self.session.key_down(key)
    }

    pub fn key_up(&mut self, key: &str) -> bool {
        self.session.key_up(key)
    }

    /// Touch buttons: "left", "right" or "shoot"
    pub fn touch(&mut self, button: &str, pressed: bool) {
        let button = match button {
            "left" => TouchButton::Left,
            "right" => TouchButton::Right,
            "shoot" => TouchButton::Shoot,
            _ => return,
        };
        if pressed {
            self.session.touch_press(button);
        } else {
            self.session.touch_release(button);
        }
    }

    /// One animation frame: run due ticks and play their sounds
    pub fn frame(&mut self, time: f64) -> u32 {
        let elapsed = if self.last_time > 0.0 {
            time - self.last_time
        } else {
            TICK_MS
        };
        self.last_time = time;

        let ticks = self.session.update(elapsed, time);
        let events = self.session.drain_events();
        self.audio.play_events(&events);
        ticks
    }

    pub fn snapshot_json(&self) -> String {
        serde_json::to_string(&self.session.snapshot()).unwrap_or_default()
    }

    pub fn high_scores_json(&self) -> String {
        serde_json::to_string(self.session.high_scores()).unwrap_or_default()
    }
}

/// Music panel: request JSON in, response JSON (with `status`) out
#[wasm_bindgen]
pub fn embed_player(body: &str) -> String {
    let (status, mut response) = handle_embed_request(body);
    if let Some(obj) = response.as_object_mut() {
        obj.insert("status".to_string(), status.into());
    }
    response.to_string()
}
