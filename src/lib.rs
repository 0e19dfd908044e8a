//! Word Rain core crate.
//!
//! Vocabulary words fall down a canvas and the player types their translation
//! before they leave the screen. The round state machine (`round`), the word
//! supply (`words`) and configuration are plain Rust and testable on the
//! host; `screen` is the browser front end driven from `start_game()`.

use wasm_bindgen::prelude::*;

pub mod config;
pub mod error;
pub mod round;
mod screen;
pub mod words;

pub use config::GameConfig;
pub use round::{Phase, RoundController, RoundEvent, RoundSnapshot, SubmitOutcome};
pub use words::{WordPair, WordSupply};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    #[cfg(all(target_arch = "wasm32", feature = "console_tracing"))]
    tracing_wasm::set_as_global_default();
}

// -----------------------------------------------------------------------------
// JS entrypoints
// -----------------------------------------------------------------------------

/// Set up the canvas and start panel. `config_json` is an optional
/// `GameConfig` JSON object; missing fields take their defaults.
#[wasm_bindgen]
pub fn start_game(config_json: Option<String>) -> Result<(), JsValue> {
    let config = match config_json.as_deref() {
        Some(json) if !json.trim().is_empty() => {
            GameConfig::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?
        }
        _ => GameConfig::default(),
    };
    screen::start_screen(config)
}

/// Start a round from script instead of the start button. Non-positive
/// counts are ignored; positive counts are clamped to the configured
/// `min_words..=max_words` range (5..=20 by default), so `start_round(1)`
/// plays with `min_words` words.
#[wasm_bindgen]
pub fn start_round(count: i32) {
    match usize::try_from(count) {
        Ok(n) if n > 0 => screen::begin_round(Some(n)),
        _ => tracing::debug!(count, "ignoring non-positive word count"),
    }
}

/// Current round as JSON (`RoundSnapshot`), or `null` before `start_game()`.
#[wasm_bindgen]
pub fn round_snapshot() -> Result<String, JsValue> {
    serde_json::to_string(&screen::snapshot()).map_err(|e| JsValue::from_str(&e.to_string()))
}

pub(crate) fn performance_now() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}
