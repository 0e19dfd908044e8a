// Browser smoke tests; run with `wasm-pack test --headless --firefox`.
#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn start_game_builds_canvas_and_panel() {
    word_rain::start_game(None).unwrap();
    let doc = web_sys::window().unwrap().document().unwrap();
    assert!(doc.get_element_by_id("wr-canvas").is_some());
    assert!(doc.get_element_by_id("wr-start").is_some());
    assert!(word_rain::round_snapshot().unwrap().contains("NotStarted"));
}

#[wasm_bindgen_test]
fn start_game_rejects_bad_config() {
    assert!(word_rain::start_game(Some("{\"min_words\": 0}".to_string())).is_err());
}
