// DOM overlays around the canvas: score, typing buffer and the
// start / game-over panel.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlInputElement};

use crate::config::GameConfig;
use crate::words::WordPair;

pub const SCORE_ID: &str = "wr-score";
pub const TYPING_ID: &str = "wr-typing";
pub const PANEL_ID: &str = "wr-overlay";
pub const COUNT_ID: &str = "wr-count";
pub const START_ID: &str = "wr-start";
pub const SUMMARY_ID: &str = "wr-summary";

const HUD_STYLE: &str = "position:fixed; font-family:'Fira Code', monospace; padding:4px 10px; background:rgba(0,0,0,0.42); border:1px solid #333; border-radius:6px; color:#ffd166; z-index:45;";

fn body(doc: &Document) -> Result<web_sys::HtmlElement, JsValue> {
    doc.body().ok_or_else(|| JsValue::from_str("no body"))
}

fn ensure_div(doc: &Document, id: &str, style: &str, text: &str) -> Result<Element, JsValue> {
    if let Some(el) = doc.get_element_by_id(id) {
        return Ok(el);
    }
    let div = doc.create_element("div")?;
    div.set_id(id);
    div.set_text_content(Some(text));
    div.set_attribute("style", style)?;
    body(doc)?.append_child(&div)?;
    Ok(div)
}

/// Score (top-left) and typing buffer (bottom-center).
pub fn ensure_hud(doc: &Document) -> Result<(), JsValue> {
    ensure_div(
        doc,
        SCORE_ID,
        &format!("{HUD_STYLE} top:10px; left:12px; font-size:15px;"),
        "Score: 0",
    )?;
    ensure_div(
        doc,
        TYPING_ID,
        &format!("{HUD_STYLE} bottom:40px; left:50%; transform:translateX(-50%); font-size:20px; min-width:120px; text-align:center;"),
        "",
    )?;
    Ok(())
}

/// Start panel with the word-count input. Returns the start button so the
/// caller can attach its click handler.
pub fn ensure_panel(doc: &Document, cfg: &GameConfig) -> Result<Element, JsValue> {
    if let Some(btn) = doc.get_element_by_id(START_ID) {
        return Ok(btn);
    }
    let panel = ensure_div(
        doc,
        PANEL_ID,
        "position:fixed; inset:0; display:flex; flex-direction:column; align-items:center; justify-content:center; gap:14px; background:rgba(0,0,0,0.72); color:#fff; font-family:'Fira Code', monospace; z-index:60;",
        "",
    )?;

    let title = doc.create_element("h1")?;
    title.set_text_content(Some("Word Rain"));
    panel.append_child(&title)?;

    let summary = doc.create_element("div")?;
    summary.set_id(SUMMARY_ID);
    panel.append_child(&summary)?;

    let label = doc.create_element("label")?;
    label.set_text_content(Some("Words: "));
    let input: HtmlInputElement = doc.create_element("input")?.dyn_into()?;
    input.set_id(COUNT_ID);
    input.set_type("number");
    input.set_min(&cfg.min_words.to_string());
    input.set_max(&cfg.max_words.to_string());
    input.set_value(&cfg.default_words.to_string());
    label.append_child(&input)?;
    panel.append_child(&label)?;

    let button = doc.create_element("button")?;
    button.set_id(START_ID);
    button.set_text_content(Some("Start"));
    panel.append_child(&button)?;
    Ok(button)
}

/// Word count currently entered in the panel, if it parses.
pub fn requested_count(doc: &Document) -> Option<usize> {
    let input: HtmlInputElement = doc.get_element_by_id(COUNT_ID)?.dyn_into().ok()?;
    input.value().trim().parse().ok()
}

pub fn set_panel_visible(doc: &Document, visible: bool) {
    if let Some(panel) = doc.get_element_by_id(PANEL_ID) {
        let display = if visible { "flex" } else { "none" };
        let style = panel.get_attribute("style").unwrap_or_default();
        let kept: Vec<&str> = style
            .split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty() && !s.starts_with("display:"))
            .collect();
        let _ = panel.set_attribute("style", &format!("{}; display:{display};", kept.join("; ")));
    }
}

pub fn set_score(doc: &Document, score: u32) {
    if let Some(el) = doc.get_element_by_id(SCORE_ID) {
        el.set_text_content(Some(&format!("Score: {score}")));
    }
}

pub fn set_typing(doc: &Document, text: &str) {
    if let Some(el) = doc.get_element_by_id(TYPING_ID) {
        el.set_text_content(Some(text));
    }
}

/// Fill the panel with the result of a finished round. Words come from a
/// remote generator, so they are inserted as text nodes only.
pub fn show_game_over(
    doc: &Document,
    score: u32,
    total: usize,
    missed: &[WordPair],
) -> Result<(), JsValue> {
    let Some(summary) = doc.get_element_by_id(SUMMARY_ID) else {
        return Ok(());
    };
    summary.set_text_content(None);

    let heading = doc.create_element("h2")?;
    heading.set_text_content(Some(&format!("Game over: {score} / {total}")));
    summary.append_child(&heading)?;

    if !missed.is_empty() {
        let list = doc.create_element("ul")?;
        for pair in missed {
            let li = doc.create_element("li")?;
            li.set_text_content(Some(&format!("{} → {}", pair.source, pair.target)));
            list.append_child(&li)?;
        }
        summary.append_child(&list)?;
    }
    if let Some(btn) = doc.get_element_by_id(START_ID) {
        btn.set_text_content(Some("Play again"));
    }
    set_panel_visible(doc, true);
    Ok(())
}
