//! Browser presentation: canvas rendering of the falling words, keyboard
//! input and the start / game-over panel.
//!
//! The round controller lives in a thread-local next to the canvas handles.
//! Every browser callback borrows it briefly; the word fetch runs on
//! `spawn_local` and only re-borrows it to apply its result, guarded by the
//! round ticket.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, window};

use crate::config::GameConfig;
use crate::round::motion::RandomMotion;
use crate::round::{Phase, RoundController, RoundEvent, RoundSnapshot, SubmitOutcome};
use crate::words::{SupplyKind, WordPair, WordSupply};

mod overlay;

const CANVAS_ID: &str = "wr-canvas";
const WORD_FONT: &str = "28px 'Noto Serif', Georgia, serif";
/// How long the last correct answer stays visible.
const MATCH_FLASH_MS: f64 = 900.0;

struct Screen {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    config: GameConfig,
    controller: RoundController,
    motion: RandomMotion,
    supply: Rc<SupplyKind>,
    // performance.now() at which the current round's words arrived
    loaded_at_ms: Option<f64>,
    last_match: Option<(WordPair, f64)>,
}

thread_local! {
    static SCREEN: RefCell<Option<Screen>> = const { RefCell::new(None) };
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

pub fn start_screen(config: GameConfig) -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let canvas: HtmlCanvasElement = if let Some(el) = doc.get_element_by_id(CANVAS_ID) {
        el.dyn_into()?
    } else {
        let c: HtmlCanvasElement = doc.create_element("canvas")?.dyn_into()?;
        c.set_id(CANVAS_ID);
        c.set_width(800);
        c.set_height(600);
        c.set_attribute("style", "position:fixed; left:50%; top:50%; transform:translate(-50%,-50%); border-radius:18px; border:2px solid #222; background:#000; z-index:20;")?;
        doc.body()
            .ok_or_else(|| JsValue::from_str("no body"))?
            .append_child(&c)?;
        c
    };
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("no 2d context"))?
        .dyn_into()?;
    ctx.set_font(WORD_FONT);
    ctx.set_text_align("center");

    overlay::ensure_hud(&doc)?;
    let start_button = overlay::ensure_panel(&doc, &config)?;
    overlay::set_panel_visible(&doc, true);

    let already_running = SCREEN.with(|cell| cell.borrow().is_some());
    let screen = Screen {
        canvas,
        ctx,
        motion: RandomMotion::new(config.fall.clone()),
        supply: Rc::new(SupplyKind::from_config(&config.supply)),
        config,
        controller: RoundController::new(),
        loaded_at_ms: None,
        last_match: None,
    };
    SCREEN.with(|cell| cell.replace(Some(screen)));
    if already_running {
        // Listeners and the frame loop from the first call keep serving the
        // replaced state.
        return Ok(());
    }

    {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
            let count = window()
                .and_then(|w| w.document())
                .and_then(|doc| overlay::requested_count(&doc));
            begin_round(count);
        }) as Box<dyn FnMut(_)>);
        start_button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::KeyboardEvent| {
            on_key(&evt);
        }) as Box<dyn FnMut(_)>);
        doc.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    start_frame_loop();
    tracing::info!("word rain screen ready");
    Ok(())
}

/// Start a new round with `requested` words (clamped to the configured range;
/// `None` uses the default count). Any running round is discarded.
pub fn begin_round(requested: Option<usize>) {
    let issued = SCREEN.with(|cell| {
        let mut guard = cell.borrow_mut();
        let screen = guard.as_mut()?;
        let count = screen
            .config
            .clamp_word_count(requested.unwrap_or(screen.config.default_words));
        let ticket = screen.controller.request_round(count)?;
        screen.loaded_at_ms = None;
        screen.last_match = None;
        Some((ticket, Rc::clone(&screen.supply)))
    });
    let Some((ticket, supply)) = issued else {
        return;
    };
    if let Some(doc) = window().and_then(|w| w.document()) {
        overlay::set_panel_visible(&doc, false);
        overlay::set_typing(&doc, "");
    }

    wasm_bindgen_futures::spawn_local(async move {
        let pairs = supply.supply(ticket.requested()).await;
        SCREEN.with(|cell| {
            if let Some(screen) = cell.borrow_mut().as_mut() {
                if screen
                    .controller
                    .load_round(ticket, pairs, &mut screen.motion)
                {
                    screen.loaded_at_ms = Some(crate::performance_now());
                }
            }
        });
    });
}

pub fn snapshot() -> Option<RoundSnapshot> {
    SCREEN.with(|cell| cell.borrow().as_ref().map(|s| s.controller.snapshot()))
}

fn on_key(evt: &web_sys::KeyboardEvent) {
    SCREEN.with(|cell| {
        let mut guard = cell.borrow_mut();
        let Some(screen) = guard.as_mut() else {
            return;
        };
        if screen.controller.state().phase() != Phase::InProgress {
            return;
        }
        let mut text = screen.controller.state().current_input().to_string();
        let key = evt.key();
        match key.as_str() {
            "Escape" => text.clear(),
            "Backspace" => {
                text.pop();
            }
            k if k.chars().count() == 1 && !evt.ctrl_key() && !evt.meta_key() => text.push_str(k),
            _ => return,
        }
        evt.prevent_default();
        if let SubmitOutcome::Matched(pair) = screen.controller.submit_input(&text) {
            screen.last_match = Some((pair, crate::performance_now()));
        }
        if let Some(doc) = window().and_then(|w| w.document()) {
            overlay::set_typing(&doc, screen.controller.state().current_input());
        }
    });
}

fn start_frame_loop() {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        SCREEN.with(|cell| {
            if let Some(screen) = cell.borrow_mut().as_mut() {
                frame(screen, ts);
            }
        });
        if let (Some(w), Some(cb)) = (window(), f.borrow().as_ref()) {
            let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut(f64)>));
    if let (Some(w), Some(cb)) = (window(), g.borrow().as_ref()) {
        let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

fn frame(screen: &mut Screen, now: f64) {
    if let Some(start) = screen.loaded_at_ms {
        let elapsed = now - start;
        let gone: Vec<String> = screen
            .controller
            .state()
            .pending()
            .iter()
            .filter(|item| item.motion.progress(elapsed) >= 1.0)
            .map(|item| item.pair.source.clone())
            .collect();
        for source in gone {
            screen.controller.mark_exited(&source);
        }
    }
    if screen
        .last_match
        .as_ref()
        .is_some_and(|(_, at)| now - at > MATCH_FLASH_MS)
    {
        screen.last_match = None;
    }

    let events = screen.controller.drain_events();
    if !events.is_empty() {
        if let Some(doc) = window().and_then(|w| w.document()) {
            for event in &events {
                apply_event(&doc, screen, event);
            }
        }
    }
    render(screen, now);
}

fn apply_event(doc: &web_sys::Document, screen: &Screen, event: &RoundEvent) {
    match event {
        RoundEvent::ScoreChanged(score) => overlay::set_score(doc, *score),
        RoundEvent::PhaseChanged(Phase::Complete) => {
            let s = screen.controller.state();
            if let Err(err) = overlay::show_game_over(doc, s.score(), s.total(), s.missed()) {
                tracing::warn!(?err, "could not render game over panel");
            }
        }
        RoundEvent::Missed(pair) => tracing::debug!(source = %pair.source, "missed"),
        RoundEvent::RoundLoaded { .. } | RoundEvent::Matched(_) | RoundEvent::PhaseChanged(_) => {}
    }
}

fn render(screen: &Screen, now: f64) {
    let ctx = &screen.ctx;
    let w = screen.canvas.width() as f64;
    let h = screen.canvas.height() as f64;
    ctx.set_fill_style_str("#000");
    ctx.fill_rect(0.0, 0.0, w, h);

    let state = screen.controller.state();
    if state.phase() == Phase::InProgress && !screen.controller.is_loaded() {
        ctx.set_font("20px 'Fira Code', monospace");
        ctx.set_fill_style_str("#888");
        ctx.fill_text("Generating words…", w / 2.0, h / 2.0).ok();
        ctx.set_font(WORD_FONT);
        return;
    }

    if let Some(start) = screen.loaded_at_ms {
        let elapsed = now - start;
        // Words enter above the top edge and leave below the bottom edge.
        let travel = h + 60.0;
        ctx.set_line_width(5.0);
        ctx.set_stroke_style_str("#000");
        ctx.set_fill_style_str("#fff");
        for item in state.pending() {
            let t = item.motion.progress(elapsed);
            if !(0.0..1.0).contains(&t) {
                continue;
            }
            let x = 60.0 + item.motion.x * (w - 120.0);
            let y = t * travel - 30.0;
            ctx.stroke_text(&item.pair.source, x, y).ok();
            ctx.fill_text(&item.pair.source, x, y).ok();
        }
    }

    if let Some((pair, at)) = &screen.last_match {
        let alpha = (1.0 - (now - at) / MATCH_FLASH_MS).clamp(0.0, 1.0);
        ctx.set_font("22px 'Fira Code', monospace");
        ctx.set_fill_style_str(&format!("rgba(120,230,140,{alpha:.2})"));
        ctx.fill_text(&format!("{} → {}", pair.source, pair.target), w / 2.0, h - 24.0)
            .ok();
        ctx.set_font(WORD_FONT);
    }
}
