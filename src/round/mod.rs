//! Round controller: the falling-word lifecycle and scoring state machine.
//!
//! A word starts out *pending* (falling). It leaves that state either by being
//! typed correctly ([`RoundController::submit_input`], it becomes *matched*)
//! or by leaving the play area ([`RoundController::mark_exited`], it becomes
//! *missed*). Once nothing is pending and every word is accounted for, the
//! round completes.
//!
//! Starting a round is split in two so the word fetch can run asynchronously
//! without holding the controller: [`RoundController::request_round`] resets
//! state and hands out a [`RoundTicket`], and [`RoundController::load_round`]
//! applies the fetched words only if that ticket is still the current one.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

pub mod motion;

use self::motion::{Motion, MotionSource};
use crate::words::{WordPair, WordSupply};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Phase {
    NotStarted,
    InProgress,
    Complete,
}

/// A word on its way down the screen.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FallingItem {
    pub pair: WordPair,
    pub motion: Motion,
}

/// Authoritative state of one round. Read-only outside this module.
#[derive(Clone, Debug)]
pub struct RoundState {
    pending: Vec<FallingItem>,
    exited: HashSet<String>,
    matched: Vec<WordPair>,
    missed: Vec<WordPair>,
    total: usize,
    score: u32,
    current_input: String,
    phase: Phase,
}

impl RoundState {
    fn new() -> Self {
        Self {
            pending: Vec::new(),
            exited: HashSet::new(),
            matched: Vec::new(),
            missed: Vec::new(),
            total: 0,
            score: 0,
            current_input: String::new(),
            phase: Phase::NotStarted,
        }
    }

    pub fn pending(&self) -> &[FallingItem] {
        &self.pending
    }
    pub fn is_exited(&self, source: &str) -> bool {
        self.exited.contains(source)
    }
    pub fn exited_count(&self) -> usize {
        self.exited.len()
    }
    pub fn matched(&self) -> &[WordPair] {
        &self.matched
    }
    pub fn missed(&self) -> &[WordPair] {
        &self.missed
    }
    pub fn total(&self) -> usize {
        self.total
    }
    pub fn score(&self) -> u32 {
        self.score
    }
    pub fn current_input(&self) -> &str {
        &self.current_input
    }
    pub fn phase(&self) -> Phase {
        self.phase
    }

    fn is_matched(&self, source: &str) -> bool {
        self.matched.iter().any(|p| p.source == source)
    }
}

/// Serializable read projection handed to the presentation layer / JS.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RoundSnapshot {
    pub phase: Phase,
    pub score: u32,
    pub total: usize,
    pub current_input: String,
    pub pending: Vec<String>,
    pub matched: Vec<WordPair>,
    pub missed: Vec<WordPair>,
}

/// State-change notification, drained by the presentation layer each frame.
#[derive(Clone, Debug, PartialEq)]
pub enum RoundEvent {
    RoundLoaded { total: usize },
    ScoreChanged(u32),
    Matched(WordPair),
    Missed(WordPair),
    PhaseChanged(Phase),
}

#[derive(Clone, Debug, PartialEq)]
pub enum SubmitOutcome {
    Matched(WordPair),
    NoMatch,
}

/// Proof that a round was requested. Only the ticket of the latest request
/// can load words.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoundTicket {
    generation: u64,
    requested: usize,
}

impl RoundTicket {
    pub fn requested(&self) -> usize {
        self.requested
    }
}

// Shared by all controllers, so a ticket is never valid for a controller
// other than the one that issued it.
static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

pub struct RoundController {
    state: RoundState,
    generation: u64,
    // Distinct from `phase`: InProgress is set before the words arrive.
    loaded: bool,
    events: Vec<RoundEvent>,
}

impl Default for RoundController {
    fn default() -> Self {
        Self::new()
    }
}

impl RoundController {
    pub fn new() -> Self {
        Self {
            state: RoundState::new(),
            generation: 0,
            loaded: false,
            events: Vec::new(),
        }
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    /// True once the current round's words have been loaded.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn snapshot(&self) -> RoundSnapshot {
        let s = &self.state;
        RoundSnapshot {
            phase: s.phase,
            score: s.score,
            total: s.total,
            current_input: s.current_input.clone(),
            pending: s.pending.iter().map(|i| i.pair.source.clone()).collect(),
            matched: s.matched.clone(),
            missed: s.missed.clone(),
        }
    }

    pub fn drain_events(&mut self) -> Vec<RoundEvent> {
        std::mem::take(&mut self.events)
    }

    /// First half of starting a round: reset everything and invalidate any
    /// outstanding fetch. A count of zero is ignored.
    pub fn request_round(&mut self, requested: usize) -> Option<RoundTicket> {
        if requested == 0 {
            tracing::debug!("ignoring round request for zero words");
            return None;
        }
        self.generation = NEXT_GENERATION.fetch_add(1, Ordering::Relaxed);
        self.loaded = false;
        let previous = self.state.phase;
        self.state = RoundState::new();
        self.state.phase = Phase::InProgress;
        if previous != Phase::InProgress {
            self.events.push(RoundEvent::PhaseChanged(Phase::InProgress));
        }
        self.events.push(RoundEvent::ScoreChanged(0));
        tracing::info!(generation = self.generation, requested, "round requested");
        Some(RoundTicket {
            generation: self.generation,
            requested,
        })
    }

    /// Second half of starting a round. Returns `false` without touching state
    /// when `ticket` belongs to a round that has since been replaced.
    ///
    /// Pairs repeating an earlier source are dropped; `total` counts the items
    /// actually loaded.
    pub fn load_round<M: MotionSource>(
        &mut self,
        ticket: RoundTicket,
        pairs: Vec<WordPair>,
        motion: &mut M,
    ) -> bool {
        if ticket.generation != self.generation || self.loaded {
            tracing::debug!(
                stale = ticket.generation,
                current = self.generation,
                "discarding stale word list"
            );
            return false;
        }
        let mut seen = HashSet::new();
        let mut pending = Vec::with_capacity(pairs.len());
        for pair in pairs {
            if !seen.insert(pair.source.clone()) {
                tracing::warn!(source = %pair.source, "duplicate source word dropped");
                continue;
            }
            let motion = motion.next_motion(pending.len());
            pending.push(FallingItem { pair, motion });
        }
        self.state.total = pending.len();
        self.state.pending = pending;
        self.loaded = true;
        tracing::info!(total = self.state.total, "round loaded");
        self.events.push(RoundEvent::RoundLoaded {
            total: self.state.total,
        });
        self.check_completion();
        true
    }

    /// Request, fetch and load in one go.
    pub async fn start_round<S, M>(&mut self, requested: usize, supply: &S, motion: &mut M) -> bool
    where
        S: WordSupply,
        M: MotionSource,
    {
        let Some(ticket) = self.request_round(requested) else {
            return false;
        };
        let pairs = supply.supply(ticket.requested()).await;
        self.load_round(ticket, pairs, motion)
    }

    /// Record the player's current text and match it against the falling
    /// words. Matching is case-insensitive and exact; on duplicate targets
    /// the earliest pending word wins.
    pub fn submit_input(&mut self, text: &str) -> SubmitOutcome {
        self.state.current_input = text.to_string();
        let typed = text.to_lowercase();
        let Some(idx) = self
            .state
            .pending
            .iter()
            .position(|item| item.pair.target.to_lowercase() == typed)
        else {
            return SubmitOutcome::NoMatch;
        };
        if self.state.is_exited(&self.state.pending[idx].pair.source) {
            return SubmitOutcome::NoMatch;
        }

        let item = self.state.pending.remove(idx);
        let pair = item.pair;
        self.state.score += 1;
        self.state.exited.remove(&pair.source);
        self.state.missed.retain(|p| p.source != pair.source);
        self.state.matched.push(pair.clone());
        self.state.current_input.clear();

        self.events.push(RoundEvent::ScoreChanged(self.state.score));
        self.events.push(RoundEvent::Matched(pair.clone()));
        self.check_completion();
        SubmitOutcome::Matched(pair)
    }

    /// Called by the presentation layer when a word leaves the play area.
    /// Returns whether anything changed; repeated, early, late and unknown
    /// exits are ignored.
    pub fn mark_exited(&mut self, source: &str) -> bool {
        if self.state.phase != Phase::InProgress || !self.loaded {
            return false;
        }
        if self.state.is_exited(source) {
            return false;
        }
        let Some(idx) = self
            .state
            .pending
            .iter()
            .position(|item| item.pair.source == source)
        else {
            return false;
        };

        let item = self.state.pending.remove(idx);
        self.state.exited.insert(item.pair.source.clone());
        if !self.state.is_matched(source) {
            self.state.missed.push(item.pair.clone());
            self.events.push(RoundEvent::Missed(item.pair));
        }
        self.check_completion();
        true
    }

    fn check_completion(&mut self) {
        let s = &self.state;
        let done = s.phase == Phase::InProgress
            && self.loaded
            && s.total > 0
            && s.pending.is_empty()
            && s.exited.len() + s.matched.len() == s.total;
        if done {
            self.state.phase = Phase::Complete;
            tracing::info!(
                score = self.state.score,
                total = self.state.total,
                "round complete"
            );
            self.events.push(RoundEvent::PhaseChanged(Phase::Complete));
        }
    }
}
