// Integration tests (native) for full rounds: supply -> controller -> exits.
// These avoid wasm/browser APIs and drive the async supply with block_on.

use futures::executor::block_on;
use word_rain::config::FallConfig;
use word_rain::round::motion::RandomMotion;
use word_rain::words::{StaticWordSupply, WordPair, fallback_pairs};
use word_rain::{Phase, RoundController};

fn motion() -> RandomMotion {
    RandomMotion::seeded(42, FallConfig::default())
}

fn supply(raw: &[(&str, &str)]) -> StaticWordSupply {
    StaticWordSupply::new(raw.iter().map(|&(s, t)| WordPair::new(s, t)).collect())
}

const WORDS: &[(&str, &str)] = &[
    ("Pomme", "Apple"),
    ("Chien", "Dog"),
    ("Chat", "Cat"),
    ("Maison", "House"),
];

#[test]
fn start_round_loads_supplied_words() {
    let mut ctl = RoundController::new();
    assert!(block_on(ctl.start_round(3, &supply(WORDS), &mut motion())));
    let s = ctl.state();
    assert_eq!(s.phase(), Phase::InProgress);
    assert_eq!(s.total(), 3);
    assert_eq!(s.pending().len(), 3);
    assert_eq!(s.score(), 0);
}

#[test]
fn start_round_with_zero_is_ignored() {
    let mut ctl = RoundController::new();
    assert!(!block_on(ctl.start_round(0, &supply(WORDS), &mut motion())));
    assert_eq!(ctl.state().phase(), Phase::NotStarted);
}

#[test]
fn shorter_supply_sets_total_to_what_arrived() {
    let mut ctl = RoundController::new();
    let short = StaticWordSupply::fallback();
    assert!(block_on(ctl.start_round(20, &short, &mut motion())));
    assert_eq!(ctl.state().total(), fallback_pairs().len());
}

#[test]
fn motion_descriptors_follow_fall_config() {
    let fall = FallConfig::default();
    let mut ctl = RoundController::new();
    let mut m = RandomMotion::seeded(3, fall.clone());
    block_on(ctl.start_round(4, &supply(WORDS), &mut m));
    for (i, item) in ctl.state().pending().iter().enumerate() {
        assert!(item.motion.start_delay_ms >= i as f64 * fall.stagger_ms);
        assert!(item.motion.fall_duration_ms >= fall.min_duration_ms);
    }
}

/// Every way of resolving four words (typed or exited, in order) must end
/// the round exactly when the last word is resolved, with score + missed
/// equal to the word count.
#[test]
fn completion_holds_for_every_resolution_pattern() {
    let n = WORDS.len();
    for mask in 0u32..(1 << n) {
        let mut ctl = RoundController::new();
        assert!(block_on(ctl.start_round(n, &supply(WORDS), &mut motion())));
        for (i, (source, target)) in WORDS.iter().enumerate() {
            assert_eq!(ctl.state().phase(), Phase::InProgress, "mask {mask:04b} step {i}");
            if mask & (1 << i) != 0 {
                ctl.submit_input(&target.to_uppercase());
            } else {
                assert!(ctl.mark_exited(source));
            }
        }
        let s = ctl.state();
        assert_eq!(s.phase(), Phase::Complete, "mask {mask:04b}");
        assert_eq!(s.score() as usize, mask.count_ones() as usize);
        assert_eq!(s.score() as usize + s.missed().len(), n);
        assert_eq!(s.exited_count() + s.matched().len(), s.total());
        assert!(s.matched().iter().all(|m| !s.missed().contains(m)));
    }
}

#[test]
fn stale_fetch_does_not_overwrite_newer_round() {
    let mut ctl = RoundController::new();
    let mut m = motion();
    let first = ctl.request_round(4).unwrap();
    let second = ctl.request_round(2).unwrap();

    let newer = block_on(word_rain::WordSupply::supply(&supply(&WORDS[2..]), second.requested()));
    assert!(ctl.load_round(second, newer, &mut m));
    let older = block_on(word_rain::WordSupply::supply(&supply(WORDS), first.requested()));
    assert!(!ctl.load_round(first, older, &mut m));

    let sources: Vec<_> = ctl
        .state()
        .pending()
        .iter()
        .map(|i| i.pair.source.as_str())
        .collect();
    assert_eq!(sources, ["Chat", "Maison"]);
}

#[test]
fn replay_after_completion_starts_fresh() {
    let mut ctl = RoundController::new();
    block_on(ctl.start_round(1, &supply(WORDS), &mut motion()));
    ctl.submit_input("apple");
    assert_eq!(ctl.state().phase(), Phase::Complete);

    assert!(block_on(ctl.start_round(2, &supply(WORDS), &mut motion())));
    let s = ctl.state();
    assert_eq!(s.phase(), Phase::InProgress);
    assert_eq!(s.score(), 0);
    assert!(s.matched().is_empty());
    assert_eq!(s.pending().len(), 2);
}
