// Dataset invariants for the built-in fallback word list.

use std::collections::HashSet;

use word_rain::words::{FALLBACK_PAIRS, fallback_pairs, parse_pairs};

#[test]
fn fallback_sources_and_targets_are_unique_and_nonempty() {
    let mut sources = HashSet::new();
    let mut targets = HashSet::new();
    for (s, t) in FALLBACK_PAIRS {
        assert!(!s.trim().is_empty() && !t.trim().is_empty());
        assert!(sources.insert(*s), "duplicate source '{}'", s);
        assert!(
            targets.insert(t.to_lowercase()),
            "duplicate target '{}'",
            t
        );
    }
}

#[test]
fn fallback_list_has_five_pairs() {
    assert_eq!(fallback_pairs().len(), 5);
    assert_eq!(fallback_pairs()[0].source, "Pomme");
}

#[test]
fn fallback_list_survives_text_round_trip() {
    let text = FALLBACK_PAIRS
        .iter()
        .map(|(s, t)| format!("{s}:{t}"))
        .collect::<Vec<_>>()
        .join(", ");
    assert_eq!(parse_pairs(&text), fallback_pairs());
}
