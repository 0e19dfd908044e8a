//! Word supply: where the vocabulary pairs for a round come from.
//!
//! A supply never fails from the caller's point of view. Whatever goes wrong
//! upstream is absorbed here and replaced by [`FALLBACK_PAIRS`], so the round
//! controller only ever sees a non-empty list of pairs.

use std::future::Future;

use serde::{Deserialize, Serialize};

mod chat;

pub use chat::ChatWordSupply;

use crate::config::SupplyConfig;

/// One vocabulary entry: the word shown on screen and the translation the
/// player has to type.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WordPair {
    pub source: String,
    pub target: String,
}

impl WordPair {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// Pairs handed out whenever the remote generator cannot deliver.
pub const FALLBACK_PAIRS: &[(&str, &str)] = &[
    ("Pomme", "Apple"),
    ("École", "School"),
    ("Ami", "Friend"),
    ("Voiture", "Car"),
    ("Eau", "Water"),
];

pub fn fallback_pairs() -> Vec<WordPair> {
    FALLBACK_PAIRS
        .iter()
        .map(|&(s, t)| WordPair::new(s, t))
        .collect()
}

/// Producer of the pairs for one round. Implementations must return at least
/// one pair; the returned length may differ from `count`.
pub trait WordSupply {
    fn supply(&self, count: usize) -> impl Future<Output = Vec<WordPair>>;
}

/// Fixed word list, used offline (no API key) and in tests.
#[derive(Clone, Debug)]
pub struct StaticWordSupply {
    pairs: Vec<WordPair>,
}

impl StaticWordSupply {
    /// An empty list is replaced by the fallback pairs.
    pub fn new(pairs: Vec<WordPair>) -> Self {
        if pairs.is_empty() {
            Self::fallback()
        } else {
            Self { pairs }
        }
    }

    pub fn fallback() -> Self {
        Self {
            pairs: fallback_pairs(),
        }
    }
}

impl WordSupply for StaticWordSupply {
    async fn supply(&self, count: usize) -> Vec<WordPair> {
        let take = count.clamp(1, self.pairs.len());
        self.pairs[..take].to_vec()
    }
}

/// Supply chosen from configuration: the chat generator when an API key is
/// present, the static fallback list otherwise.
#[derive(Clone, Debug)]
pub enum SupplyKind {
    Chat(ChatWordSupply),
    Static(StaticWordSupply),
}

impl SupplyKind {
    pub fn from_config(cfg: &SupplyConfig) -> Self {
        match ChatWordSupply::new(cfg.clone()) {
            Ok(chat) => SupplyKind::Chat(chat),
            Err(err) => {
                tracing::info!(%err, "using the built-in word list");
                SupplyKind::Static(StaticWordSupply::fallback())
            }
        }
    }
}

impl WordSupply for SupplyKind {
    async fn supply(&self, count: usize) -> Vec<WordPair> {
        match self {
            SupplyKind::Chat(s) => s.supply(count).await,
            SupplyKind::Static(s) => s.supply(count).await,
        }
    }
}

/// Parse generator text of the form `Pomme:Apple, Chien:Dog, ...` into pairs.
///
/// Chunks are separated by commas or newlines. A chunk without a `:` or with
/// an empty side is dropped rather than failing the whole reply; only the
/// first two `:`-separated fields of a chunk are used.
pub fn parse_pairs(text: &str) -> Vec<WordPair> {
    text.split([',', '\n'])
        .filter_map(|chunk| {
            let chunk = trim_chunk(chunk);
            // Anything after a second ':' is ignored.
            let mut fields = chunk.split(':');
            let source = trim_chunk(fields.next()?);
            let target = trim_chunk(fields.next()?);
            if source.is_empty() || target.is_empty() {
                return None;
            }
            Some(WordPair::new(source, target))
        })
        .collect()
}

fn trim_chunk(s: &str) -> &str {
    s.trim()
        .trim_matches(|c: char| c == '"' || c == '\'' || c == '.')
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn parses_comma_separated_pairs() {
        let pairs = parse_pairs("Pomme:Apple, Chien:Dog,Chat : Cat");
        assert_eq!(
            pairs,
            vec![
                WordPair::new("Pomme", "Apple"),
                WordPair::new("Chien", "Dog"),
                WordPair::new("Chat", "Cat"),
            ]
        );
    }

    #[test]
    fn skips_chunks_without_separator_or_side() {
        let pairs = parse_pairs("Pomme:Apple, garbage, :Dog, Chat:, Eau:Water.");
        assert_eq!(
            pairs,
            vec![WordPair::new("Pomme", "Apple"), WordPair::new("Eau", "Water")]
        );
    }

    #[test]
    fn extra_fields_after_target_are_ignored() {
        let pairs = parse_pairs("Pomme:Apple:x, Chien:Dog:");
        assert_eq!(
            pairs,
            vec![WordPair::new("Pomme", "Apple"), WordPair::new("Chien", "Dog")]
        );
    }

    #[test]
    fn accepts_quoted_and_newline_separated_chunks() {
        let pairs = parse_pairs("\"Maison:House\"\n'Livre:Book'");
        assert_eq!(
            pairs,
            vec![WordPair::new("Maison", "House"), WordPair::new("Livre", "Book")]
        );
    }

    #[test]
    fn static_supply_truncates_but_never_empties() {
        let supply = StaticWordSupply::fallback();
        assert_eq!(block_on(supply.supply(3)).len(), 3);
        assert_eq!(block_on(supply.supply(0)).len(), 1);
        assert_eq!(block_on(supply.supply(50)).len(), FALLBACK_PAIRS.len());
    }

    #[test]
    fn empty_static_list_uses_fallback() {
        let supply = StaticWordSupply::new(Vec::new());
        assert_eq!(block_on(supply.supply(10)), fallback_pairs());
    }

    #[test]
    fn supply_kind_without_key_is_static() {
        let kind = SupplyKind::from_config(&SupplyConfig::default());
        assert!(matches!(kind, SupplyKind::Static(_)));
    }
}
