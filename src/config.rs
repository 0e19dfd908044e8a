//! Game configuration handed over by the host page as JSON.
//!
//! Every field is optional; missing values fall back to the defaults below.
//! Credentials for the remote word generator travel in here too, so nothing in
//! the crate reads ambient environment.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-4o";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub min_words: usize,
    pub max_words: usize,
    pub default_words: usize,
    pub fall: FallConfig,
    pub supply: SupplyConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            min_words: 5,
            max_words: 20,
            default_words: 10,
            fall: FallConfig::default(),
            supply: SupplyConfig::default(),
        }
    }
}

/// Timing of the falling animation, in milliseconds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallConfig {
    pub min_duration_ms: f64,
    pub max_duration_ms: f64,
    /// Delay added per item index so words enter one after another.
    pub stagger_ms: f64,
    /// Random extra delay on top of the stagger.
    pub jitter_ms: f64,
    /// Horizontal margin as a fraction of the play-area width.
    pub x_margin: f64,
}

impl Default for FallConfig {
    fn default() -> Self {
        Self {
            min_duration_ms: 6_000.0,
            max_duration_ms: 10_000.0,
            stagger_ms: 1_500.0,
            jitter_ms: 800.0,
            x_margin: 0.05,
        }
    }
}

#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupplyConfig {
    pub endpoint: String,
    pub model: String,
    pub temperature: f32,
    pub api_key: Option<String>,
    pub source_language: String,
    pub target_language: String,
    /// CEFR level quoted in the generation prompt.
    pub level: String,
}

impl Default for SupplyConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 1.0,
            api_key: None,
            source_language: "French".to_string(),
            target_language: "English".to_string(),
            level: "B1".to_string(),
        }
    }
}

impl fmt::Debug for SupplyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupplyConfig")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("source_language", &self.source_language)
            .field("target_language", &self.target_language)
            .field("level", &self.level)
            .finish()
    }
}

impl SupplyConfig {
    /// API key if one is set and not blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

impl GameConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: GameConfig = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_words == 0 || self.min_words > self.max_words {
            return Err(ConfigError::InvalidWordRange {
                min: self.min_words,
                max: self.max_words,
            });
        }
        let f = &self.fall;
        let timings_ok = f.min_duration_ms > 0.0
            && f.min_duration_ms <= f.max_duration_ms
            && f.stagger_ms >= 0.0
            && f.jitter_ms >= 0.0;
        if !timings_ok {
            return Err(ConfigError::InvalidFallTiming);
        }
        if !(0.0..0.5).contains(&f.x_margin) {
            return Err(ConfigError::InvalidMargin);
        }
        Ok(())
    }

    /// Clamp a player-chosen word count into the configured range.
    pub fn clamp_word_count(&self, requested: usize) -> usize {
        requested.clamp(self.min_words, self.max_words)
    }
}
