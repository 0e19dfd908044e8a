use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::config::FallConfig;

/// How one falling word moves. Assigned once when the round loads and never
/// recomputed, otherwise the word would jump on screen.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Motion {
    /// Left edge as a fraction of the play-area width (0..1).
    pub x: f64,
    pub fall_duration_ms: f64,
    pub start_delay_ms: f64,
}

impl Motion {
    /// Fall progress at `elapsed_ms` since the round loaded: negative before
    /// the word enters, 1.0 or more once it has left the play area.
    pub fn progress(&self, elapsed_ms: f64) -> f64 {
        (elapsed_ms - self.start_delay_ms) / self.fall_duration_ms
    }
}

pub trait MotionSource {
    fn next_motion(&mut self, index: usize) -> Motion;
}

/// Random x position and fall speed; start delays staggered by item index.
pub struct RandomMotion {
    rng: SmallRng,
    fall: FallConfig,
}

impl RandomMotion {
    pub fn new(fall: FallConfig) -> Self {
        Self {
            rng: SmallRng::from_entropy(),
            fall,
        }
    }

    pub fn seeded(seed: u64, fall: FallConfig) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            fall,
        }
    }
}

impl MotionSource for RandomMotion {
    fn next_motion(&mut self, index: usize) -> Motion {
        let f = &self.fall;
        let margin = f.x_margin;
        let x = self.rng.gen_range(margin..=1.0 - margin);
        let fall_duration_ms = if f.max_duration_ms > f.min_duration_ms {
            self.rng.gen_range(f.min_duration_ms..f.max_duration_ms)
        } else {
            f.min_duration_ms
        };
        let jitter = if f.jitter_ms > 0.0 {
            self.rng.gen_range(0.0..f.jitter_ms)
        } else {
            0.0
        };
        Motion {
            x,
            fall_duration_ms,
            start_delay_ms: index as f64 * f.stagger_ms + jitter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_motion_stays_in_bounds() {
        let fall = FallConfig::default();
        let mut src = RandomMotion::seeded(7, fall.clone());
        for i in 0..50 {
            let m = src.next_motion(i);
            assert!(m.x >= fall.x_margin && m.x <= 1.0 - fall.x_margin);
            assert!(m.fall_duration_ms >= fall.min_duration_ms);
            assert!(m.fall_duration_ms < fall.max_duration_ms);
            let base = i as f64 * fall.stagger_ms;
            assert!(m.start_delay_ms >= base && m.start_delay_ms < base + fall.jitter_ms);
        }
    }

    #[test]
    fn fixed_timing_when_range_collapses() {
        let fall = FallConfig {
            min_duration_ms: 4_000.0,
            max_duration_ms: 4_000.0,
            jitter_ms: 0.0,
            ..FallConfig::default()
        };
        let m = RandomMotion::seeded(1, fall).next_motion(2);
        assert_eq!(m.fall_duration_ms, 4_000.0);
        assert_eq!(m.start_delay_ms, 3_000.0);
    }

    #[test]
    fn progress_accounts_for_delay() {
        let m = Motion {
            x: 0.5,
            fall_duration_ms: 1_000.0,
            start_delay_ms: 500.0,
        };
        assert!(m.progress(0.0) < 0.0);
        assert_eq!(m.progress(1_000.0), 0.5);
        assert!(m.progress(1_500.0) >= 1.0);
    }
}
