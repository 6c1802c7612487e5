use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub const DURATION_RANGE: (u64, u64) = (10, 120);
pub const DURATION_STEP: u64 = 5;
pub const SIZE_RANGE: (f64, f64) = (40.0, 140.0);
pub const SIZE_STEP: f64 = 10.0;

#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    Classic,
    Speed,
    Precision,
    Tracking,
}

impl GameMode {
    pub const ALL: [GameMode; 4] = [
        GameMode::Classic,
        GameMode::Speed,
        GameMode::Precision,
        GameMode::Tracking,
    ];

    pub fn title(self) -> &'static str {
        match self {
            GameMode::Classic => "Classic",
            GameMode::Speed => "Speed",
            GameMode::Precision => "Precision",
            GameMode::Tracking => "Reflex",
        }
    }

    pub fn blurb(self) -> &'static str {
        match self {
            GameMode::Classic => "One target at a time. Click as fast and accurately as you can.",
            GameMode::Speed => "Multiple targets appear. Destroy them all before time runs out!",
            GameMode::Precision => "Targets shrink over time. Hit the center for maximum points.",
            GameMode::Tracking => "Targets appear and disappear quickly. Test your reflexes!",
        }
    }

    /// How long a spawned target takes to shrink to nothing, when shrinking.
    pub fn shrink_duration_ms(self) -> f64 {
        match self {
            GameMode::Precision => 2500.0,
            GameMode::Tracking => 1500.0,
            _ => 3000.0,
        }
    }
}

/// Session configuration, fixed for the duration of a session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameSettings {
    pub mode: GameMode,
    /// Simultaneous targets (only meaningful in speed mode).
    pub target_count: usize,
    /// Base target diameter in pixels.
    pub target_size: f64,
    /// Session length in seconds.
    pub duration_secs: u64,
    pub shrink_targets: bool,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            mode: GameMode::Classic,
            target_count: 1,
            target_size: 80.0,
            duration_secs: 30,
            shrink_targets: false,
        }
    }
}

impl GameSettings {
    /// Build settings the way the menu does: target count and shrink
    /// behavior derive from the chosen mode.
    pub fn preset(mode: GameMode, duration_secs: u64, target_size: f64) -> Self {
        Self {
            mode,
            target_count: if mode == GameMode::Speed { 3 } else { 1 },
            target_size,
            duration_secs,
            shrink_targets: mode == GameMode::Precision,
        }
    }

    /// Live targets the session keeps on screen at once.
    pub fn required_targets(&self) -> usize {
        if self.mode == GameMode::Speed {
            self.target_count.max(1)
        } else {
            1
        }
    }

    pub fn is_valid(&self) -> bool {
        self.duration_secs > 0 && self.target_size > 0.0
    }
}

pub fn clamp_duration(secs: u64) -> u64 {
    secs.clamp(DURATION_RANGE.0, DURATION_RANGE.1)
}

pub fn clamp_size(px: f64) -> f64 {
    px.clamp(SIZE_RANGE.0, SIZE_RANGE.1)
}
