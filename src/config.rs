use crate::pos::Pos;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Everything tunable, loaded from an optional JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub window: WindowConfig,
    pub timing: TimingConfig,
    pub rules: RulesConfig,
    pub input: InputConfig,
    /// JSON file holding the high score
    pub prefs_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self { width: 800, height: 600, title: "Mini Snake".to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimingConfig {
    /// Delay between loop iterations
    pub tick_ms: u64,
    /// Food blink half-period
    pub blink_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self { tick_ms: 200, blink_ms: 900 }
    }
}

impl TimingConfig {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn blink(&self) -> Duration {
        Duration::from_millis(self.blink_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RulesConfig {
    /// Cells along the shorter viewport side
    pub cells_across: u32,
    /// Where the snake respawns
    pub start: Pos,
    /// Ignore a steer to the exact opposite of the heading
    pub reject_reversal: bool,
    /// Never drop food on the snake while a free cell exists
    pub avoid_snake_body: bool,
    pub rng_seed: Option<u64>,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            cells_across: 26,
            start: Pos::new(5, 5),
            reject_reversal: true,
            avoid_snake_body: false,
            rng_seed: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputStrategy {
    /// Long press starts, dragging steers
    Drag,
    /// Tap starts, a quick swipe steers
    Fling,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputConfig {
    pub strategy: InputStrategy,
    pub long_press_ms: u64,
    pub drag_dead_zone: f32,
    pub fling_min_distance: f32,
    /// Pixels per second
    pub fling_min_velocity: f32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            strategy: InputStrategy::Drag,
            long_press_ms: 1000,
            drag_dead_zone: 8.0,
            fling_min_distance: 40.0,
            fling_min_velocity: 300.0,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            timing: TimingConfig::default(),
            rules: RulesConfig::default(),
            input: InputConfig::default(),
            prefs_path: PathBuf::from("snake_game.json"),
        }
    }
}

impl Config {
    /// Defaults when `path` is `None`, otherwise the file's values on top of them.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {:?}", path))?;
        serde_json::from_str(&text).with_context(|| format!("Failed to parse config {:?}", path))
    }
}
