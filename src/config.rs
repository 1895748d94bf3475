//! Tunable game rules
//!
//! Every balance constant lives in [`Rules`]. Defaults are the shipped rule
//! set; players can override any subset in `rules.toml` under the OS config
//! directory (via `directories`):
//! - Linux: `$XDG_CONFIG_HOME/booksnek/rules.toml`
//! - macOS: `~/Library/Application Support/booksnek/rules.toml`

use std::path::{Path, PathBuf};

use crate::game::TileKind;
use derive_more::{Display, Error, From};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// File name looked up in the config directory.
pub const RULES_FILE: &str = "rules.toml";

/// Failure to read or parse a rules file.
#[derive(Debug, Display, Error, From)]
pub enum ConfigError {
    #[display("could not read rules file: {_0}")]
    Read(std::io::Error),
    #[display("malformed rules file: {_0}")]
    Parse(toml::de::Error),
}

/// Word length that guarantees a special tile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LengthRule {
    pub length: usize,
    /// Also applies to every longer word.
    #[serde(default)]
    pub or_longer: bool,
    pub kind: TileKind,
}

impl LengthRule {
    pub fn matches(&self, length: usize) -> bool {
        if self.or_longer {
            length >= self.length
        } else {
            length == self.length
        }
    }
}

/// Attack countdown for letters below a rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerTier {
    pub below_rank: u32,
    pub timer: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    pub starting_hp: u32,
    /// Each level needs `level * exp_increment` more EXP than the last.
    pub exp_increment: u64,
    pub history_len: usize,
    /// Length of the first bonus word.
    pub bonus_start_len: usize,
    /// Minimum frequency weight of a bonus word, indexed by word length.
    pub bonus_thresholds: Vec<f64>,
    /// Checked in order; first match wins.
    pub spawn_table: Vec<LengthRule>,
    /// Words remembered for the adverse-tile roll.
    pub rolling_window: usize,
    pub adverse_slope: f64,
    pub adverse_intercept: f64,
    pub attack_weight: f64,
    pub poison_weight: f64,
    /// Checked in order; letters past every tier use `attack_timer_max`.
    pub attack_timer_tiers: Vec<TimerTier>,
    pub attack_timer_max: u32,
    pub poison_timer: u32,
    pub special_timer: u32,
    pub level_buff_min: u32,
    pub level_buff_max: u32,
    pub save_slots: u32,
    pub hi_score_len: usize,
    /// Delay between resolved batches in the interactive loop.
    pub step_ms: u64,
    /// Word list to play with instead of the embedded one.
    pub dictionary: Option<PathBuf>,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            starting_hp: 15,
            exp_increment: 100,
            history_len: 17,
            bonus_start_len: 3,
            bonus_thresholds: vec![
                0.0, 0.0, 0.0, 0.16, 0.22, 0.28, 0.36, 0.42, 0.48, 0.55, 0.61, 0.68, 0.74, 0.8,
                0.87, 0.93, 0.99, 1.07, 1.13, 1.28, 1.31, 1.38,
            ],
            spawn_table: vec![
                LengthRule {
                    length: 5,
                    or_longer: false,
                    kind: TileKind::Silver,
                },
                LengthRule {
                    length: 6,
                    or_longer: false,
                    kind: TileKind::Heal,
                },
                LengthRule {
                    length: 7,
                    or_longer: true,
                    kind: TileKind::Gold,
                },
            ],
            rolling_window: 5,
            adverse_slope: -0.375,
            adverse_intercept: 1.975,
            attack_weight: 0.8,
            poison_weight: 0.2,
            attack_timer_tiers: vec![
                TimerTier {
                    below_rank: 3,
                    timer: 2,
                },
                TimerTier {
                    below_rank: 8,
                    timer: 3,
                },
            ],
            attack_timer_max: 4,
            poison_timer: 5,
            special_timer: 3,
            level_buff_min: 1,
            level_buff_max: 3,
            save_slots: 5,
            hi_score_len: 10,
            step_ms: 200,
            dictionary: None,
        }
    }
}

impl Rules {
    /// Load from the standard config location, falling back to defaults.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::config_path() {
            Some(path) => Self::from_path(&path),
            None => {
                debug!("no config directory; using default rules");
                Ok(Self::default())
            }
        }
    }

    /// Load from a file. A missing file yields the defaults.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "rules file not found; using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let rules = Self::from_toml_str(&content)?;
        info!(path = %path.display(), "rules loaded");
        Ok(rules)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// `$CONFIG/booksnek/rules.toml`, if the platform has a config directory.
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "booksnek").map(|dirs| dirs.config_dir().join(RULES_FILE))
    }

    /// Bonus-word frequency floor for a word length.
    pub fn bonus_threshold(&self, length: usize) -> f64 {
        self.bonus_thresholds
            .get(length)
            .or(self.bonus_thresholds.last())
            .copied()
            .unwrap_or(0.0)
    }

    /// Guaranteed special tile for a word length, if any.
    pub fn special_for_length(&self, length: usize) -> Option<TileKind> {
        self.spawn_table
            .iter()
            .find(|rule| rule.matches(length))
            .map(|rule| rule.kind)
    }

    /// Attack countdown for a letter of the given rank.
    pub fn attack_timer(&self, rank: u32) -> u32 {
        self.attack_timer_tiers
            .iter()
            .find(|tier| rank < tier.below_rank)
            .map(|tier| tier.timer)
            .unwrap_or(self.attack_timer_max)
    }

    /// Chance that a short word spawns a hazard, given the recent average length.
    pub fn adverse_probability(&self, average_len: f64) -> f64 {
        (self.adverse_slope * average_len + self.adverse_intercept).clamp(0.0, 1.0)
    }
}
