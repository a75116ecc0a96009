//! Gameplay tuning
//!
//! Every constant the rules depend on, grouped so a host can load a JSON
//! override. The two historical rule sets of the game are exposed as presets.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Error;
use crate::consts::*;

/// Rule-set presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RuleSet {
    /// Single-file build: ball launches straight up
    Classic,
    /// Modular build: random launch within the spread, status bar
    #[default]
    Modular,
}

impl RuleSet {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleSet::Classic => "Classic",
            RuleSet::Modular => "Modular",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" | "single" => Some(RuleSet::Classic),
            "modular" => Some(RuleSet::Modular),
            _ => None,
        }
    }

    /// Launch spread either side of vertical (degrees)
    pub fn launch_spread(&self) -> f32 {
        match self {
            RuleSet::Classic => 0.0,
            RuleSet::Modular => LAUNCH_SPREAD,
        }
    }

    /// Explosion radius as a multiple of the larger brick dimension
    pub fn explosion_radius_multiplier(&self) -> f32 {
        match self {
            RuleSet::Classic => 1.5,
            RuleSet::Modular => EXPLOSION_RADIUS_MULTIPLIER,
        }
    }
}

/// Gameplay settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub rule_set: RuleSet,

    // === Playfield ===
    pub playfield_width: f32,
    pub playfield_height: f32,
    pub ui_bar_height: f32,

    // === Paddle / ball ===
    pub paddle_width: f32,
    pub paddle_height: f32,
    /// Degrees from vertical at the paddle edge
    pub paddle_angle_range: f32,
    pub ball_size: f32,
    pub start_ball_speed: f32,
    pub min_ball_speed: f32,
    pub max_ball_speed: f32,
    pub rotation_reverse_chance: f64,
    /// Degrees either side of vertical; 0 launches straight up
    pub launch_spread: f32,
    pub max_lives: u32,

    // === Bricks ===
    pub brick_rows: u32,
    pub brick_cols: u32,
    pub brick_width: f32,
    pub brick_height: f32,
    pub brick_gap: f32,
    pub brick_top: f32,
    pub orange_brick_count: u32,
    pub explosion_radius_multiplier: f32,

    // === Powerups ===
    pub powerup_radius: f32,
    pub powerup_fall_speed: f32,
    pub powerup_offscreen_margin: f32,
    pub speed_increase: f32,
    pub speed_decrease: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_rule_set(RuleSet::default())
    }
}

impl Settings {
    /// Create settings from a rule-set preset
    pub fn from_rule_set(rule_set: RuleSet) -> Self {
        Self {
            rule_set,

            playfield_width: PLAYFIELD_WIDTH,
            playfield_height: PLAYFIELD_HEIGHT,
            ui_bar_height: UI_BAR_HEIGHT,

            paddle_width: PADDLE_WIDTH,
            paddle_height: PADDLE_HEIGHT,
            paddle_angle_range: PADDLE_ANGLE_RANGE,
            ball_size: BALL_SIZE,
            start_ball_speed: START_BALL_SPEED,
            min_ball_speed: MIN_BALL_SPEED,
            max_ball_speed: MAX_BALL_SPEED,
            rotation_reverse_chance: BALL_ROTATION_REVERSE_CHANCE,
            launch_spread: rule_set.launch_spread(),
            max_lives: MAX_LIVES,

            brick_rows: BRICK_ROWS,
            brick_cols: BRICK_COLS,
            brick_width: BRICK_WIDTH,
            brick_height: BRICK_HEIGHT,
            brick_gap: BRICK_GAP,
            brick_top: BRICK_TOP,
            orange_brick_count: ORANGE_BRICK_COUNT,
            explosion_radius_multiplier: rule_set.explosion_radius_multiplier(),

            powerup_radius: POWERUP_RADIUS,
            powerup_fall_speed: POWERUP_FALL_SPEED,
            powerup_offscreen_margin: POWERUP_OFFSCREEN_MARGIN,
            speed_increase: SPEED_INCREASE,
            speed_decrease: SPEED_DECREASE,
        }
    }

    /// Apply a preset (updates only the preset-dependent settings)
    pub fn apply_rule_set(&mut self, rule_set: RuleSet) {
        self.rule_set = rule_set;
        self.launch_spread = rule_set.launch_spread();
        self.explosion_radius_multiplier = rule_set.explosion_radius_multiplier();
    }

    /// Blast radius of an exploding brick
    pub fn explosion_radius(&self) -> f32 {
        self.brick_width.max(self.brick_height) * self.explosion_radius_multiplier
    }

    /// Y coordinate past which the ball counts as lost
    pub fn ball_loss_y(&self) -> f32 {
        self.playfield_height - self.ui_bar_height
    }

    /// Y coordinate past which a falling powerup expires
    pub fn powerup_expiry_y(&self) -> f32 {
        self.playfield_height + self.powerup_offscreen_margin
    }

    /// Resting Y of the paddle centre
    pub fn paddle_y(&self) -> f32 {
        self.playfield_height - self.ui_bar_height - self.paddle_height
    }

    /// Clamp a speed into the allowed ball-speed range
    pub fn clamp_ball_speed(&self, speed: f32) -> f32 {
        speed.max(self.min_ball_speed).min(self.max_ball_speed)
    }

    /// Reject combinations the rules cannot run with
    pub fn validate(&self) -> Result<(), Error> {
        let mut errors = Vec::new();
        let (min, max) = (self.min_ball_speed, self.max_ball_speed);
        if !(min.is_finite() && max.is_finite() && min > 0.0 && min <= max) {
            errors.push(format!(
                "ball speed range {min}..={max} must be positive, finite and ordered"
            ));
        }
        if !(0.0..=1.0).contains(&self.rotation_reverse_chance) {
            errors.push(format!(
                "rotation_reverse_chance {} must lie in 0..=1",
                self.rotation_reverse_chance
            ));
        }
        if !(self.launch_spread.is_finite() && self.launch_spread >= 0.0) {
            errors.push(format!(
                "launch_spread {} must be finite and non-negative",
                self.launch_spread
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::Format(errors))
        }
    }

    /// Parse settings from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    return settings;
                }
                Err(e) => log::warn!("Ignoring settings {}: {e}", path.display()),
            },
            Err(e) => log::info!("No settings at {} ({e})", path.display()),
        }

        log::info!("Using default settings");
        Self::default()
    }
}
