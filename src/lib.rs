//! Ricochet - brick breaker gameplay core
//!
//! Core modules:
//! - `sim`: Gameplay rules (bricks, powerups, ball/paddle rules, frame loop)
//! - `level`: Text level format parser and validation
//! - `settings`: Tunable constants and rule-set presets
//! - `audio`: Sound cues requested by the core
//! - `headless`: Minimal host used by the demo binary and tests
//!
//! Rendering, physics stepping, input and audio playback belong to the host.

pub mod audio;
pub mod error;
pub mod headless;
pub mod level;
pub mod settings;
pub mod sim;

pub use error::Error;
pub use level::{ParsedLevel, parse_level, validate_level};
pub use settings::{RuleSet, Settings};

/// Game configuration constants (defaults for [`Settings`])
pub mod consts {
    /// Playfield dimensions
    pub const PLAYFIELD_WIDTH: f32 = 800.0;
    pub const PLAYFIELD_HEIGHT: f32 = 600.0;
    /// Status bar along the bottom edge; the ball is lost once it enters it
    pub const UI_BAR_HEIGHT: f32 = 60.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 120.0;
    pub const PADDLE_HEIGHT: f32 = 20.0;
    /// Maximum deflection from vertical at the paddle edge (degrees)
    pub const PADDLE_ANGLE_RANGE: f32 = 60.0;

    /// Ball defaults
    pub const BALL_SIZE: f32 = 16.0;
    pub const START_BALL_SPEED: f32 = 200.0;
    pub const MIN_BALL_SPEED: f32 = 50.0;
    pub const MAX_BALL_SPEED: f32 = 400.0;
    /// Chance that a bounce reverses the ball's spin
    pub const BALL_ROTATION_REVERSE_CHANCE: f64 = 0.2;
    /// Launch spread either side of vertical (degrees)
    pub const LAUNCH_SPREAD: f32 = 30.0;

    /// Brick grid
    pub const BRICK_ROWS: u32 = 6;
    pub const BRICK_COLS: u32 = 10;
    pub const BRICK_WIDTH: f32 = 64.0;
    pub const BRICK_HEIGHT: f32 = 32.0;
    pub const BRICK_GAP: f32 = 4.0;
    pub const BRICK_TOP: f32 = 60.0;
    pub const ORANGE_BRICK_COUNT: u32 = 4;
    pub const EXPLOSION_RADIUS_MULTIPLIER: f32 = 1.5;

    /// Powerups
    pub const POWERUP_RADIUS: f32 = 14.0;
    pub const POWERUP_FALL_SPEED: f32 = 150.0;
    /// Distance below the playfield at which a powerup expires
    pub const POWERUP_OFFSCREEN_MARGIN: f32 = 50.0;
    pub const SPEED_INCREASE: f32 = 50.0;
    pub const SPEED_DECREASE: f32 = 30.0;

    pub const MAX_LIVES: u32 = 3;
    /// Number of bounce sound variants (bounce-var1 ..= bounce-varN)
    pub const SFX_BOUNCE_VARIANTS: u8 = 5;
}

/// X coordinate of the first column centre when `cols` bricks are centred
/// horizontally in a playfield of `field_width`.
#[inline]
pub fn centered_start_x(cols: usize, field_width: f32, brick_width: f32, gap: f32) -> f32 {
    let cols = cols as f32;
    let total = cols * brick_width + (cols - 1.0).max(0.0) * gap;
    (field_width - total) / 2.0 + brick_width / 2.0
}
