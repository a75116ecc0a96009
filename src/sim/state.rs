//! Session state and side-effect notifications
//!
//! `GameState` is the single mutable record of a playthrough. Nothing here is
//! global: the session owns one and passes it to whatever needs it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bricks::BrickId;
use super::powerups::{PowerupId, PowerupKind};
use crate::Settings;
use crate::audio::SoundCue;

/// Current phase of a playthrough
///
/// Losing the ball is not a resting phase: the frame that detects it either
/// returns to `Idle` or ends in `GameOver`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Ball glued to the paddle, waiting for launch
    Idle,
    /// Ball in free flight
    Launched,
    /// Out of lives (terminal)
    GameOver,
    /// Every destructible brick cleared (terminal)
    Victory,
}

impl GamePhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, GamePhase::GameOver | GamePhase::Victory)
    }
}

/// Notifications for the host (rendering, audio, scene changes)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    BrickSpawned {
        id: BrickId,
        pos: Vec2,
        sprite: &'static str,
    },
    /// Brick survived a hit and should show a different sprite
    BrickDamaged {
        id: BrickId,
        sprite: &'static str,
    },
    BrickDestroyed {
        id: BrickId,
    },
    Explosion {
        pos: Vec2,
        radius: f32,
    },
    PowerupSpawned {
        id: PowerupId,
        pos: Vec2,
        kind: PowerupKind,
    },
    PowerupCaught {
        id: PowerupId,
        kind: PowerupKind,
    },
    PowerupExpired {
        id: PowerupId,
    },
    Sound(SoundCue),
    BallLaunched {
        vel: Vec2,
    },
    BallLost {
        lives_left: u32,
    },
    GameOver,
    Victory,
}

/// Mutable per-session record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub lives: u32,
    /// Always within [min_ball_speed, max_ball_speed]
    ball_speed: f32,
    min_ball_speed: f32,
    max_ball_speed: f32,
    pub phase: GamePhase,
    /// Ball spin direction, +1.0 or -1.0
    pub rotation_dir: f32,
    pub sfx_muted: bool,
    pub music_muted: bool,
    /// Destroyed powerup bricks only drop pickups while set
    pub powerups_enabled: bool,
}

impl GameState {
    pub fn new(settings: &Settings) -> Self {
        Self {
            lives: settings.max_lives,
            ball_speed: settings.clamp_ball_speed(settings.start_ball_speed),
            min_ball_speed: settings.min_ball_speed,
            max_ball_speed: settings.max_ball_speed,
            phase: GamePhase::Idle,
            rotation_dir: 1.0,
            sfx_muted: false,
            music_muted: false,
            powerups_enabled: true,
        }
    }

    /// Restore every field to its starting value
    pub fn reset(&mut self, settings: &Settings) {
        *self = Self::new(settings);
    }

    pub fn ball_speed(&self) -> f32 {
        self.ball_speed
    }

    /// Set the ball speed, clamped into the allowed range
    pub fn set_ball_speed(&mut self, speed: f32) {
        self.ball_speed = speed.max(self.min_ball_speed).min(self.max_ball_speed);
    }

    pub fn speed_up(&mut self, amount: f32) {
        self.ball_speed = (self.ball_speed + amount).min(self.max_ball_speed);
    }

    pub fn slow_down(&mut self, amount: f32) {
        self.ball_speed = (self.ball_speed - amount).max(self.min_ball_speed);
    }

    pub fn ball_launched(&self) -> bool {
        self.phase == GamePhase::Launched
    }

    pub fn reverse_rotation(&mut self) {
        self.rotation_dir = -self.rotation_dir;
    }

    pub fn toggle_sfx(&mut self) -> bool {
        self.sfx_muted = !self.sfx_muted;
        self.sfx_muted
    }

    pub fn toggle_music(&mut self) -> bool {
        self.music_muted = !self.music_muted;
        self.music_muted
    }

    /// Deduct one life. Returns true when that was the last one.
    pub fn lose_life(&mut self) -> bool {
        self.lives = self.lives.saturating_sub(1);
        self.lives == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_new_state_defaults() {
        let state = GameState::new(&Settings::default());
        assert_eq!(state.lives, 3);
        assert_eq!(state.ball_speed(), 200.0);
        assert_eq!(state.phase, GamePhase::Idle);
        assert!(!state.ball_launched());
        assert_eq!(state.rotation_dir, 1.0);
    }

    #[test]
    fn test_speed_clamps() {
        let mut state = GameState::new(&Settings::default());
        state.set_ball_speed(1000.0);
        assert_eq!(state.ball_speed(), 400.0);
        state.slow_down(1000.0);
        assert_eq!(state.ball_speed(), 50.0);
        state.speed_up(50.0);
        assert_eq!(state.ball_speed(), 100.0);
    }

    #[test]
    fn test_lose_life_reports_last() {
        let mut state = GameState::new(&Settings::default());
        assert!(!state.lose_life());
        assert!(!state.lose_life());
        assert!(state.lose_life());
        assert_eq!(state.lives, 0);
        // Never goes negative
        assert!(state.lose_life());
        assert_eq!(state.lives, 0);
    }

    #[test]
    fn test_reset_restores_fields() {
        let settings = Settings::default();
        let mut state = GameState::new(&settings);
        state.lives = 1;
        state.speed_up(100.0);
        state.reverse_rotation();
        state.toggle_sfx();
        state.toggle_music();
        state.phase = GamePhase::Launched;
        state.reset(&settings);
        assert_eq!(state, GameState::new(&settings));
    }

    #[test]
    fn test_inverted_range_does_not_panic() {
        let mut settings = Settings::default();
        settings.min_ball_speed = 500.0;
        let mut state = GameState::new(&settings);
        assert_eq!(state.ball_speed(), 400.0);
        state.set_ball_speed(10.0);
        assert_eq!(state.ball_speed(), 400.0);
    }

    proptest! {
        #[test]
        fn prop_speed_always_in_range(ops in prop::collection::vec((any::<bool>(), 0.0f32..500.0), 0..64)) {
            let mut state = GameState::new(&Settings::default());
            for (up, amount) in ops {
                if up { state.speed_up(amount) } else { state.slow_down(amount) }
                prop_assert!((50.0..=400.0).contains(&state.ball_speed()));
            }
        }
    }
}
