//! Gameplay simulation
//!
//! All gameplay rules live here. The module stays host-agnostic:
//! - Seeded RNG only
//! - Entities addressed by id, never by renderer objects
//! - Side effects reported as `GameEvent`s
//! - No rendering, audio or platform dependencies

pub mod bricks;
pub mod catalog;
pub mod powerups;
pub mod rules;
pub mod state;
pub mod tick;

pub use bricks::{Brick, BrickField, BrickId, BrickStats, DestroyReport, HitOutcome};
pub use catalog::{BrickKind, BrickTypeDef};
pub use powerups::{Powerup, PowerupEvent, PowerupField, PowerupId, PowerupKind};
pub use rules::{Rect, launch_velocity, reflect_off_paddle, renormalize_speed};
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{Ball, BallSample, FrameInput, Layout, Paddle, Session, Wall, tick};
