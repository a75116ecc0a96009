//! Session and per-frame update
//!
//! The host engine integrates ball physics and detects contacts. It reports
//! contacts through the `on_*_hit` entry points and calls [`tick`] once per
//! frame with the integrated ball body.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::bricks::{BrickField, BrickId, DestroyReport};
use super::powerups::{PowerupEvent, PowerupField, PowerupId, PowerupKind};
use super::rules::{
    Rect, launch_velocity, reflect_off_paddle, renormalize_speed, roll_rotation_flip, spin_delta,
};
use super::state::{GameEvent, GamePhase, GameState};
use crate::Settings;
use crate::audio::SoundCue;
use crate::level::ParsedLevel;

/// Ball body as the core sees it
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Visual spin angle in radians
    pub rotation: f32,
}

/// Host-integrated ball position and velocity for this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallSample {
    pub pos: Vec2,
    pub vel: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paddle {
    /// Centre x
    pub x: f32,
    /// Centre y
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Paddle {
    pub fn new(settings: &Settings) -> Self {
        Self {
            x: settings.playfield_width / 2.0,
            y: settings.paddle_y(),
            width: settings.paddle_width,
            height: settings.paddle_height,
        }
    }

    /// Move horizontally, keeping the whole paddle on the playfield
    pub fn move_to(&mut self, x: f32, playfield_width: f32) {
        let half = self.width / 2.0;
        self.x = x.clamp(half, (playfield_width - half).max(half));
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(Vec2::new(self.x, self.y), Vec2::new(self.width, self.height))
    }
}

/// Playfield boundaries the ball can bounce off. The bottom is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wall {
    Left,
    Right,
    Top,
}

/// Where the bricks of a playthrough come from
#[derive(Debug, Clone)]
pub enum Layout {
    DefaultGrid,
    Level(ParsedLevel),
}

/// Input for a single frame
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    /// Pointer x for the paddle
    pub paddle_x: Option<f32>,
    /// Launch trigger (click/space)
    pub launch: bool,
    /// Ball body after the host's physics step
    pub ball: Option<BallSample>,
}

/// Everything one playthrough owns
#[derive(Debug, Clone)]
pub struct Session {
    pub state: GameState,
    pub bricks: BrickField,
    pub powerups: PowerupField,
    pub ball: Ball,
    pub paddle: Paddle,
    settings: Settings,
    layout: Layout,
    rng: Pcg32,
    events: Vec<GameEvent>,
}

impl Session {
    /// New session on the default randomized grid
    pub fn new(seed: u64, settings: Settings) -> Self {
        Self::with_layout(seed, settings, Layout::DefaultGrid)
    }

    /// New session on a parsed level, honouring its config block
    pub fn from_level(seed: u64, settings: Settings, level: ParsedLevel) -> Self {
        Self::with_layout(seed, settings, Layout::Level(level))
    }

    pub fn with_layout(seed: u64, settings: Settings, layout: Layout) -> Self {
        let mut session = Self {
            state: GameState::new(&settings),
            bricks: BrickField::new(&settings),
            powerups: PowerupField::new(&settings),
            ball: Ball::default(),
            paddle: Paddle::new(&settings),
            settings,
            layout: Layout::DefaultGrid,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
        };
        session.restart_with(layout);
        session
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Clear bricks, powerups and pending events and reset the state
    pub fn reset(&mut self) {
        self.bricks.clear();
        self.powerups.clear();
        self.events.clear();
        self.state.reset(&self.settings);
        self.paddle = Paddle::new(&self.settings);
        self.glue_ball();
    }

    /// Reset, then build a fresh brick field from `layout`
    pub fn restart_with(&mut self, layout: Layout) {
        self.reset();

        match &layout {
            Layout::DefaultGrid => {
                self.bricks = BrickField::default_grid(&self.settings, &mut self.rng);
                log::info!("Starting session on default grid ({} bricks)", self.bricks.len());
            }
            Layout::Level(level) => {
                self.bricks = BrickField::from_level(level, &self.settings);
                if let Some(speed) = level.config.ball_speed() {
                    self.state.set_ball_speed(speed);
                }
                if let Some(lives) = level.config.lives() {
                    self.state.lives = lives;
                }
                self.state.powerups_enabled = level.config.powerups_enabled();
                log::info!(
                    "Starting session on level '{}' ({} bricks)",
                    level.name().unwrap_or("unnamed"),
                    self.bricks.len()
                );
            }
        }

        let spawned: Vec<GameEvent> = self
            .bricks
            .iter()
            .map(|b| GameEvent::BrickSpawned {
                id: b.id,
                pos: b.pos,
                sprite: b.sprite(),
            })
            .collect();
        self.events.extend(spawned);
        self.layout = layout;
    }

    /// Start over on the same layout
    pub fn restart(&mut self) {
        let layout = self.layout.clone();
        self.restart_with(layout);
    }

    /// Hand pending notifications to the host
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn pending_events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Ball touched the paddle at the sampled contact. Returns the new
    /// ball velocity.
    pub fn on_paddle_hit(&mut self, contact: BallSample) -> Vec2 {
        if !self.state.ball_launched() {
            return self.ball.vel;
        }
        self.ball.pos = contact.pos;
        self.ball.vel = reflect_off_paddle(
            contact.pos.x,
            self.paddle.x,
            self.paddle.width,
            self.state.ball_speed(),
            self.settings.paddle_angle_range,
        );
        self.bounce();
        self.ball.vel
    }

    /// Ball touched a brick. Returns false for unknown or destroyed ids.
    pub fn on_brick_hit(&mut self, id: BrickId) -> bool {
        if self.state.phase.is_terminal() {
            return false;
        }
        let Some((outcome, report)) = self.bricks.hit(id) else {
            log::warn!("Ignoring hit on unknown brick {id:?}");
            return false;
        };

        self.bounce();
        if let Some(sprite) = outcome.damaged_sprite {
            self.events.push(GameEvent::BrickDamaged { id, sprite });
        }
        self.apply_destroy_report(report);
        true
    }

    /// Ball bounced off a playfield wall
    pub fn on_wall_hit(&mut self, wall: Wall) {
        if !self.state.ball_launched() {
            return;
        }
        log::trace!("Wall bounce: {wall:?}");
        self.bounce();
    }

    /// Destroy a brick outright, with the usual chain reaction
    pub fn destroy_brick(&mut self, id: BrickId) {
        let report = self.bricks.destroy(id);
        self.apply_destroy_report(report);
    }

    /// Drop a powerup explicitly; a missing kind is picked at random
    pub fn spawn_powerup(&mut self, pos: Vec2, kind: Option<PowerupKind>) -> PowerupId {
        let (id, kind) = self.powerups.spawn(pos, kind, &mut self.rng);
        self.events.push(GameEvent::PowerupSpawned { id, pos, kind });
        id
    }

    fn apply_destroy_report(&mut self, report: DestroyReport) {
        for id in &report.destroyed {
            self.events.push(GameEvent::BrickDestroyed { id: *id });
        }

        let radius = self.bricks.explosion_radius();
        for pos in &report.explosions {
            self.events.push(GameEvent::Explosion { pos: *pos, radius });
            self.cue(SoundCue::Explosion);
        }

        if self.state.powerups_enabled {
            for pos in report.powerup_drops {
                self.spawn_powerup(pos, None);
            }
        }
    }

    /// Sound and spin side effects shared by every bounce
    fn bounce(&mut self) {
        // Rolled even when muted so the RNG stream does not depend on audio
        let cue = SoundCue::random_bounce(&mut self.rng);
        self.cue(cue);
        if roll_rotation_flip(&mut self.rng, self.settings.rotation_reverse_chance) {
            self.state.reverse_rotation();
        }
    }

    fn cue(&mut self, cue: SoundCue) {
        if !self.state.sfx_muted {
            self.events.push(GameEvent::Sound(cue));
        }
    }

    /// Park the ball on top of the paddle
    fn glue_ball(&mut self) {
        let offset = self.paddle.height / 2.0 + self.settings.ball_size / 2.0;
        self.ball.pos = Vec2::new(self.paddle.x, self.paddle.y - offset);
        self.ball.vel = Vec2::ZERO;
    }

    fn launch(&mut self) {
        let vel = launch_velocity(
            self.state.ball_speed(),
            self.settings.launch_spread,
            &mut self.rng,
        );
        self.ball.vel = vel;
        self.state.phase = GamePhase::Launched;
        self.events.push(GameEvent::BallLaunched { vel });
    }

    fn lose_ball(&mut self) {
        let last = self.state.lose_life();
        self.cue(SoundCue::Death);
        self.events.push(GameEvent::BallLost {
            lives_left: self.state.lives,
        });
        log::info!("Ball lost, {} lives left", self.state.lives);

        if last {
            self.state.phase = GamePhase::GameOver;
            self.events.push(GameEvent::GameOver);
            log::info!("Game over");
        } else {
            self.state.phase = GamePhase::Idle;
            self.glue_ball();
        }
    }
}

/// Advance the session by one frame
///
/// Within a frame: speed renormalisation, then ball loss, then powerups, then
/// the victory check. Terminal phases ignore further frames.
pub fn tick(session: &mut Session, input: &FrameInput, dt: f32) {
    if session.state.phase.is_terminal() {
        return;
    }

    if let Some(x) = input.paddle_x {
        session.paddle.move_to(x, session.settings.playfield_width);
    }

    match session.state.phase {
        GamePhase::Idle => {
            session.glue_ball();
            if input.launch && session.state.lives > 0 {
                session.launch();
            }
        }
        GamePhase::Launched => {
            if let Some(sample) = input.ball {
                session.ball.pos = sample.pos;
                session.ball.vel = sample.vel;
            }
        }
        GamePhase::GameOver | GamePhase::Victory => {}
    }

    // Engine bounces drift the magnitude; pin it to the current speed
    if session.state.ball_launched() {
        let speed = session.state.ball_speed();
        session.ball.vel = renormalize_speed(session.ball.vel, speed);
        session.ball.rotation += spin_delta(speed, session.state.rotation_dir);
    }

    if session.state.ball_launched() && session.ball.pos.y > session.settings.ball_loss_y() {
        session.lose_ball();
        if session.state.phase.is_terminal() {
            return;
        }
    }

    let paddle = session.paddle.bounds();
    let outcomes = session
        .powerups
        .update(dt, &paddle, &mut session.state, &session.settings);
    for outcome in outcomes {
        match outcome {
            PowerupEvent::Caught { id, kind } => {
                log::debug!("Caught {} powerup", kind.as_str());
                session.events.push(GameEvent::PowerupCaught { id, kind });
                session.cue(SoundCue::PowerUp);
            }
            PowerupEvent::Expired { id } => {
                session.events.push(GameEvent::PowerupExpired { id });
            }
        }
    }

    if session.bricks.all_destroyed() {
        session.state.phase = GamePhase::Victory;
        session.events.push(GameEvent::Victory);
        log::info!("Victory with {} lives left", session.state.lives);
    }
}
