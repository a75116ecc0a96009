//! Headless host
//!
//! Stands in for the game engine: integrates the ball, resolves box
//! collisions against walls, paddle and bricks, reports contacts to the
//! [`Session`] and drives [`tick`] on a fixed timestep. Used by the demo
//! binary and end-to-end tests.

use serde::Serialize;

use crate::sim::{
    BallSample, BrickId, FrameInput, GameEvent, GamePhase, Rect, Session, Wall, tick,
};

/// Fixed simulation step (seconds)
pub const FIXED_DT: f32 = 1.0 / 60.0;

/// Cap on catch-up steps per `advance` call
const MAX_STEPS_PER_ADVANCE: u32 = 8;

/// Paddle and launch decisions for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Controls {
    pub paddle_x: Option<f32>,
    pub launch: bool,
}

/// Outcome of an autoplay run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub frames: u64,
    pub phase: Option<GamePhase>,
    pub lives: u32,
    pub bricks_left: usize,
    pub bricks_destroyed: usize,
    pub explosions: usize,
    pub powerups_caught: usize,
    pub powerups_expired: usize,
    pub balls_lost: usize,
}

impl RunSummary {
    fn record(&mut self, event: &GameEvent) {
        match event {
            GameEvent::BrickDestroyed { .. } => self.bricks_destroyed += 1,
            GameEvent::Explosion { .. } => self.explosions += 1,
            GameEvent::PowerupCaught { .. } => self.powerups_caught += 1,
            GameEvent::PowerupExpired { .. } => self.powerups_expired += 1,
            GameEvent::BallLost { .. } => self.balls_lost += 1,
            _ => {}
        }
    }
}

/// Minimal engine around a session
pub struct HeadlessHost {
    pub session: Session,
    accumulator: f32,
    frames: u64,
}

impl HeadlessHost {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            accumulator: 0.0,
            frames: 0,
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Run as many fixed steps as `elapsed` seconds cover
    pub fn advance(&mut self, elapsed: f32, controls: Controls) -> Vec<GameEvent> {
        self.accumulator += elapsed.max(0.0);
        let mut events = Vec::new();
        let mut steps = 0;
        while self.accumulator >= FIXED_DT && steps < MAX_STEPS_PER_ADVANCE {
            events.extend(self.step(controls));
            self.accumulator -= FIXED_DT;
            steps += 1;
        }
        // Drop time we could not catch up on
        if steps == MAX_STEPS_PER_ADVANCE {
            self.accumulator = 0.0;
        }
        events
    }

    /// One fixed step: physics, contacts, then the session frame
    pub fn step(&mut self, controls: Controls) -> Vec<GameEvent> {
        let ball = if self.session.state.ball_launched() {
            Some(self.integrate_ball(FIXED_DT))
        } else {
            None
        };

        let input = FrameInput {
            paddle_x: controls.paddle_x,
            launch: controls.launch,
            ball,
        };
        tick(&mut self.session, &input, FIXED_DT);
        self.frames += 1;
        self.session.drain_events()
    }

    /// Play until the session ends or `max_frames` pass, asking `pilot`
    /// for controls every frame
    pub fn autoplay_with<F>(&mut self, max_frames: u64, mut pilot: F) -> RunSummary
    where
        F: FnMut(&Session, u64) -> Controls,
    {
        let mut summary = RunSummary::default();
        for _ in 0..max_frames {
            if self.session.state.phase.is_terminal() {
                break;
            }
            let controls = pilot(&self.session, self.frames);
            for event in self.step(controls) {
                summary.record(&event);
            }
        }

        summary.frames = self.frames;
        summary.phase = Some(self.session.state.phase);
        summary.lives = self.session.state.lives;
        summary.bricks_left = self.session.bricks.remaining_count();
        log::info!(
            "Autoplay finished after {} frames: {:?}, {} lives, {} bricks left",
            summary.frames,
            self.session.state.phase,
            summary.lives,
            summary.bricks_left
        );
        summary
    }

    /// Play with the built-in tracking pilot
    pub fn autoplay(&mut self, max_frames: u64) -> RunSummary {
        self.autoplay_with(max_frames, tracking_pilot)
    }

    /// Move the ball and resolve at most one contact of each kind
    fn integrate_ball(&mut self, dt: f32) -> BallSample {
        let settings = self.session.settings();
        let (field_w, radius) = (settings.playfield_width, settings.ball_size / 2.0);

        let mut pos = self.session.ball.pos + self.session.ball.vel * dt;
        let mut vel = self.session.ball.vel;

        let mut wall = None;
        if pos.x - radius < 0.0 {
            pos.x = radius;
            vel.x = vel.x.abs();
            wall = Some(Wall::Left);
        } else if pos.x + radius > field_w {
            pos.x = field_w - radius;
            vel.x = -vel.x.abs();
            wall = Some(Wall::Right);
        }
        if pos.y - radius < 0.0 {
            pos.y = radius;
            vel.y = vel.y.abs();
            wall = Some(Wall::Top);
        }

        self.session.ball.pos = pos;
        self.session.ball.vel = vel;
        if let Some(wall) = wall {
            self.session.on_wall_hit(wall);
        }

        let ball_box = Rect::around_circle(pos, radius);
        let paddle = self.session.paddle;
        if vel.y > 0.0 && pos.y <= paddle.y && ball_box.intersects(&paddle.bounds()) {
            self.session.on_paddle_hit(BallSample { pos, vel });
            self.session.ball.pos.y = paddle.y - paddle.height / 2.0 - radius;
        } else if let Some((id, axis, sign)) = self.brick_contact(ball_box) {
            let ball = &mut self.session.ball;
            match axis {
                Axis::X => ball.vel.x = ball.vel.x.abs() * sign,
                Axis::Y => ball.vel.y = ball.vel.y.abs() * sign,
            }
            self.session.on_brick_hit(id);
        }

        BallSample {
            pos: self.session.ball.pos,
            vel: self.session.ball.vel,
        }
    }

    /// First brick (by id) the ball overlaps, with the axis to reflect on
    /// and the sign that points away from the brick
    fn brick_contact(&self, ball_box: Rect) -> Option<(BrickId, Axis, f32)> {
        let size = self.session.bricks.brick_size();
        let brick = self
            .session
            .bricks
            .active_bricks()
            .find(|b| b.bounds(size).intersects(&ball_box))?;

        let delta = ball_box.center - brick.pos;
        let overlap = (ball_box.size + size) / 2.0 - delta.abs();
        let (axis, d) = if overlap.x < overlap.y {
            (Axis::X, delta.x)
        } else {
            (Axis::Y, delta.y)
        };
        let sign = if d >= 0.0 { 1.0 } else { -1.0 };
        Some((brick.id, axis, sign))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    X,
    Y,
}

/// Follow the ball with a slowly drifting offset so hit angles vary
pub fn tracking_pilot(session: &Session, frame: u64) -> Controls {
    let t = frame as f32 * 0.01;
    let drift = (t.sin() * 0.3 + (t * 0.7).sin() * 0.15) * session.paddle.width / 2.0;
    let target = if session.state.ball_launched() {
        // Lead the ball slightly
        let ahead = session.ball.pos + session.ball.vel.normalize_or_zero() * 30.0;
        ahead.x + drift
    } else {
        session.settings().playfield_width / 2.0 + drift
    };

    Controls {
        paddle_x: Some(target),
        launch: !session.state.ball_launched(),
    }
}

/// Keep the paddle at `x` no matter what
pub fn parked_pilot(x: f32) -> impl FnMut(&Session, u64) -> Controls {
    move |session: &Session, _frame: u64| Controls {
        paddle_x: Some(x),
        launch: !session.state.ball_launched(),
    }
}
