//! Falling powerups

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::rules::Rect;
use super::state::GameState;
use crate::{Error, Settings};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PowerupId(pub u32);

/// Powerup effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerupKind {
    SpeedUp,
    SlowDown,
}

impl PowerupKind {
    pub const ALL: [PowerupKind; 2] = [PowerupKind::SpeedUp, PowerupKind::SlowDown];

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerupKind::SpeedUp => "speedup",
            PowerupKind::SlowDown => "slowdown",
        }
    }

    pub fn from_id(id: &str) -> Result<Self, Error> {
        match id.to_lowercase().as_str() {
            "speedup" => Ok(PowerupKind::SpeedUp),
            "slowdown" => Ok(PowerupKind::SlowDown),
            _ => Err(Error::UnknownPowerupType(id.to_string())),
        }
    }

    /// Uniform pick between the two kinds
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        if rng.random_bool(0.5) {
            PowerupKind::SpeedUp
        } else {
            PowerupKind::SlowDown
        }
    }

    /// Sprite key for the pickup
    pub fn sprite(&self) -> &'static str {
        match self {
            PowerupKind::SpeedUp => "powerup_speedup",
            PowerupKind::SlowDown => "powerup_slowdown",
        }
    }

    /// Apply the effect; the state keeps the speed in range
    pub fn apply(&self, state: &mut GameState, settings: &Settings) {
        match self {
            PowerupKind::SpeedUp => state.speed_up(settings.speed_increase),
            PowerupKind::SlowDown => state.slow_down(settings.speed_decrease),
        }
        log::debug!("{} applied, ball speed {}", self.as_str(), state.ball_speed());
    }
}

/// A live falling pickup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Powerup {
    pub id: PowerupId,
    pub kind: PowerupKind,
    pub pos: Vec2,
    /// Constant, pointing down
    pub vel: Vec2,
}

impl Powerup {
    pub fn bounds(&self, radius: f32) -> Rect {
        Rect::around_circle(self.pos, radius)
    }
}

/// Terminal outcome of a powerup during an update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerupEvent {
    Caught { id: PowerupId, kind: PowerupKind },
    Expired { id: PowerupId },
}

/// Live powerup collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerupField {
    powerups: Vec<Powerup>,
    radius: f32,
    fall_speed: f32,
    /// Powerups below this line are gone
    expiry_y: f32,
    next_id: u32,
}

impl PowerupField {
    pub fn new(settings: &Settings) -> Self {
        Self {
            powerups: Vec::new(),
            radius: settings.powerup_radius,
            fall_speed: settings.powerup_fall_speed,
            expiry_y: settings.powerup_expiry_y(),
            next_id: 1,
        }
    }

    /// Spawn a powerup at `pos`; a missing kind is picked at random
    pub fn spawn<R: Rng>(
        &mut self,
        pos: Vec2,
        kind: Option<PowerupKind>,
        rng: &mut R,
    ) -> (PowerupId, PowerupKind) {
        let kind = kind.unwrap_or_else(|| PowerupKind::random(rng));
        let id = PowerupId(self.next_id);
        self.next_id += 1;
        self.powerups.push(Powerup {
            id,
            kind,
            pos,
            vel: Vec2::new(0.0, self.fall_speed),
        });
        (id, kind)
    }

    /// Advance every powerup by `dt` seconds, then expire or catch
    ///
    /// Each powerup ends at most once: expiry is checked before the paddle.
    pub fn update(
        &mut self,
        dt: f32,
        paddle: &Rect,
        state: &mut GameState,
        settings: &Settings,
    ) -> Vec<PowerupEvent> {
        let mut events = Vec::new();
        let (radius, expiry_y) = (self.radius, self.expiry_y);

        self.powerups.retain_mut(|powerup| {
            powerup.pos += powerup.vel * dt;

            if powerup.pos.y > expiry_y {
                events.push(PowerupEvent::Expired { id: powerup.id });
                return false;
            }

            if powerup.bounds(radius).intersects(paddle) {
                powerup.kind.apply(state, settings);
                events.push(PowerupEvent::Caught {
                    id: powerup.id,
                    kind: powerup.kind,
                });
                return false;
            }

            true
        });

        events
    }

    pub fn iter(&self) -> impl Iterator<Item = &Powerup> {
        self.powerups.iter()
    }

    pub fn count(&self) -> usize {
        self.powerups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.powerups.is_empty()
    }

    pub fn of_kind(&self, kind: PowerupKind) -> impl Iterator<Item = &Powerup> {
        self.powerups.iter().filter(move |p| p.kind == kind)
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn clear(&mut self) {
        self.powerups.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const DT: f32 = 1.0 / 60.0;

    fn paddle_at(x: f32) -> Rect {
        Rect::new(Vec2::new(x, 520.0), Vec2::new(120.0, 20.0))
    }

    fn setup() -> (Settings, GameState, PowerupField, Pcg32) {
        let settings = Settings::default();
        let state = GameState::new(&settings);
        let field = PowerupField::new(&settings);
        (settings, state, field, Pcg32::seed_from_u64(7))
    }

    #[test]
    fn test_from_id() {
        assert_eq!(PowerupKind::from_id("speedup").unwrap(), PowerupKind::SpeedUp);
        assert_eq!(PowerupKind::from_id("SlowDown").unwrap(), PowerupKind::SlowDown);
        assert!(matches!(
            PowerupKind::from_id("multiball"),
            Err(Error::UnknownPowerupType(_))
        ));
    }

    #[test]
    fn test_catch_applies_effect() {
        let (settings, mut state, mut field, mut rng) = setup();
        let (id, _) = field.spawn(Vec2::new(400.0, 515.0), Some(PowerupKind::SpeedUp), &mut rng);

        let events = field.update(DT, &paddle_at(400.0), &mut state, &settings);
        assert_eq!(
            events,
            vec![PowerupEvent::Caught {
                id,
                kind: PowerupKind::SpeedUp
            }]
        );
        assert_eq!(state.ball_speed(), 250.0);
        assert!(field.is_empty());
    }

    #[test]
    fn test_slowdown_respects_floor() {
        let (settings, mut state, mut field, mut rng) = setup();
        state.set_ball_speed(60.0);
        field.spawn(Vec2::new(400.0, 515.0), Some(PowerupKind::SlowDown), &mut rng);
        field.update(DT, &paddle_at(400.0), &mut state, &settings);
        assert_eq!(state.ball_speed(), 50.0);
    }

    #[test]
    fn test_expiry_has_no_effect() {
        let (settings, mut state, mut field, mut rng) = setup();
        let (id, _) = field.spawn(Vec2::new(400.0, 649.0), Some(PowerupKind::SpeedUp), &mut rng);

        // Paddle placed right on top: expiry still wins
        let paddle = Rect::new(Vec2::new(400.0, 651.0), Vec2::new(120.0, 20.0));
        let events = field.update(DT, &paddle, &mut state, &settings);
        assert_eq!(events, vec![PowerupEvent::Expired { id }]);
        assert_eq!(state.ball_speed(), 200.0);
    }

    #[test]
    fn test_falls_at_constant_speed() {
        let (settings, mut state, mut field, mut rng) = setup();
        field.spawn(Vec2::new(100.0, 100.0), None, &mut rng);
        let events = field.update(0.5, &paddle_at(700.0), &mut state, &settings);
        assert!(events.is_empty());
        let p = field.iter().next().unwrap();
        assert_eq!(p.pos, Vec2::new(100.0, 175.0));
    }

    #[test]
    fn test_random_kind_covers_both() {
        let (_, _, mut field, mut rng) = setup();
        for _ in 0..64 {
            field.spawn(Vec2::ZERO, None, &mut rng);
        }
        assert!(field.of_kind(PowerupKind::SpeedUp).count() > 0);
        assert!(field.of_kind(PowerupKind::SlowDown).count() > 0);
        assert_eq!(field.count(), 64);
        field.clear();
        assert!(field.is_empty());
    }

    proptest! {
        #[test]
        fn prop_every_powerup_terminates(
            starts in prop::collection::vec((0.0f32..800.0, 0.0f32..600.0), 1..20),
            paddle_x in 60.0f32..740.0,
            seed in any::<u64>(),
        ) {
            let settings = Settings::default();
            let mut state = GameState::new(&settings);
            let mut field = PowerupField::new(&settings);
            let mut rng = Pcg32::seed_from_u64(seed);
            for (x, y) in &starts {
                field.spawn(Vec2::new(*x, *y), None, &mut rng);
            }

            let mut ended = 0;
            let mut steps = 0;
            while !field.is_empty() {
                ended += field.update(DT, &paddle_at(paddle_x), &mut state, &settings).len();
                steps += 1;
                prop_assert!(steps < 1000);
                prop_assert!((50.0..=400.0).contains(&state.ball_speed()));
            }
            prop_assert_eq!(ended, starts.len());
        }
    }
}
