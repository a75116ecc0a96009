//! Ball and paddle interaction rules
//!
//! Pure functions over collision geometry. The host's physics engine detects
//! contacts; these decide the resulting velocity.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Axis-aligned box described by its centre and size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub center: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self { center, size }
    }

    /// Square box around a circle
    pub fn around_circle(center: Vec2, radius: f32) -> Self {
        Self::new(center, Vec2::splat(radius * 2.0))
    }

    pub fn min(&self) -> Vec2 {
        self.center - self.size / 2.0
    }

    pub fn max(&self) -> Vec2 {
        self.center + self.size / 2.0
    }

    /// Overlap test; touching edges count
    pub fn intersects(&self, other: &Rect) -> bool {
        let (a0, a1) = (self.min(), self.max());
        let (b0, b1) = (other.min(), other.max());
        !(a1.x < b0.x || a1.y < b0.y || a0.x > b1.x || a0.y > b1.y)
    }

    pub fn contains(&self, point: Vec2) -> bool {
        let (lo, hi) = (self.min(), self.max());
        point.x >= lo.x && point.x <= hi.x && point.y >= lo.y && point.y <= hi.y
    }
}

/// Velocity leaving the paddle
///
/// Only the hit offset matters: the centre sends the ball straight up and the
/// edges deflect it by `angle_range` degrees from vertical. Screen Y grows
/// downward, so "up" is negative Y.
pub fn reflect_off_paddle(
    ball_x: f32,
    paddle_x: f32,
    paddle_width: f32,
    speed: f32,
    angle_range: f32,
) -> Vec2 {
    let norm = ((ball_x - paddle_x) / (paddle_width / 2.0)).clamp(-1.0, 1.0);
    let angle = (norm * angle_range).to_radians();
    Vec2::new(speed * angle.sin(), -speed * angle.cos())
}

/// Keep direction, force magnitude to `target_speed`
#[inline]
pub fn renormalize_speed(velocity: Vec2, target_speed: f32) -> Vec2 {
    velocity.normalize_or_zero() * target_speed
}

/// Initial launch velocity, within `spread` degrees of straight up
pub fn launch_velocity<R: Rng>(speed: f32, spread: f32, rng: &mut R) -> Vec2 {
    let degrees = if spread > 0.0 {
        rng.random_range(-spread..=spread)
    } else {
        0.0
    };
    let angle = degrees.to_radians();
    Vec2::new(speed * angle.sin(), -speed * angle.cos())
}

/// Visual spin per frame (radians) for a ball moving at `speed`
#[inline]
pub fn spin_delta(speed: f32, rotation_dir: f32) -> f32 {
    speed / 5000.0 * rotation_dir
}

/// Whether a bounce reverses the ball's spin
pub fn roll_rotation_flip<R: Rng>(rng: &mut R, chance: f64) -> bool {
    rng.random_bool(chance.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const EPS: f32 = 0.001;

    #[test]
    fn test_centre_hit_goes_straight_up() {
        let v = reflect_off_paddle(400.0, 400.0, 120.0, 200.0, 60.0);
        assert!(v.x.abs() < EPS);
        assert!((v.y + 200.0).abs() < EPS);
    }

    #[test]
    fn test_right_edge_hit_is_sixty_degrees() {
        let v = reflect_off_paddle(460.0, 400.0, 120.0, 200.0, 60.0);
        let angle = v.x.atan2(-v.y).to_degrees();
        assert!((angle - 60.0).abs() < EPS);
        assert!((v.length() - 200.0).abs() < EPS);
    }

    #[test]
    fn test_offset_beyond_edge_is_clamped() {
        let edge = reflect_off_paddle(340.0, 400.0, 120.0, 200.0, 60.0);
        let beyond = reflect_off_paddle(300.0, 400.0, 120.0, 200.0, 60.0);
        assert!((edge - beyond).length() < EPS);
        assert!(edge.x < 0.0);
    }

    #[test]
    fn test_renormalize_keeps_direction() {
        let v = renormalize_speed(Vec2::new(3.0, -4.0), 250.0);
        assert!((v.length() - 250.0).abs() < EPS);
        assert!((v.x / v.y - 3.0 / -4.0).abs() < EPS);
        assert_eq!(renormalize_speed(Vec2::ZERO, 250.0), Vec2::ZERO);
    }

    #[test]
    fn test_straight_launch_without_spread() {
        let mut rng = Pcg32::seed_from_u64(1);
        let v = launch_velocity(200.0, 0.0, &mut rng);
        assert_eq!(v, Vec2::new(0.0, -200.0));
    }

    #[test]
    fn test_rect_intersects_inclusive() {
        let a = Rect::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
        let touching = Rect::new(Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0));
        let apart = Rect::new(Vec2::new(10.5, 0.0), Vec2::new(10.0, 10.0));
        assert!(a.intersects(&touching));
        assert!(!a.intersects(&apart));
        assert!(a.contains(Vec2::new(5.0, -5.0)));
        assert!(!a.contains(Vec2::new(5.1, 0.0)));
    }

    #[test]
    fn test_spin_follows_direction() {
        assert_eq!(spin_delta(5000.0, 1.0), 1.0);
        assert_eq!(spin_delta(5000.0, -1.0), -1.0);
    }

    #[test]
    fn test_rotation_flip_extremes() {
        let mut rng = Pcg32::seed_from_u64(3);
        assert!(!roll_rotation_flip(&mut rng, 0.0));
        assert!(roll_rotation_flip(&mut rng, 1.0));
    }

    proptest! {
        #[test]
        fn prop_paddle_reflection_has_ball_speed_and_goes_up(
            offset in -200.0f32..200.0,
            speed in 50.0f32..400.0,
        ) {
            let v = reflect_off_paddle(400.0 + offset, 400.0, 120.0, speed, 60.0);
            prop_assert!((v.length() - speed).abs() < 0.01);
            prop_assert!(v.y < 0.0);
            let angle = v.x.atan2(-v.y).to_degrees();
            prop_assert!(angle.abs() <= 60.0 + 0.01);
        }

        #[test]
        fn prop_launch_stays_within_spread(seed in any::<u64>(), spread in 0.0f32..=30.0) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let v = launch_velocity(200.0, spread, &mut rng);
            let angle = v.x.atan2(-v.y).to_degrees();
            prop_assert!(angle.abs() <= spread + 0.01);
            prop_assert!((v.length() - 200.0).abs() < 0.01);
        }
    }
}
