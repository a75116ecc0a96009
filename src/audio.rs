//! Sound cues requested by the gameplay core
//!
//! The core never plays audio; it emits cues that the host maps to loaded
//! sound assets by key.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::SFX_BOUNCE_VARIANTS;

/// Sound effect cues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundCue {
    /// Ball bounced off paddle, brick or wall (variant 1..=5)
    Bounce(u8),
    /// Ball fell past the paddle
    Death,
    /// Orange brick exploded
    Explosion,
    /// Powerup caught by the paddle
    PowerUp,
}

impl SoundCue {
    /// Pick a bounce variant uniformly
    pub fn random_bounce<R: Rng>(rng: &mut R) -> Self {
        SoundCue::Bounce(rng.random_range(1..=SFX_BOUNCE_VARIANTS))
    }

    /// Asset key the host plays for this cue
    pub fn key(&self) -> String {
        match self {
            SoundCue::Bounce(n) => format!("bounce-var{n}"),
            SoundCue::Death => "death".to_string(),
            SoundCue::Explosion => "explosion".to_string(),
            SoundCue::PowerUp => "powerUp".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_cue_keys() {
        assert_eq!(SoundCue::Bounce(3).key(), "bounce-var3");
        assert_eq!(SoundCue::Death.key(), "death");
        assert_eq!(SoundCue::Explosion.key(), "explosion");
        assert_eq!(SoundCue::PowerUp.key(), "powerUp");
    }

    #[test]
    fn test_random_bounce_in_range() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..200 {
            match SoundCue::random_bounce(&mut rng) {
                SoundCue::Bounce(n) => assert!((1..=SFX_BOUNCE_VARIANTS).contains(&n)),
                other => panic!("unexpected cue {other:?}"),
            }
        }
    }
}
