//! Brick field
//!
//! Owns the live bricks of a playthrough: hits, destruction, chain-reaction
//! explosions and the victory predicate.

use std::collections::{BTreeMap, HashSet};

use glam::Vec2;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::catalog::BrickKind;
use super::rules::Rect;
use crate::level::{ParsedLevel, SpecialEffect};
use crate::{Error, Settings, centered_start_x};

/// Stable brick identifier; the only handle the renderer keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BrickId(pub u32);

/// A live brick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brick {
    pub id: BrickId,
    pub kind: BrickKind,
    /// Centre in playfield coordinates
    pub pos: Vec2,
    hits: u32,
    /// Ignores hits and explosions, not required for victory
    pub indestructible: bool,
    /// Reserved level tag, no runtime behaviour
    pub effect: Option<SpecialEffect>,
    /// Grid (row, col) the brick occupies
    pub cell: Option<(u32, u32)>,
    active: bool,
}

impl Brick {
    pub fn new(id: BrickId, kind: BrickKind, pos: Vec2) -> Self {
        Self {
            id,
            kind,
            pos,
            hits: kind.def().hits,
            indestructible: false,
            effect: None,
            cell: None,
            active: true,
        }
    }

    /// Build from a catalog identifier; unknown identifiers are rejected
    pub fn from_type_id(id: BrickId, type_id: &str, pos: Vec2) -> Result<Self, Error> {
        Ok(Self::new(id, BrickKind::from_id(type_id)?, pos))
    }

    pub fn hits(&self) -> u32 {
        self.hits
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Take one hit. Returns true exactly when the last hit point goes.
    pub fn apply_hit(&mut self) -> bool {
        if !self.active || self.indestructible || self.hits == 0 {
            return false;
        }
        self.hits -= 1;
        self.hits == 0
    }

    /// Sprite key for the current damage state
    pub fn sprite(&self) -> &'static str {
        let def = self.kind.def();
        match def.damaged_sprite {
            Some(damaged) if self.hits > 0 && self.hits < def.hits => damaged,
            _ => def.sprite,
        }
    }

    pub fn bounds(&self, size: Vec2) -> Rect {
        Rect::new(self.pos, size)
    }
}

/// Result of a single hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitOutcome {
    pub destroyed: bool,
    /// New sprite to show when the brick survived with a damaged look
    pub damaged_sprite: Option<&'static str>,
}

/// Everything a destruction (and its chain reaction) set off
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DestroyReport {
    /// Newly destroyed bricks, trigger first
    pub destroyed: Vec<BrickId>,
    /// Positions where a powerup should drop
    pub powerup_drops: Vec<Vec2>,
    /// Centres of exploding bricks
    pub explosions: Vec<Vec2>,
}

impl DestroyReport {
    pub fn is_empty(&self) -> bool {
        self.destroyed.is_empty()
    }
}

/// Remaining-brick summary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrickStats {
    /// Bricks spawned since the field was built or cleared
    pub total: usize,
    pub active: usize,
    pub by_kind: BTreeMap<BrickKind, usize>,
}

/// Live brick collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrickField {
    /// Sorted by id
    bricks: Vec<Brick>,
    brick_size: Vec2,
    explosion_radius: f32,
    spawned: usize,
    next_id: u32,
}

impl BrickField {
    /// Empty field using the geometry from `settings`
    pub fn new(settings: &Settings) -> Self {
        Self {
            bricks: Vec::new(),
            brick_size: Vec2::new(settings.brick_width, settings.brick_height),
            explosion_radius: settings.explosion_radius(),
            spawned: 0,
            next_id: 1,
        }
    }

    /// Default randomized grid
    ///
    /// Cell positions are shuffled. Kinds follow the generation row (first
    /// row blue, next two red, rest green) and `orange_brick_count` distinct
    /// cells are upgraded to orange.
    pub fn default_grid<R: Rng>(settings: &Settings, rng: &mut R) -> Self {
        let mut field = Self::new(settings);
        let rows = settings.brick_rows as usize;
        let cols = settings.brick_cols as usize;
        let (w, h, gap) = (settings.brick_width, settings.brick_height, settings.brick_gap);
        let start_x = centered_start_x(cols, settings.playfield_width, w, gap);
        let top = settings.brick_top;

        let mut slots: Vec<(u32, u32, Vec2)> = (0..rows)
            .flat_map(|row| {
                (0..cols).map(move |col| {
                    let pos = Vec2::new(
                        start_x + col as f32 * (w + gap),
                        top + row as f32 * (h + gap),
                    );
                    (row as u32, col as u32, pos)
                })
            })
            .collect();
        slots.shuffle(rng);

        let total = slots.len();
        let orange_count = (settings.orange_brick_count as usize).min(total);
        let orange: HashSet<usize> = rand::seq::index::sample(rng, total, orange_count)
            .into_iter()
            .collect();

        for (i, &(row, col, pos)) in slots.iter().enumerate() {
            let generation_row = i / cols.max(1);
            let kind = if orange.contains(&i) {
                BrickKind::Orange
            } else if generation_row == 0 {
                BrickKind::Blue
            } else if generation_row < 3 {
                BrickKind::Red
            } else {
                BrickKind::Green
            };
            let id = field.add(kind, pos);
            if let Some(brick) = field.get_mut(id) {
                brick.cell = Some((row, col));
            }
        }

        log::debug!("Generated {} bricks ({} orange)", field.len(), orange_count);
        field
    }

    /// Instantiate a parsed level
    ///
    /// Cells without a playable kind are skipped with a warning.
    pub fn from_level(level: &ParsedLevel, settings: &Settings) -> Self {
        let mut field = Self::new(settings);
        for placement in &level.bricks {
            let kind = match BrickKind::from_cell(placement.cell) {
                Ok(kind) => kind,
                Err(e) => {
                    log::warn!(
                        "Failed to create brick at {}, {}: {e}",
                        placement.x,
                        placement.y
                    );
                    continue;
                }
            };

            let id = field.add(kind, Vec2::new(placement.x, placement.y));
            if let Some(brick) = field.get_mut(id) {
                let special = &placement.special;
                if special.hits > 0 {
                    brick.hits = special.hits as u32;
                }
                brick.indestructible = special.indestructible;
                brick.effect = special.effect;
                brick.cell = Some((placement.row, placement.col));
            }
        }
        field
    }

    /// Add a brick of a known kind
    pub fn add(&mut self, kind: BrickKind, pos: Vec2) -> BrickId {
        let id = BrickId(self.next_id);
        self.next_id += 1;
        self.spawned += 1;
        self.bricks.push(Brick::new(id, kind, pos));
        id
    }

    /// Add a brick by catalog identifier
    pub fn add_by_type_id(&mut self, type_id: &str, pos: Vec2) -> Result<BrickId, Error> {
        let kind = BrickKind::from_id(type_id)?;
        Ok(self.add(kind, pos))
    }

    pub fn get(&self, id: BrickId) -> Option<&Brick> {
        self.bricks.iter().find(|b| b.id == id)
    }

    pub fn get_mut(&mut self, id: BrickId) -> Option<&mut Brick> {
        self.bricks.iter_mut().find(|b| b.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Brick> {
        self.bricks.iter()
    }

    pub fn active_bricks(&self) -> impl Iterator<Item = &Brick> {
        self.bricks.iter().filter(|b| b.active)
    }

    pub fn len(&self) -> usize {
        self.bricks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bricks.is_empty()
    }

    pub fn brick_size(&self) -> Vec2 {
        self.brick_size
    }

    pub fn explosion_radius(&self) -> f32 {
        self.explosion_radius
    }

    /// Apply one hit to a live brick; `None` for unknown or destroyed ids
    pub fn apply_hit(&mut self, id: BrickId) -> Option<HitOutcome> {
        let brick = self.bricks.iter_mut().find(|b| b.id == id && b.active)?;
        let destroyed = brick.apply_hit();
        let damaged_sprite = match brick.kind.def().damaged_sprite {
            Some(sprite) if !destroyed && brick.hits > 0 && !brick.indestructible => Some(sprite),
            _ => None,
        };
        Some(HitOutcome {
            destroyed,
            damaged_sprite,
        })
    }

    /// Hit a brick and destroy it if that was its last hit point
    pub fn hit(&mut self, id: BrickId) -> Option<(HitOutcome, DestroyReport)> {
        let outcome = self.apply_hit(id)?;
        let report = if outcome.destroyed {
            self.destroy(id)
        } else {
            DestroyReport::default()
        };
        Some((outcome, report))
    }

    /// Destroy a brick, propagating explosions. Destroying an inactive or
    /// unknown brick does nothing.
    pub fn destroy(&mut self, id: BrickId) -> DestroyReport {
        let mut report = DestroyReport::default();
        // Depth-first worklist; victims are pushed reversed so the
        // nearest-listed one is handled next
        let mut pending = vec![id];
        while let Some(id) = pending.pop() {
            let Some(brick) = self.bricks.iter_mut().find(|b| b.id == id && b.active) else {
                // Already gone in an earlier branch of the cascade
                continue;
            };
            brick.active = false;
            brick.hits = 0;
            let (pos, def) = (brick.pos, brick.kind.def());
            report.destroyed.push(id);

            if def.spawns_powerup {
                report.powerup_drops.push(pos);
            }

            if def.explodes {
                report.explosions.push(pos);
                let radius = self.explosion_radius;
                let victims: Vec<BrickId> = self
                    .bricks
                    .iter()
                    .filter(|b| b.active && !b.indestructible && b.pos.distance(pos) <= radius)
                    .map(|b| b.id)
                    .collect();
                log::debug!("Explosion at {pos} catches {} bricks", victims.len());
                pending.extend(victims.into_iter().rev());
            }
        }

        if !report.is_empty() {
            self.bricks.retain(|b| b.active);
        }
        report
    }

    /// Victory predicate: no destructible brick remains
    pub fn all_destroyed(&self) -> bool {
        self.remaining_count() == 0
    }

    /// Active bricks that still have to be cleared
    pub fn remaining_count(&self) -> usize {
        self.active_bricks().filter(|b| !b.indestructible).count()
    }

    /// Active brick whose bounds contain `point`
    pub fn brick_at(&self, point: Vec2) -> Option<&Brick> {
        self.active_bricks()
            .find(|b| b.bounds(self.brick_size).contains(point))
    }

    pub fn stats(&self) -> BrickStats {
        let mut stats = BrickStats {
            total: self.spawned,
            ..Default::default()
        };
        for brick in self.active_bricks() {
            stats.active += 1;
            *stats.by_kind.entry(brick.kind).or_default() += 1;
        }
        stats
    }

    /// Drop every brick
    pub fn clear(&mut self) {
        self.bricks.clear();
        self.spawned = 0;
    }
}
