//! Brick type catalog
//!
//! Static attributes of each playable brick kind.

use serde::{Deserialize, Serialize};

use crate::Error;
use crate::level::CellType;

/// Playable brick kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrickKind {
    /// Drops a powerup when destroyed
    Blue,
    /// Takes two hits, shows a cracked sprite in between
    Red,
    Green,
    /// Explodes, destroying neighbours
    Orange,
}

/// Catalog entry for a brick kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrickTypeDef {
    pub id: &'static str,
    pub sprite: &'static str,
    pub damaged_sprite: Option<&'static str>,
    pub hits: u32,
    pub spawns_powerup: bool,
    pub explodes: bool,
}

const BLUE: BrickTypeDef = BrickTypeDef {
    id: "blue",
    sprite: "brick_blue",
    damaged_sprite: None,
    hits: 1,
    spawns_powerup: true,
    explodes: false,
};

const RED: BrickTypeDef = BrickTypeDef {
    id: "red",
    sprite: "brick_red_whole",
    damaged_sprite: Some("brick_red_damaged"),
    hits: 2,
    spawns_powerup: false,
    explodes: false,
};

const GREEN: BrickTypeDef = BrickTypeDef {
    id: "green",
    sprite: "brick_green",
    damaged_sprite: None,
    hits: 1,
    spawns_powerup: false,
    explodes: false,
};

const ORANGE: BrickTypeDef = BrickTypeDef {
    id: "orange",
    sprite: "brick_orange",
    damaged_sprite: None,
    hits: 1,
    spawns_powerup: false,
    explodes: true,
};

impl BrickKind {
    pub const ALL: [BrickKind; 4] = [
        BrickKind::Blue,
        BrickKind::Red,
        BrickKind::Green,
        BrickKind::Orange,
    ];

    pub fn def(&self) -> &'static BrickTypeDef {
        match self {
            BrickKind::Blue => &BLUE,
            BrickKind::Red => &RED,
            BrickKind::Green => &GREEN,
            BrickKind::Orange => &ORANGE,
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.def().id
    }

    /// Resolve a type identifier (case-insensitive)
    pub fn from_id(id: &str) -> Result<Self, Error> {
        let lowered = id.to_lowercase();
        BrickKind::ALL
            .into_iter()
            .find(|kind| kind.def().id == lowered)
            .ok_or_else(|| Error::UnknownBrickType(id.to_string()))
    }

    /// Playable kind for a level cell. Metal, diamond, power and wall cells
    /// borrow the look of a base kind; the rest have no counterpart.
    pub fn from_cell(cell: CellType) -> Result<Self, Error> {
        match cell {
            CellType::Blue | CellType::Diamond | CellType::Power => Ok(BrickKind::Blue),
            CellType::Red | CellType::Metal => Ok(BrickKind::Red),
            CellType::Green | CellType::Wall => Ok(BrickKind::Green),
            CellType::Orange => Ok(BrickKind::Orange),
            CellType::Empty
            | CellType::Special
            | CellType::Chain
            | CellType::Teleport
            | CellType::Shield => Err(Error::UnknownBrickType(cell.as_str().to_string())),
        }
    }
}
