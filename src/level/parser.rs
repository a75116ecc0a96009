//! Level text parser
//!
//! ```text
//! [metadata]
//! name=Example Level
//!
//! [config]
//! ballSpeed=200
//!
//! [bricks]
//! BBBB
//! R..R
//!
//! [rules]
//! Orange bricks explode when hit
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::validate::validate_level;
use crate::Error;
use crate::centered_start_x;
use crate::consts::*;

/// Cell type named by a layout glyph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellType {
    Empty,
    Blue,
    Red,
    Green,
    Orange,
    Special,
    Wall,
    Metal,
    Diamond,
    Power,
    Chain,
    Teleport,
    Shield,
}

impl CellType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CellType::Empty => "empty",
            CellType::Blue => "blue",
            CellType::Red => "red",
            CellType::Green => "green",
            CellType::Orange => "orange",
            CellType::Special => "special",
            CellType::Wall => "wall",
            CellType::Metal => "metal",
            CellType::Diamond => "diamond",
            CellType::Power => "power",
            CellType::Chain => "chain",
            CellType::Teleport => "teleport",
            CellType::Shield => "shield",
        }
    }
}

/// Reserved brick effect tags. Recorded on bricks, no runtime behaviour yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialEffect {
    GuaranteedPowerup,
    ChainReaction,
    Teleport,
    Shield,
}

/// Per-glyph overrides, derived independently of the cell type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialProperties {
    pub explodes: bool,
    pub spawns_powerup: bool,
    /// Hit count override; -1 marks an indestructible cell
    pub hits: i32,
    pub indestructible: bool,
    pub effect: Option<SpecialEffect>,
}

impl Default for SpecialProperties {
    fn default() -> Self {
        Self {
            explodes: false,
            spawns_powerup: false,
            hits: 1,
            indestructible: false,
            effect: None,
        }
    }
}

/// A brick cell from the layout section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrickPlacement {
    pub row: u32,
    pub col: u32,
    /// Cell centre in playfield coordinates
    pub x: f32,
    pub y: f32,
    pub cell: CellType,
    pub glyph: char,
    pub special: SpecialProperties,
}

/// Coerced `[config]` value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl ConfigValue {
    /// Numbers first, then `true`/`false`, everything else stays text.
    /// A value counts as a number when it starts with a finite decimal
    /// literal, so `250px` reads as 250 and `inf` stays text.
    pub fn coerce(raw: &str) -> Self {
        if let Some(n) = leading_number(raw) {
            return ConfigValue::Number(n);
        }
        match raw {
            "true" => ConfigValue::Bool(true),
            "false" => ConfigValue::Bool(false),
            _ => ConfigValue::Text(raw.to_string()),
        }
    }
}

/// Longest decimal literal at the start of `raw` (sign, digits, fraction,
/// exponent), if it is finite
fn leading_number(raw: &str) -> Option<f64> {
    let bytes = raw.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let int_end = digits_from(end);
    let mut mantissa_digits = int_end - end;
    end = int_end;
    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        mantissa_digits += frac_end - end - 1;
        if mantissa_digits > 0 {
            end = frac_end;
        }
    }
    if mantissa_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    raw[..end].parse::<f64>().ok().filter(|n| n.is_finite())
}

/// `[config]` and `[rules]` sections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub values: BTreeMap<String, ConfigValue>,
    /// Free-form rule lines, informational only
    pub special_rules: Vec<String>,
}

impl Default for LevelConfig {
    fn default() -> Self {
        let mut values = BTreeMap::new();
        values.insert(
            "paddleSpeed".to_string(),
            ConfigValue::Number(START_BALL_SPEED as f64),
        );
        values.insert(
            "ballSpeed".to_string(),
            ConfigValue::Number(START_BALL_SPEED as f64),
        );
        values.insert("lives".to_string(), ConfigValue::Number(MAX_LIVES as f64));
        values.insert("powerupsEnabled".to_string(), ConfigValue::Bool(true));
        Self {
            values,
            special_rules: Vec::new(),
        }
    }
}

impl LevelConfig {
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.values.get(key)
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        match self.values.get(key) {
            Some(ConfigValue::Number(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn flag(&self, key: &str) -> Option<bool> {
        match self.values.get(key) {
            Some(ConfigValue::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn ball_speed(&self) -> Option<f32> {
        self.number("ballSpeed").map(|n| n as f32)
    }

    /// Starting lives, if the level sets a positive count
    pub fn lives(&self) -> Option<u32> {
        self.number("lives")
            .filter(|n| *n >= 1.0)
            .map(|n| n.floor() as u32)
    }

    pub fn powerups_enabled(&self) -> bool {
        self.flag("powerupsEnabled").unwrap_or(true)
    }
}

/// Structured result of parsing level text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedLevel {
    pub metadata: BTreeMap<String, String>,
    pub config: LevelConfig,
    pub bricks: Vec<BrickPlacement>,
}

impl Default for ParsedLevel {
    fn default() -> Self {
        let metadata = [
            ("name", "Custom Level"),
            ("difficulty", "normal"),
            ("description", ""),
            ("author", "Unknown"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            metadata,
            config: LevelConfig::default(),
            bricks: Vec::new(),
        }
    }
}

impl ParsedLevel {
    pub fn name(&self) -> Option<&str> {
        self.metadata
            .get("name")
            .map(String::as_str)
            .filter(|n| !n.is_empty())
    }

    pub fn brick_at(&self, row: u32, col: u32) -> Option<&BrickPlacement> {
        self.bricks.iter().find(|b| b.row == row && b.col == col)
    }
}

/// Placement geometry for the layout section
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    pub brick_width: f32,
    pub brick_height: f32,
    pub brick_gap: f32,
    pub field_width: f32,
    /// First column centre; centred on the widest row when `None`
    pub start_x: Option<f32>,
    pub start_y: f32,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            brick_width: BRICK_WIDTH,
            brick_height: BRICK_HEIGHT,
            brick_gap: BRICK_GAP,
            field_width: PLAYFIELD_WIDTH,
            start_x: None,
            start_y: BRICK_TOP,
        }
    }
}

/// Map a layout glyph to its cell type; `None` is an empty cell
pub fn cell_type_for(glyph: char) -> Option<CellType> {
    let cell = match glyph {
        'B' => CellType::Blue,
        'R' => CellType::Red,
        'G' => CellType::Green,
        'O' => CellType::Orange,
        'X' => CellType::Special,
        '#' => CellType::Wall,
        'M' => CellType::Metal,
        'D' => CellType::Diamond,
        'P' => CellType::Power,
        'C' => CellType::Chain,
        'T' => CellType::Teleport,
        'S' => CellType::Shield,
        // '.', ' ' and anything unrecognised
        _ => return None,
    };
    Some(cell)
}

/// Overrides carried by a glyph
pub fn special_properties_for(glyph: char) -> SpecialProperties {
    let mut props = SpecialProperties::default();
    match glyph {
        'B' => props.spawns_powerup = true,
        'R' => props.hits = 2,
        'O' => props.explodes = true,
        'M' => props.hits = 3,
        'D' => props.hits = 5,
        'P' => {
            props.spawns_powerup = true;
            props.effect = Some(SpecialEffect::GuaranteedPowerup);
        }
        'C' => props.effect = Some(SpecialEffect::ChainReaction),
        'T' => props.effect = Some(SpecialEffect::Teleport),
        'S' => props.effect = Some(SpecialEffect::Shield),
        '#' => {
            props.indestructible = true;
            props.hits = -1;
        }
        _ => {}
    }
    props
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Metadata,
    Config,
    Layout,
    Rules,
    Other,
}

impl Section {
    fn from_header(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "metadata" => Section::Metadata,
            "config" => Section::Config,
            "bricks" | "layout" => Section::Layout,
            "rules" => Section::Rules,
            _ => Section::Other,
        }
    }
}

fn key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let (key, value) = (key.trim(), value.trim());
    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key, value))
}

/// Parse level text with the default layout geometry
pub fn parse_level(text: &str) -> ParsedLevel {
    parse_level_with(text, &LayoutOptions::default())
}

/// Parse level text. Never fails; see [`parse_level_strict`].
pub fn parse_level_with(text: &str, options: &LayoutOptions) -> ParsedLevel {
    let mut level = ParsedLevel::default();
    let mut section = Section::Layout;
    let mut rows: Vec<&str> = Vec::new();

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') && line.len() >= 2 {
            section = Section::from_header(&line[1..line.len() - 1]);
            continue;
        }

        match section {
            Section::Metadata => {
                if let Some((key, value)) = key_value(line) {
                    level.metadata.insert(key.to_string(), value.to_string());
                }
            }
            Section::Config => {
                if let Some((key, value)) = key_value(line) {
                    level
                        .config
                        .values
                        .insert(key.to_string(), ConfigValue::coerce(value));
                }
            }
            Section::Rules => level.config.special_rules.push(line.to_string()),
            Section::Layout => rows.push(line),
            Section::Other => {}
        }
    }

    level.bricks = layout_bricks(&rows, options);
    log::debug!(
        "Parsed level {:?}: {} rows, {} bricks",
        level.name().unwrap_or("?"),
        rows.len(),
        level.bricks.len()
    );
    level
}

fn layout_bricks(rows: &[&str], options: &LayoutOptions) -> Vec<BrickPlacement> {
    let max_cols = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
    let start_x = options.start_x.unwrap_or_else(|| {
        centered_start_x(
            max_cols,
            options.field_width,
            options.brick_width,
            options.brick_gap,
        )
    });

    let mut bricks = Vec::new();
    for (row, text) in rows.iter().enumerate() {
        for (col, glyph) in text.chars().enumerate() {
            let Some(cell) = cell_type_for(glyph) else {
                continue;
            };
            bricks.push(BrickPlacement {
                row: row as u32,
                col: col as u32,
                x: start_x + col as f32 * (options.brick_width + options.brick_gap),
                y: options.start_y + row as f32 * (options.brick_height + options.brick_gap),
                cell,
                glyph,
                special: special_properties_for(glyph),
            });
        }
    }
    bricks
}

/// Parse and reject levels that fail validation
pub fn parse_level_strict(text: &str) -> Result<ParsedLevel, Error> {
    let level = parse_level(text);
    let validation = validate_level(&level);
    if !validation.valid {
        return Err(Error::Format(validation.errors));
    }
    for warning in &validation.warnings {
        log::warn!("Level {:?}: {warning}", level.name().unwrap_or("?"));
    }
    Ok(level)
}

/// Read and parse a level file. Read failures propagate; no retry.
pub fn load_level_file(path: impl AsRef<Path>) -> Result<ParsedLevel, Error> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let level = parse_level(&text);
    log::info!(
        "Loaded level {:?} from {} ({} bricks)",
        level.name().unwrap_or("?"),
        path.display(),
        level.bricks.len()
    );
    Ok(level)
}

/// Bundled example level
pub fn example_level() -> &'static str {
    "[metadata]
name=Example Level
difficulty=normal
description=A simple example level
author=Level Designer

[config]
ballSpeed=200
lives=3
powerupsEnabled=true

[bricks]
BBBBBBBBB
RRRRRRRRR
GGGGGGGGG
...OOO...
.........
BRBRBRBR.
GGGGGGGGG

[rules]
Orange bricks explode when hit
Blue bricks spawn powerups
Red bricks need 2 hits"
}
