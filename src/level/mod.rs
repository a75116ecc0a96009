//! Text level format
//!
//! Levels are line-oriented text with `[metadata]`, `[config]`,
//! `[bricks]`/`[layout]` and `[rules]` sections. Parsing is lenient: unknown
//! glyphs become empty cells. [`validate_level`] reports what is unusable and
//! the caller decides whether to reject the level.

pub mod parser;
pub mod validate;

pub use parser::{
    BrickPlacement, CellType, ConfigValue, LayoutOptions, LevelConfig, ParsedLevel,
    SpecialEffect, SpecialProperties, cell_type_for, example_level, load_level_file, parse_level,
    parse_level_strict, parse_level_with, special_properties_for,
};
pub use validate::{Validation, validate_level};
