//! Advisory level validation

use serde::{Deserialize, Serialize};

use super::parser::{CellType, ParsedLevel};

/// Validation result; callers decide whether to reject
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validation {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Check a parsed level without modifying it
pub fn validate_level(level: &ParsedLevel) -> Validation {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if level.bricks.is_empty() {
        errors.push("Level must contain at least one brick".to_string());
    }

    for (index, brick) in level.bricks.iter().enumerate() {
        if !brick.x.is_finite() || !brick.y.is_finite() {
            errors.push(format!("Brick {index} has invalid position"));
        }
        if brick.cell == CellType::Empty {
            warnings.push(format!("Brick {index} has empty type"));
        }
    }

    if level.name().is_none() {
        warnings.push("Level missing name".to_string());
    }

    Validation {
        valid: errors.is_empty(),
        errors,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{example_level, parse_level};

    #[test]
    fn test_example_level_is_valid() {
        let result = validate_level(&parse_level(example_level()));
        assert!(result.valid);
        assert!(result.errors.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_zero_bricks_is_an_error() {
        let result = validate_level(&parse_level("[bricks]\n....\n  \n"));
        assert!(!result.valid);
        assert_eq!(result.errors, vec!["Level must contain at least one brick"]);
    }

    #[test]
    fn test_bad_coordinates_and_empty_types() {
        let mut level = parse_level("GGG");
        level.bricks[0].x = f32::NAN;
        level.bricks[2].cell = CellType::Empty;
        let before = level.clone();

        let result = validate_level(&level);
        assert!(!result.valid);
        assert_eq!(result.errors, vec!["Brick 0 has invalid position"]);
        assert_eq!(result.warnings, vec!["Brick 2 has empty type"]);
        // Never mutates its input
        assert_eq!(level.bricks.len(), before.bricks.len());
        assert_eq!(level.bricks[2], before.bricks[2]);
    }

    #[test]
    fn test_missing_name_is_a_warning() {
        let mut level = parse_level("G");
        level.metadata.remove("name");
        let result = validate_level(&level);
        assert!(result.valid);
        assert_eq!(result.warnings, vec!["Level missing name"]);
    }
}
