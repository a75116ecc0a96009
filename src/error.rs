//! Crate error type

/// Errors surfaced by the gameplay core.
#[derive(Debug)]
pub enum Error {
    /// Brick type identifier with no catalog entry
    UnknownBrickType(String),
    /// Powerup type identifier that is neither speedup nor slowdown
    UnknownPowerupType(String),
    /// Level text is structurally unusable (validation errors)
    Format(Vec<String>),
    /// Reading a level or settings file failed
    Io(std::io::Error),
    /// Settings or level JSON failed to (de)serialize
    Json(serde_json::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::UnknownBrickType(id) => write!(f, "invalid brick type: {id}"),
            Error::UnknownPowerupType(id) => write!(f, "invalid powerup type: {id}"),
            Error::Format(errors) => write!(f, "invalid level: {}", errors.join("; ")),
            Error::Io(e) => write!(f, "IO error: {e}"),
            Error::Json(e) => write!(f, "JSON error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let e = Error::UnknownBrickType("purple".into());
        assert_eq!(e.to_string(), "invalid brick type: purple");

        let e = Error::Format(vec!["a".into(), "b".into()]);
        assert_eq!(e.to_string(), "invalid level: a; b");
    }

    #[test]
    fn test_io_source_is_preserved() {
        use std::error::Error as _;
        let e: Error = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(e.source().is_some());
        assert!(e.to_string().contains("gone"));
    }
}
