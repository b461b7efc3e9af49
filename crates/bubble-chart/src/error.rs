#![forbid(unsafe_code)]

//! Errors surfaced by the chart driver.

use std::fmt;

use bubble_layout::InvalidDataError;

use crate::config::ConfigError;

/// A rejected update or construction. The retained render state is never
/// modified when one of these is returned.
#[derive(Debug)]
pub enum ChartError {
    /// The dataset failed hierarchy normalization.
    InvalidData(InvalidDataError),
    /// The configuration failed validation.
    Config(Vec<ConfigError>),
    /// JSON input could not be parsed.
    Parse(serde_json::Error),
}

impl fmt::Display for ChartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidData(e) => write!(f, "invalid data: {e}"),
            Self::Config(errors) => {
                f.write_str("invalid config: ")?;
                for (i, e) in errors.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    write!(f, "{e}")?;
                }
                Ok(())
            }
            Self::Parse(e) => write!(f, "parse error: {e}"),
        }
    }
}

impl std::error::Error for ChartError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidData(e) => Some(e),
            Self::Config(errors) => errors
                .first()
                .map(|e| e as &(dyn std::error::Error + 'static)),
            Self::Parse(e) => Some(e),
        }
    }
}

impl From<InvalidDataError> for ChartError {
    fn from(e: InvalidDataError) -> Self {
        Self::InvalidData(e)
    }
}

impl From<Vec<ConfigError>> for ChartError {
    fn from(errors: Vec<ConfigError>) -> Self {
        Self::Config(errors)
    }
}

impl From<serde_json::Error> for ChartError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}
