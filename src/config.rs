//! Runtime engine configuration

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Environment variable consulted by [`EngineConfig::from_env`].
pub const VALIDATION_ENV_VAR: &str = "QUARRY_BOARD_VALIDATION";

/// How thoroughly a [`Board`](crate::board::Board) checks itself.
///
/// Level 2 snapshots the whole grid on the move stack for every move, which
/// roughly multiplies stack memory by the board area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationLevel {
    /// No checks
    None,
    /// Validate the board after every move and undo
    Basic,
    /// Basic checks plus grid snapshots verified on undo
    Full,
}

impl Default for ValidationLevel {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            ValidationLevel::Basic
        } else {
            ValidationLevel::None
        }
    }
}

impl FromStr for ValidationLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "0" | "none" => Ok(ValidationLevel::None),
            "1" | "basic" => Ok(ValidationLevel::Basic),
            "2" | "full" => Ok(ValidationLevel::Full),
            _ => Err(Error::InvalidValidationLevel(s.to_string())),
        }
    }
}

impl fmt::Display for ValidationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ValidationLevel::None => "none",
            ValidationLevel::Basic => "basic",
            ValidationLevel::Full => "full",
        })
    }
}

/// Engine-wide settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub validation: ValidationLevel,
}

impl EngineConfig {
    pub fn with_validation(validation: ValidationLevel) -> Self {
        Self { validation }
    }

    /// Build a configuration from the defaults overridden by the environment.
    ///
    /// An unset variable keeps the default; a malformed one is an error.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Ok(value) = std::env::var(VALIDATION_ENV_VAR) {
            config.validation = value.parse()?;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_validation_level() {
        assert_eq!("0".parse::<ValidationLevel>(), Ok(ValidationLevel::None));
        assert_eq!("basic".parse::<ValidationLevel>(), Ok(ValidationLevel::Basic));
        assert_eq!(" FULL ".parse::<ValidationLevel>(), Ok(ValidationLevel::Full));
        assert_eq!(
            "3".parse::<ValidationLevel>(),
            Err(Error::InvalidValidationLevel("3".to_string()))
        );
    }

    #[test]
    fn test_config_serde() {
        let config = EngineConfig::with_validation(ValidationLevel::Full);
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(json, r#"{"validation":"full"}"#);

        let parsed: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, EngineConfig::default());
    }

    #[test]
    fn test_validation_ordering() {
        assert!(ValidationLevel::Full > ValidationLevel::Basic);
        assert!(ValidationLevel::Basic > ValidationLevel::None);
    }
}
