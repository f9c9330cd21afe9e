//! # Mapper Configuration

use serde::Deserialize;

use crate::error::{MapError, Result};

/// Options controlling how values are mapped
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapperConfig {
    /// Match enum member names without regard to ASCII case
    pub ignore_enum_case: bool,
    /// Maximum nesting depth followed by deep mapping; unlimited when unset
    pub max_depth: Option<usize>,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            ignore_enum_case: true,
            max_depth: None,
        }
    }
}

impl MapperConfig {
    /// Parse a configuration from JSON; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| MapError::InvalidConfig(e.to_string()))
    }
}
