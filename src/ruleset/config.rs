//! RuleSet configuration types.

use serde::{Deserialize, Serialize};

/// How a rule set treats entries that fail to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Any invalid entry is a configuration error (fail-closed)
    #[default]
    Strict,
    /// Invalid entries are logged and never match
    #[serde(alias = "lenient")]
    Permissive,
}

impl ValidationMode {
    /// Get the internal name of this mode.
    pub fn name(&self) -> &'static str {
        match self {
            ValidationMode::Strict => "strict",
            ValidationMode::Permissive => "permissive",
        }
    }
}

/// Configuration for a RuleSet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSetConfig {
    /// Name of the list, used in log output
    pub name: String,
    /// Policy for entries that fail to parse
    pub mode: ValidationMode,
}

impl RuleSetConfig {
    /// Create a new RuleSetConfig.
    pub fn new(name: impl Into<String>, mode: ValidationMode) -> Self {
        Self {
            name: name.into(),
            mode,
        }
    }

    /// Create a strict configuration with the given name.
    pub fn strict(name: impl Into<String>) -> Self {
        Self::new(name, ValidationMode::Strict)
    }

    /// Create a permissive configuration with the given name.
    pub fn permissive(name: impl Into<String>) -> Self {
        Self::new(name, ValidationMode::Permissive)
    }
}

impl Default for RuleSetConfig {
    fn default() -> Self {
        Self::strict("default")
    }
}
