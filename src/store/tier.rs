//! Precedence tiers and lookup provenance.

use serde::Serialize;
use serde_json::Value;

/// Value source, ordered lowest to highest precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigTier {
    /// Programmer-supplied defaults (lowest priority)
    Default = 0,
    /// Loaded config file
    File = 1,
    /// Explicit key -> environment variable bindings
    BoundEnv = 2,
    /// `PREFIX_KEY` environment lookup for any key
    AutomaticEnv = 3,
    /// Explicit overrides (highest priority)
    Override = 4,
}

impl std::fmt::Display for ConfigTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigTier::Default => write!(f, "default"),
            ConfigTier::File => write!(f, "file"),
            ConfigTier::BoundEnv => write!(f, "bound env"),
            ConfigTier::AutomaticEnv => write!(f, "automatic env"),
            ConfigTier::Override => write!(f, "override"),
        }
    }
}

/// A looked-up value together with the tier that supplied it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolved {
    pub value: Value,
    pub tier: ConfigTier,
}

impl Resolved {
    pub(crate) fn new(value: Value, tier: ConfigTier) -> Self {
        Self { value, tier }
    }
}
