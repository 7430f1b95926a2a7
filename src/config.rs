//! Per-entity query configuration
//!
//! Loaded alongside the key schema (see `schema::SchemaLoader`) or built in
//! code. Defaults: scans allowed, scan counting disabled, store-default
//! read consistency.

use serde::{Deserialize, Serialize};

/// Read consistency requested from the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsistencyMode {
    /// Leave the choice to the store
    #[default]
    Default,
    /// Strongly consistent reads
    Consistent,
    /// Eventually consistent reads
    Eventual,
}

impl ConsistencyMode {
    /// Value for the native `consistent_read` flag
    pub fn consistent_read(&self) -> Option<bool> {
        match self {
            ConsistencyMode::Default => None,
            ConsistencyMode::Consistent => Some(true),
            ConsistencyMode::Eventual => Some(false),
        }
    }
}

/// Whether full scans may be issued for this entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanPolicy {
    /// Queries may fall back to a filtered scan
    #[serde(default = "scan_enabled_default")]
    pub enabled: bool,
    /// Page totals may be computed by scanning
    #[serde(default)]
    pub count_enabled: bool,
}

fn scan_enabled_default() -> bool {
    true
}

impl Default for ScanPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            count_enabled: false,
        }
    }
}

impl ScanPolicy {
    /// Scans and scan counts both allowed
    pub fn permissive() -> Self {
        Self {
            enabled: true,
            count_enabled: true,
        }
    }

    /// No scans at all
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            count_enabled: false,
        }
    }
}

/// Query configuration for one entity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QueryConfig {
    #[serde(default)]
    pub scan: ScanPolicy,
    #[serde(default)]
    pub consistency: ConsistencyMode,
}
