//! Runtime configuration for the reference host.

use serde::Deserialize;

use crate::error::HookError;

fn default_max_slots() -> usize {
    1024
}

fn default_check_hook_count() -> bool {
    true
}

/// Limits and validation switches for [`Runtime`](crate::host::Runtime).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RuntimeConfig {
    /// Maximum number of hook slots a single instance may allocate.
    #[serde(default = "default_max_slots")]
    pub max_slots: usize,

    /// Reject renders that call more or fewer hooks than the first
    /// committed render of the same instance.
    #[serde(default = "default_check_hook_count")]
    pub check_hook_count: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_slots: default_max_slots(),
            check_hook_count: default_check_hook_count(),
        }
    }
}

impl RuntimeConfig {
    /// Parse a config from a JSON string. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, HookError> {
        serde_json::from_str(json).map_err(HookError::Config)
    }
}
