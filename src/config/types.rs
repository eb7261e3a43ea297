use serde::{Deserialize, Serialize};

/// Root engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub hooks: HookConfig,
    #[serde(default)]
    pub naming: NamingConfig,
}

/// Bounds on interceptor execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookConfig {
    /// Per-hook timeout in milliseconds for create and update hooks.
    /// Unbounded when absent.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    /// Per-hook timeout for `before_destroy` hooks (default: 5000).
    #[serde(default = "default_destroy_timeout_ms")]
    pub destroy_timeout_ms: u64,
}

/// Id generation for reactives created without an id or name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamingConfig {
    /// Prefix of generated ids, as in `{prefix}-{uuid}` (default: "reactive").
    #[serde(default = "default_generated_prefix")]
    pub generated_prefix: String,
}

fn default_destroy_timeout_ms() -> u64 {
    5000
}

fn default_generated_prefix() -> String {
    "reactive".to_string()
}

impl Default for HookConfig {
    fn default() -> Self {
        Self {
            timeout_ms: None,
            destroy_timeout_ms: default_destroy_timeout_ms(),
        }
    }
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            generated_prefix: default_generated_prefix(),
        }
    }
}
