//! Engine configuration.
//!
//! Loaded from TOML; every field has a default so an empty file (or no
//! file at all) yields a working configuration.

mod loader;
mod types;

pub use loader::ConfigError;
pub use types::{EngineConfig, HookConfig, NamingConfig};
