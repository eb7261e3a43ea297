//! Error types for the reactive engine.

use std::fmt;

use thiserror::Error;

/// Lifecycle point at which an interceptor ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookStage {
    BeforeCreate,
    AfterCreate,
    BeforeUpdate,
    AfterUpdate,
    BeforeDestroy,
    /// Effect body of an `effect` reactive. Failures are reported under
    /// the plugin name `effect`.
    Effect,
}

impl fmt::Display for HookStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HookStage::BeforeCreate => "before_create",
            HookStage::AfterCreate => "after_create",
            HookStage::BeforeUpdate => "before_update",
            HookStage::AfterUpdate => "after_update",
            HookStage::BeforeDestroy => "before_destroy",
            HookStage::Effect => "effect",
        };
        f.write_str(name)
    }
}

/// Error raised by an interceptor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HookError {
    /// The interceptor refused the payload.
    #[error("{0}")]
    Rejected(String),

    /// The interceptor did not finish within the configured bound.
    #[error("timed out after {timeout_ms}ms")]
    TimedOut { timeout_ms: u64 },
}

impl HookError {
    /// Shorthand for [`HookError::Rejected`].
    pub fn rejected(reason: impl Into<String>) -> Self {
        HookError::Rejected(reason.into())
    }
}

/// A single interceptor failure, tagged with where it happened.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("plugin '{plugin}' failed in {stage}: {error}")]
pub struct HookFailure {
    pub plugin: String,
    pub stage: HookStage,
    #[source]
    pub error: HookError,
}

/// Errors surfaced by [`ComponentSystem`](crate::system::ComponentSystem) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReactiveError {
    /// A reactive with this id is already live.
    #[error("reactive '{id}' already exists")]
    DuplicateId { id: String },

    /// Declared dependencies would close a cycle through the reactive.
    #[error("reactive '{id}' would create a dependency cycle: {}", path.join(" -> "))]
    CyclicDependency { id: String, path: Vec<String> },

    /// An interceptor rejected creation or update, or the plugin set is invalid.
    #[error("plugin '{plugin}' rejected {stage}: {reason}")]
    PluginRejected {
        plugin: String,
        stage: HookStage,
        reason: String,
    },

    /// No live reactive with this id.
    #[error("reactive '{id}' not found")]
    NotFound { id: String },

    /// The runtime shut down before the operation's task finished.
    #[error("operation on reactive '{id}' was aborted")]
    Aborted { id: String },

    /// One or more `before_destroy` interceptors failed. The id was released anyway.
    #[error("reactive '{id}' destroyed with {} plugin failure(s)", failures.len())]
    DestroyFailure { id: String, failures: Vec<HookFailure> },
}

impl ReactiveError {
    pub(crate) fn not_found(id: &str) -> Self {
        ReactiveError::NotFound { id: id.to_string() }
    }
}

impl From<HookFailure> for ReactiveError {
    fn from(failure: HookFailure) -> Self {
        ReactiveError::PluginRejected {
            plugin: failure.plugin,
            stage: failure.stage,
            reason: failure.error.to_string(),
        }
    }
}

pub type Result<T, E = ReactiveError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_error_renders_path() {
        let err = ReactiveError::CyclicDependency {
            id: "a".to_string(),
            path: vec!["a".to_string(), "b".to_string(), "a".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "reactive 'a' would create a dependency cycle: a -> b -> a"
        );
    }

    #[test]
    fn hook_failure_converts_to_plugin_rejected() {
        let failure = HookFailure {
            plugin: "guard".to_string(),
            stage: HookStage::BeforeUpdate,
            error: HookError::rejected("negative"),
        };

        match ReactiveError::from(failure) {
            ReactiveError::PluginRejected { plugin, stage, reason } => {
                assert_eq!(plugin, "guard");
                assert_eq!(stage, HookStage::BeforeUpdate);
                assert_eq!(reason, "negative");
            }
            other => panic!("Expected PluginRejected, got {other:?}"),
        }
    }
}
