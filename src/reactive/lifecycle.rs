//! Reactive lifecycle state machine.
//!
//! ```text
//! Uninitialized → Creating → Active ⇄ Updating
//!                              │         │
//!                              └──┬──────┘
//!                                 ▼
//!                            Destroying → Destroyed
//! ```

use std::fmt;

/// Lifecycle state of a reactive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    #[default]
    Uninitialized,
    Creating,
    Active,
    Updating,
    Destroying,
    Destroyed,
}

/// Events that drive [`LifecycleState`] transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    Create,
    Constructed,
    Set,
    /// The update committed or was rejected; either way the reactive is usable again.
    UpdateFinished,
    Destroy,
    TeardownComplete,
}

/// A transition the state machine refuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidTransition {
    pub from: LifecycleState,
    pub event: LifecycleEvent,
}

impl fmt::Display for InvalidTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot apply {:?} in state {:?}", self.event, self.from)
    }
}

impl std::error::Error for InvalidTransition {}

impl LifecycleState {
    /// Compute the state after `event`, or refuse the transition.
    pub fn next(self, event: LifecycleEvent) -> Result<Self, InvalidTransition> {
        use LifecycleEvent as E;
        use LifecycleState as S;

        let next = match (self, event) {
            (S::Uninitialized, E::Create) => S::Creating,
            (S::Creating, E::Constructed) => S::Active,
            (S::Active, E::Set) => S::Updating,
            (S::Updating, E::UpdateFinished) => S::Active,
            (S::Active | S::Updating, E::Destroy) => S::Destroying,
            (S::Destroying, E::TeardownComplete) => S::Destroyed,
            (from, event) => return Err(InvalidTransition { from, event }),
        };
        Ok(next)
    }

    /// True once destruction has started.
    pub fn is_terminal(self) -> bool {
        matches!(self, LifecycleState::Destroying | LifecycleState::Destroyed)
    }
}
