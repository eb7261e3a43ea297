//! Lifecycle plugins and the pipeline that runs them.
//!
//! ```text
//! Plugin (record of optional hooks)
//!    │  built once, shared as Arc
//!    ▼
//! PluginPipeline (ordered list per reactive)
//!    │  fold / fan-out per lifecycle point
//!    ▼
//! ComponentSystem
//! ```

pub mod builtin;
mod hooks;
mod pipeline;

pub use hooks::{HookFuture, Plugin, PluginBuilder};
pub(crate) use pipeline::bounded;
pub use pipeline::{HookTimeouts, PluginPipeline};
